//! Campaign domain: stage/node progression plugin wiring and public exports.

mod director;
mod events;
mod map;
mod run_state;
mod systems;


pub use director::{Campaign, CampaignNotice};
pub use events::{
    AbandonRunRequest, CompleteNodeRequest, CursesUpdatedEvent, DeckUpdatedEvent,
    FortressUpdatedEvent, GoldUpdatedEvent, LoadRunRequest, MoveToNodeRequest, NodeCompletedEvent,
    NodeSelectedEvent, RelicsUpdatedEvent, RosterUpdatedEvent, RunAbandonedEvent,
    RunCompletedEvent, RunLoadedEvent, RunStartedEvent, StageCompletedEvent, StageEnteredEvent,
    StartRunRequest,
};
pub use map::{CampaignMap, CampaignNode, CampaignStage, MapError};
pub use run_state::{normalize_card_id, RunState, StageSnapshot};

use bevy::prelude::*;

use crate::campaign::systems::{
    handle_abandon_run, handle_complete_node, handle_load_run, handle_move_to_node,
    handle_start_run, publish_notices,
};

pub struct CampaignPlugin;

impl Plugin for CampaignPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<Campaign>()
            .add_message::<StartRunRequest>()
            .add_message::<LoadRunRequest>()
            .add_message::<AbandonRunRequest>()
            .add_message::<MoveToNodeRequest>()
            .add_message::<CompleteNodeRequest>()
            .add_message::<RunStartedEvent>()
            .add_message::<RunLoadedEvent>()
            .add_message::<RunAbandonedEvent>()
            .add_message::<StageEnteredEvent>()
            .add_message::<NodeSelectedEvent>()
            .add_message::<NodeCompletedEvent>()
            .add_message::<StageCompletedEvent>()
            .add_message::<RunCompletedEvent>()
            .add_message::<GoldUpdatedEvent>()
            .add_message::<FortressUpdatedEvent>()
            .add_message::<DeckUpdatedEvent>()
            .add_message::<RelicsUpdatedEvent>()
            .add_message::<CursesUpdatedEvent>()
            .add_message::<RosterUpdatedEvent>()
            .add_systems(
                Update,
                (
                    handle_start_run,
                    handle_load_run,
                    handle_abandon_run,
                    handle_move_to_node,
                    handle_complete_node,
                    publish_notices,
                )
                    .chain(),
            );
    }
}
