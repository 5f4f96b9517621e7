//! Relics domain: run-scoped modifiers, triggers, and drafting.

mod drafting;
mod engine;
mod events;
mod modifiers;
mod rewards;


pub use drafting::{draft_curse, draft_relics, draft_starting_relics};
pub use engine::{RelicChange, RelicEngine, TriggerContext};
pub use events::{RelicAddedEvent, RelicRemovedEvent};
pub use modifiers::AggregateModifiers;
pub use rewards::{ClaimRelicRequest, CurrentRelicChoices, RelicRewardOfferedEvent};

use bevy::ecs::message::MessageWriter;
use bevy::prelude::*;

use crate::relics::rewards::{handle_claim_relic, offer_relic_rewards};

pub struct RelicsPlugin;

impl Plugin for RelicsPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<RelicEngine>()
            .init_resource::<CurrentRelicChoices>()
            .add_message::<RelicAddedEvent>()
            .add_message::<RelicRemovedEvent>()
            .add_message::<RelicRewardOfferedEvent>()
            .add_message::<ClaimRelicRequest>()
            .add_systems(
                Update,
                (publish_relic_changes, offer_relic_rewards, handle_claim_relic),
            );
    }
}

/// Drain pending relic set changes into typed messages.
fn publish_relic_changes(
    mut engine: ResMut<RelicEngine>,
    mut added: MessageWriter<RelicAddedEvent>,
    mut removed: MessageWriter<RelicRemovedEvent>,
) {
    if !engine.has_changes() {
        return;
    }
    for change in engine.take_changes() {
        match change {
            RelicChange::Added(relic_id) => {
                added.write(RelicAddedEvent { relic_id });
            }
            RelicChange::Removed(relic_id) => {
                removed.write(RelicRemovedEvent { relic_id });
            }
        }
    }
}
