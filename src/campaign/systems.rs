//! Campaign domain: request handlers and the notice publisher.

use bevy::ecs::message::{MessageReader, MessageWriter};
use bevy::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::content::{ContentRegistry, GameplayDefaults};
use crate::core::{GameState, RunConfig};
use crate::persistence::{load_run, SaveSlot};
use crate::relics::RelicEngine;

use super::director::{Campaign, CampaignNotice};
use super::events::*;

/// Start a fresh run on request, reseeding the run config first.
pub(crate) fn handle_start_run(
    mut requests: MessageReader<StartRunRequest>,
    mut campaign: ResMut<Campaign>,
    mut relics: ResMut<RelicEngine>,
    mut run_config: ResMut<RunConfig>,
    registry: Option<Res<ContentRegistry>>,
    defaults: Option<Res<GameplayDefaults>>,
    mut game_state: ResMut<NextState<GameState>>,
) {
    let (Some(registry), Some(defaults)) = (registry, defaults) else {
        return;
    };

    for request in requests.read() {
        run_config.reseed();
        run_config.faction_id = request.faction_id.clone();
        run_config.difficulty = request.difficulty;

        let mut rng = ChaCha8Rng::seed_from_u64(run_config.seed);
        match campaign.start_new_run(
            &request.faction_id,
            request.difficulty,
            request.commander_override.as_deref(),
            &registry,
            &defaults,
            &mut relics,
            &mut rng,
        ) {
            Ok(()) => {
                game_state.set(GameState::Run);
            }
            Err(e) => {
                error!("Cannot start run: {}", e);
            }
        }
    }
}

/// Restore the saved run, if any. Missing or unreadable saves degrade to a
/// quiet no-op.
pub(crate) fn handle_load_run(
    mut requests: MessageReader<LoadRunRequest>,
    mut campaign: ResMut<Campaign>,
    mut relics: ResMut<RelicEngine>,
    mut run_config: ResMut<RunConfig>,
    registry: Option<Res<ContentRegistry>>,
    save_slot: Res<SaveSlot>,
    mut game_state: ResMut<NextState<GameState>>,
) {
    let Some(registry) = registry else {
        return;
    };

    for _request in requests.read() {
        let Some(saved) = load_run(&save_slot) else {
            info!("No saved run to load");
            continue;
        };
        run_config.seed = saved.seed;
        run_config.faction_id = saved.state.faction_id.clone();
        run_config.difficulty = saved.state.difficulty;
        if campaign.load_saved_run(saved.state, &registry, &mut relics) {
            game_state.set(GameState::Run);
        }
    }
}

pub(crate) fn handle_abandon_run(
    mut requests: MessageReader<AbandonRunRequest>,
    mut campaign: ResMut<Campaign>,
    mut relics: ResMut<RelicEngine>,
    mut game_state: ResMut<NextState<GameState>>,
) {
    for _request in requests.read() {
        if campaign.abandon_run() {
            relics.reset();
            game_state.set(GameState::MainMenu);
        }
    }
}

pub(crate) fn handle_move_to_node(
    mut requests: MessageReader<MoveToNodeRequest>,
    mut campaign: ResMut<Campaign>,
    mut relics: ResMut<RelicEngine>,
) {
    for request in requests.read() {
        if !campaign.move_to_node(&request.node_id, &mut relics) {
            warn!("Rejected move to node '{}'", request.node_id);
        }
    }
}

pub(crate) fn handle_complete_node(
    mut requests: MessageReader<CompleteNodeRequest>,
    mut campaign: ResMut<Campaign>,
    mut relics: ResMut<RelicEngine>,
    defaults: Option<Res<GameplayDefaults>>,
    mut game_state: ResMut<NextState<GameState>>,
) {
    let Some(defaults) = defaults else {
        return;
    };
    for request in requests.read() {
        // A run that just completed sends the player to the victory screen.
        if campaign.complete_node(&request.node_id, &defaults, &mut relics)
            && campaign.notices().contains(&CampaignNotice::RunCompleted)
        {
            game_state.set(GameState::Victory);
        }
    }
}

/// Drain queued notices into typed messages with snapshot payloads.
#[allow(clippy::type_complexity)]
pub(crate) fn publish_notices(
    mut campaign: ResMut<Campaign>,
    mut lifecycle: (
        MessageWriter<RunStartedEvent>,
        MessageWriter<RunLoadedEvent>,
        MessageWriter<RunAbandonedEvent>,
        MessageWriter<StageEnteredEvent>,
        MessageWriter<NodeSelectedEvent>,
        MessageWriter<NodeCompletedEvent>,
        MessageWriter<StageCompletedEvent>,
        MessageWriter<RunCompletedEvent>,
    ),
    mut updates: (
        MessageWriter<GoldUpdatedEvent>,
        MessageWriter<FortressUpdatedEvent>,
        MessageWriter<DeckUpdatedEvent>,
        MessageWriter<RelicsUpdatedEvent>,
        MessageWriter<CursesUpdatedEvent>,
        MessageWriter<RosterUpdatedEvent>,
    ),
) {
    if !campaign.has_notices() {
        return;
    }

    for notice in campaign.take_notices() {
        match notice {
            CampaignNotice::RunStarted => {
                if let Some(state) = campaign.run_state() {
                    lifecycle.0.write(RunStartedEvent { state });
                }
            }
            CampaignNotice::RunLoaded => {
                if let Some(state) = campaign.run_state() {
                    lifecycle.1.write(RunLoadedEvent { state });
                }
            }
            CampaignNotice::RunAbandoned => {
                lifecycle.2.write(RunAbandonedEvent);
            }
            CampaignNotice::StageEntered(index) => {
                if let Some(stage) = campaign.stage_snapshot(index) {
                    lifecycle.3.write(StageEnteredEvent { stage });
                }
            }
            CampaignNotice::NodeSelected(id) => {
                if let Some(node) = campaign.node_snapshot(&id) {
                    lifecycle.4.write(NodeSelectedEvent { node });
                }
            }
            CampaignNotice::NodeCompleted(id) => {
                if let Some(node) = campaign.node_snapshot(&id) {
                    lifecycle.5.write(NodeCompletedEvent { node });
                }
            }
            CampaignNotice::StageCompleted(stage_index) => {
                lifecycle.6.write(StageCompletedEvent { stage_index });
            }
            CampaignNotice::RunCompleted => {
                if let Some(state) = campaign.run_state() {
                    lifecycle.7.write(RunCompletedEvent { state });
                }
            }
            CampaignNotice::GoldUpdated => {
                if let Some(state) = campaign.run_state() {
                    updates.0.write(GoldUpdatedEvent { gold: state.gold });
                }
            }
            CampaignNotice::FortressUpdated => {
                if let Some(state) = campaign.run_state() {
                    updates.1.write(FortressUpdatedEvent {
                        fortress_hp: state.fortress_hp,
                        fortress_max_hp: state.fortress_max_hp,
                    });
                }
            }
            CampaignNotice::DeckUpdated => {
                updates.2.write(DeckUpdatedEvent {
                    deck: campaign.deck_snapshot(),
                    card_collection: campaign.card_collection(),
                });
            }
            CampaignNotice::RelicsUpdated => {
                if let Some(state) = campaign.run_state() {
                    updates.3.write(RelicsUpdatedEvent {
                        relics: state.relics,
                    });
                }
            }
            CampaignNotice::CursesUpdated => {
                if let Some(state) = campaign.run_state() {
                    updates.4.write(CursesUpdatedEvent {
                        curses: state.curses,
                    });
                }
            }
            CampaignNotice::RosterUpdated => {
                if let Some(state) = campaign.run_state() {
                    updates.5.write(RosterUpdatedEvent {
                        commanders: state.commander_roster,
                    });
                }
            }
        }
    }
}
