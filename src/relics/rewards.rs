//! Relics domain: relic reward offers after combat encounters.

use bevy::ecs::message::{Message, MessageReader, MessageWriter};
use bevy::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::campaign::{Campaign, NodeCompletedEvent};
use crate::content::{ContentRegistry, GameplayDefaults, NodeType};
use crate::core::RunConfig;
use crate::relics::drafting::draft_relics;
use crate::relics::engine::RelicEngine;

/// Relic choices currently on offer (empty when none).
#[derive(Resource, Debug, Default)]
pub struct CurrentRelicChoices {
    pub choices: Vec<String>,
}

/// Fired when a cleared encounter puts relics on offer.
#[derive(Debug)]
pub struct RelicRewardOfferedEvent {
    pub node_id: String,
    pub choices: Vec<String>,
}

impl Message for RelicRewardOfferedEvent {}

/// Claim one of the offered relics.
#[derive(Debug)]
pub struct ClaimRelicRequest {
    pub relic_id: String,
}

impl Message for ClaimRelicRequest {}

/// Offer relic choices after combat nodes. The node's reward tier picks the
/// preferred rarity; a pending reward upgrade bumps it one tier.
pub(crate) fn offer_relic_rewards(
    mut node_events: MessageReader<NodeCompletedEvent>,
    mut offers: MessageWriter<RelicRewardOfferedEvent>,
    mut campaign: ResMut<Campaign>,
    engine: Res<RelicEngine>,
    registry: Option<Res<ContentRegistry>>,
    defaults: Option<Res<GameplayDefaults>>,
    run_config: Res<RunConfig>,
    mut current: ResMut<CurrentRelicChoices>,
) {
    let (Some(registry), Some(defaults)) = (registry, defaults) else {
        return;
    };

    for event in node_events.read() {
        if !matches!(
            event.node.node_type,
            NodeType::Battle | NodeType::Elite | NodeType::Boss
        ) {
            continue;
        }

        let mut tier = event.node.reward_tier;
        if campaign.consume_reward_upgrade() {
            tier += 1;
        }

        // Deterministic per node: the run seed folded with the node id.
        let salt = event
            .node
            .id
            .bytes()
            .fold(0u64, |acc, b| acc.wrapping_mul(31).wrapping_add(b as u64));
        let mut rng = ChaCha8Rng::seed_from_u64(run_config.seed.wrapping_add(salt));

        let exclude = engine.active_relic_ids();
        let choices = draft_relics(
            &registry,
            &mut rng,
            defaults.reward_defaults.relic_choices as usize,
            &exclude,
            Some(tier),
        );
        if choices.is_empty() {
            continue;
        }

        info!(
            "Offering {} relic choices (tier {}) for '{}'",
            choices.len(),
            tier,
            event.node.id
        );
        current.choices = choices.clone();
        offers.write(RelicRewardOfferedEvent {
            node_id: event.node.id.clone(),
            choices,
        });
    }
}

/// Grant a claimed relic if it is actually on offer, then close the offer.
pub(crate) fn handle_claim_relic(
    mut requests: MessageReader<ClaimRelicRequest>,
    mut campaign: ResMut<Campaign>,
    mut engine: ResMut<RelicEngine>,
    registry: Option<Res<ContentRegistry>>,
    mut current: ResMut<CurrentRelicChoices>,
) {
    let Some(registry) = registry else {
        return;
    };

    for request in requests.read() {
        if !current.choices.iter().any(|id| id == &request.relic_id) {
            warn!("Claimed relic '{}' was not on offer", request.relic_id);
            continue;
        }
        if campaign.grant_relic(&request.relic_id, &registry, &mut engine) {
            current.choices.clear();
        }
    }
}
