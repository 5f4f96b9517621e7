//! Campaign domain: run-scoped player state and snapshot types.

use serde::{Deserialize, Serialize};

use crate::core::Difficulty;

use super::map::CampaignNode;

/// The one mutable run record. Owned exclusively by the `Campaign` resource;
/// every external read gets a clone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunState {
    pub faction_id: String,
    pub difficulty: Difficulty,
    pub current_stage_index: u32,
    pub current_node_id: String,
    pub completed_node_ids: Vec<String>,
    pub fortress_hp: f32,
    pub fortress_max_hp: f32,
    pub gold: u32,
    /// Ordered card instances; every copy carries a unique instance id.
    pub deck: Vec<String>,
    /// Base card ids acquired but not currently decked.
    pub card_collection: Vec<String>,
    /// Active relic ids in acquisition order (curses included).
    pub relics: Vec<String>,
    /// Subset of `relics` flagged cursed.
    pub curses: Vec<String>,
    pub commander_roster: Vec<String>,
    /// Counter behind deck instance ids; monotonic for the run.
    pub next_card_instance: u32,
}

impl RunState {
    /// Mint a unique deck instance id for a base card id.
    pub(crate) fn mint_card_instance(&mut self, card_id: &str) -> String {
        self.next_card_instance += 1;
        format!("{}_{}", card_id, self.next_card_instance)
    }
}

/// Strip the trailing `_<digits>` instance suffix off a card instance id,
/// yielding the base template id. Ids without a suffix pass through.
pub fn normalize_card_id(instance_id: &str) -> String {
    if let Some((base, suffix)) = instance_id.rsplit_once('_') {
        if !suffix.is_empty() && suffix.chars().all(|c| c.is_ascii_digit()) {
            return base.to_string();
        }
    }
    instance_id.to_string()
}

/// Immutable stage view handed to presentation. Node clones carry the flag
/// state at snapshot time.
#[derive(Debug, Clone)]
pub struct StageSnapshot {
    pub id: String,
    pub index: u32,
    pub name: String,
    pub boss_node_id: String,
    pub nodes: Vec<CampaignNode>,
}
