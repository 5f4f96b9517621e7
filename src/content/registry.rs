//! ContentRegistry resource providing HashMap lookups for all loaded content.

use bevy::prelude::*;
use std::collections::HashMap;

use super::data::*;

/// Central registry for all loaded game content.
/// Provides O(1) lookup by id for any content type.
/// Read-only after startup; the progression core never mutates it.
#[derive(Resource, Default)]
pub struct ContentRegistry {
    pub stages: HashMap<String, StageDef>,
    pub relics: HashMap<String, RelicDef>,
    pub cards: HashMap<String, CardDef>,
    pub commanders: HashMap<String, CommanderDef>,
    pub factions: HashMap<String, FactionDef>,
}

impl ContentRegistry {
    /// Stages sorted by their sequential index.
    pub fn stages_in_order(&self) -> Vec<&StageDef> {
        let mut stages: Vec<&StageDef> = self.stages.values().collect();
        stages.sort_by_key(|s| s.index);
        stages
    }

    /// Find a node definition anywhere in the stage list.
    pub fn find_node(&self, node_id: &str) -> Option<&NodeDef> {
        self.stages
            .values()
            .flat_map(|s| s.nodes.iter())
            .find(|n| n.id == node_id)
    }

    /// Returns a summary of loaded content counts for logging.
    pub fn summary(&self) -> String {
        format!(
            "ContentRegistry loaded:\n\
             - Stages: {}\n\
             - Relics: {}\n\
             - Cards: {}\n\
             - Commanders: {}\n\
             - Factions: {}",
            self.stages.len(),
            self.relics.len(),
            self.cards.len(),
            self.commanders.len(),
            self.factions.len(),
        )
    }

    /// Returns total count of all loaded items.
    pub fn total_count(&self) -> usize {
        self.stages.len()
            + self.relics.len()
            + self.cards.len()
            + self.commanders.len()
            + self.factions.len()
    }
}
