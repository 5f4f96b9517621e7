//! Core domain: shared resources for run configuration.

use bevy::prelude::*;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Run difficulty. Calamity is the tier that guarantees a starting curse.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize, Reflect, Default,
)]
pub enum Difficulty {
    #[default]
    Standard,
    Veteran,
    Calamity,
}

impl Difficulty {
    pub fn guarantees_curse(&self) -> bool {
        matches!(self, Difficulty::Calamity)
    }
}

/// Seed and setup for the current run. Reseeded on every new run.
#[derive(Resource, Debug, Clone)]
pub struct RunConfig {
    pub seed: u64,
    pub faction_id: String,
    pub difficulty: Difficulty,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            seed: rand::rng().random(),
            faction_id: String::new(),
            difficulty: Difficulty::default(),
        }
    }
}

impl RunConfig {
    /// Reseed for a fresh run.
    pub fn reseed(&mut self) {
        self.seed = rand::rng().random();
    }
}
