//! Persistence domain: JSON save files for run state and meta-progression.
//!
//! Every failure here degrades to "no saved run" with a warning; nothing in
//! the core retries or propagates IO errors.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::campaign::RunState;

/// Where the save files live. A resource so tests can point it elsewhere.
#[derive(Resource, Debug, Clone)]
pub struct SaveSlot {
    pub run_path: PathBuf,
    pub profile_path: PathBuf,
}

impl Default for SaveSlot {
    fn default() -> Self {
        Self {
            run_path: PathBuf::from("saves/run.json"),
            profile_path: PathBuf::from("saves/profile.json"),
        }
    }
}

/// On-disk form of an interrupted run. The graph itself is never persisted;
/// it is rebuilt from the catalog and the flags replayed from node ids.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedRun {
    pub seed: u64,
    pub state: RunState,
}

/// Meta-progression that survives across runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnlockProfile {
    pub unlocked_factions: Vec<String>,
    pub unlocked_commanders: Vec<String>,
    pub runs_won: u32,
}

impl Default for UnlockProfile {
    fn default() -> Self {
        Self {
            unlocked_factions: vec!["faction_ironhold".to_string(), "faction_sylvan".to_string()],
            unlocked_commanders: vec![
                "commander_aldric".to_string(),
                "commander_sylvara".to_string(),
            ],
            runs_won: 0,
        }
    }
}

impl UnlockProfile {
    pub fn is_faction_unlocked(&self, faction_id: &str) -> bool {
        self.unlocked_factions.iter().any(|id| id == faction_id)
    }

    pub fn is_commander_unlocked(&self, commander_id: &str) -> bool {
        self.unlocked_commanders.iter().any(|id| id == commander_id)
    }

    /// Record a finished run, unlocking the late-game faction on the first win.
    pub fn record_victory(&mut self) {
        self.runs_won += 1;
        let emberfall = "faction_emberfall".to_string();
        if !self.unlocked_factions.contains(&emberfall) {
            self.unlocked_factions.push(emberfall);
        }
    }
}

// Bevy resource wrapper so systems can query unlocks directly.
#[derive(Resource, Debug, Clone, Default)]
pub struct Unlocks(pub UnlockProfile);

pub fn save_run(slot: &SaveSlot, saved: &SavedRun) -> bool {
    write_json(&slot.run_path, saved)
}

pub fn load_run(slot: &SaveSlot) -> Option<SavedRun> {
    read_json(&slot.run_path)
}

pub fn delete_run(slot: &SaveSlot) {
    if slot.run_path.exists() {
        if let Err(e) = fs::remove_file(&slot.run_path) {
            warn!("Could not delete save file: {}", e);
        }
    }
}

pub fn save_profile(slot: &SaveSlot, profile: &UnlockProfile) -> bool {
    write_json(&slot.profile_path, profile)
}

pub fn load_profile(slot: &SaveSlot) -> Option<UnlockProfile> {
    read_json(&slot.profile_path)
}

fn write_json<T: Serialize>(path: &PathBuf, value: &T) -> bool {
    if let Some(parent) = path.parent() {
        if let Err(e) = fs::create_dir_all(parent) {
            warn!("Could not create save directory: {}", e);
            return false;
        }
    }
    let json = match serde_json::to_string_pretty(value) {
        Ok(json) => json,
        Err(e) => {
            warn!("Could not serialize save data: {}", e);
            return false;
        }
    };
    match fs::write(path, json) {
        Ok(()) => true,
        Err(e) => {
            warn!("Could not write {}: {}", path.display(), e);
            false
        }
    }
}

fn read_json<T: for<'de> Deserialize<'de>>(path: &PathBuf) -> Option<T> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(_) => return None,
    };
    match serde_json::from_str(&contents) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!("Corrupt save file {}: {}", path.display(), e);
            None
        }
    }
}
