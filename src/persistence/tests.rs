//! Persistence domain: tests for save slots and the unlock profile.

use std::path::PathBuf;

use super::save::{
    delete_run, load_profile, load_run, save_profile, save_run, SavedRun, SaveSlot, UnlockProfile,
};
use crate::campaign::RunState;
use crate::core::Difficulty;

fn temp_slot(tag: &str) -> SaveSlot {
    let dir = std::env::temp_dir().join(format!("bulwark_test_{}_{}", tag, std::process::id()));
    SaveSlot {
        run_path: dir.join("run.json"),
        profile_path: dir.join("profile.json"),
    }
}

fn sample_state() -> RunState {
    RunState {
        faction_id: "faction_ironhold".to_string(),
        difficulty: Difficulty::Veteran,
        current_stage_index: 1,
        current_node_id: "e".to_string(),
        completed_node_ids: vec!["a".to_string(), "b".to_string(), "d".to_string()],
        fortress_hp: 421.5,
        fortress_max_hp: 550.0,
        gold: 230,
        deck: vec!["card_militia_1".to_string(), "card_archer_2".to_string()],
        card_collection: vec!["card_pikeman".to_string()],
        relics: vec!["granite_heart".to_string(), "gilded_idol".to_string()],
        curses: Vec::new(),
        commander_roster: vec!["commander_aldric".to_string()],
        next_card_instance: 2,
    }
}

#[test]
fn test_run_round_trips_through_disk() {
    let slot = temp_slot("roundtrip");
    let saved = SavedRun {
        seed: 12345,
        state: sample_state(),
    };

    assert!(save_run(&slot, &saved));
    let loaded = load_run(&slot).expect("save exists");
    assert_eq!(loaded.seed, 12345);
    assert_eq!(loaded.state, saved.state);

    delete_run(&slot);
    assert!(load_run(&slot).is_none());
}

#[test]
fn test_missing_save_degrades_to_none() {
    let slot = temp_slot("missing");
    assert!(load_run(&slot).is_none());
}

#[test]
fn test_corrupt_save_degrades_to_none() {
    let slot = temp_slot("corrupt");
    std::fs::create_dir_all(slot.run_path.parent().expect("has parent")).expect("mkdir");
    std::fs::write(&slot.run_path, "not json at all {").expect("write");
    assert!(load_run(&slot).is_none());
    delete_run(&slot);
}

#[test]
fn test_delete_missing_save_is_harmless() {
    let slot = SaveSlot {
        run_path: PathBuf::from("/definitely/not/a/real/path/run.json"),
        profile_path: PathBuf::from("/definitely/not/a/real/path/profile.json"),
    };
    delete_run(&slot);
}

#[test]
fn test_profile_round_trips_and_unlocks() {
    let slot = temp_slot("profile");
    let mut profile = UnlockProfile::default();

    assert!(profile.is_faction_unlocked("faction_ironhold"));
    assert!(!profile.is_faction_unlocked("faction_emberfall"));
    assert!(profile.is_commander_unlocked("commander_aldric"));

    profile.record_victory();
    assert_eq!(profile.runs_won, 1);
    assert!(profile.is_faction_unlocked("faction_emberfall"));

    // A second victory does not duplicate the unlock.
    profile.record_victory();
    assert_eq!(
        profile
            .unlocked_factions
            .iter()
            .filter(|id| *id == "faction_emberfall")
            .count(),
        1
    );

    assert!(save_profile(&slot, &profile));
    let loaded = load_profile(&slot).expect("profile exists");
    assert_eq!(loaded.runs_won, 2);
    let _ = std::fs::remove_file(&slot.profile_path);
}
