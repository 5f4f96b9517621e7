//! Persistence domain: save/load plugin wiring.

mod save;

#[cfg(test)]
mod tests;

pub use save::{
    delete_run, load_profile, load_run, save_profile, save_run, SavedRun, SaveSlot,
    UnlockProfile, Unlocks,
};

use bevy::ecs::message::MessageReader;
use bevy::prelude::*;

use crate::campaign::{Campaign, RunAbandonedEvent, RunCompletedEvent};
use crate::core::RunConfig;

pub struct PersistencePlugin;

impl Plugin for PersistencePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SaveSlot>()
            .init_resource::<Unlocks>()
            .add_systems(Startup, load_unlock_profile)
            .add_systems(
                Update,
                (autosave_run, record_victory, clear_save_on_abandon),
            );
    }
}

/// Pull the unlock profile off disk, keeping defaults when none exists.
fn load_unlock_profile(slot: Res<SaveSlot>, mut unlocks: ResMut<Unlocks>) {
    if let Some(profile) = load_profile(&slot) {
        unlocks.0 = profile;
    } else {
        info!("No unlock profile on disk, using defaults");
    }
}

/// Write the run to disk whenever the state machine mutated this frame.
/// Change detection stands in for hooking every individual operation.
fn autosave_run(campaign: Res<Campaign>, run_config: Res<RunConfig>, slot: Res<SaveSlot>) {
    if !campaign.is_changed() || campaign.is_added() {
        return;
    }
    let Some(state) = campaign.run_state() else {
        return;
    };
    let saved = SavedRun {
        seed: run_config.seed,
        state,
    };
    save_run(&slot, &saved);
}

/// A completed run counts toward meta-progression and clears the slot.
fn record_victory(
    mut events: MessageReader<RunCompletedEvent>,
    mut unlocks: ResMut<Unlocks>,
    slot: Res<SaveSlot>,
) {
    for _event in events.read() {
        unlocks.0.record_victory();
        save_profile(&slot, &unlocks.0);
        delete_run(&slot);
        info!("Run recorded; {} total victories", unlocks.0.runs_won);
    }
}

fn clear_save_on_abandon(mut events: MessageReader<RunAbandonedEvent>, slot: Res<SaveSlot>) {
    for _event in events.read() {
        delete_run(&slot);
    }
}
