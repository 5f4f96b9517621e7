//! Core domain: run flow states and configuration.

mod resources;
mod state;

pub use resources::{Difficulty, RunConfig};
pub use state::GameState;

use bevy::prelude::*;

pub struct CorePlugin;

impl Plugin for CorePlugin {
    fn build(&self, app: &mut App) {
        app.init_state::<GameState>()
            .init_resource::<RunConfig>()
            .add_systems(Startup, finish_boot);
    }
}

/// Leave the boot state once startup systems have run.
fn finish_boot(mut game_state: ResMut<NextState<GameState>>) {
    game_state.set(GameState::MainMenu);
}
