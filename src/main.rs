mod campaign;
mod content;
mod core;
mod persistence;
mod relics;

use bevy::prelude::*;

fn main() {
    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Bulwark".to_string(),
                resolution: (1280, 720).into(),
                resizable: true,
                ..default()
            }),
            ..default()
        }))
        .add_plugins((
            core::CorePlugin,
            content::ContentPlugin,
            relics::RelicsPlugin,
            campaign::CampaignPlugin,
            persistence::PersistencePlugin,
        ))
        .run();
}
