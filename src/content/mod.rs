//! Content domain: immutable definitions loaded from assets/data/*.ron.

mod data;
mod loader;
mod registry;
mod validation;

#[cfg(test)]
mod tests;

pub use data::{
    CardDef, CardRarity, CommanderDef, DataFile, DrawbackDef, DrawbackKind, EffectKind,
    FactionDef, GameplayDefaults, NodeDef, NodePosition, NodeType, RelicDef, RelicEffectDef,
    RelicRarity, RelicTrigger, StageDef,
};
pub use loader::{load_all_content, ContentLoadError};
pub use registry::ContentRegistry;
pub use validation::{validate_content, ValidationError};

use bevy::prelude::*;
use std::path::Path;

pub struct ContentPlugin;

impl Plugin for ContentPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<StageDef>()
            .register_type::<NodeDef>()
            .register_type::<NodeType>()
            .register_type::<RelicDef>()
            .register_type::<RelicEffectDef>()
            .register_type::<RelicRarity>()
            .register_type::<RelicTrigger>()
            .register_type::<CardDef>()
            .register_type::<CommanderDef>()
            .register_type::<FactionDef>()
            .add_systems(Startup, load_content);
    }
}

/// Load and validate all content at startup, inserting the registry
/// and gameplay defaults as resources.
fn load_content(mut commands: Commands) {
    let base_path = Path::new("assets/data");
    match load_all_content(base_path) {
        Ok((registry, defaults)) => {
            info!("{}", registry.summary());

            let validation_errors = validate_content(&registry);
            if validation_errors.is_empty() {
                info!("Content validation passed ({} items)", registry.total_count());
            } else {
                for error in &validation_errors {
                    error!("Content validation: {}", error);
                }
            }

            commands.insert_resource(registry);
            commands.insert_resource(defaults);
        }
        Err(errors) => {
            for error in &errors {
                error!("{}", error);
            }
            warn!("Content loading failed; starting with an empty registry");
            commands.insert_resource(ContentRegistry::default());
            commands.insert_resource(GameplayDefaults::default());
        }
    }
}
