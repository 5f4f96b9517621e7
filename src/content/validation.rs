//! Validation for cross-references and graph shape in content definitions.

use std::collections::{HashMap, HashSet};

use super::registry::ContentRegistry;

/// A validation error with context about what failed.
#[derive(Debug)]
pub enum ValidationError {
    MissingRef {
        source_type: &'static str,
        source_id: String,
        field: &'static str,
        target_type: &'static str,
        missing_id: String,
    },
    DuplicateNodeId {
        node_id: String,
        stage_id: String,
    },
    /// Edge pointing at a stage with a lower index than its source.
    BackwardEdge {
        node_id: String,
        target_id: String,
    },
    /// A non-boss node with no successors strands the player.
    DeadEndNode {
        node_id: String,
        stage_id: String,
    },
    /// No node in the stage is free of same-stage inbound edges.
    NoEntryNode {
        stage_id: String,
    },
    CursedMismatch {
        relic_id: String,
    },
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::MissingRef {
                source_type,
                source_id,
                field,
                target_type,
                missing_id,
            } => write!(
                f,
                "{} '{}' references missing {} '{}' in field '{}'",
                source_type, source_id, target_type, missing_id, field
            ),
            ValidationError::DuplicateNodeId { node_id, stage_id } => write!(
                f,
                "Node id '{}' in stage '{}' is declared more than once",
                node_id, stage_id
            ),
            ValidationError::BackwardEdge { node_id, target_id } => write!(
                f,
                "Node '{}' has an edge to '{}' in an earlier stage",
                node_id, target_id
            ),
            ValidationError::DeadEndNode { node_id, stage_id } => write!(
                f,
                "Node '{}' in stage '{}' is not the boss node but has no successors",
                node_id, stage_id
            ),
            ValidationError::NoEntryNode { stage_id } => write!(
                f,
                "Stage '{}' has no entry node (every node has a same-stage inbound edge)",
                stage_id
            ),
            ValidationError::CursedMismatch { relic_id } => write!(
                f,
                "Relic '{}' has a cursed flag inconsistent with its rarity",
                relic_id
            ),
        }
    }
}

/// Helper macro for checking a reference exists
macro_rules! check_ref {
    ($errors:expr, $registry_map:expr, $source_type:expr, $source_id:expr, $field:expr, $target_type:expr, $ref_id:expr) => {
        if !$registry_map.contains_key($ref_id) {
            $errors.push(ValidationError::MissingRef {
                source_type: $source_type,
                source_id: $source_id.to_string(),
                field: $field,
                target_type: $target_type,
                missing_id: $ref_id.to_string(),
            });
        }
    };
}

/// Validate all cross-references and stage-graph invariants in the registry.
/// Returns a list of validation errors, empty if the content is sound.
pub fn validate_content(registry: &ContentRegistry) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    // Index every node by id along with its stage index, catching duplicates.
    let mut node_stage_index: HashMap<&str, u32> = HashMap::new();
    for stage in registry.stages.values() {
        for node in &stage.nodes {
            if node_stage_index.insert(node.id.as_str(), stage.index).is_some() {
                errors.push(ValidationError::DuplicateNodeId {
                    node_id: node.id.clone(),
                    stage_id: stage.id.clone(),
                });
            }
        }
    }

    // Validate stages
    for (id, stage) in &registry.stages {
        if !stage.nodes.iter().any(|n| n.id == stage.boss_node_id) {
            errors.push(ValidationError::MissingRef {
                source_type: "Stage",
                source_id: id.clone(),
                field: "boss_node_id",
                target_type: "Node",
                missing_id: stage.boss_node_id.clone(),
            });
        }
        if let Some(next_id) = &stage.next_stage_id {
            check_ref!(
                errors,
                registry.stages,
                "Stage",
                id,
                "next_stage_id",
                "Stage",
                next_id
            );
        }

        // Nodes reachable from a same-stage edge cannot be the entry node.
        let mut has_same_stage_inbound: HashSet<&str> = HashSet::new();
        for node in &stage.nodes {
            if node.id != stage.boss_node_id && node.next_node_ids.is_empty() {
                errors.push(ValidationError::DeadEndNode {
                    node_id: node.id.clone(),
                    stage_id: id.clone(),
                });
            }
            for next_id in &node.next_node_ids {
                match node_stage_index.get(next_id.as_str()) {
                    None => errors.push(ValidationError::MissingRef {
                        source_type: "Node",
                        source_id: node.id.clone(),
                        field: "next_node_ids",
                        target_type: "Node",
                        missing_id: next_id.clone(),
                    }),
                    Some(&target_stage) if target_stage < stage.index => {
                        errors.push(ValidationError::BackwardEdge {
                            node_id: node.id.clone(),
                            target_id: next_id.clone(),
                        });
                    }
                    Some(&target_stage) => {
                        if target_stage == stage.index {
                            has_same_stage_inbound.insert(next_id.as_str());
                        }
                    }
                }
            }
        }
        if !stage.nodes.is_empty()
            && stage
                .nodes
                .iter()
                .all(|n| has_same_stage_inbound.contains(n.id.as_str()))
        {
            errors.push(ValidationError::NoEntryNode {
                stage_id: id.clone(),
            });
        }
    }

    // Validate relics
    for (id, relic) in &registry.relics {
        let rarity_cursed = relic.rarity == super::data::RelicRarity::Cursed;
        if relic.cursed != rarity_cursed {
            errors.push(ValidationError::CursedMismatch {
                relic_id: id.clone(),
            });
        }
    }

    // Validate factions
    for (id, faction) in &registry.factions {
        check_ref!(
            errors,
            registry.commanders,
            "Faction",
            id,
            "commander_id",
            "Commander",
            &faction.commander_id
        );
        for card_id in &faction.starting_deck {
            check_ref!(
                errors,
                registry.cards,
                "Faction",
                id,
                "starting_deck",
                "Card",
                card_id
            );
        }
    }

    // Validate commanders
    for (id, commander) in &registry.commanders {
        for card_id in &commander.card_ids {
            check_ref!(
                errors,
                registry.cards,
                "Commander",
                id,
                "card_ids",
                "Card",
                card_id
            );
        }
    }

    errors
}
