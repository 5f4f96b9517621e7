//! Content domain: tests for RON schemas and cross-reference validation.

use ron::extensions::Extensions;
use ron::Options;

use super::data::*;
use super::registry::ContentRegistry;
use super::validation::{validate_content, ValidationError};

fn ron_options() -> Options {
    Options::default().with_default_extension(Extensions::IMPLICIT_SOME)
}

// -----------------------------------------------------------------------------
// Schema tests
// -----------------------------------------------------------------------------

#[test]
fn test_stage_file_parses() {
    let source = r#"
        (
            schema_version: 1,
            items: [
                (
                    id: "stage_test",
                    index: 0,
                    name: "Test Stage",
                    boss_node_id: "warden",
                    nodes: [
                        (
                            id: "gate",
                            node_type: Battle,
                            tier: 1,
                            next_node_ids: ["warden"],
                            position: (x: 0.0, y: 0.0),
                            reward_tier: 1,
                        ),
                        (
                            id: "warden",
                            node_type: Boss,
                            tier: 3,
                            encounter_id: "encounter_warden",
                            position: (x: 200.0, y: 0.0),
                            reward_tier: 3,
                        ),
                    ],
                ),
            ],
        )
    "#;

    let file: DataFile<StageDef> = ron_options().from_str(source).expect("stage parses");
    assert_eq!(file.items.len(), 1);
    let stage = &file.items[0];
    assert_eq!(stage.boss_node_id, "warden");
    assert!(stage.next_stage_id.is_none());
    // Defaults fill omitted fields; implicit Some wraps present ones.
    assert!(stage.nodes[0].encounter_id.is_none());
    assert_eq!(
        stage.nodes[1].encounter_id.as_deref(),
        Some("encounter_warden")
    );
    assert!(stage.nodes[1].next_node_ids.is_empty());
}

#[test]
fn test_relic_file_parses() {
    let source = r#"
        (
            schema_version: 1,
            items: [
                (
                    id: "relic_test",
                    name: "Test Relic",
                    rarity: Cursed,
                    cursed: true,
                    description: "Gold at a price.",
                    effect: (
                        kind: GoldGain,
                        trigger: Passive,
                        condition: "fortress_hp_above_75",
                        percent: 25.0,
                        drawbacks: [
                            (kind: FortressDamagePerWave, magnitude: 5.0),
                        ],
                    ),
                ),
            ],
        )
    "#;

    let file: DataFile<RelicDef> = ron_options().from_str(source).expect("relic parses");
    let relic = &file.items[0];
    assert_eq!(relic.rarity, RelicRarity::Cursed);
    assert_eq!(relic.effect.kind, EffectKind::GoldGain);
    assert_eq!(
        relic.effect.condition.as_deref(),
        Some("fortress_hp_above_75")
    );
    assert_eq!(relic.effect.value, 0.0);
    assert_eq!(relic.effect.drawbacks.len(), 1);
}

#[test]
fn test_rarity_weights() {
    assert_eq!(RelicRarity::Common.draft_weight(), 50.0);
    assert_eq!(RelicRarity::Rare.draft_weight(), 30.0);
    assert_eq!(RelicRarity::Epic.draft_weight(), 15.0);
    assert_eq!(RelicRarity::Legendary.draft_weight(), 4.0);
    assert_eq!(RelicRarity::Mythic.draft_weight(), 1.0);
    assert_eq!(RelicRarity::Cursed.draft_weight(), 0.0);
}

#[test]
fn test_tier_to_rarity_mapping() {
    assert_eq!(RelicRarity::preferred_for_tier(0), RelicRarity::Common);
    assert_eq!(RelicRarity::preferred_for_tier(1), RelicRarity::Common);
    assert_eq!(RelicRarity::preferred_for_tier(2), RelicRarity::Rare);
    assert_eq!(RelicRarity::preferred_for_tier(3), RelicRarity::Epic);
    assert_eq!(RelicRarity::preferred_for_tier(4), RelicRarity::Legendary);
    assert_eq!(RelicRarity::preferred_for_tier(9), RelicRarity::Legendary);
}

// -----------------------------------------------------------------------------
// Validation tests
// -----------------------------------------------------------------------------

fn minimal_stage(id: &str, index: u32, boss: &str, nodes: Vec<NodeDef>) -> StageDef {
    StageDef {
        id: id.to_string(),
        index,
        name: id.to_string(),
        boss_node_id: boss.to_string(),
        next_stage_id: None,
        nodes,
    }
}

fn minimal_node(id: &str, node_type: NodeType, next: &[&str]) -> NodeDef {
    NodeDef {
        id: id.to_string(),
        node_type,
        tier: 1,
        encounter_id: None,
        next_node_ids: next.iter().map(|s| s.to_string()).collect(),
        position: NodePosition::default(),
        reward_tier: 1,
    }
}

#[test]
fn test_validation_passes_on_sound_content() {
    let mut registry = ContentRegistry::default();
    let stage = minimal_stage(
        "stage_ok",
        0,
        "boss",
        vec![
            minimal_node("entry", NodeType::Battle, &["boss"]),
            minimal_node("boss", NodeType::Boss, &[]),
        ],
    );
    registry.stages.insert(stage.id.clone(), stage);
    assert!(validate_content(&registry).is_empty());
}

#[test]
fn test_validation_flags_missing_boss_node() {
    let mut registry = ContentRegistry::default();
    let stage = minimal_stage(
        "stage_bad",
        0,
        "ghost_boss",
        vec![minimal_node("entry", NodeType::Battle, &[])],
    );
    registry.stages.insert(stage.id.clone(), stage);

    let errors = validate_content(&registry);
    assert!(errors
        .iter()
        .any(|e| matches!(e, ValidationError::MissingRef { field, .. } if *field == "boss_node_id")));
    // The lone non-boss node is also a dead end.
    assert!(errors
        .iter()
        .any(|e| matches!(e, ValidationError::DeadEndNode { .. })));
}

#[test]
fn test_validation_flags_no_entry_node() {
    let mut registry = ContentRegistry::default();
    let stage = minimal_stage(
        "stage_cyclic",
        0,
        "loop_b",
        vec![
            minimal_node("loop_a", NodeType::Battle, &["loop_b"]),
            minimal_node("loop_b", NodeType::Boss, &["loop_a"]),
        ],
    );
    registry.stages.insert(stage.id.clone(), stage);

    let errors = validate_content(&registry);
    assert!(errors
        .iter()
        .any(|e| matches!(e, ValidationError::NoEntryNode { stage_id } if stage_id == "stage_cyclic")));
}

#[test]
fn test_validation_flags_backward_edge() {
    let mut registry = ContentRegistry::default();
    let first = minimal_stage(
        "stage_first",
        0,
        "first_boss",
        vec![
            minimal_node("first_entry", NodeType::Battle, &["first_boss"]),
            minimal_node("first_boss", NodeType::Boss, &[]),
        ],
    );
    let second = minimal_stage(
        "stage_second",
        1,
        "second_boss",
        vec![
            minimal_node("second_entry", NodeType::Battle, &["first_entry"]),
            minimal_node("second_boss", NodeType::Boss, &[]),
        ],
    );
    registry.stages.insert(first.id.clone(), first);
    registry.stages.insert(second.id.clone(), second);

    let errors = validate_content(&registry);
    assert!(errors
        .iter()
        .any(|e| matches!(e, ValidationError::BackwardEdge { node_id, .. } if node_id == "second_entry")));
}

#[test]
fn test_validation_flags_cursed_mismatch() {
    let mut registry = ContentRegistry::default();
    registry.relics.insert(
        "relic_liar".to_string(),
        RelicDef {
            id: "relic_liar".to_string(),
            name: "Liar".to_string(),
            rarity: RelicRarity::Cursed,
            cursed: false,
            description: String::new(),
            effect: RelicEffectDef {
                kind: EffectKind::GoldGain,
                trigger: RelicTrigger::Passive,
                condition: None,
                value: 0.0,
                percent: 10.0,
                drawbacks: Vec::new(),
            },
        },
    );

    let errors = validate_content(&registry);
    assert!(errors
        .iter()
        .any(|e| matches!(e, ValidationError::CursedMismatch { relic_id } if relic_id == "relic_liar")));
}

#[test]
fn test_validation_flags_dangling_faction_refs() {
    let mut registry = ContentRegistry::default();
    registry.factions.insert(
        "faction_ghost".to_string(),
        FactionDef {
            id: "faction_ghost".to_string(),
            name: "Ghost".to_string(),
            fortress_hp: 500.0,
            starting_gold: 100,
            commander_id: "commander_ghost".to_string(),
            starting_deck: vec!["card_ghost".to_string()],
        },
    );

    let errors = validate_content(&registry);
    assert_eq!(
        errors
            .iter()
            .filter(|e| matches!(e, ValidationError::MissingRef { .. }))
            .count(),
        2
    );
}
