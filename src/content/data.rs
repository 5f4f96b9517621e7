//! Data definitions for all RON content files.
//!
//! These structs mirror the structure in assets/data/*.ron and are used
//! for deserialization. The ContentRegistry provides lookup by id.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

// ============================================================================
// Common wrapper for RON files with schema_version and items
// ============================================================================

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DataFile<T> {
    pub schema_version: u32,
    pub items: Vec<T>,
}

// ============================================================================
// Stages (stages.ron)
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize, Reflect, Default)]
pub enum NodeType {
    #[default]
    Battle,
    Elite,
    Boss,
    Event,
    Shop,
    Recruitment,
    Rest,
}

/// 2D placement hint for map rendering. Never read by the progression core.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize, Reflect, Default)]
pub struct NodePosition {
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone, Deserialize, Serialize, Reflect)]
pub struct NodeDef {
    pub id: String,
    pub node_type: NodeType,
    /// Difficulty/reward magnitude, 1-based.
    pub tier: u32,
    #[serde(default)]
    pub encounter_id: Option<String>,
    /// Successor node ids. Empty only for a stage's boss node.
    #[serde(default)]
    pub next_node_ids: Vec<String>,
    #[serde(default)]
    pub position: NodePosition,
    #[serde(default)]
    pub reward_tier: u32,
}

#[derive(Debug, Clone, Deserialize, Serialize, Reflect)]
pub struct StageDef {
    pub id: String,
    pub index: u32,
    pub name: String,
    pub boss_node_id: String,
    /// If absent, the next stage is the one with index + 1.
    #[serde(default)]
    pub next_stage_id: Option<String>,
    pub nodes: Vec<NodeDef>,
}

// ============================================================================
// Relics (relics.ron)
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize, Reflect, Default)]
pub enum RelicRarity {
    #[default]
    Common,
    Rare,
    Epic,
    Legendary,
    Mythic,
    Cursed,
}

impl RelicRarity {
    /// Draft weight for weighted selection (lower = rarer).
    /// Cursed relics carry zero weight and only enter pools that ask for them.
    pub fn draft_weight(&self) -> f32 {
        match self {
            RelicRarity::Common => 50.0,
            RelicRarity::Rare => 30.0,
            RelicRarity::Epic => 15.0,
            RelicRarity::Legendary => 4.0,
            RelicRarity::Mythic => 1.0,
            RelicRarity::Cursed => 0.0,
        }
    }

    /// Preferred reward rarity for a node's reward tier.
    pub fn preferred_for_tier(tier: u32) -> RelicRarity {
        match tier {
            0 | 1 => RelicRarity::Common,
            2 => RelicRarity::Rare,
            3 => RelicRarity::Epic,
            _ => RelicRarity::Legendary,
        }
    }

    pub fn display_name(&self) -> &str {
        match self {
            RelicRarity::Common => "Common",
            RelicRarity::Rare => "Rare",
            RelicRarity::Epic => "Epic",
            RelicRarity::Legendary => "Legendary",
            RelicRarity::Mythic => "Mythic",
            RelicRarity::Cursed => "Cursed",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize, Reflect, Default)]
pub enum RelicTrigger {
    #[default]
    Passive,
    RunStart,
    GoldGain,
    NodeComplete,
    DamageTaken,
    WaveEnd,
    ShopEnter,
    UnitDeath,
    DamageDealt,
}

/// Closed set of effect behaviors. Passive kinds feed the aggregate;
/// the rest are evaluated when their trigger fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Reflect, Default)]
pub enum EffectKind {
    #[default]
    FortressHp,
    UnitDamage,
    UnitArmor,
    MoveSpeed,
    AttackSpeed,
    AttackRange,
    GoldGain,
    ShopDiscount,
    CardDraw,
    CommanderCooldown,
    CommanderDamage,
    Healing,
    HandSize,
    /// Flat gold granted when the trigger fires.
    BonusGold,
    /// Flat fortress heal when the trigger fires.
    BonusHeal,
    /// Percent of the gold just gained, granted on top.
    GoldInterest,
    /// Percent of damage dealt returned as fortress healing.
    Lifesteal,
    /// Damage reflected back at attackers.
    Thorns,
    /// Prevents one lethal hit per run, then heals for `value`.
    Revive,
    /// Upgrades the next reward's tier, once per stage.
    RewardUpgrade,
}

/// Structured secondary drawback attached to a relic effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Reflect)]
pub enum DrawbackKind {
    /// Subtracts 50 from the healing percent aggregate.
    HealingHalved,
    /// Reduces hand size by `magnitude`.
    HandSizeReduced,
    /// Reduces the gold gain percent aggregate by `magnitude`.
    GoldGainReduced,
    /// Contributes `magnitude` fortress damage when the effect's trigger fires.
    FortressDamage,
    /// Contributes `magnitude` fortress damage on every wave end.
    FortressDamagePerWave,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize, Reflect)]
pub struct DrawbackDef {
    pub kind: DrawbackKind,
    pub magnitude: f32,
}

#[derive(Debug, Clone, Deserialize, Serialize, Reflect)]
pub struct RelicEffectDef {
    pub kind: EffectKind,
    #[serde(default)]
    pub trigger: RelicTrigger,
    /// Evaluated against a context at call time, never cached.
    /// Unknown tags evaluate false.
    #[serde(default)]
    pub condition: Option<String>,
    #[serde(default)]
    pub value: f32,
    #[serde(default)]
    pub percent: f32,
    #[serde(default)]
    pub drawbacks: Vec<DrawbackDef>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Reflect)]
pub struct RelicDef {
    pub id: String,
    pub name: String,
    pub rarity: RelicRarity,
    #[serde(default)]
    pub cursed: bool,
    pub description: String,
    pub effect: RelicEffectDef,
}

// ============================================================================
// Cards (cards.ron)
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize, Reflect, Default)]
pub enum CardRarity {
    #[default]
    Common,
    Rare,
    Epic,
    Legendary,
}

#[derive(Debug, Clone, Deserialize, Serialize, Reflect)]
pub struct CardDef {
    pub id: String,
    pub name: String,
    pub rarity: CardRarity,
    pub gold_cost: u32,
}

// ============================================================================
// Commanders (commanders.ron)
// ============================================================================

#[derive(Debug, Clone, Deserialize, Serialize, Reflect)]
pub struct CommanderDef {
    pub id: String,
    pub name: String,
    pub cooldown_seconds: f32,
    /// Cards this commander brings into the collection when recruited.
    pub card_ids: Vec<String>,
}

// ============================================================================
// Factions (factions.ron)
// ============================================================================

#[derive(Debug, Clone, Deserialize, Serialize, Reflect)]
pub struct FactionDef {
    pub id: String,
    pub name: String,
    pub fortress_hp: f32,
    pub starting_gold: u32,
    pub commander_id: String,
    pub starting_deck: Vec<String>,
}

// ============================================================================
// Gameplay Defaults (gameplay_defaults.ron) - Single struct, not a list
// ============================================================================

#[derive(Debug, Clone, Deserialize, Serialize, Reflect, Resource)]
pub struct GameplayDefaults {
    pub schema_version: u32,
    pub run_defaults: RunDefaults,
    pub economy: EconomyDefaults,
    pub reward_defaults: RewardDefaults,
}

#[derive(Debug, Clone, Deserialize, Serialize, Reflect)]
pub struct RunDefaults {
    pub starting_relic_count: u32,
    /// Grant one guaranteed curse when starting at the highest difficulty.
    pub curse_on_calamity: bool,
    pub base_hand_size: u32,
}

#[derive(Debug, Clone, Deserialize, Serialize, Reflect)]
pub struct EconomyDefaults {
    pub node_gold_base: u32,
    pub node_gold_per_tier: u32,
}

#[derive(Debug, Clone, Deserialize, Serialize, Reflect)]
pub struct RewardDefaults {
    pub relic_choices: u32,
    pub card_choices: u32,
}

impl Default for GameplayDefaults {
    fn default() -> Self {
        Self {
            schema_version: 1,
            run_defaults: RunDefaults {
                starting_relic_count: 2,
                curse_on_calamity: true,
                base_hand_size: 5,
            },
            economy: EconomyDefaults {
                node_gold_base: 10,
                node_gold_per_tier: 5,
            },
            reward_defaults: RewardDefaults {
                relic_choices: 3,
                card_choices: 3,
            },
        }
    }
}
