//! Relics domain: cached aggregate of unconditional passive effects.

use crate::content::{DrawbackDef, DrawbackKind, EffectKind, RelicEffectDef};

/// Sum of every unconditional passive relic effect currently active.
/// Recomputed from scratch whenever the active relic set changes;
/// read-only to every other caller.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AggregateModifiers {
    pub fortress_hp_flat: f32,
    pub fortress_hp_pct: f32,
    pub unit_damage_flat: f32,
    pub unit_damage_pct: f32,
    pub unit_armor_flat: f32,
    pub unit_armor_pct: f32,
    pub move_speed_pct: f32,
    pub attack_speed_pct: f32,
    pub range_pct: f32,
    pub gold_gain_pct: f32,
    pub shop_discount_pct: f32,
    pub card_draw_bonus: i32,
    pub commander_cooldown_pct: f32,
    pub commander_damage_pct: f32,
    pub healing_pct: f32,
    pub hand_size_delta: i32,
}

impl AggregateModifiers {
    /// Fold one passive effect into the aggregate. Trigger-scoped and
    /// conditional effects never reach this.
    pub(crate) fn accumulate(&mut self, effect: &RelicEffectDef) {
        match effect.kind {
            EffectKind::FortressHp => {
                self.fortress_hp_flat += effect.value;
                self.fortress_hp_pct += effect.percent;
            }
            EffectKind::UnitDamage => {
                self.unit_damage_flat += effect.value;
                self.unit_damage_pct += effect.percent;
            }
            EffectKind::UnitArmor => {
                self.unit_armor_flat += effect.value;
                self.unit_armor_pct += effect.percent;
            }
            EffectKind::MoveSpeed => self.move_speed_pct += effect.percent,
            EffectKind::AttackSpeed => self.attack_speed_pct += effect.percent,
            EffectKind::AttackRange => self.range_pct += effect.percent,
            EffectKind::GoldGain => self.gold_gain_pct += effect.percent,
            EffectKind::ShopDiscount => self.shop_discount_pct += effect.percent,
            EffectKind::CardDraw => self.card_draw_bonus += effect.value as i32,
            EffectKind::CommanderCooldown => self.commander_cooldown_pct += effect.percent,
            EffectKind::CommanderDamage => self.commander_damage_pct += effect.percent,
            EffectKind::Healing => self.healing_pct += effect.percent,
            EffectKind::HandSize => self.hand_size_delta += effect.value as i32,
            // Trigger-scoped kinds contribute nothing while passive.
            EffectKind::BonusGold
            | EffectKind::BonusHeal
            | EffectKind::GoldInterest
            | EffectKind::Lifesteal
            | EffectKind::Thorns
            | EffectKind::Revive
            | EffectKind::RewardUpgrade => {}
        }
    }

    /// Fold an aggregate-scoped drawback. Drawbacks apply regardless of the
    /// owning effect's trigger or condition.
    pub(crate) fn apply_drawback(&mut self, drawback: &DrawbackDef) {
        match drawback.kind {
            DrawbackKind::HealingHalved => self.healing_pct -= 50.0,
            DrawbackKind::HandSizeReduced => {
                self.hand_size_delta -= drawback.magnitude as i32
            }
            DrawbackKind::GoldGainReduced => self.gold_gain_pct -= drawback.magnitude,
            // Trigger-context drawbacks are handled during apply_trigger.
            DrawbackKind::FortressDamage | DrawbackKind::FortressDamagePerWave => {}
        }
    }
}
