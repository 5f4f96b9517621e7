//! Relics domain: the active relic set, trigger evaluation, and stat accessors.

use bevy::prelude::*;

use crate::content::{
    ContentRegistry, DrawbackKind, EffectKind, NodeType, RelicDef, RelicTrigger,
};
use crate::relics::modifiers::AggregateModifiers;

/// Mutable context passed through trigger evaluation and condition checks.
/// Callers fill in what they know; effects accumulate their deltas into it.
#[derive(Debug, Clone, PartialEq)]
pub struct TriggerContext {
    /// Node the event happened on, if any.
    pub node_type: Option<NodeType>,
    /// Gold amount that caused a gold-gain trigger.
    pub gold_gained: u32,
    /// Incoming damage (damage-taken) or damage dealt (damage-dealt).
    pub damage: f32,
    pub fortress_hp: f32,
    pub fortress_max_hp: f32,
    pub unit_ranged: bool,
    /// Unit health fraction in 0.0..=1.0.
    pub unit_hp_pct: f32,
    pub wave: u32,
    // Accumulated outputs.
    pub gold_delta: u32,
    pub heal: f32,
    pub reflect_damage: f32,
    pub fortress_damage: f32,
    pub prevent_death: bool,
    pub reward_upgraded: bool,
}

impl Default for TriggerContext {
    fn default() -> Self {
        Self {
            node_type: None,
            gold_gained: 0,
            damage: 0.0,
            fortress_hp: 0.0,
            fortress_max_hp: 0.0,
            unit_ranged: false,
            unit_hp_pct: 1.0,
            wave: 0,
            gold_delta: 0,
            heal: 0.0,
            reflect_damage: 0.0,
            fortress_damage: 0.0,
            prevent_death: false,
            reward_upgraded: false,
        }
    }
}

impl TriggerContext {
    pub fn for_node(node_type: NodeType, fortress_hp: f32, fortress_max_hp: f32) -> Self {
        Self {
            node_type: Some(node_type),
            fortress_hp,
            fortress_max_hp,
            ..Self::default()
        }
    }
}

/// Closed condition vocabulary. Unknown tags evaluate false.
fn condition_holds(tag: &str, ctx: &TriggerContext) -> bool {
    match tag {
        "ranged" => ctx.unit_ranged,
        "unit_hp_below_50" => ctx.unit_hp_pct < 0.5,
        "fortress_hp_above_75" => {
            ctx.fortress_max_hp > 0.0 && ctx.fortress_hp / ctx.fortress_max_hp > 0.75
        }
        "elite" => ctx.node_type == Some(NodeType::Elite),
        "boss" => ctx.node_type == Some(NodeType::Boss),
        "fortress_lethal" => ctx.damage >= ctx.fortress_hp,
        _ => false,
    }
}

/// Notification of a relic set change, drained by the plugin's publisher.
#[derive(Debug, Clone)]
pub enum RelicChange {
    Added(String),
    Removed(String),
}

/// Owns the active relic set, the cached aggregate of unconditional passive
/// effects, and the one-shot trigger guards for the current run.
///
/// Conditional passive relics are intentionally excluded from the cache:
/// their contribution depends on a call-site context, so the stat accessors
/// walk them per call on top of the cached aggregate.
#[derive(Resource, Debug, Default)]
pub struct RelicEngine {
    /// Active relic defs in insertion order. Cloned out of the catalog so the
    /// engine never holds a live reference into it.
    active: Vec<RelicDef>,
    aggregate: AggregateModifiers,
    revive_used: bool,
    reward_upgrade_used: bool,
    pending_changes: Vec<RelicChange>,
}

impl RelicEngine {
    /// Drop all relics and guards. Called when a run starts or is abandoned.
    pub fn reset(&mut self) {
        self.active.clear();
        self.aggregate = AggregateModifiers::default();
        self.revive_used = false;
        self.reward_upgrade_used = false;
        self.pending_changes.clear();
    }

    /// Clear per-stage guards. The revive guard survives: it is once per run.
    pub fn reset_stage_state(&mut self) {
        self.reward_upgrade_used = false;
    }

    pub fn has_relic(&self, id: &str) -> bool {
        self.active.iter().any(|r| r.id == id)
    }

    pub fn active_relic_ids(&self) -> Vec<String> {
        self.active.iter().map(|r| r.id.clone()).collect()
    }

    pub fn curse_ids(&self) -> Vec<String> {
        self.active
            .iter()
            .filter(|r| r.cursed)
            .map(|r| r.id.clone())
            .collect()
    }

    /// Add a relic by id. Returns false (and changes nothing) if the relic is
    /// already active or unknown to the catalog. Recomputes the aggregate
    /// before returning.
    pub fn add_relic(&mut self, id: &str, registry: &ContentRegistry) -> bool {
        if self.has_relic(id) {
            return false;
        }
        let Some(def) = registry.relics.get(id) else {
            warn!("Ignoring unknown relic '{}'", id);
            return false;
        };
        self.active.push(def.clone());
        self.recompute();
        self.pending_changes.push(RelicChange::Added(id.to_string()));
        true
    }

    /// Remove a relic by id. Returns false if it was not active.
    pub fn remove_relic(&mut self, id: &str) -> bool {
        let Some(pos) = self.active.iter().position(|r| r.id == id) else {
            return false;
        };
        self.active.remove(pos);
        self.recompute();
        self.pending_changes
            .push(RelicChange::Removed(id.to_string()));
        true
    }

    /// Copy of the cached aggregate. Never recomputed on read.
    pub fn modifiers(&self) -> AggregateModifiers {
        self.aggregate
    }

    pub fn has_changes(&self) -> bool {
        !self.pending_changes.is_empty()
    }

    pub fn take_changes(&mut self) -> Vec<RelicChange> {
        std::mem::take(&mut self.pending_changes)
    }

    /// Full recompute from the active set. Unconditional passive effects and
    /// aggregate-scoped drawbacks only.
    fn recompute(&mut self) {
        let mut aggregate = AggregateModifiers::default();
        for relic in &self.active {
            let effect = &relic.effect;
            if effect.trigger == RelicTrigger::Passive && effect.condition.is_none() {
                aggregate.accumulate(effect);
            }
            for drawback in &effect.drawbacks {
                aggregate.apply_drawback(drawback);
            }
        }
        self.aggregate = aggregate;
    }

    /// Evaluate every active relic whose trigger matches exactly, applying
    /// effect logic against a copy of the context. Sub-conditions and
    /// one-shot guards are checked inline; an effect may decline to apply
    /// even on a trigger match.
    pub fn apply_trigger(&mut self, trigger: RelicTrigger, ctx: TriggerContext) -> TriggerContext {
        let mut ctx = ctx;
        let matching: Vec<_> = self
            .active
            .iter()
            .filter(|r| r.effect.trigger == trigger)
            .map(|r| r.effect.clone())
            .collect();

        for effect in &matching {
            // Drawbacks are the price of carrying the relic: they apply on the
            // trigger whether or not the beneficial condition holds.
            for drawback in &effect.drawbacks {
                if drawback.kind == DrawbackKind::FortressDamage {
                    ctx.fortress_damage += drawback.magnitude;
                }
            }

            if let Some(condition) = &effect.condition {
                if !condition_holds(condition, &ctx) {
                    continue;
                }
            }

            match effect.kind {
                EffectKind::BonusGold => ctx.gold_delta += effect.value as u32,
                EffectKind::BonusHeal => ctx.heal += effect.value,
                EffectKind::GoldInterest => {
                    ctx.gold_delta += (ctx.gold_gained as f32 * effect.percent / 100.0) as u32;
                }
                EffectKind::Lifesteal => ctx.heal += ctx.damage * effect.percent / 100.0,
                EffectKind::Thorns => {
                    ctx.reflect_damage += effect.value + ctx.damage * effect.percent / 100.0;
                }
                EffectKind::Revive => {
                    if !self.revive_used && ctx.damage >= ctx.fortress_hp {
                        self.revive_used = true;
                        ctx.prevent_death = true;
                        ctx.heal += effect.value;
                    }
                }
                EffectKind::RewardUpgrade => {
                    if !self.reward_upgrade_used {
                        self.reward_upgrade_used = true;
                        ctx.reward_upgraded = true;
                    }
                }
                // Passive numeric kinds contribute through the aggregate.
                _ => {}
            }
        }

        // Per-wave drawbacks bite on wave end no matter what their relic's
        // own trigger is.
        if trigger == RelicTrigger::WaveEnd {
            for relic in &self.active {
                for drawback in &relic.effect.drawbacks {
                    if drawback.kind == DrawbackKind::FortressDamagePerWave {
                        ctx.fortress_damage += drawback.magnitude;
                    }
                }
            }
        }

        ctx
    }

    /// Sum contributions of conditional passive relics of `kind` whose
    /// condition holds for this context. Returns (flat, percent).
    fn conditional_bonus(&self, kind: EffectKind, ctx: &TriggerContext) -> (f32, f32) {
        let mut flat = 0.0;
        let mut pct = 0.0;
        for relic in &self.active {
            let effect = &relic.effect;
            if effect.trigger != RelicTrigger::Passive || effect.kind != kind {
                continue;
            }
            let Some(condition) = &effect.condition else {
                continue;
            };
            if condition_holds(condition, ctx) {
                flat += effect.value;
                pct += effect.percent;
            }
        }
        (flat, pct)
    }

    fn scaled(base: f32, flat: f32, pct: f32) -> f32 {
        (base + flat) * (1.0 + pct / 100.0)
    }

    pub fn apply_damage_modifier(&self, base: f32, ctx: &TriggerContext) -> f32 {
        let (flat, pct) = self.conditional_bonus(EffectKind::UnitDamage, ctx);
        Self::scaled(
            base,
            self.aggregate.unit_damage_flat + flat,
            self.aggregate.unit_damage_pct + pct,
        )
    }

    pub fn apply_armor_modifier(&self, base: f32, ctx: &TriggerContext) -> f32 {
        let (flat, pct) = self.conditional_bonus(EffectKind::UnitArmor, ctx);
        Self::scaled(
            base,
            self.aggregate.unit_armor_flat + flat,
            self.aggregate.unit_armor_pct + pct,
        )
    }

    pub fn apply_move_speed_modifier(&self, base: f32, ctx: &TriggerContext) -> f32 {
        let (_, pct) = self.conditional_bonus(EffectKind::MoveSpeed, ctx);
        Self::scaled(base, 0.0, self.aggregate.move_speed_pct + pct)
    }

    pub fn apply_attack_speed_modifier(&self, base: f32, ctx: &TriggerContext) -> f32 {
        let (_, pct) = self.conditional_bonus(EffectKind::AttackSpeed, ctx);
        Self::scaled(base, 0.0, self.aggregate.attack_speed_pct + pct)
    }

    pub fn apply_range_modifier(&self, base: f32, ctx: &TriggerContext) -> f32 {
        let (_, pct) = self.conditional_bonus(EffectKind::AttackRange, ctx);
        Self::scaled(base, 0.0, self.aggregate.range_pct + pct)
    }

    pub fn apply_fortress_hp_modifier(&self, base: f32, ctx: &TriggerContext) -> f32 {
        let (flat, pct) = self.conditional_bonus(EffectKind::FortressHp, ctx);
        Self::scaled(
            base,
            self.aggregate.fortress_hp_flat + flat,
            self.aggregate.fortress_hp_pct + pct,
        )
    }

    /// Healing percent can go negative through drawbacks; never flip a heal
    /// into damage.
    pub fn apply_healing_modifier(&self, base: f32, ctx: &TriggerContext) -> f32 {
        let (_, pct) = self.conditional_bonus(EffectKind::Healing, ctx);
        Self::scaled(base, 0.0, self.aggregate.healing_pct + pct).max(0.0)
    }

    pub fn apply_gold_modifier(&self, base: u32, ctx: &TriggerContext) -> u32 {
        let (_, pct) = self.conditional_bonus(EffectKind::GoldGain, ctx);
        Self::scaled(base as f32, 0.0, self.aggregate.gold_gain_pct + pct).max(0.0) as u32
    }

    pub fn apply_shop_discount(&self, price: u32, ctx: &TriggerContext) -> u32 {
        let (_, pct) = self.conditional_bonus(EffectKind::ShopDiscount, ctx);
        let discount = (self.aggregate.shop_discount_pct + pct).clamp(0.0, 100.0);
        (price as f32 * (1.0 - discount / 100.0)).round() as u32
    }

    /// Hand size never drops below one card.
    pub fn effective_hand_size(&self, base: u32, ctx: &TriggerContext) -> u32 {
        let (flat, _) = self.conditional_bonus(EffectKind::HandSize, ctx);
        let size = base as i32 + self.aggregate.hand_size_delta + flat as i32;
        size.max(1) as u32
    }

    pub fn effective_commander_cooldown(&self, base: f32, ctx: &TriggerContext) -> f32 {
        let (_, pct) = self.conditional_bonus(EffectKind::CommanderCooldown, ctx);
        Self::scaled(base, 0.0, self.aggregate.commander_cooldown_pct + pct).max(0.0)
    }

    pub fn apply_commander_damage_modifier(&self, base: f32, ctx: &TriggerContext) -> f32 {
        let (_, pct) = self.conditional_bonus(EffectKind::CommanderDamage, ctx);
        Self::scaled(base, 0.0, self.aggregate.commander_damage_pct + pct)
    }
}
