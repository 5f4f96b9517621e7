//! Campaign domain: the run progression state machine.

use bevy::prelude::*;
use rand::Rng;

use crate::content::{ContentRegistry, GameplayDefaults, NodeType, RelicTrigger};
use crate::core::Difficulty;
use crate::relics::{draft_curse, draft_starting_relics, RelicEngine, TriggerContext};

use super::map::{CampaignMap, CampaignNode, MapError};
use super::run_state::{normalize_card_id, RunState, StageSnapshot};

// Fallback loadout used when faction/commander lookups fail.
const FALLBACK_FORTRESS_HP: f32 = 500.0;
const FALLBACK_GOLD: u32 = 100;
const FALLBACK_COMMANDER: &str = "commander_aldric";
const FALLBACK_DECK: [&str; 6] = [
    "card_militia",
    "card_militia",
    "card_militia",
    "card_archer",
    "card_archer",
    "card_pikeman",
];

/// Lifecycle notice queued by the state machine and drained into typed
/// messages by the publisher system. Snapshot payloads are resolved at
/// drain time.
#[derive(Debug, Clone, PartialEq)]
pub enum CampaignNotice {
    RunStarted,
    RunLoaded,
    RunAbandoned,
    StageEntered(u32),
    NodeSelected(String),
    NodeCompleted(String),
    StageCompleted(u32),
    RunCompleted,
    GoldUpdated,
    FortressUpdated,
    DeckUpdated,
    RelicsUpdated,
    CursesUpdated,
    RosterUpdated,
}

/// The progression state machine. Owns the node graph and the run record;
/// neither is ever handed out by reference. Explicitly constructed and
/// passed its collaborators (catalog, relic engine, rng) per call.
#[derive(Resource, Debug, Default)]
pub struct Campaign {
    map: Option<CampaignMap>,
    run: Option<RunState>,
    notices: Vec<CampaignNotice>,
    /// Set when a reward-upgrade trigger fired; consumed by the next offer.
    reward_upgrade_pending: bool,
}

impl Campaign {
    // -------------------------------------------------------------------------
    // Run lifecycle
    // -------------------------------------------------------------------------

    /// Start a fresh run: rebuild the graph, roll the starting loadout and
    /// relics, apply run-start modifiers, and stand the player on stage
    /// zero's entry node.
    pub fn start_new_run(
        &mut self,
        faction_id: &str,
        difficulty: Difficulty,
        commander_override: Option<&str>,
        registry: &ContentRegistry,
        defaults: &GameplayDefaults,
        relics: &mut RelicEngine,
        rng: &mut impl Rng,
    ) -> Result<(), MapError> {
        let mut map = CampaignMap::build(registry)?;

        let (fortress_base, gold_base, deck_cards, faction_commander) =
            match registry.factions.get(faction_id) {
                Some(faction) => (
                    faction.fortress_hp,
                    faction.starting_gold,
                    faction.starting_deck.clone(),
                    faction.commander_id.clone(),
                ),
                None => {
                    warn!("Unknown faction '{}', using fallback loadout", faction_id);
                    (
                        FALLBACK_FORTRESS_HP,
                        FALLBACK_GOLD,
                        FALLBACK_DECK.iter().map(|s| s.to_string()).collect(),
                        FALLBACK_COMMANDER.to_string(),
                    )
                }
            };

        let commander_id = match commander_override {
            Some(id) if registry.commanders.contains_key(id) => id.to_string(),
            Some(id) => {
                warn!("Unknown commander override '{}', keeping '{}'", id, faction_commander);
                faction_commander
            }
            None => faction_commander,
        };

        relics.reset();
        let starting = draft_starting_relics(
            registry,
            rng,
            defaults.run_defaults.starting_relic_count as usize,
        );
        for relic_id in &starting {
            relics.add_relic(relic_id, registry);
        }
        if difficulty.guarantees_curse() && defaults.run_defaults.curse_on_calamity {
            if let Some(curse_id) = draft_curse(registry, rng, &relics.active_relic_ids()) {
                relics.add_relic(&curse_id, registry);
            }
        }

        // Relics shape the run before the record exists: fortress scaling
        // first, then the run-start trigger for bonus gold.
        let fortress_max =
            relics.apply_fortress_hp_modifier(fortress_base, &TriggerContext::default());
        let start_ctx = TriggerContext {
            fortress_hp: fortress_max,
            fortress_max_hp: fortress_max,
            ..TriggerContext::default()
        };
        let start = relics.apply_trigger(RelicTrigger::RunStart, start_ctx);
        let gold = gold_base.saturating_add(start.gold_delta);

        let first_index = map.first_stage_index().ok_or(MapError::NoStages)?;
        let entry_id = map
            .entry_node_id(first_index)
            .ok_or(MapError::NoStages)?
            .to_string();

        let mut run = RunState {
            faction_id: faction_id.to_string(),
            difficulty,
            current_stage_index: first_index,
            current_node_id: entry_id.clone(),
            completed_node_ids: Vec::new(),
            fortress_hp: fortress_max,
            fortress_max_hp: fortress_max,
            gold,
            deck: Vec::new(),
            card_collection: Vec::new(),
            relics: relics.active_relic_ids(),
            curses: relics.curse_ids(),
            commander_roster: vec![commander_id],
            next_card_instance: 0,
        };
        for card_id in &deck_cards {
            let instance = run.mint_card_instance(card_id);
            run.deck.push(instance);
        }

        map.recompute_accessibility(&entry_id);
        self.map = Some(map);
        self.run = Some(run);
        self.reward_upgrade_pending = false;

        info!(
            "Run started: faction '{}', difficulty {:?}, {} starting relics",
            faction_id,
            difficulty,
            starting.len()
        );

        self.notices.push(CampaignNotice::RunStarted);
        self.notices.push(CampaignNotice::StageEntered(first_index));
        self.notices.push(CampaignNotice::NodeSelected(entry_id));
        Ok(())
    }

    /// Restore a previously saved run. Relic ids replay into the engine in
    /// saved order; accessibility is recomputed, never persisted.
    pub fn load_saved_run(
        &mut self,
        state: RunState,
        registry: &ContentRegistry,
        relics: &mut RelicEngine,
    ) -> bool {
        let mut map = match CampaignMap::build(registry) {
            Ok(map) => map,
            Err(e) => {
                warn!("Cannot rebuild campaign map for saved run: {}", e);
                return false;
            }
        };

        relics.reset();
        for relic_id in &state.relics {
            relics.add_relic(relic_id, registry);
        }

        for node_id in &state.completed_node_ids {
            if let Some(node) = map.node_mut(node_id) {
                node.is_completed = true;
            }
        }
        map.recompute_accessibility(&state.current_node_id);

        let stage_index = state.current_stage_index;
        let node_id = state.current_node_id.clone();
        self.map = Some(map);
        self.run = Some(state);
        self.reward_upgrade_pending = false;

        self.notices.push(CampaignNotice::RunLoaded);
        self.notices.push(CampaignNotice::StageEntered(stage_index));
        self.notices.push(CampaignNotice::NodeSelected(node_id));
        true
    }

    /// Drop the active run. No effect without one.
    pub fn abandon_run(&mut self) -> bool {
        if self.run.is_none() {
            return false;
        }
        self.map = None;
        self.run = None;
        self.reward_upgrade_pending = false;
        self.notices.push(CampaignNotice::RunAbandoned);
        true
    }

    pub fn has_active_run(&self) -> bool {
        self.run.is_some()
    }

    // -------------------------------------------------------------------------
    // Node progression
    // -------------------------------------------------------------------------

    /// Pure predicate: the node exists, is accessible, and is not completed.
    pub fn can_access_node(&self, node_id: &str) -> bool {
        self.map
            .as_ref()
            .and_then(|m| m.node(node_id))
            .map(|n| n.is_accessible && !n.is_completed)
            .unwrap_or(false)
    }

    /// Move onto an accessible node. Fails without side effects otherwise.
    /// Landing on a shop node fires the shop-enter trigger.
    pub fn move_to_node(&mut self, node_id: &str, relics: &mut RelicEngine) -> bool {
        let node_type;
        {
            let (Some(map), Some(run)) = (self.map.as_mut(), self.run.as_mut()) else {
                return false;
            };
            let Some(node) = map.node(node_id) else {
                return false;
            };
            if !node.is_accessible {
                return false;
            }
            node_type = node.node_type;
            run.current_node_id = node_id.to_string();
            map.recompute_accessibility(node_id);
        }
        self.notices
            .push(CampaignNotice::NodeSelected(node_id.to_string()));

        if node_type == NodeType::Shop {
            let ctx = self.trigger_context(Some(node_type));
            let out = relics.apply_trigger(RelicTrigger::ShopEnter, ctx);
            self.apply_trigger_outcome(out, relics);
        }
        true
    }

    /// Mark a node completed. No-op (false) for unknown or already-completed
    /// nodes. Completing the stage's boss node advances the stage; anything
    /// else just reopens the frontier.
    pub fn complete_node(
        &mut self,
        node_id: &str,
        defaults: &GameplayDefaults,
        relics: &mut RelicEngine,
    ) -> bool {
        let node_type;
        let tier;
        let is_boss;
        {
            let (Some(map), Some(run)) = (self.map.as_mut(), self.run.as_mut()) else {
                return false;
            };
            let Some(node) = map.node(node_id) else {
                return false;
            };
            if node.is_completed {
                return false;
            }
            node_type = node.node_type;
            tier = node.tier;
            is_boss = map
                .stage(node.stage_index)
                .map(|s| s.boss_node_id == node_id)
                .unwrap_or(false);

            if let Some(node) = map.node_mut(node_id) {
                node.is_completed = true;
                node.is_accessible = false;
            }
            if !run.completed_node_ids.iter().any(|id| id == node_id) {
                run.completed_node_ids.push(node_id.to_string());
            }
        }
        self.notices
            .push(CampaignNotice::NodeCompleted(node_id.to_string()));

        // Clear reward, routed through gain_gold so gold relics apply.
        let gold_reward =
            defaults.economy.node_gold_base + tier * defaults.economy.node_gold_per_tier;
        if gold_reward > 0 {
            self.gain_gold(gold_reward, relics);
        }

        let ctx = self.trigger_context(Some(node_type));
        let out = relics.apply_trigger(RelicTrigger::NodeComplete, ctx);
        self.apply_trigger_outcome(out, relics);

        if is_boss {
            self.transition_stage(relics);
        } else if let (Some(map), Some(run)) = (self.map.as_mut(), self.run.as_ref()) {
            map.recompute_accessibility(&run.current_node_id);
        }
        true
    }

    /// Stage handoff after a boss falls. Terminal when no next stage exists.
    fn transition_stage(&mut self, relics: &mut RelicEngine) {
        let finished_index;
        let next;
        {
            let (Some(map), Some(run)) = (self.map.as_ref(), self.run.as_ref()) else {
                return;
            };
            finished_index = run.current_stage_index;
            next = map.next_stage_index(finished_index);
        }
        self.notices
            .push(CampaignNotice::StageCompleted(finished_index));

        let Some(next_index) = next else {
            info!("Run complete after stage {}", finished_index);
            self.notices.push(CampaignNotice::RunCompleted);
            return;
        };

        relics.reset_stage_state();
        let entry_id = self
            .map
            .as_ref()
            .and_then(|m| m.entry_node_id(next_index))
            .map(str::to_string);
        let Some(entry_id) = entry_id else {
            warn!("Stage {} has no entry node; cannot advance", next_index);
            return;
        };
        if let (Some(map), Some(run)) = (self.map.as_mut(), self.run.as_mut()) {
            run.current_stage_index = next_index;
            run.current_node_id = entry_id.clone();
            map.recompute_accessibility(&entry_id);
        }
        self.notices.push(CampaignNotice::StageEntered(next_index));
    }

    // -------------------------------------------------------------------------
    // Resources
    // -------------------------------------------------------------------------

    /// Add gold with the gold-gain modifier applied, then let gold-gain
    /// triggers top it up. Returns the total actually gained.
    pub fn gain_gold(&mut self, amount: u32, relics: &mut RelicEngine) -> u32 {
        let ctx = self.trigger_context(None);
        let Some(run) = self.run.as_mut() else {
            return 0;
        };
        let modified = relics.apply_gold_modifier(amount, &ctx);
        let out = relics.apply_trigger(
            RelicTrigger::GoldGain,
            TriggerContext {
                gold_gained: modified,
                ..ctx
            },
        );
        let total = modified.saturating_add(out.gold_delta);
        run.gold = run.gold.saturating_add(total);
        self.notices.push(CampaignNotice::GoldUpdated);
        total
    }

    /// Spend gold at the discounted price. Fails (no mutation) if the
    /// discounted price still exceeds the purse.
    pub fn spend_gold(&mut self, cost: u32, relics: &RelicEngine) -> bool {
        let ctx = self.trigger_context(None);
        let Some(run) = self.run.as_mut() else {
            return false;
        };
        let price = relics.apply_shop_discount(cost, &ctx);
        if run.gold < price {
            return false;
        }
        run.gold -= price;
        self.notices.push(CampaignNotice::GoldUpdated);
        true
    }

    /// Heal with the healing modifier applied, clamped at max HP.
    /// Returns the amount actually applied before clamping.
    pub fn heal_fortress(&mut self, amount: f32, relics: &RelicEngine) -> f32 {
        let ctx = self.trigger_context(None);
        let Some(run) = self.run.as_mut() else {
            return 0.0;
        };
        let healed = relics.apply_healing_modifier(amount, &ctx);
        run.fortress_hp = (run.fortress_hp + healed).min(run.fortress_max_hp);
        self.notices.push(CampaignNotice::FortressUpdated);
        healed
    }

    /// Apply incoming fortress damage, consulting damage-taken triggers.
    /// A revive leaves the fortress standing at the relic's heal value.
    /// Returns the remaining HP.
    pub fn damage_fortress(&mut self, amount: f32, relics: &mut RelicEngine) -> f32 {
        let ctx = TriggerContext {
            damage: amount,
            ..self.trigger_context(None)
        };
        let Some(run) = self.run.as_mut() else {
            return 0.0;
        };
        let out = relics.apply_trigger(RelicTrigger::DamageTaken, ctx);
        if out.prevent_death && amount >= run.fortress_hp {
            run.fortress_hp = out.heal.max(1.0).min(run.fortress_max_hp);
        } else {
            run.fortress_hp = (run.fortress_hp - amount).max(0.0);
            if out.heal > 0.0 {
                run.fortress_hp = (run.fortress_hp + out.heal).min(run.fortress_max_hp);
            }
        }
        self.notices.push(CampaignNotice::FortressUpdated);
        run.fortress_hp
    }

    // -------------------------------------------------------------------------
    // Deck and collection
    // -------------------------------------------------------------------------

    /// Add a card to the deck, minting a unique instance id. Returns it.
    pub fn add_card_to_run_deck(
        &mut self,
        card_id: &str,
        registry: &ContentRegistry,
    ) -> Option<String> {
        let Some(run) = self.run.as_mut() else {
            return None;
        };
        if !registry.cards.contains_key(card_id) {
            warn!("Ignoring unknown card '{}'", card_id);
            return None;
        }
        let instance = run.mint_card_instance(card_id);
        run.deck.push(instance.clone());
        self.notices.push(CampaignNotice::DeckUpdated);
        Some(instance)
    }

    /// Remove a card by its exact instance id.
    pub fn remove_card_from_run_deck(&mut self, instance_id: &str) -> bool {
        let Some(run) = self.run.as_mut() else {
            return false;
        };
        let Some(pos) = run.deck.iter().position(|id| id == instance_id) else {
            return false;
        };
        run.deck.remove(pos);
        self.notices.push(CampaignNotice::DeckUpdated);
        true
    }

    /// Replace the whole deck.
    pub fn set_run_deck(&mut self, deck: Vec<String>) -> bool {
        let Some(run) = self.run.as_mut() else {
            return false;
        };
        run.deck = deck;
        self.notices.push(CampaignNotice::DeckUpdated);
        true
    }

    /// Store a card in the collection by its base template id; instance
    /// suffixes are stripped first.
    pub fn add_card_to_collection(&mut self, card_instance_id: &str) -> bool {
        let Some(run) = self.run.as_mut() else {
            return false;
        };
        run.card_collection.push(normalize_card_id(card_instance_id));
        self.notices.push(CampaignNotice::DeckUpdated);
        true
    }

    /// Remove a uniformly random deck card, optionally restricted by a
    /// predicate over instance ids.
    pub fn remove_random_card(
        &mut self,
        rng: &mut impl Rng,
        filter: Option<&dyn Fn(&str) -> bool>,
    ) -> Option<String> {
        let Some(run) = self.run.as_mut() else {
            return None;
        };
        let matches: Vec<usize> = run
            .deck
            .iter()
            .enumerate()
            .filter(|(_, id)| filter.map_or(true, |f| f(id.as_str())))
            .map(|(i, _)| i)
            .collect();
        if matches.is_empty() {
            return None;
        }
        let idx = matches[rng.random_range(0..matches.len())];
        let removed = run.deck.remove(idx);
        self.notices.push(CampaignNotice::DeckUpdated);
        Some(removed)
    }

    // -------------------------------------------------------------------------
    // Relics and roster
    // -------------------------------------------------------------------------

    /// Grant a relic mid-run, keeping the run record in sync with the engine.
    pub fn grant_relic(
        &mut self,
        relic_id: &str,
        registry: &ContentRegistry,
        relics: &mut RelicEngine,
    ) -> bool {
        if self.run.is_none() || !relics.add_relic(relic_id, registry) {
            return false;
        }
        self.sync_relics(relics);
        true
    }

    /// Remove a relic mid-run (cleansing a curse, selling a relic).
    pub fn lose_relic(&mut self, relic_id: &str, relics: &mut RelicEngine) -> bool {
        if self.run.is_none() || !relics.remove_relic(relic_id) {
            return false;
        }
        self.sync_relics(relics);
        true
    }

    fn sync_relics(&mut self, relics: &RelicEngine) {
        let Some(run) = self.run.as_mut() else {
            return;
        };
        run.relics = relics.active_relic_ids();
        let curses = relics.curse_ids();
        let curses_changed = run.curses != curses;
        run.curses = curses;
        self.notices.push(CampaignNotice::RelicsUpdated);
        if curses_changed {
            self.notices.push(CampaignNotice::CursesUpdated);
        }
    }

    /// Add a commander to the roster; their cards join the collection.
    pub fn recruit_commander(&mut self, commander_id: &str, registry: &ContentRegistry) -> bool {
        let Some(run) = self.run.as_mut() else {
            return false;
        };
        let Some(def) = registry.commanders.get(commander_id) else {
            return false;
        };
        if run.commander_roster.iter().any(|id| id == commander_id) {
            return false;
        }
        run.commander_roster.push(commander_id.to_string());
        for card_id in &def.card_ids {
            run.card_collection.push(card_id.clone());
        }
        self.notices.push(CampaignNotice::RosterUpdated);
        self.notices.push(CampaignNotice::DeckUpdated);
        true
    }

    // -------------------------------------------------------------------------
    // Snapshots
    // -------------------------------------------------------------------------

    /// Deep copy of the run record.
    pub fn run_state(&self) -> Option<RunState> {
        self.run.clone()
    }

    pub fn node_snapshot(&self, node_id: &str) -> Option<CampaignNode> {
        self.map.as_ref().and_then(|m| m.node(node_id)).cloned()
    }

    pub fn stage_snapshot(&self, stage_index: u32) -> Option<StageSnapshot> {
        let map = self.map.as_ref()?;
        let stage = map.stage(stage_index)?;
        let nodes = stage
            .node_ids
            .iter()
            .filter_map(|id| map.node(id))
            .cloned()
            .collect();
        Some(StageSnapshot {
            id: stage.id.clone(),
            index: stage.index,
            name: stage.name.clone(),
            boss_node_id: stage.boss_node_id.clone(),
            nodes,
        })
    }

    pub fn deck_snapshot(&self) -> Vec<String> {
        self.run.as_ref().map(|r| r.deck.clone()).unwrap_or_default()
    }

    pub fn card_collection(&self) -> Vec<String> {
        self.run
            .as_ref()
            .map(|r| r.card_collection.clone())
            .unwrap_or_default()
    }

    pub fn accessible_node_ids(&self) -> Vec<String> {
        self.map
            .as_ref()
            .map(|m| m.accessible_node_ids())
            .unwrap_or_default()
    }

    // -------------------------------------------------------------------------
    // Notices
    // -------------------------------------------------------------------------

    pub fn has_notices(&self) -> bool {
        !self.notices.is_empty()
    }

    /// Queued notices awaiting the publisher.
    pub fn notices(&self) -> &[CampaignNotice] {
        &self.notices
    }

    pub fn take_notices(&mut self) -> Vec<CampaignNotice> {
        std::mem::take(&mut self.notices)
    }

    // -------------------------------------------------------------------------
    // Internals
    // -------------------------------------------------------------------------

    fn trigger_context(&self, node_type: Option<NodeType>) -> TriggerContext {
        match self.run.as_ref() {
            Some(run) => TriggerContext {
                node_type,
                fortress_hp: run.fortress_hp,
                fortress_max_hp: run.fortress_max_hp,
                ..TriggerContext::default()
            },
            None => TriggerContext {
                node_type,
                ..TriggerContext::default()
            },
        }
    }

    /// Fold trigger deltas back into the run: heals clamp at max, drawback
    /// damage floors at zero, bonus gold rides the normal gain path.
    fn apply_trigger_outcome(&mut self, out: TriggerContext, relics: &mut RelicEngine) {
        {
            let Some(run) = self.run.as_mut() else {
                return;
            };
            let mut fortress_changed = false;
            if out.heal > 0.0 {
                run.fortress_hp = (run.fortress_hp + out.heal).min(run.fortress_max_hp);
                fortress_changed = true;
            }
            if out.fortress_damage > 0.0 {
                run.fortress_hp = (run.fortress_hp - out.fortress_damage).max(0.0);
                fortress_changed = true;
            }
            if fortress_changed {
                self.notices.push(CampaignNotice::FortressUpdated);
            }
        }
        if out.gold_delta > 0 {
            self.gain_gold(out.gold_delta, relics);
        }
        if out.reward_upgraded {
            self.reward_upgrade_pending = true;
        }
    }

    /// One-shot read of a pending reward-tier upgrade.
    pub fn consume_reward_upgrade(&mut self) -> bool {
        std::mem::take(&mut self.reward_upgrade_pending)
    }
}
