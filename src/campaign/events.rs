//! Campaign domain: request and notification messages.
//!
//! Requests are the presentation-facing command surface; notifications carry
//! immutable snapshots, never live references into the state machine.

use bevy::ecs::message::Message;

use crate::core::Difficulty;

use super::map::CampaignNode;
use super::run_state::{RunState, StageSnapshot};

// ============================================================================
// Requests
// ============================================================================

#[derive(Debug)]
pub struct StartRunRequest {
    pub faction_id: String,
    pub difficulty: Difficulty,
    pub commander_override: Option<String>,
}

impl Message for StartRunRequest {}

#[derive(Debug)]
pub struct LoadRunRequest;

impl Message for LoadRunRequest {}

#[derive(Debug)]
pub struct AbandonRunRequest;

impl Message for AbandonRunRequest {}

#[derive(Debug)]
pub struct MoveToNodeRequest {
    pub node_id: String,
}

impl Message for MoveToNodeRequest {}

#[derive(Debug)]
pub struct CompleteNodeRequest {
    pub node_id: String,
}

impl Message for CompleteNodeRequest {}

// ============================================================================
// Notifications
// ============================================================================

#[derive(Debug)]
pub struct RunStartedEvent {
    pub state: RunState,
}

impl Message for RunStartedEvent {}

#[derive(Debug)]
pub struct RunLoadedEvent {
    pub state: RunState,
}

impl Message for RunLoadedEvent {}

#[derive(Debug)]
pub struct RunAbandonedEvent;

impl Message for RunAbandonedEvent {}

#[derive(Debug)]
pub struct StageEnteredEvent {
    pub stage: StageSnapshot,
}

impl Message for StageEnteredEvent {}

#[derive(Debug)]
pub struct NodeSelectedEvent {
    pub node: CampaignNode,
}

impl Message for NodeSelectedEvent {}

#[derive(Debug)]
pub struct NodeCompletedEvent {
    pub node: CampaignNode,
}

impl Message for NodeCompletedEvent {}

#[derive(Debug)]
pub struct StageCompletedEvent {
    pub stage_index: u32,
}

impl Message for StageCompletedEvent {}

#[derive(Debug)]
pub struct RunCompletedEvent {
    pub state: RunState,
}

impl Message for RunCompletedEvent {}

#[derive(Debug)]
pub struct GoldUpdatedEvent {
    pub gold: u32,
}

impl Message for GoldUpdatedEvent {}

#[derive(Debug)]
pub struct FortressUpdatedEvent {
    pub fortress_hp: f32,
    pub fortress_max_hp: f32,
}

impl Message for FortressUpdatedEvent {}

#[derive(Debug)]
pub struct DeckUpdatedEvent {
    pub deck: Vec<String>,
    pub card_collection: Vec<String>,
}

impl Message for DeckUpdatedEvent {}

#[derive(Debug)]
pub struct RelicsUpdatedEvent {
    pub relics: Vec<String>,
}

impl Message for RelicsUpdatedEvent {}

#[derive(Debug)]
pub struct CursesUpdatedEvent {
    pub curses: Vec<String>,
}

impl Message for CursesUpdatedEvent {}

#[derive(Debug)]
pub struct RosterUpdatedEvent {
    pub commanders: Vec<String>,
}

impl Message for RosterUpdatedEvent {}
