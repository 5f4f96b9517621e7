//! Relics domain: messages for relic set changes.

use bevy::ecs::message::Message;

#[derive(Debug)]
pub struct RelicAddedEvent {
    pub relic_id: String,
}

impl Message for RelicAddedEvent {}

#[derive(Debug)]
pub struct RelicRemovedEvent {
    pub relic_id: String,
}

impl Message for RelicRemovedEvent {}
