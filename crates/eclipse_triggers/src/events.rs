//! Trigger events

use eclipse_core::EntityId;
use serde::{Deserialize, Serialize};

/// Type of trigger event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TriggerEventType {
    /// Entity entered the trigger region
    Enter,
    /// Entity left the trigger region
    Exit,
    /// Entity passed every option and activated the trigger
    Activated,
    /// Reactions were reset for an entity that left
    Reset,
}

/// A trigger event
#[derive(Debug, Clone, PartialEq)]
pub struct TriggerEvent {
    /// Type of event
    pub event_type: TriggerEventType,
    /// The trigger's owner
    pub trigger_entity: EntityId,
    /// The entity that caused the event
    pub other_entity: EntityId,
    /// Time of the event
    pub time: f32,
}

impl TriggerEvent {
    /// Create an event
    pub fn new(
        event_type: TriggerEventType,
        trigger: EntityId,
        other: EntityId,
        time: f32,
    ) -> Self {
        Self {
            event_type,
            trigger_entity: trigger,
            other_entity: other,
            time,
        }
    }

    /// Create an enter event
    pub fn enter(trigger: EntityId, other: EntityId, time: f32) -> Self {
        Self::new(TriggerEventType::Enter, trigger, other, time)
    }

    /// Create an exit event
    pub fn exit(trigger: EntityId, other: EntityId, time: f32) -> Self {
        Self::new(TriggerEventType::Exit, trigger, other, time)
    }

    /// Create an activation event
    pub fn activated(trigger: EntityId, other: EntityId, time: f32) -> Self {
        Self::new(TriggerEventType::Activated, trigger, other, time)
    }

    /// Create a reset event
    pub fn reset(trigger: EntityId, other: EntityId, time: f32) -> Self {
        Self::new(TriggerEventType::Reset, trigger, other, time)
    }

    /// Check if this is an activation
    pub fn is_activation(&self) -> bool {
        self.event_type == TriggerEventType::Activated
    }
}
