//! Capability lookup
//!
//! Stands in for per-entity component queries on the host side ("does this
//! entity have health?"). The core only asks yes/no questions; typed access
//! to a capability goes through the subsystem that owns it.

use crate::id::EntityId;
use core::fmt;
use serde::{Deserialize, Serialize};

/// A capability an entity may expose
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    /// Has a health pool
    Health,
    /// Has a navigation agent that can be stopped
    Agent,
    /// Has an animator
    Animator,
    /// Has a renderer
    Renderer,
    /// Host-defined capability
    Custom(String),
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Capability::Health => write!(f, "health"),
            Capability::Agent => write!(f, "agent"),
            Capability::Animator => write!(f, "animator"),
            Capability::Renderer => write!(f, "renderer"),
            Capability::Custom(name) => write!(f, "{}", name),
        }
    }
}

/// Answers capability queries for entities
pub trait ComponentLookup {
    /// Whether `entity` exposes `capability`
    fn has_capability(&self, entity: EntityId, capability: &Capability) -> bool;
}

impl<F> ComponentLookup for F
where
    F: Fn(EntityId, &Capability) -> bool,
{
    fn has_capability(&self, entity: EntityId, capability: &Capability) -> bool {
        self(entity, capability)
    }
}
