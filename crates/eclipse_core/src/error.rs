//! Error types shared by actions, triggers and state machines

use crate::capability::Capability;
use crate::id::EntityId;
use thiserror::Error;

/// Faults reported by gameplay components.
///
/// None of these ever cross into the host: runners and triggers absorb them
/// and report them through the log.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// A required reference was not configured
    #[error("Missing reference: {0}")]
    MissingReference(String),

    /// The referenced entity does not exist
    #[error("Entity not found: {0}")]
    EntityNotFound(EntityId),

    /// The entity exists but lacks a capability
    #[error("Entity {entity} has no {capability} capability")]
    MissingCapability {
        entity: EntityId,
        capability: Capability,
    },

    /// A configured parameter is invalid
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Generic error with message
    #[error("{0}")]
    Message(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Configuration errors are non-fatal: the operation is skipped
    pub fn is_configuration(&self) -> bool {
        matches!(self, Error::MissingReference(_) | Error::InvalidParameter(_))
    }
}

impl From<&str> for Error {
    fn from(s: &str) -> Self {
        Error::Message(s.to_string())
    }
}

impl From<String> for Error {
    fn from(s: String) -> Self {
        Error::Message(s)
    }
}
