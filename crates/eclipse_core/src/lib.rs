//! # eclipse_core - Child of Eclipse Core
//!
//! Shared primitives used by every gameplay crate:
//! - **Entity ids**: opaque [`EntityId`] handles and an [`IdGenerator`]
//! - **Errors**: the [`Error`] taxonomy reported by actions and triggers
//! - **Frame time**: [`FrameTime`], [`Clock`] and [`Countdown`] for cooperative,
//!   delta-driven timers
//! - **Capabilities**: [`ComponentLookup`] for "does this entity have X" queries
//!
//! Nothing in here knows about a host engine. Hosts feed frame time in and
//! answer lookups through the traits defined here.

pub mod capability;
pub mod error;
pub mod id;
pub mod time;

pub use capability::*;
pub use error::*;
pub use id::*;
pub use time::*;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::capability::{Capability, ComponentLookup};
    pub use crate::error::{Error, Result};
    pub use crate::id::{EntityId, IdGenerator};
    pub use crate::time::{Clock, Countdown, FrameTime};
}
