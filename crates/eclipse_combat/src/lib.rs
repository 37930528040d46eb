//! Eclipse Combat - Health, Death and Respawn
//!
//! # Features
//!
//! - Health with damage, healing and hit invulnerability
//! - Death and optional respawn after a countdown
//! - A shared [`HealthRegistry`] answering health capability lookups
//! - Trigger options, reactions and actions that work on health
//!
//! # Example
//!
//! ```ignore
//! use eclipse_combat::prelude::*;
//!
//! let health = HealthRegistry::new();
//! health.insert(player, Health::new(100.0).with_respawn(3.0));
//!
//! let spikes = GenericTrigger::new(spikes_id, region)
//!     .with_option(AliveOption::new(health.clone()))
//!     .with_reaction(DamageReaction::new(health.clone(), 25.0));
//! ```

pub mod gameplay;
pub mod health;
pub mod registry;

pub mod prelude {
    pub use crate::gameplay::{AliveOption, DamageAction, DamageReaction};
    pub use crate::health::{DamageOutcome, Health, HealthConfig, HealthEvent};
    pub use crate::registry::HealthRegistry;
}

pub use prelude::*;
