//! Eclipse Triggers - Condition-Gated Trigger Zones
//!
//! A [`GenericTrigger`] watches a region, evaluates a conjunction of
//! [`TriggerOption`]s for every candidate inside it, and on success notifies
//! its [`TriggerReaction`]s and runs an optional [`ActionRunner`].
//!
//! # Features
//!
//! - Volume shapes (box, sphere, capsule, cylinder) placed as regions
//! - Pluggable spatial queries
//! - Once-per-entry and per-candidate cooldown suppression
//! - Reset notifications when a candidate leaves
//! - Enter/Exit/Activated/Reset events
//!
//! # Example
//!
//! ```ignore
//! use eclipse_triggers::prelude::*;
//!
//! let trigger = GenericTrigger::new(owner, TriggerRegion::new(TriggerVolume::cube(2.0)))
//!     .with_cooldown(0.5)
//!     .with_option(FilterOption::player_only())
//!     .with_reaction(CallbackReaction::new().on_activated(|c, _| println!("{} entered", c.id)));
//! ```
//!
//! [`ActionRunner`]: eclipse_actions::ActionRunner

pub mod events;
pub mod option;
pub mod query;
pub mod reaction;
pub mod system;
pub mod trigger;
pub mod volume;

pub mod prelude {
    pub use crate::events::{TriggerEvent, TriggerEventType};
    pub use crate::option::{
        CapabilityOption, FilterOption, MaxActivationsOption, PredicateOption, TriggerOption,
    };
    pub use crate::query::{PointQuery, SpatialQuery, TriggerCandidate};
    pub use crate::reaction::{CallbackReaction, CounterReaction, EventReaction, TriggerReaction};
    pub use crate::system::TriggerSystem;
    pub use crate::trigger::{GenericTrigger, TriggerContext, TriggerSettings};
    pub use crate::volume::{TriggerRegion, TriggerVolume};
}

pub use prelude::*;
