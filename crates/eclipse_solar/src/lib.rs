//! Eclipse Solar - Solar State and State-Gated Triggers
//!
//! The world's sun/moon/eclipse phase is an observable value. A
//! [`SolarStateActionTrigger`] watches one or more such values and runs its
//! actions when all of them reach their required state at once.
//!
//! # Example
//!
//! ```ignore
//! use eclipse_solar::prelude::*;
//!
//! let sky = SolarStateSource::new("sky", SolarState::Sun);
//! let mut trigger = SolarStateActionTrigger::new(vec![
//!     SolarStateCondition::new(sky.clone(), SolarState::Eclipse),
//! ])
//! .with_runner(ActionRunner::from_kinds([ActionKind::set_active(gate, true)]));
//!
//! sky.set(SolarState::Eclipse);
//! trigger.process(&mut scene);
//! ```

pub mod cycle;
pub mod state;
pub mod trigger;

pub mod prelude {
    pub use crate::cycle::{SolarCycle, SolarPhase};
    pub use crate::state::{SolarState, SolarStateSource};
    pub use crate::trigger::{SolarStateActionTrigger, SolarStateCondition};
}

pub use prelude::*;
