//! Eclipse Runtime - Headless Host
//!
//! Loads a world description and steps every gameplay system at a fixed
//! rate: movement, health, trigger zones, solar-state triggers and enemy AI.
//!
//! # Example
//!
//! ```ignore
//! use eclipse_runtime::prelude::*;
//!
//! let (config, _) = SimConfig::load(None)?;
//! let mut runtime = Runtime::from_config(&config)?;
//! let stats = runtime.run(config.ticks, config.delta_time);
//! ```

pub mod config;
pub mod runtime;

pub mod prelude {
    pub use crate::config::{
        ConditionConfig, ConfigError, EnemyConfig, EntityConfig, SimConfig, SolarConfig,
        SolarTriggerConfig, TriggerConfig,
    };
    pub use crate::runtime::{EnemyUnit, Runtime, RuntimeStats, SKY_SOURCE};
}

pub use prelude::*;
