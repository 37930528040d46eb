//! Simulation Configuration
//!
//! Describes the world the headless runtime simulates: entities, trigger
//! zones, solar-state triggers and enemies.
//!
//! # Configuration Sources (in priority order)
//!
//! 1. Path given on the command line
//! 2. Environment variable: `ECLIPSE_CONFIG=/path/to/world.toml`
//! 3. `eclipse.toml` in the working directory
//! 4. Built-in defaults (an empty world)
//!
//! `ECLIPSE_TICKS` and `ECLIPSE_LOG` override the tick count and log filter
//! afterwards.
//!
//! # Example Config File
//!
//! ```toml
//! ticks = 600
//! delta_time = 0.016
//!
//! [[entities]]
//! name = "player"
//! position = [0.0, 0.0, 0.0]
//! tags = ["player"]
//! health = { max = 100.0, respawn_delay = 3.0 }
//!
//! [[triggers]]
//! owner = "altar"
//! volume = { shape = "sphere", radius = 2.0 }
//! filter = { required_tags = ["player"] }
//! actions = [{ type = "set_active", target = { named = "door" }, active = true }]
//! ```

use eclipse_actions::{ActionKind, SceneEntity};
use eclipse_ai::EnemyAiConfig;
use eclipse_combat::HealthConfig;
use eclipse_solar::{SolarPhase, SolarState};
use eclipse_triggers::{FilterOption, TriggerSettings, TriggerVolume};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of the config file looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "eclipse.toml";

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The config file is not valid TOML for this schema
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// The config parsed but describes an impossible world
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// An entity to spawn
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityConfig {
    #[serde(flatten)]
    pub entity: SceneEntity,
    /// Health, if the entity can be damaged
    #[serde(default)]
    pub health: Option<HealthConfig>,
}

/// A trigger zone
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TriggerConfig {
    /// Entity that owns the trigger
    pub owner: String,
    /// Zone shape
    #[serde(default)]
    pub volume: TriggerVolume,
    /// Zone center; the owner's position when absent
    #[serde(default)]
    pub position: Option<[f32; 3]>,
    #[serde(default)]
    pub settings: TriggerSettings,
    /// Layer/tag filter
    #[serde(default)]
    pub filter: Option<FilterOption>,
    /// Only living entities activate the trigger
    #[serde(default)]
    pub require_alive: bool,
    /// Damage dealt to the activating entity
    #[serde(default)]
    pub damage: Option<f32>,
    /// Actions run on activation, with the activating entity as instigator
    #[serde(default)]
    pub actions: Vec<ActionKind>,
    #[serde(default = "default_true")]
    pub stop_on_error: bool,
}

/// One required state of a named solar source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConditionConfig {
    /// Source name; `sky` is the one driven by the solar cycle
    #[serde(default = "default_source")]
    pub source: String,
    pub state: SolarState,
}

/// A solar-state action trigger
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolarTriggerConfig {
    /// Entity passed to actions as instigator
    #[serde(default)]
    pub owner: Option<String>,
    #[serde(default)]
    pub conditions: Vec<ConditionConfig>,
    #[serde(default = "default_true")]
    pub trigger_once: bool,
    #[serde(default)]
    pub actions: Vec<ActionKind>,
}

/// An enemy driven by the state machine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnemyConfig {
    /// Entity the enemy controls
    pub entity: String,
    /// Entity the enemy hunts
    #[serde(default = "default_target")]
    pub target: String,
    #[serde(default)]
    pub ai: EnemyAiConfig,
    /// Movement speed in units per second
    #[serde(default = "default_speed")]
    pub speed: f32,
    #[serde(default)]
    pub waypoints: Vec<[f32; 3]>,
    #[serde(default = "default_detection_radius")]
    pub detection_radius: f32,
    #[serde(default = "default_attack_range")]
    pub attack_range: f32,
    #[serde(default = "default_attack_cooldown")]
    pub attack_cooldown: f32,
    #[serde(default = "default_attack_damage")]
    pub attack_damage: f32,
}

/// Solar cycle settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SolarConfig {
    /// Phases of the `sky` source
    pub phases: Vec<SolarPhase>,
    /// Extra sources the host sets directly, all starting in the sun state
    pub sources: Vec<String>,
}

impl Default for SolarConfig {
    fn default() -> Self {
        Self {
            phases: vec![
                SolarPhase::new(SolarState::Sun, 20.0),
                SolarPhase::new(SolarState::Moon, 10.0),
                SolarPhase::new(SolarState::Eclipse, 3.0),
            ],
            sources: Vec::new(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_source() -> String {
    "sky".to_string()
}

fn default_target() -> String {
    "player".to_string()
}

fn default_speed() -> f32 {
    3.0
}

fn default_detection_radius() -> f32 {
    8.0
}

fn default_attack_range() -> f32 {
    1.5
}

fn default_attack_cooldown() -> f32 {
    1.0
}

fn default_attack_damage() -> f32 {
    10.0
}

/// Complete simulation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Default log filter (overridden by `RUST_LOG`)
    pub log_filter: String,
    /// Number of ticks the binary runs
    pub ticks: u32,
    /// Fixed delta per tick in seconds
    pub delta_time: f32,
    pub solar: SolarConfig,
    pub entities: Vec<EntityConfig>,
    pub triggers: Vec<TriggerConfig>,
    pub solar_triggers: Vec<SolarTriggerConfig>,
    pub enemies: Vec<EnemyConfig>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            log_filter: "info".to_string(),
            ticks: 600,
            delta_time: 1.0 / 60.0,
            solar: SolarConfig::default(),
            entities: Vec::new(),
            triggers: Vec::new(),
            solar_triggers: Vec::new(),
            enemies: Vec::new(),
        }
    }
}

impl SimConfig {
    /// Load using the layered lookup. Returns the config and the file it
    /// came from, if any.
    pub fn load(explicit: Option<&Path>) -> Result<(Self, Option<PathBuf>), ConfigError> {
        let path = match explicit {
            Some(path) => Some(path.to_path_buf()),
            None => match std::env::var("ECLIPSE_CONFIG") {
                Ok(path) if !path.is_empty() => Some(PathBuf::from(path)),
                _ => {
                    let local = PathBuf::from(DEFAULT_CONFIG_FILE);
                    local.exists().then_some(local)
                }
            },
        };

        let mut config = match &path {
            Some(path) => Self::load_from_file(path)?,
            None => Self::default(),
        };
        config.apply_env_overrides();
        config.validate()?;
        Ok((config, path))
    }

    /// Load a specific file
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Parse TOML text
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `ECLIPSE_TICKS` and `ECLIPSE_LOG`
    pub fn apply_env_overrides(&mut self) {
        if let Ok(ticks) = std::env::var("ECLIPSE_TICKS") {
            match ticks.parse() {
                Ok(ticks) => self.ticks = ticks,
                Err(_) => log::warn!("Ignoring ECLIPSE_TICKS={}: not a tick count", ticks),
            }
        }
        if let Ok(filter) = std::env::var("ECLIPSE_LOG") {
            if !filter.is_empty() {
                self.log_filter = filter;
            }
        }
    }

    /// Check values serde cannot
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.delta_time.is_finite() || self.delta_time <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "delta_time must be a positive finite number, got {}",
                self.delta_time
            )));
        }
        if self
            .solar
            .phases
            .iter()
            .any(|phase| !phase.duration.is_finite() || phase.duration < 0.0)
        {
            return Err(ConfigError::Invalid(
                "solar phase durations must be finite and not negative".to_string(),
            ));
        }

        let mut names = std::collections::HashSet::new();
        for entity in &self.entities {
            if !names.insert(entity.entity.name.as_str()) {
                return Err(ConfigError::Invalid(format!(
                    "duplicate entity name '{}'",
                    entity.entity.name
                )));
            }
        }

        let known = |name: &str, what: &str| {
            if names.contains(name) {
                Ok(())
            } else {
                Err(ConfigError::Invalid(format!("{} refers to unknown entity '{}'", what, name)))
            }
        };
        for trigger in &self.triggers {
            known(&trigger.owner, "trigger owner")?;
        }
        for trigger in &self.solar_triggers {
            if let Some(owner) = &trigger.owner {
                known(owner, "solar trigger owner")?;
            }
        }
        for enemy in &self.enemies {
            known(&enemy.entity, "enemy")?;
            known(&enemy.target, "enemy target")?;
        }
        Ok(())
    }

    /// Condition sources that are neither `sky` nor listed in
    /// `solar.sources`, in first-use order. Nothing drives them.
    pub fn undeclared_sources(&self) -> Vec<&str> {
        let mut undeclared: Vec<&str> = Vec::new();
        for condition in self.solar_triggers.iter().flat_map(|t| &t.conditions) {
            let name = condition.source.as_str();
            let declared = name == "sky" || self.solar.sources.iter().any(|s| s == name);
            if !declared && !undeclared.contains(&name) {
                undeclared.push(name);
            }
        }
        undeclared
    }
}
