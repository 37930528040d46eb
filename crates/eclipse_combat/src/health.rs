//! Health component

use eclipse_core::{Countdown, EntityId};
use serde::{Deserialize, Serialize};

/// Events emitted by the health registry
#[derive(Debug, Clone, PartialEq)]
pub enum HealthEvent {
    /// Damage was taken
    DamageTaken {
        entity: EntityId,
        amount: f32,
        source: Option<EntityId>,
        new_health: f32,
    },
    /// Entity was healed
    Healed {
        entity: EntityId,
        amount: f32,
        new_health: f32,
    },
    /// Entity died
    Death {
        entity: EntityId,
        killer: Option<EntityId>,
    },
    /// Entity respawned
    Respawned { entity: EntityId, new_health: f32 },
}

impl HealthEvent {
    /// Entity the event is about
    pub fn entity(&self) -> EntityId {
        match self {
            Self::DamageTaken { entity, .. }
            | Self::Healed { entity, .. }
            | Self::Death { entity, .. }
            | Self::Respawned { entity, .. } => *entity,
        }
    }
}

/// Result of applying damage
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DamageOutcome {
    /// Health actually removed
    pub dealt: f32,
    /// Whether this hit killed the entity
    pub died: bool,
}

/// Health as written in config files
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthConfig {
    /// Maximum health
    pub max: f32,
    /// Invulnerability after taking a hit
    #[serde(default)]
    pub invulnerability_on_hit: f32,
    /// Respawn delay; no respawn when absent
    #[serde(default)]
    pub respawn_delay: Option<f32>,
}

/// Health for an entity
#[derive(Debug, Clone, Deserialize)]
#[serde(from = "HealthConfig")]
pub struct Health {
    /// Current health
    pub current: f32,
    /// Maximum health
    pub max: f32,
    /// Invulnerability after taking a hit
    pub invulnerability: Countdown,
    /// Whether to respawn after death
    pub can_respawn: bool,
    /// Delay before respawning
    pub respawn: Countdown,
    is_dead: bool,
}

impl From<HealthConfig> for Health {
    fn from(config: HealthConfig) -> Self {
        let health = Health::new(config.max)
            .with_invulnerability_on_hit(config.invulnerability_on_hit);
        match config.respawn_delay {
            Some(delay) => health.with_respawn(delay),
            None => health,
        }
    }
}

impl Health {
    /// Create full health
    pub fn new(max_health: f32) -> Self {
        let max = max_health.max(0.0);
        Self {
            current: max,
            max,
            invulnerability: Countdown::new(0.0),
            can_respawn: false,
            respawn: Countdown::new(3.0),
            is_dead: max <= 0.0,
        }
    }

    /// Set invulnerability time after a hit
    pub fn with_invulnerability_on_hit(mut self, duration: f32) -> Self {
        self.invulnerability = Countdown::new(duration);
        self
    }

    /// Enable respawning
    pub fn with_respawn(mut self, delay: f32) -> Self {
        self.can_respawn = true;
        self.respawn = Countdown::new(delay);
        self
    }

    /// Apply damage. Dead or invulnerable entities take none.
    pub fn apply_damage(&mut self, amount: f32) -> DamageOutcome {
        if self.is_dead || self.invulnerability.is_running() {
            return DamageOutcome::default();
        }

        let before = self.current;
        self.current = (self.current - amount.max(0.0)).max(0.0);

        if self.invulnerability.duration > 0.0 {
            self.invulnerability.start();
        }

        let died = self.current <= 0.0;
        if died {
            self.is_dead = true;
            self.invulnerability.cancel();
            if self.can_respawn {
                self.respawn.start();
            }
        }

        DamageOutcome {
            dealt: before - self.current,
            died,
        }
    }

    /// Heal; returns the amount actually restored
    pub fn heal(&mut self, amount: f32) -> f32 {
        if self.is_dead {
            return 0.0;
        }

        let old_health = self.current;
        self.current = (self.current + amount.max(0.0)).min(self.max);
        self.current - old_health
    }

    /// Set health directly (clamped to 0..max)
    pub fn set_health(&mut self, health: f32) {
        self.current = health.clamp(0.0, self.max);
        self.is_dead = self.current <= 0.0;
    }

    /// Advance timers. Returns true when the entity respawned this tick.
    pub fn update(&mut self, delta_time: f32) -> bool {
        self.invulnerability.tick(delta_time);

        if self.is_dead && self.can_respawn && self.respawn.tick(delta_time) {
            self.revive();
            return true;
        }
        false
    }

    /// Bring the entity back at full health
    pub fn revive(&mut self) {
        self.is_dead = false;
        self.current = self.max;
        self.invulnerability.cancel();
        self.respawn.cancel();
    }

    /// Get health as a fraction (0.0 - 1.0)
    pub fn health_percent(&self) -> f32 {
        if self.max <= 0.0 {
            return 0.0;
        }
        self.current / self.max
    }

    pub fn is_dead(&self) -> bool {
        self.is_dead
    }

    pub fn is_alive(&self) -> bool {
        !self.is_dead
    }

    pub fn is_invulnerable(&self) -> bool {
        self.invulnerability.is_running()
    }
}

impl Default for Health {
    fn default() -> Self {
        Self::new(100.0)
    }
}
