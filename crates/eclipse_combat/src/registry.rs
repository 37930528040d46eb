//! Shared health storage

use crate::health::{DamageOutcome, Health, HealthEvent};
use eclipse_core::{Capability, ComponentLookup, EntityId, Error, Result};
use eclipse_event::{EventChannel, Signal, SubscriberId};
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Health of every entity that has one
///
/// Clones share the same storage. Events are delivered to subscribers after
/// the storage lock is released, then queued for [`drain_events`].
/// Subscribers must not subscribe or unsubscribe from inside a handler.
///
/// [`drain_events`]: HealthRegistry::drain_events
#[derive(Clone, Default)]
pub struct HealthRegistry {
    entries: Arc<RwLock<HashMap<EntityId, Health>>>,
    signal: Arc<Mutex<Signal<HealthEvent>>>,
    queue: Arc<EventChannel<HealthEvent>>,
}

impl HealthRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Give `entity` health, replacing any it had
    pub fn insert(&self, entity: EntityId, health: Health) {
        self.entries.write().insert(entity, health);
    }

    pub fn remove(&self, entity: EntityId) -> Option<Health> {
        self.entries.write().remove(&entity)
    }

    pub fn contains(&self, entity: EntityId) -> bool {
        self.entries.read().contains_key(&entity)
    }

    /// Snapshot of an entity's health
    pub fn get(&self, entity: EntityId) -> Option<Health> {
        self.entries.read().get(&entity).cloned()
    }

    /// Whether the entity is alive; `None` without health
    pub fn is_alive(&self, entity: EntityId) -> Option<bool> {
        self.entries.read().get(&entity).map(Health::is_alive)
    }

    /// Current health; `None` without health
    pub fn current(&self, entity: EntityId) -> Option<f32> {
        self.entries.read().get(&entity).map(|h| h.current)
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Damage an entity
    pub fn apply_damage(
        &self,
        entity: EntityId,
        amount: f32,
        source: Option<EntityId>,
    ) -> Result<DamageOutcome> {
        let (outcome, new_health) = {
            let mut entries = self.entries.write();
            let health = entries.get_mut(&entity).ok_or(Error::MissingCapability {
                entity,
                capability: Capability::Health,
            })?;
            (health.apply_damage(amount), health.current)
        };

        let mut events = Vec::new();
        if outcome.dealt > 0.0 {
            events.push(HealthEvent::DamageTaken {
                entity,
                amount: outcome.dealt,
                source,
                new_health,
            });
        }
        if outcome.died {
            log::debug!("Entity {} died", entity);
            events.push(HealthEvent::Death {
                entity,
                killer: source,
            });
        }
        self.publish(events);
        Ok(outcome)
    }

    /// Heal an entity; returns the amount restored
    pub fn heal(&self, entity: EntityId, amount: f32) -> Result<f32> {
        let (healed, new_health) = {
            let mut entries = self.entries.write();
            let health = entries.get_mut(&entity).ok_or(Error::MissingCapability {
                entity,
                capability: Capability::Health,
            })?;
            (health.heal(amount), health.current)
        };

        if healed > 0.0 {
            self.publish(vec![HealthEvent::Healed {
                entity,
                amount: healed,
                new_health,
            }]);
        }
        Ok(healed)
    }

    /// Advance every health timer
    pub fn update(&self, delta_time: f32) {
        let mut events = Vec::new();
        {
            let mut entries = self.entries.write();
            for (entity, health) in entries.iter_mut() {
                if health.update(delta_time) {
                    log::debug!("Entity {} respawned", entity);
                    events.push(HealthEvent::Respawned {
                        entity: *entity,
                        new_health: health.current,
                    });
                }
            }
        }
        events.sort_by_key(HealthEvent::entity);
        self.publish(events);
    }

    /// Subscribe to health events
    pub fn on_event<F>(&self, handler: F) -> SubscriberId
    where
        F: Fn(&HealthEvent) + Send + Sync + 'static,
    {
        self.signal.lock().subscribe(handler)
    }

    /// Remove a subscription
    pub fn unsubscribe(&self, id: SubscriberId) -> bool {
        self.signal.lock().unsubscribe(id)
    }

    /// Take queued events
    pub fn drain_events(&self) -> Vec<HealthEvent> {
        self.queue.drain()
    }

    fn publish(&self, events: Vec<HealthEvent>) {
        if events.is_empty() {
            return;
        }
        {
            let signal = self.signal.lock();
            for event in &events {
                signal.emit(event);
            }
        }
        for event in events {
            self.queue.send(event);
        }
    }
}

impl ComponentLookup for HealthRegistry {
    fn has_capability(&self, entity: EntityId, capability: &Capability) -> bool {
        *capability == Capability::Health && self.contains(entity)
    }
}

impl fmt::Debug for HealthRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HealthRegistry")
            .field("entities", &self.len())
            .field("subscribers", &self.signal.lock().len())
            .finish()
    }
}
