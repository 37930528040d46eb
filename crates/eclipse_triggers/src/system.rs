//! Trigger system: updates every registered trigger each tick

use crate::events::TriggerEvent;
use crate::query::SpatialQuery;
use crate::trigger::GenericTrigger;
use eclipse_actions::Scene;
use eclipse_core::{EntityId, FrameTime};
use std::collections::BTreeMap;

/// Registry of triggers keyed by owner
#[derive(Debug, Default)]
pub struct TriggerSystem {
    /// Registered triggers, updated in owner order
    triggers: BTreeMap<EntityId, GenericTrigger>,
    /// Collected events from last update
    last_events: Vec<TriggerEvent>,
}

impl TriggerSystem {
    /// Create an empty trigger system
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a trigger under its owner. Returns the trigger it replaced.
    pub fn register(&mut self, trigger: GenericTrigger) -> Option<GenericTrigger> {
        let previous = self.triggers.insert(trigger.owner(), trigger);
        if let Some(previous) = &previous {
            log::warn!("Replacing trigger owned by {}", previous.owner());
        }
        previous
    }

    /// Unregister a trigger
    pub fn unregister(&mut self, owner: EntityId) -> Option<GenericTrigger> {
        self.triggers.remove(&owner)
    }

    /// Get a trigger
    pub fn get(&self, owner: EntityId) -> Option<&GenericTrigger> {
        self.triggers.get(&owner)
    }

    /// Get a mutable trigger
    pub fn get_mut(&mut self, owner: EntityId) -> Option<&mut GenericTrigger> {
        self.triggers.get_mut(&owner)
    }

    /// Check if a point lies inside a trigger's region
    pub fn query_point(&self, owner: EntityId, point: [f32; 3]) -> bool {
        self.triggers
            .get(&owner)
            .is_some_and(|trigger| trigger.region().contains(point))
    }

    /// Update every trigger against `query`
    pub fn update(&mut self, time: FrameTime, query: &dyn SpatialQuery, scene: &mut dyn Scene) {
        self.last_events.clear();

        for trigger in self.triggers.values_mut() {
            trigger.update(time, query, scene);
            self.last_events.extend(trigger.drain_events());
        }
    }

    /// Get events from the last update
    pub fn get_events(&self) -> &[TriggerEvent] {
        &self.last_events
    }

    /// Take events from the last update
    pub fn drain_events(&mut self) -> Vec<TriggerEvent> {
        std::mem::take(&mut self.last_events)
    }

    /// Number of registered triggers
    pub fn trigger_count(&self) -> usize {
        self.triggers.len()
    }

    /// Owners of registered triggers
    pub fn trigger_ids(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.triggers.keys().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::{PointQuery, TriggerCandidate};
    use crate::volume::{TriggerRegion, TriggerVolume};
    use eclipse_actions::MemoryScene;

    #[test]
    fn test_register_and_update() {
        let mut scene = MemoryScene::new();
        let mut system = TriggerSystem::new();

        let near = EntityId::new(10);
        let far = EntityId::new(20);
        system.register(GenericTrigger::new(
            near,
            TriggerRegion::new(TriggerVolume::cube(2.0)),
        ));
        system.register(GenericTrigger::new(
            far,
            TriggerRegion::new(TriggerVolume::cube(2.0)).at([50.0, 0.0, 0.0]),
        ));
        assert_eq!(system.trigger_count(), 2);

        let query = PointQuery::with_candidates([TriggerCandidate::new(EntityId::new(1))]);
        system.update(FrameTime::at(0.0), &query, &mut scene);

        let activations: Vec<_> = system
            .get_events()
            .iter()
            .filter(|event| event.is_activation())
            .map(|event| event.trigger_entity)
            .collect();
        assert_eq!(activations, vec![near]);
        assert_eq!(system.get(near).map(|t| t.activation_count()), Some(1));
        assert_eq!(system.get(far).map(|t| t.activation_count()), Some(0));
    }

    #[test]
    fn test_query_point() {
        let mut system = TriggerSystem::new();
        let owner = EntityId::new(3);
        system.register(GenericTrigger::new(
            owner,
            TriggerRegion::new(TriggerVolume::sphere(1.0)).at([5.0, 0.0, 0.0]),
        ));

        assert!(system.query_point(owner, [5.5, 0.0, 0.0]));
        assert!(!system.query_point(owner, [0.0, 0.0, 0.0]));
        assert!(!system.query_point(EntityId::new(99), [5.0, 0.0, 0.0]));
    }

    #[test]
    fn test_unregister() {
        let mut system = TriggerSystem::new();
        let owner = EntityId::new(3);
        system.register(GenericTrigger::new(owner, TriggerRegion::default()));

        assert!(system.unregister(owner).is_some());
        assert_eq!(system.trigger_count(), 0);
        assert_eq!(system.trigger_ids().count(), 0);
    }
}
