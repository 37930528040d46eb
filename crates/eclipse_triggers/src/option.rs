//! Trigger options: the predicates that gate activation
//!
//! A trigger activates for a candidate only when every option agrees.

use crate::query::TriggerCandidate;
use crate::trigger::TriggerContext;
use eclipse_core::{Capability, EntityId};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A predicate that gates trigger activation
pub trait TriggerOption: Send + Sync {
    /// Whether this option lets `candidate` activate the trigger
    fn should_activate(&self, candidate: &TriggerCandidate, ctx: &TriggerContext<'_>) -> bool;

    /// Called after the trigger activated for `candidate`
    fn on_activated(&mut self, _candidate: &TriggerCandidate, _ctx: &TriggerContext<'_>) {}
}

/// Layer, tag and entity filter
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterOption {
    /// Required layers (candidate must have at least one)
    pub required_layers: u32,
    /// Excluded layers (candidate must not have any)
    pub excluded_layers: u32,
    /// Required tags (candidate must have all of these)
    pub required_tags: HashSet<String>,
    /// Excluded tags (candidate must not have any)
    pub excluded_tags: HashSet<String>,
    /// Specific entity IDs that can trigger (empty = any)
    pub allowed_entities: HashSet<EntityId>,
    /// Specific entity IDs that cannot trigger
    pub blocked_entities: HashSet<EntityId>,
    /// Whether the trigger owner can activate itself
    pub allow_self: bool,
}

impl FilterOption {
    /// Create a filter that accepts everything except the owner
    pub fn new() -> Self {
        Self {
            required_layers: 0xFFFFFFFF,
            excluded_layers: 0,
            required_tags: HashSet::new(),
            excluded_tags: HashSet::new(),
            allowed_entities: HashSet::new(),
            blocked_entities: HashSet::new(),
            allow_self: false,
        }
    }

    /// Filter for player entities only
    pub fn player_only() -> Self {
        Self::new().with_tag("player")
    }

    /// Set required layers (bitmask)
    pub fn with_layers(mut self, layers: u32) -> Self {
        self.required_layers = layers;
        self
    }

    /// Set excluded layers (bitmask)
    pub fn without_layers(mut self, layers: u32) -> Self {
        self.excluded_layers = layers;
        self
    }

    /// Require a tag
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.required_tags.insert(tag.into());
        self
    }

    /// Exclude a tag
    pub fn without_tag(mut self, tag: impl Into<String>) -> Self {
        self.excluded_tags.insert(tag.into());
        self
    }

    /// Allow only specific entities
    pub fn only_entities<I: IntoIterator<Item = EntityId>>(mut self, entities: I) -> Self {
        self.allowed_entities = entities.into_iter().collect();
        self
    }

    /// Block specific entities
    pub fn block_entities<I: IntoIterator<Item = EntityId>>(mut self, entities: I) -> Self {
        self.blocked_entities.extend(entities);
        self
    }

    /// Allow self-triggering
    pub fn allow_self_trigger(mut self) -> Self {
        self.allow_self = true;
        self
    }

    /// Check a candidate against this filter
    pub fn passes(&self, candidate: &TriggerCandidate, trigger_owner: EntityId) -> bool {
        if candidate.id == trigger_owner && !self.allow_self {
            return false;
        }

        if self.blocked_entities.contains(&candidate.id) {
            return false;
        }

        if !self.allowed_entities.is_empty() && !self.allowed_entities.contains(&candidate.id) {
            return false;
        }

        if candidate.layers & self.required_layers == 0 {
            return false;
        }
        if candidate.layers & self.excluded_layers != 0 {
            return false;
        }

        if !self.required_tags.iter().all(|tag| candidate.tags.contains(tag)) {
            return false;
        }

        !self.excluded_tags.iter().any(|tag| candidate.tags.contains(tag))
    }
}

impl Default for FilterOption {
    fn default() -> Self {
        Self::new()
    }
}

impl TriggerOption for FilterOption {
    fn should_activate(&self, candidate: &TriggerCandidate, ctx: &TriggerContext<'_>) -> bool {
        self.passes(candidate, ctx.owner)
    }
}

/// Requires the candidate to expose a capability
#[derive(Debug, Clone)]
pub struct CapabilityOption {
    pub capability: Capability,
}

impl CapabilityOption {
    pub fn new(capability: Capability) -> Self {
        Self { capability }
    }
}

impl TriggerOption for CapabilityOption {
    fn should_activate(&self, candidate: &TriggerCandidate, ctx: &TriggerContext<'_>) -> bool {
        ctx.scene.has_capability(candidate.id, &self.capability)
    }
}

/// Stops passing after the trigger activated `max` times
#[derive(Debug, Clone)]
pub struct MaxActivationsOption {
    max: u32,
    count: u32,
}

impl MaxActivationsOption {
    pub fn new(max: u32) -> Self {
        Self { max, count: 0 }
    }

    /// Activations seen so far
    pub fn count(&self) -> u32 {
        self.count
    }
}

impl TriggerOption for MaxActivationsOption {
    fn should_activate(&self, _candidate: &TriggerCandidate, _ctx: &TriggerContext<'_>) -> bool {
        self.count < self.max
    }

    fn on_activated(&mut self, _candidate: &TriggerCandidate, _ctx: &TriggerContext<'_>) {
        self.count += 1;
    }
}

type Predicate = dyn Fn(&TriggerCandidate, &TriggerContext<'_>) -> bool + Send + Sync;

/// Option backed by a closure
pub struct PredicateOption {
    predicate: Box<Predicate>,
}

impl PredicateOption {
    pub fn new<F>(predicate: F) -> Self
    where
        F: Fn(&TriggerCandidate, &TriggerContext<'_>) -> bool + Send + Sync + 'static,
    {
        Self {
            predicate: Box::new(predicate),
        }
    }
}

impl TriggerOption for PredicateOption {
    fn should_activate(&self, candidate: &TriggerCandidate, ctx: &TriggerContext<'_>) -> bool {
        (self.predicate)(candidate, ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eclipse_actions::{MemoryScene, SceneEntity};
    use eclipse_core::FrameTime;

    fn candidate(id: u64) -> TriggerCandidate {
        TriggerCandidate::new(EntityId::new(id))
    }

    #[test]
    fn test_filter_layers() {
        let filter = FilterOption::new().with_layers(0b0011);
        let owner = EntityId::new(0);

        assert!(filter.passes(&candidate(1).with_layers(0b0001), owner));
        assert!(filter.passes(&candidate(2).with_layers(0b0010), owner));
        assert!(!filter.passes(&candidate(3).with_layers(0b0100), owner));
    }

    #[test]
    fn test_filter_tags() {
        let filter = FilterOption::player_only().without_tag("dead");
        let owner = EntityId::new(0);

        assert!(filter.passes(&candidate(1).with_tag("player"), owner));
        assert!(!filter.passes(&candidate(2).with_tag("enemy"), owner));
        assert!(!filter.passes(&candidate(3).with_tag("player").with_tag("dead"), owner));
    }

    #[test]
    fn test_filter_self() {
        let owner = EntityId::new(5);

        assert!(!FilterOption::new().passes(&candidate(5), owner));
        assert!(FilterOption::new().allow_self_trigger().passes(&candidate(5), owner));
    }

    #[test]
    fn test_filter_allowed_and_blocked() {
        let owner = EntityId::new(0);
        let filter = FilterOption::new()
            .only_entities([EntityId::new(1), EntityId::new(2)])
            .block_entities([EntityId::new(2)]);

        assert!(filter.passes(&candidate(1), owner));
        assert!(!filter.passes(&candidate(2), owner));
        assert!(!filter.passes(&candidate(3), owner));
    }

    #[test]
    fn test_capability_option() {
        let mut scene = MemoryScene::new();
        let golem = scene.spawn(SceneEntity::new("golem").with_animator());
        let rock = scene.spawn(SceneEntity::new("rock"));
        let ctx = TriggerContext::new(EntityId::new(0), FrameTime::default(), &scene);

        let option = CapabilityOption::new(Capability::Animator);
        assert!(option.should_activate(&TriggerCandidate::new(golem), &ctx));
        assert!(!option.should_activate(&TriggerCandidate::new(rock), &ctx));
    }

    #[test]
    fn test_max_activations_counts() {
        let scene = MemoryScene::new();
        let ctx = TriggerContext::new(EntityId::new(0), FrameTime::default(), &scene);
        let mut option = MaxActivationsOption::new(2);
        let c = candidate(1);

        assert!(option.should_activate(&c, &ctx));
        option.on_activated(&c, &ctx);
        option.on_activated(&c, &ctx);
        assert!(!option.should_activate(&c, &ctx));
        assert_eq!(option.count(), 2);
    }
}
