//! Host world interface and an in-memory scene

use eclipse_core::{Capability, ComponentLookup, EntityId, Error, IdGenerator, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};

/// Value written to an animator parameter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnimatorValue {
    Bool(bool),
    Float(f32),
    Int(i32),
    /// One-shot trigger, consumed by the animator
    Trigger,
}

/// The world actions read and write.
///
/// Hosts implement this over their own entity storage. Every method that
/// targets an entity fails with [`Error::EntityNotFound`] when the entity does
/// not exist.
pub trait Scene: ComponentLookup {
    /// Whether the entity exists
    fn contains(&self, entity: EntityId) -> bool;

    /// Look an entity up by name
    fn find(&self, name: &str) -> Option<EntityId>;

    /// Active flag, `None` if the entity does not exist
    fn is_active(&self, entity: EntityId) -> Option<bool>;

    /// Activate or deactivate an entity
    fn set_active(&mut self, entity: EntityId, active: bool) -> Result<()>;

    /// Remove an entity
    fn destroy(&mut self, entity: EntityId) -> Result<()>;

    /// Spawn a copy of `prefab`, optionally at a position
    fn instantiate(&mut self, prefab: EntityId, position: Option<[f32; 3]>) -> Result<EntityId>;

    /// World position
    fn position(&self, entity: EntityId) -> Option<[f32; 3]>;

    /// Move an entity
    fn set_position(&mut self, entity: EntityId, position: [f32; 3]) -> Result<()>;

    /// Switch the entity's animator to a state
    fn play_animation(&mut self, entity: EntityId, state: &str) -> Result<()>;

    /// Write an animator parameter
    fn set_animator_parameter(
        &mut self,
        entity: EntityId,
        parameter: &str,
        value: AnimatorValue,
    ) -> Result<()>;
}

/// Animator data of a scene entity
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnimatorState {
    /// Currently playing state
    pub current: Option<String>,
    /// Parameter values
    pub parameters: HashMap<String, AnimatorValue>,
}

/// An entity stored in a [`MemoryScene`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneEntity {
    /// Entity ID (assigned on spawn)
    #[serde(skip)]
    pub id: EntityId,
    /// Display name
    pub name: String,
    /// Whether the entity is active
    #[serde(default = "default_active")]
    pub active: bool,
    /// World position
    #[serde(default)]
    pub position: [f32; 3],
    /// Units per second, applied by the host each tick
    #[serde(default)]
    pub velocity: [f32; 3],
    /// Collision layers
    #[serde(default = "default_layers")]
    pub layers: u32,
    /// Entity tags
    #[serde(default)]
    pub tags: HashSet<String>,
    /// Animator, if any
    #[serde(default)]
    pub animator: Option<AnimatorState>,
    /// Additional capabilities
    #[serde(default)]
    pub capabilities: HashSet<Capability>,
}

fn default_active() -> bool {
    true
}

fn default_layers() -> u32 {
    0xFFFFFFFF
}

impl SceneEntity {
    /// Create a new active entity at the origin
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: EntityId::null(),
            name: name.into(),
            active: true,
            position: [0.0, 0.0, 0.0],
            velocity: [0.0, 0.0, 0.0],
            layers: default_layers(),
            tags: HashSet::new(),
            animator: None,
            capabilities: HashSet::new(),
        }
    }

    /// Set position
    pub fn with_position(mut self, position: [f32; 3]) -> Self {
        self.position = position;
        self
    }

    /// Set velocity
    pub fn with_velocity(mut self, velocity: [f32; 3]) -> Self {
        self.velocity = velocity;
        self
    }

    /// Set layers
    pub fn with_layers(mut self, layers: u32) -> Self {
        self.layers = layers;
        self
    }

    /// Add a tag
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.insert(tag.into());
        self
    }

    /// Attach an empty animator
    pub fn with_animator(mut self) -> Self {
        self.animator = Some(AnimatorState::default());
        self
    }

    /// Add a capability
    pub fn with_capability(mut self, capability: Capability) -> Self {
        self.capabilities.insert(capability);
        self
    }

    /// Start inactive
    pub fn inactive(mut self) -> Self {
        self.active = false;
        self
    }

    /// Check for a tag
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }
}

/// In-process [`Scene`] backed by a map
#[derive(Debug, Default)]
pub struct MemoryScene {
    entities: BTreeMap<EntityId, SceneEntity>,
    ids: IdGenerator,
}

impl MemoryScene {
    /// Create an empty scene
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entity and return its new id
    pub fn spawn(&mut self, mut entity: SceneEntity) -> EntityId {
        let id = self.ids.next();
        entity.id = id;
        self.entities.insert(id, entity);
        id
    }

    /// Add an entity under a caller-chosen id, replacing any existing one
    pub fn spawn_with_id(&mut self, id: EntityId, mut entity: SceneEntity) -> EntityId {
        self.ids.reserve_through(id);
        entity.id = id;
        self.entities.insert(id, entity);
        id
    }

    /// Get an entity
    pub fn entity(&self, id: EntityId) -> Option<&SceneEntity> {
        self.entities.get(&id)
    }

    /// Get a mutable entity
    pub fn entity_mut(&mut self, id: EntityId) -> Option<&mut SceneEntity> {
        self.entities.get_mut(&id)
    }

    /// Iterate entities in id order
    pub fn iter(&self) -> impl Iterator<Item = &SceneEntity> {
        self.entities.values()
    }

    /// Entity count
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Check if the scene is empty
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Apply each active entity's velocity for `delta_time` seconds
    pub fn integrate(&mut self, delta_time: f32) {
        for entity in self.entities.values_mut().filter(|e| e.active) {
            for axis in 0..3 {
                entity.position[axis] += entity.velocity[axis] * delta_time;
            }
        }
    }

    fn get_mut(&mut self, entity: EntityId) -> Result<&mut SceneEntity> {
        self.entities
            .get_mut(&entity)
            .ok_or(Error::EntityNotFound(entity))
    }

    fn animator_mut(&mut self, entity: EntityId) -> Result<&mut AnimatorState> {
        self.get_mut(entity)?
            .animator
            .as_mut()
            .ok_or(Error::MissingCapability {
                entity,
                capability: Capability::Animator,
            })
    }
}

impl ComponentLookup for MemoryScene {
    fn has_capability(&self, entity: EntityId, capability: &Capability) -> bool {
        match self.entities.get(&entity) {
            Some(e) if *capability == Capability::Animator => e.animator.is_some(),
            Some(e) => e.capabilities.contains(capability),
            None => false,
        }
    }
}

impl Scene for MemoryScene {
    fn contains(&self, entity: EntityId) -> bool {
        self.entities.contains_key(&entity)
    }

    fn find(&self, name: &str) -> Option<EntityId> {
        self.entities
            .values()
            .find(|e| e.name == name)
            .map(|e| e.id)
    }

    fn is_active(&self, entity: EntityId) -> Option<bool> {
        self.entities.get(&entity).map(|e| e.active)
    }

    fn set_active(&mut self, entity: EntityId, active: bool) -> Result<()> {
        self.get_mut(entity)?.active = active;
        Ok(())
    }

    fn destroy(&mut self, entity: EntityId) -> Result<()> {
        self.entities
            .remove(&entity)
            .map(|_| ())
            .ok_or(Error::EntityNotFound(entity))
    }

    fn instantiate(&mut self, prefab: EntityId, position: Option<[f32; 3]>) -> Result<EntityId> {
        let mut copy = self
            .entities
            .get(&prefab)
            .cloned()
            .ok_or(Error::EntityNotFound(prefab))?;
        copy.name = format!("{} (clone)", copy.name);
        if let Some(position) = position {
            copy.position = position;
        }
        Ok(self.spawn(copy))
    }

    fn position(&self, entity: EntityId) -> Option<[f32; 3]> {
        self.entities.get(&entity).map(|e| e.position)
    }

    fn set_position(&mut self, entity: EntityId, position: [f32; 3]) -> Result<()> {
        self.get_mut(entity)?.position = position;
        Ok(())
    }

    fn play_animation(&mut self, entity: EntityId, state: &str) -> Result<()> {
        self.animator_mut(entity)?.current = Some(state.to_string());
        Ok(())
    }

    fn set_animator_parameter(
        &mut self,
        entity: EntityId,
        parameter: &str,
        value: AnimatorValue,
    ) -> Result<()> {
        self.animator_mut(entity)?
            .parameters
            .insert(parameter.to_string(), value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spawn_and_find() {
        let mut scene = MemoryScene::new();
        let door = scene.spawn(SceneEntity::new("door").with_tag("interactable"));

        assert!(scene.contains(door));
        assert_eq!(scene.find("door"), Some(door));
        assert_eq!(scene.find("window"), None);
        assert!(scene.entity(door).map(|e| e.has_tag("interactable")).unwrap_or(false));
    }

    #[test]
    fn test_instantiate_copies_prefab() {
        let mut scene = MemoryScene::new();
        let prefab = scene.spawn(SceneEntity::new("orb").with_tag("pickup"));

        let copy = scene.instantiate(prefab, Some([1.0, 2.0, 3.0])).unwrap();

        assert_ne!(copy, prefab);
        let entity = scene.entity(copy).unwrap();
        assert_eq!(entity.name, "orb (clone)");
        assert_eq!(entity.position, [1.0, 2.0, 3.0]);
        assert!(entity.has_tag("pickup"));
    }

    #[test]
    fn test_missing_entity_errors() {
        let mut scene = MemoryScene::new();
        let ghost = EntityId::new(99);

        assert_eq!(scene.destroy(ghost), Err(Error::EntityNotFound(ghost)));
        assert_eq!(scene.set_active(ghost, true), Err(Error::EntityNotFound(ghost)));
        assert!(scene.instantiate(ghost, None).is_err());
    }

    #[test]
    fn test_animator_required() {
        let mut scene = MemoryScene::new();
        let statue = scene.spawn(SceneEntity::new("statue"));
        let golem = scene.spawn(SceneEntity::new("golem").with_animator());

        assert!(matches!(
            scene.play_animation(statue, "Idle"),
            Err(Error::MissingCapability { .. })
        ));

        scene.play_animation(golem, "Walk").unwrap();
        scene
            .set_animator_parameter(golem, "Angry", AnimatorValue::Bool(true))
            .unwrap();

        let animator = scene.entity(golem).unwrap().animator.as_ref().unwrap();
        assert_eq!(animator.current.as_deref(), Some("Walk"));
        assert_eq!(animator.parameters.get("Angry"), Some(&AnimatorValue::Bool(true)));
        assert!(scene.has_capability(golem, &Capability::Animator));
        assert!(!scene.has_capability(statue, &Capability::Animator));
    }

    #[test]
    fn test_integrate_moves_active_only() {
        let mut scene = MemoryScene::new();
        let moving = scene.spawn(SceneEntity::new("a").with_velocity([1.0, 0.0, 0.0]));
        let frozen = scene.spawn(
            SceneEntity::new("b")
                .with_velocity([1.0, 0.0, 0.0])
                .inactive(),
        );

        scene.integrate(0.5);

        assert_eq!(scene.position(moving), Some([0.5, 0.0, 0.0]));
        assert_eq!(scene.position(frozen), Some([0.0, 0.0, 0.0]));
    }

    #[test]
    fn test_spawn_with_id_reserves() {
        let mut scene = MemoryScene::new();
        scene.spawn_with_id(EntityId::new(10), SceneEntity::new("fixed"));
        let next = scene.spawn(SceneEntity::new("auto"));
        assert_eq!(next.raw(), 11);
    }
}
