//! Action contract and built-in action kinds

use crate::scene::{AnimatorValue, Scene};
use eclipse_core::{EntityId, Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Context passed to [`Action::execute`]
pub struct ActionContext<'a> {
    /// World the action operates on
    pub scene: &'a mut dyn Scene,
    /// Entity that caused the run (e.g. the candidate that entered a trigger)
    pub instigator: Option<EntityId>,
}

impl<'a> ActionContext<'a> {
    /// Create a context with no instigator
    pub fn new(scene: &'a mut dyn Scene) -> Self {
        Self {
            scene,
            instigator: None,
        }
    }

    /// Set the instigator
    pub fn with_instigator(mut self, instigator: EntityId) -> Self {
        self.instigator = Some(instigator);
        self
    }

    /// Resolve an optional target to an entity id.
    ///
    /// An unconfigured target is a configuration problem: it is logged and
    /// resolves to `Ok(None)` so the action can no-op. A configured target
    /// that cannot be resolved is an execution fault.
    pub fn resolve(&self, target: Option<&Target>, action: &str) -> Result<Option<EntityId>> {
        let Some(target) = target else {
            log::warn!("{}: no target configured, skipping", action);
            return Ok(None);
        };

        let entity = match target {
            Target::Entity(id) => *id,
            Target::Named(name) => self
                .scene
                .find(name)
                .ok_or_else(|| Error::Message(format!("no entity named '{}'", name)))?,
            Target::Instigator => self.instigator.ok_or_else(|| {
                Error::MissingReference(format!("{}: target is the instigator but none was given", action))
            })?,
        };

        if !self.scene.contains(entity) {
            return Err(Error::EntityNotFound(entity));
        }
        Ok(Some(entity))
    }
}

/// A single unit of configured behavior.
///
/// Actions are stateless between invocations apart from their configuration.
/// Failures are returned, never panicked; the caller decides what a failure
/// means for the actions that follow.
pub trait Action: Send + Sync + fmt::Debug {
    /// Short label for diagnostics
    fn name(&self) -> &str;

    /// Perform the action
    fn execute(&self, ctx: &mut ActionContext<'_>) -> Result<()>;
}

/// How an action picks the entity it works on
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Target {
    /// A fixed entity
    Entity(EntityId),
    /// The entity with this name, looked up when the action runs
    Named(String),
    /// The instigator carried by the context
    Instigator,
}

impl From<EntityId> for Target {
    fn from(id: EntityId) -> Self {
        Target::Entity(id)
    }
}

/// Built-in data-only actions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ActionKind {
    /// Activate or deactivate an entity
    SetActive {
        target: Option<Target>,
        active: bool,
    },
    /// Flip an entity's active flag
    ToggleActive { target: Option<Target> },
    /// Remove an entity from the scene
    Destroy { target: Option<Target> },
    /// Spawn a copy of a prefab entity
    Instantiate {
        prefab: Option<Target>,
        position: Option<[f32; 3]>,
    },
    /// Move an entity
    SetPosition {
        target: Option<Target>,
        position: [f32; 3],
    },
    /// Switch an animator to a state
    PlayAnimation {
        target: Option<Target>,
        state: String,
    },
    /// Write a bool animator parameter
    SetAnimatorBool {
        target: Option<Target>,
        parameter: String,
        value: bool,
    },
    /// Write a float animator parameter
    SetAnimatorFloat {
        target: Option<Target>,
        parameter: String,
        value: f32,
    },
    /// Fire an animator trigger
    SetAnimatorTrigger {
        target: Option<Target>,
        parameter: String,
    },
    /// Write a message to the log
    Log { message: String },
}

impl ActionKind {
    /// Activate or deactivate a fixed entity
    pub fn set_active(target: EntityId, active: bool) -> Self {
        Self::SetActive {
            target: Some(target.into()),
            active,
        }
    }

    /// Toggle a fixed entity
    pub fn toggle_active(target: EntityId) -> Self {
        Self::ToggleActive {
            target: Some(target.into()),
        }
    }

    /// Destroy a fixed entity
    pub fn destroy(target: EntityId) -> Self {
        Self::Destroy {
            target: Some(target.into()),
        }
    }

    /// Spawn a copy of `prefab`
    pub fn instantiate(prefab: EntityId, position: Option<[f32; 3]>) -> Self {
        Self::Instantiate {
            prefab: Some(prefab.into()),
            position,
        }
    }

    /// Play an animation state
    pub fn play_animation(target: EntityId, state: impl Into<String>) -> Self {
        Self::PlayAnimation {
            target: Some(target.into()),
            state: state.into(),
        }
    }

    /// Set a bool animator parameter
    pub fn set_animator_bool(target: EntityId, parameter: impl Into<String>, value: bool) -> Self {
        Self::SetAnimatorBool {
            target: Some(target.into()),
            parameter: parameter.into(),
            value,
        }
    }

    /// Log a message
    pub fn log(message: impl Into<String>) -> Self {
        Self::Log {
            message: message.into(),
        }
    }

    fn set_parameter(
        &self,
        ctx: &mut ActionContext<'_>,
        target: Option<&Target>,
        parameter: &str,
        value: AnimatorValue,
    ) -> Result<()> {
        if parameter.is_empty() {
            return Err(Error::InvalidParameter(format!(
                "{}: empty animator parameter name",
                self.name()
            )));
        }
        match ctx.resolve(target, self.name())? {
            Some(entity) => ctx.scene.set_animator_parameter(entity, parameter, value),
            None => Ok(()),
        }
    }
}

impl Action for ActionKind {
    fn name(&self) -> &str {
        match self {
            Self::SetActive { .. } => "set_active",
            Self::ToggleActive { .. } => "toggle_active",
            Self::Destroy { .. } => "destroy",
            Self::Instantiate { .. } => "instantiate",
            Self::SetPosition { .. } => "set_position",
            Self::PlayAnimation { .. } => "play_animation",
            Self::SetAnimatorBool { .. } => "set_animator_bool",
            Self::SetAnimatorFloat { .. } => "set_animator_float",
            Self::SetAnimatorTrigger { .. } => "set_animator_trigger",
            Self::Log { .. } => "log",
        }
    }

    fn execute(&self, ctx: &mut ActionContext<'_>) -> Result<()> {
        match self {
            Self::SetActive { target, active } => {
                if let Some(entity) = ctx.resolve(target.as_ref(), self.name())? {
                    ctx.scene.set_active(entity, *active)?;
                }
            }
            Self::ToggleActive { target } => {
                if let Some(entity) = ctx.resolve(target.as_ref(), self.name())? {
                    let active = ctx
                        .scene
                        .is_active(entity)
                        .ok_or(Error::EntityNotFound(entity))?;
                    ctx.scene.set_active(entity, !active)?;
                }
            }
            Self::Destroy { target } => {
                if let Some(entity) = ctx.resolve(target.as_ref(), self.name())? {
                    ctx.scene.destroy(entity)?;
                    log::debug!("Destroyed entity {}", entity);
                }
            }
            Self::Instantiate { prefab, position } => {
                if let Some(prefab) = ctx.resolve(prefab.as_ref(), self.name())? {
                    let spawned = ctx.scene.instantiate(prefab, *position)?;
                    log::debug!("Instantiated {} from prefab {}", spawned, prefab);
                }
            }
            Self::SetPosition { target, position } => {
                if let Some(entity) = ctx.resolve(target.as_ref(), self.name())? {
                    ctx.scene.set_position(entity, *position)?;
                }
            }
            Self::PlayAnimation { target, state } => {
                if state.is_empty() {
                    return Err(Error::InvalidParameter(
                        "play_animation: empty state name".to_string(),
                    ));
                }
                if let Some(entity) = ctx.resolve(target.as_ref(), self.name())? {
                    ctx.scene.play_animation(entity, state)?;
                }
            }
            Self::SetAnimatorBool {
                target,
                parameter,
                value,
            } => {
                self.set_parameter(ctx, target.as_ref(), parameter, AnimatorValue::Bool(*value))?;
            }
            Self::SetAnimatorFloat {
                target,
                parameter,
                value,
            } => {
                self.set_parameter(ctx, target.as_ref(), parameter, AnimatorValue::Float(*value))?;
            }
            Self::SetAnimatorTrigger { target, parameter } => {
                self.set_parameter(ctx, target.as_ref(), parameter, AnimatorValue::Trigger)?;
            }
            Self::Log { message } => match ctx.instigator {
                Some(instigator) => log::info!("{} (instigator {})", message, instigator),
                None => log::info!("{}", message),
            },
        }
        Ok(())
    }
}

type ActionFn = dyn Fn(&mut ActionContext<'_>) -> Result<()> + Send + Sync;

/// Action backed by a closure, for host-specific behavior
pub struct FnAction {
    name: String,
    f: Box<ActionFn>,
}

impl FnAction {
    /// Wrap a closure
    pub fn new<F>(name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&mut ActionContext<'_>) -> Result<()> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            f: Box::new(f),
        }
    }
}

impl Action for FnAction {
    fn name(&self) -> &str {
        &self.name
    }

    fn execute(&self, ctx: &mut ActionContext<'_>) -> Result<()> {
        (self.f)(ctx)
    }
}

impl fmt::Debug for FnAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnAction").field("name", &self.name).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{MemoryScene, SceneEntity};

    #[test]
    fn test_set_active() {
        let mut scene = MemoryScene::new();
        let lamp = scene.spawn(SceneEntity::new("lamp").inactive());

        let mut ctx = ActionContext::new(&mut scene);
        ActionKind::set_active(lamp, true).execute(&mut ctx).unwrap();

        assert_eq!(scene.is_active(lamp), Some(true));
    }

    #[test]
    fn test_toggle_active() {
        let mut scene = MemoryScene::new();
        let lamp = scene.spawn(SceneEntity::new("lamp"));
        let action = ActionKind::toggle_active(lamp);

        action.execute(&mut ActionContext::new(&mut scene)).unwrap();
        assert_eq!(scene.is_active(lamp), Some(false));
        action.execute(&mut ActionContext::new(&mut scene)).unwrap();
        assert_eq!(scene.is_active(lamp), Some(true));
    }

    #[test]
    fn test_missing_target_is_noop() {
        let mut scene = MemoryScene::new();
        let action = ActionKind::Destroy { target: None };

        assert!(action.execute(&mut ActionContext::new(&mut scene)).is_ok());
    }

    #[test]
    fn test_unknown_target_fails() {
        let mut scene = MemoryScene::new();
        let ghost = EntityId::new(404);

        let result = ActionKind::destroy(ghost).execute(&mut ActionContext::new(&mut scene));
        assert_eq!(result, Err(Error::EntityNotFound(ghost)));
    }

    #[test]
    fn test_instigator_target() {
        let mut scene = MemoryScene::new();
        let player = scene.spawn(SceneEntity::new("player"));
        let action = ActionKind::SetPosition {
            target: Some(Target::Instigator),
            position: [0.0, 10.0, 0.0],
        };

        // No instigator in context
        let result = action.execute(&mut ActionContext::new(&mut scene));
        assert!(matches!(result, Err(Error::MissingReference(_))));

        let mut ctx = ActionContext::new(&mut scene).with_instigator(player);
        action.execute(&mut ctx).unwrap();
        assert_eq!(scene.position(player), Some([0.0, 10.0, 0.0]));
    }

    #[test]
    fn test_named_target() {
        let mut scene = MemoryScene::new();
        let gate = scene.spawn(SceneEntity::new("gate"));
        let action = ActionKind::SetActive {
            target: Some(Target::Named("gate".into())),
            active: false,
        };

        action.execute(&mut ActionContext::new(&mut scene)).unwrap();
        assert_eq!(scene.is_active(gate), Some(false));
    }

    #[test]
    fn test_animator_actions() {
        let mut scene = MemoryScene::new();
        let golem = scene.spawn(SceneEntity::new("golem").with_animator());

        let mut ctx = ActionContext::new(&mut scene);
        ActionKind::set_animator_bool(golem, "Awake", true)
            .execute(&mut ctx)
            .unwrap();
        ActionKind::play_animation(golem, "Rise")
            .execute(&mut ctx)
            .unwrap();
        ActionKind::SetAnimatorTrigger {
            target: Some(golem.into()),
            parameter: "Roar".into(),
        }
        .execute(&mut ctx)
        .unwrap();

        let animator = scene.entity(golem).unwrap().animator.clone().unwrap();
        assert_eq!(animator.current.as_deref(), Some("Rise"));
        assert_eq!(animator.parameters.get("Awake"), Some(&AnimatorValue::Bool(true)));
        assert_eq!(animator.parameters.get("Roar"), Some(&AnimatorValue::Trigger));
    }

    #[test]
    fn test_empty_parameter_is_invalid() {
        let mut scene = MemoryScene::new();
        let golem = scene.spawn(SceneEntity::new("golem").with_animator());

        let result = ActionKind::set_animator_bool(golem, "", true)
            .execute(&mut ActionContext::new(&mut scene));
        assert!(matches!(result, Err(Error::InvalidParameter(_))));
    }

    #[test]
    fn test_instantiate_spawns_copy() {
        let mut scene = MemoryScene::new();
        let prefab = scene.spawn(SceneEntity::new("crystal"));

        ActionKind::instantiate(prefab, Some([4.0, 0.0, 0.0]))
            .execute(&mut ActionContext::new(&mut scene))
            .unwrap();

        assert_eq!(scene.len(), 2);
        assert!(scene.find("crystal (clone)").is_some());
    }

    #[test]
    fn test_action_kind_from_json() {
        let json = r#"[
            {"type": "set_active", "target": {"entity": 3}, "active": true},
            {"type": "destroy", "target": "instigator"},
            {"type": "play_animation", "target": {"named": "golem"}, "state": "Rise"},
            {"type": "log", "message": "eclipse begins"}
        ]"#;

        let actions: Vec<ActionKind> = serde_json::from_str(json).unwrap();
        assert_eq!(actions[0], ActionKind::set_active(EntityId::new(3), true));
        assert_eq!(
            actions[1],
            ActionKind::Destroy {
                target: Some(Target::Instigator)
            }
        );
        assert_eq!(actions[2].name(), "play_animation");
        assert_eq!(actions[3], ActionKind::log("eclipse begins"));
    }
}
