//! Eclipse Actions - Composable Units of Behavior
//!
//! This crate separates *what to do* from *in what order*:
//!
//! - [`Action`]: one unit of side-effecting work with a single `execute` contract
//! - [`ActionKind`]: the built-in data-only actions (toggle, spawn, destroy,
//!   animator parameters, ...)
//! - [`ActionRunner`]: an ordered list of actions with a stop-on-error policy
//! - [`Scene`]: the host world actions operate on, with [`MemoryScene`] as an
//!   in-process implementation
//!
//! # Example
//!
//! ```ignore
//! use eclipse_actions::prelude::*;
//!
//! let mut scene = MemoryScene::new();
//! let door = scene.spawn(SceneEntity::new("door"));
//!
//! let runner = ActionRunner::new()
//!     .with_action(ActionKind::set_active(door, false))
//!     .with_action(ActionKind::play_animation(door, "Open"));
//!
//! let report = runner.run_all(&mut ActionContext::new(&mut scene));
//! assert!(report.is_success());
//! ```

pub mod action;
pub mod runner;
pub mod scene;

pub mod prelude {
    pub use crate::action::{Action, ActionContext, ActionKind, FnAction, Target};
    pub use crate::runner::{ActionFault, ActionRunner, RunReport};
    pub use crate::scene::{AnimatorState, AnimatorValue, MemoryScene, Scene, SceneEntity};
}

pub use prelude::*;
