//! Eclipse AI - Enemy State Machine
//!
//! An [`EnemyAi`] picks one of four states every tick by polling its
//! collaborators: attack when the target is in range and the attack is
//! ready, chase while there is a target, otherwise idle and eventually
//! return to patrolling.
//!
//! # Features
//!
//! - Priority-ordered transitions with a lose-target delay
//! - Stop override that halts every behavior and movement
//! - State change notifications
//! - Kinematic reference collaborators (waypoint patrol, proximity chase,
//!   melee attack) moving a shared [`AgentBody`]
//!
//! # Example
//!
//! ```ignore
//! use eclipse_ai::prelude::*;
//!
//! let body = AgentBody::new([0.0, 0.0, 0.0], 3.0);
//! let target = TargetTracker::new();
//!
//! let mut ai = EnemyAi::new(enemy, EnemyAiConfig::default())
//!     .with_patrol(WaypointPatrol::new(body.clone(), waypoints))
//!     .with_chase(ProximityChase::new(body.clone(), target.clone(), 8.0))
//!     .with_attack(MeleeAttack::new(body.clone(), target.clone(), 1.5, 1.0))
//!     .with_movement(body.clone());
//!
//! ai.tick(delta_time);
//! ```

pub mod behavior;
pub mod enemy;
pub mod kinematic;
pub mod state;

pub mod prelude {
    pub use crate::behavior::{AttackBehavior, ChaseBehavior, MovementControl, PatrolBehavior};
    pub use crate::enemy::{EnemyAi, EnemyAiConfig};
    pub use crate::kinematic::{AgentBody, MeleeAttack, ProximityChase, TargetTracker, WaypointPatrol};
    pub use crate::state::{EnemyState, StateChanged};
}

pub use prelude::*;
