//! Collaborators the state machine drives
//!
//! The state machine only starts, stops and polls these. How they move or
//! find their target is up to the implementation.

/// Walks a route while the enemy has nothing better to do
pub trait PatrolBehavior: Send + Sync {
    fn start_patrolling(&mut self);
    fn stop_patrolling(&mut self);

    /// Per-tick update, called before transitions are evaluated
    fn tick(&mut self, _delta_time: f32) {}
}

/// Follows a target
pub trait ChaseBehavior: Send + Sync {
    fn start_chasing(&mut self);
    fn stop_chasing(&mut self);

    /// Whether there is a target to chase
    fn has_target(&self) -> bool;

    /// Per-tick update, called before transitions are evaluated
    fn tick(&mut self, _delta_time: f32) {}
}

/// Hits a target in range
pub trait AttackBehavior: Send + Sync {
    /// Attack now if ready
    fn try_attack(&mut self);
    fn stop_attacking(&mut self);

    fn is_target_in_range(&self) -> bool;

    /// Whether an attack is ready (e.g. cooldown elapsed)
    fn can_attack(&self) -> bool;

    /// Per-tick update, called before transitions are evaluated
    fn tick(&mut self, _delta_time: f32) {}
}

/// Halts and releases the enemy's movement
pub trait MovementControl: Send + Sync {
    fn set_stopped(&mut self, stopped: bool);
}
