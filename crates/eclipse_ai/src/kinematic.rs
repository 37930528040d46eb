//! Kinematic collaborators
//!
//! Straight-line movement on a shared [`AgentBody`]. There is no
//! pathfinding; behaviors only pick destinations.

use crate::behavior::{AttackBehavior, ChaseBehavior, MovementControl, PatrolBehavior};
use eclipse_core::Countdown;
use parking_lot::{Mutex, RwLock};
use std::fmt;
use std::sync::Arc;

fn distance(a: [f32; 3], b: [f32; 3]) -> f32 {
    let dx = b[0] - a[0];
    let dy = b[1] - a[1];
    let dz = b[2] - a[2];
    (dx * dx + dy * dy + dz * dz).sqrt()
}

#[derive(Debug, Clone)]
struct BodyState {
    position: [f32; 3],
    speed: f32,
    destination: Option<[f32; 3]>,
    stopped: bool,
}

/// Position and destination shared by an enemy's behaviors
#[derive(Debug, Clone)]
pub struct AgentBody {
    state: Arc<Mutex<BodyState>>,
}

impl AgentBody {
    pub fn new(position: [f32; 3], speed: f32) -> Self {
        Self {
            state: Arc::new(Mutex::new(BodyState {
                position,
                speed: speed.max(0.0),
                destination: None,
                stopped: false,
            })),
        }
    }

    pub fn position(&self) -> [f32; 3] {
        self.state.lock().position
    }

    /// Teleport
    pub fn set_position(&self, position: [f32; 3]) {
        self.state.lock().position = position;
    }

    pub fn destination(&self) -> Option<[f32; 3]> {
        self.state.lock().destination
    }

    pub fn set_destination(&self, destination: Option<[f32; 3]>) {
        self.state.lock().destination = destination;
    }

    pub fn is_stopped(&self) -> bool {
        self.state.lock().stopped
    }

    /// Move toward the destination. Returns the new position.
    pub fn step(&self, delta_time: f32) -> [f32; 3] {
        let mut state = self.state.lock();
        if state.stopped {
            return state.position;
        }
        let Some(destination) = state.destination else {
            return state.position;
        };

        let remaining = distance(state.position, destination);
        let travel = state.speed * delta_time.max(0.0);
        if remaining <= travel || remaining <= f32::EPSILON {
            state.position = destination;
        } else {
            let t = travel / remaining;
            for axis in 0..3 {
                state.position[axis] += (destination[axis] - state.position[axis]) * t;
            }
        }
        state.position
    }

    /// Whether the body is within `tolerance` of `point`
    pub fn is_near(&self, point: [f32; 3], tolerance: f32) -> bool {
        distance(self.position(), point) <= tolerance
    }
}

impl MovementControl for AgentBody {
    fn set_stopped(&mut self, stopped: bool) {
        self.state.lock().stopped = stopped;
    }
}

/// Where the current target is, if any
#[derive(Debug, Clone, Default)]
pub struct TargetTracker {
    position: Arc<RwLock<Option<[f32; 3]>>>,
}

impl TargetTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, position: Option<[f32; 3]>) {
        *self.position.write() = position;
    }

    pub fn get(&self) -> Option<[f32; 3]> {
        *self.position.read()
    }
}

/// Loops through waypoints
#[derive(Debug, Clone)]
pub struct WaypointPatrol {
    body: AgentBody,
    waypoints: Vec<[f32; 3]>,
    index: usize,
    arrive_distance: f32,
    active: bool,
}

impl WaypointPatrol {
    pub fn new(body: AgentBody, waypoints: Vec<[f32; 3]>) -> Self {
        Self {
            body,
            waypoints,
            index: 0,
            arrive_distance: 0.1,
            active: false,
        }
    }

    /// Distance at which a waypoint counts as reached
    pub fn with_arrive_distance(mut self, distance: f32) -> Self {
        self.arrive_distance = distance.max(0.0);
        self
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Waypoint currently headed for
    pub fn current_waypoint(&self) -> Option<[f32; 3]> {
        self.waypoints.get(self.index).copied()
    }
}

impl PatrolBehavior for WaypointPatrol {
    fn start_patrolling(&mut self) {
        if self.waypoints.is_empty() {
            log::warn!("Patrol started without waypoints");
            return;
        }
        self.active = true;
        self.body.set_destination(self.current_waypoint());
    }

    fn stop_patrolling(&mut self) {
        if self.active {
            self.active = false;
            self.body.set_destination(None);
        }
    }

    fn tick(&mut self, _delta_time: f32) {
        if !self.active {
            return;
        }
        let Some(waypoint) = self.current_waypoint() else {
            return;
        };
        if self.body.is_near(waypoint, self.arrive_distance) {
            self.index = (self.index + 1) % self.waypoints.len();
            self.body.set_destination(self.current_waypoint());
        }
    }
}

/// Chases a tracked target within a detection radius
#[derive(Debug, Clone)]
pub struct ProximityChase {
    body: AgentBody,
    target: TargetTracker,
    detection_radius: f32,
    active: bool,
}

impl ProximityChase {
    pub fn new(body: AgentBody, target: TargetTracker, detection_radius: f32) -> Self {
        Self {
            body,
            target,
            detection_radius,
            active: false,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }
}

impl ChaseBehavior for ProximityChase {
    fn start_chasing(&mut self) {
        self.active = true;
        self.body.set_destination(self.target.get());
    }

    fn stop_chasing(&mut self) {
        if self.active {
            self.active = false;
            self.body.set_destination(None);
        }
    }

    fn has_target(&self) -> bool {
        self.target
            .get()
            .is_some_and(|target| self.body.is_near(target, self.detection_radius))
    }

    fn tick(&mut self, _delta_time: f32) {
        if self.active {
            self.body.set_destination(self.target.get());
        }
    }
}

/// Hit callback type
pub type HitCallback = Box<dyn Fn() + Send + Sync>;

/// Close-range attack with a cooldown
pub struct MeleeAttack {
    body: AgentBody,
    target: TargetTracker,
    range: f32,
    cooldown: Countdown,
    on_hit: Option<HitCallback>,
    attacks: u32,
}

impl MeleeAttack {
    pub fn new(body: AgentBody, target: TargetTracker, range: f32, cooldown: f32) -> Self {
        Self {
            body,
            target,
            range,
            cooldown: Countdown::new(cooldown),
            on_hit: None,
            attacks: 0,
        }
    }

    /// Called on every landed attack
    pub fn on_hit<F>(mut self, f: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.on_hit = Some(Box::new(f));
        self
    }

    /// Attacks landed so far
    pub fn attacks(&self) -> u32 {
        self.attacks
    }
}

impl AttackBehavior for MeleeAttack {
    fn try_attack(&mut self) {
        if !self.can_attack() || !self.is_target_in_range() {
            return;
        }
        self.body.set_destination(None);
        self.attacks += 1;
        self.cooldown.start();
        if let Some(on_hit) = &self.on_hit {
            on_hit();
        }
    }

    fn stop_attacking(&mut self) {}

    fn is_target_in_range(&self) -> bool {
        self.target
            .get()
            .is_some_and(|target| self.body.is_near(target, self.range))
    }

    fn can_attack(&self) -> bool {
        !self.cooldown.is_running()
    }

    fn tick(&mut self, delta_time: f32) {
        self.cooldown.tick(delta_time);
    }
}

impl fmt::Debug for MeleeAttack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MeleeAttack")
            .field("range", &self.range)
            .field("cooldown", &self.cooldown)
            .field("attacks", &self.attacks)
            .finish()
    }
}
