//! Enemy state machine

use crate::behavior::{AttackBehavior, ChaseBehavior, MovementControl, PatrolBehavior};
use crate::state::{EnemyState, StateChanged};
use eclipse_core::{Countdown, EntityId};
use eclipse_event::{Signal, SubscriberId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Enemy AI settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyAiConfig {
    /// State entered by [`EnemyAi::start`]
    pub initial_state: EnemyState,
    /// Seconds spent idle after losing the target
    pub lose_target_delay: f32,
    /// Go back to patrolling once the delay elapses
    pub return_to_patrol_on_lose_target: bool,
    /// Whether the AI evaluates transitions
    pub enabled: bool,
}

impl Default for EnemyAiConfig {
    fn default() -> Self {
        Self {
            initial_state: EnemyState::Patrol,
            lose_target_delay: 2.0,
            return_to_patrol_on_lose_target: true,
            enabled: true,
        }
    }
}

/// Four-state enemy controller
pub struct EnemyAi {
    owner: EntityId,
    config: EnemyAiConfig,
    state: EnemyState,
    enabled: bool,
    started: bool,
    stopped_override: bool,
    /// Whether the override halted everything on the last tick
    halted: bool,
    lose_target: Countdown,
    patrol: Option<Box<dyn PatrolBehavior>>,
    chase: Option<Box<dyn ChaseBehavior>>,
    attack: Option<Box<dyn AttackBehavior>>,
    movement: Option<Box<dyn MovementControl>>,
    state_changed: Signal<StateChanged>,
}

impl EnemyAi {
    /// Create an AI in the idle state
    pub fn new(owner: EntityId, config: EnemyAiConfig) -> Self {
        Self {
            owner,
            enabled: config.enabled,
            lose_target: Countdown::new(config.lose_target_delay),
            config,
            state: EnemyState::Idle,
            started: false,
            stopped_override: false,
            halted: false,
            patrol: None,
            chase: None,
            attack: None,
            movement: None,
            state_changed: Signal::new(),
        }
    }

    pub fn with_patrol<P: PatrolBehavior + 'static>(mut self, patrol: P) -> Self {
        self.patrol = Some(Box::new(patrol));
        self
    }

    pub fn with_chase<C: ChaseBehavior + 'static>(mut self, chase: C) -> Self {
        self.chase = Some(Box::new(chase));
        self
    }

    pub fn with_attack<A: AttackBehavior + 'static>(mut self, attack: A) -> Self {
        self.attack = Some(Box::new(attack));
        self
    }

    pub fn with_movement<M: MovementControl + 'static>(mut self, movement: M) -> Self {
        self.movement = Some(Box::new(movement));
        self
    }

    pub fn owner(&self) -> EntityId {
        self.owner
    }

    pub fn config(&self) -> &EnemyAiConfig {
        &self.config
    }

    pub fn state(&self) -> EnemyState {
        self.state
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn is_stopped_override(&self) -> bool {
        self.stopped_override
    }

    /// Halt every behavior and movement each tick until cleared
    pub fn set_stopped_override(&mut self, stopped: bool) {
        self.stopped_override = stopped;
    }

    /// Whether the lose-target delay is counting down
    pub fn is_losing_target(&self) -> bool {
        self.lose_target.is_running()
    }

    /// Subscribe to state changes
    pub fn on_state_changed<F>(&mut self, handler: F) -> SubscriberId
    where
        F: Fn(&StateChanged) + Send + Sync + 'static,
    {
        self.state_changed.subscribe(handler)
    }

    /// Remove a state change subscription
    pub fn remove_state_listener(&mut self, id: SubscriberId) -> bool {
        self.state_changed.unsubscribe(id)
    }

    /// Enter the configured initial state. Called by the first tick if the
    /// host did not call it.
    pub fn start(&mut self) {
        if self.started {
            return;
        }
        self.started = true;

        if self.patrol.is_none() {
            log::warn!("Enemy {}: no patrol behavior, patrolling is skipped", self.owner);
        }
        if self.chase.is_none() {
            log::warn!("Enemy {}: no chase behavior, chasing is skipped", self.owner);
        }
        if self.attack.is_none() {
            log::warn!("Enemy {}: no attack behavior, attacking is skipped", self.owner);
        }
        if self.movement.is_none() {
            log::warn!("Enemy {}: no movement control, stop override only stops behaviors", self.owner);
        }

        self.change_state(self.config.initial_state);
    }

    /// Advance one tick
    pub fn tick(&mut self, delta_time: f32) {
        if self.stopped_override {
            self.halt();
            return;
        }
        if self.halted {
            self.resume();
        }

        if !self.enabled {
            return;
        }
        if !self.started {
            self.start();
        }

        if let Some(patrol) = self.patrol.as_mut() {
            patrol.tick(delta_time);
        }
        if let Some(chase) = self.chase.as_mut() {
            chase.tick(delta_time);
        }
        if let Some(attack) = self.attack.as_mut() {
            attack.tick(delta_time);
        }

        self.evaluate(delta_time);
    }

    /// Switch state, skipping the priority evaluation
    pub fn force_state(&mut self, state: EnemyState) {
        self.lose_target.cancel();
        self.change_state(state);
    }

    /// Switch state. Does nothing when already in `new_state`; otherwise
    /// stops every behavior, starts the one for `new_state` and notifies.
    pub fn change_state(&mut self, new_state: EnemyState) -> bool {
        if new_state == self.state {
            return false;
        }

        let old = self.state;
        self.stop_all();
        self.state = new_state;
        self.start_behavior(new_state);

        log::debug!("Enemy {}: {} -> {}", self.owner, old, new_state);
        self.state_changed.emit(&StateChanged {
            old,
            new: new_state,
        });
        true
    }

    fn evaluate(&mut self, delta_time: f32) {
        let attack_ready = self
            .attack
            .as_ref()
            .is_some_and(|attack| attack.is_target_in_range() && attack.can_attack());
        if attack_ready {
            self.lose_target.cancel();
            self.change_state(EnemyState::Attack);
            return;
        }

        let has_target = self.chase.as_ref().is_some_and(|chase| chase.has_target());
        if has_target {
            self.lose_target.cancel();
            self.change_state(EnemyState::Chase);
            return;
        }

        match self.state {
            EnemyState::Chase | EnemyState::Attack => {
                self.change_state(EnemyState::Idle);
                self.lose_target.start_with(self.config.lose_target_delay);
            }
            EnemyState::Idle => {
                if self.lose_target.tick(delta_time) && self.config.return_to_patrol_on_lose_target
                {
                    self.change_state(EnemyState::Patrol);
                }
            }
            EnemyState::Patrol => {}
        }
    }

    fn start_behavior(&mut self, state: EnemyState) {
        match state {
            EnemyState::Idle => {}
            EnemyState::Patrol => {
                if let Some(patrol) = self.patrol.as_mut() {
                    patrol.start_patrolling();
                }
            }
            EnemyState::Chase => {
                if let Some(chase) = self.chase.as_mut() {
                    chase.start_chasing();
                }
            }
            EnemyState::Attack => {
                if let Some(attack) = self.attack.as_mut() {
                    attack.try_attack();
                }
            }
        }
    }

    fn stop_all(&mut self) {
        if let Some(patrol) = self.patrol.as_mut() {
            patrol.stop_patrolling();
        }
        if let Some(chase) = self.chase.as_mut() {
            chase.stop_chasing();
        }
        if let Some(attack) = self.attack.as_mut() {
            attack.stop_attacking();
        }
    }

    fn halt(&mut self) {
        self.stop_all();
        if let Some(movement) = self.movement.as_mut() {
            movement.set_stopped(true);
        }
        if !self.halted {
            log::debug!("Enemy {} halted by override", self.owner);
        }
        self.halted = true;
    }

    /// Release movement and restart the current state's behavior
    fn resume(&mut self) {
        self.halted = false;
        if let Some(movement) = self.movement.as_mut() {
            movement.set_stopped(false);
        }
        self.start_behavior(self.state);
    }
}

impl fmt::Debug for EnemyAi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnemyAi")
            .field("owner", &self.owner)
            .field("state", &self.state)
            .field("enabled", &self.enabled)
            .field("stopped_override", &self.stopped_override)
            .field("patrol", &self.patrol.is_some())
            .field("chase", &self.chase.is_some())
            .field("attack", &self.attack.is_some())
            .field("movement", &self.movement.is_some())
            .finish()
    }
}
