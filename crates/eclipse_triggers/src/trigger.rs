//! Generic trigger
//!
//! Every tick the trigger receives the candidates inside its region. A
//! candidate activates the trigger when it is not suppressed and every
//! option agrees. Activation notifies options, then reactions, then runs the
//! attached action runner with the candidate as instigator.
//!
//! Suppression has two independent sources that combine by OR:
//! once-per-entry (cleared when the candidate leaves) and the cooldown
//! expiry stamped at activation.

use crate::events::TriggerEvent;
use crate::option::TriggerOption;
use crate::query::{SpatialQuery, TriggerCandidate};
use crate::reaction::TriggerReaction;
use crate::volume::TriggerRegion;
use eclipse_actions::{ActionContext, ActionRunner, Scene};
use eclipse_core::{EntityId, FrameTime};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;

/// Read-only view handed to options and reactions
#[derive(Clone, Copy)]
pub struct TriggerContext<'a> {
    /// Entity owning the trigger
    pub owner: EntityId,
    /// Current frame time
    pub time: FrameTime,
    /// Scene for capability lookups
    pub scene: &'a dyn Scene,
}

impl<'a> TriggerContext<'a> {
    pub fn new(owner: EntityId, time: FrameTime, scene: &'a dyn Scene) -> Self {
        Self { owner, time, scene }
    }
}

/// Trigger behaviour settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TriggerSettings {
    /// Activate at most once while a candidate stays inside
    pub trigger_once_per_entry: bool,
    /// Seconds after an activation during which the candidate is ignored
    pub trigger_cooldown: f32,
    /// Notify reactions when a candidate leaves
    pub reset_state_on_exit: bool,
}

impl Default for TriggerSettings {
    fn default() -> Self {
        Self {
            trigger_once_per_entry: true,
            trigger_cooldown: 0.0,
            reset_state_on_exit: true,
        }
    }
}

/// Trigger gated by options, observed by reactions
///
/// Options and reactions are fixed at construction through the `with_*`
/// builders; there is no way to add or remove them afterwards.
pub struct GenericTrigger {
    owner: EntityId,
    region: TriggerRegion,
    settings: TriggerSettings,
    enabled: bool,
    options: Vec<Box<dyn TriggerOption>>,
    reactions: Vec<Box<dyn TriggerReaction>>,
    runner: Option<ActionRunner>,
    /// Candidates seen inside the region on the last evaluation
    inside_zone: HashMap<EntityId, TriggerCandidate>,
    /// Candidates that activated during their current stay
    triggered: HashSet<EntityId>,
    /// Cooldown expiry timestamps
    cooldowns: HashMap<EntityId, f32>,
    events: Vec<TriggerEvent>,
    activation_count: u32,
}

impl GenericTrigger {
    /// Create a trigger with default settings
    pub fn new(owner: EntityId, region: TriggerRegion) -> Self {
        Self {
            owner,
            region,
            settings: TriggerSettings::default(),
            enabled: true,
            options: Vec::new(),
            reactions: Vec::new(),
            runner: None,
            inside_zone: HashMap::new(),
            triggered: HashSet::new(),
            cooldowns: HashMap::new(),
            events: Vec::new(),
            activation_count: 0,
        }
    }

    /// Replace all settings
    pub fn with_settings(mut self, settings: TriggerSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Set once-per-entry suppression
    pub fn with_once_per_entry(mut self, once: bool) -> Self {
        self.settings.trigger_once_per_entry = once;
        self
    }

    /// Set cooldown in seconds
    pub fn with_cooldown(mut self, cooldown: f32) -> Self {
        self.settings.trigger_cooldown = cooldown.max(0.0);
        self
    }

    /// Set reset-on-exit
    pub fn with_reset_on_exit(mut self, reset: bool) -> Self {
        self.settings.reset_state_on_exit = reset;
        self
    }

    /// Append an option; options are checked in the order added
    pub fn with_option<O: TriggerOption + 'static>(mut self, option: O) -> Self {
        self.options.push(Box::new(option));
        self
    }

    /// Append a reaction; reactions are notified in the order added
    pub fn with_reaction<R: TriggerReaction + 'static>(mut self, reaction: R) -> Self {
        self.reactions.push(Box::new(reaction));
        self
    }

    /// Run `runner` on every activation
    pub fn with_runner(mut self, runner: ActionRunner) -> Self {
        self.runner = Some(runner);
        self
    }

    /// Start disabled
    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    pub fn owner(&self) -> EntityId {
        self.owner
    }

    pub fn region(&self) -> &TriggerRegion {
        &self.region
    }

    /// Mutable region, for triggers that move with their owner
    pub fn region_mut(&mut self) -> &mut TriggerRegion {
        &mut self.region
    }

    pub fn settings(&self) -> &TriggerSettings {
        &self.settings
    }

    pub fn runner(&self) -> Option<&ActionRunner> {
        self.runner.as_ref()
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Enable the trigger
    pub fn enable(&mut self) {
        self.enabled = true;
    }

    /// Disable the trigger
    ///
    /// Zone state is forgotten without exit notifications, so candidates
    /// still inside count as fresh entries once re-enabled.
    pub fn disable(&mut self) {
        self.enabled = false;
        self.inside_zone.clear();
        self.triggered.clear();
    }

    /// Forget zone, suppression and counters
    pub fn reset(&mut self) {
        self.inside_zone.clear();
        self.triggered.clear();
        self.cooldowns.clear();
        self.events.clear();
        self.activation_count = 0;
    }

    /// Whether `entity` was inside on the last evaluation
    pub fn is_inside(&self, entity: EntityId) -> bool {
        self.inside_zone.contains_key(&entity)
    }

    /// Whether `entity` activated the trigger during its current stay
    pub fn has_triggered(&self, entity: EntityId) -> bool {
        self.triggered.contains(&entity)
    }

    /// Whether `entity` is inside its cooldown window at `now`
    pub fn is_cooling_down(&self, entity: EntityId, now: f32) -> bool {
        self.cooldowns.get(&entity).is_some_and(|expiry| now < *expiry)
    }

    /// Number of entities inside
    pub fn inside_count(&self) -> usize {
        self.inside_zone.len()
    }

    /// Total activations since creation or the last reset
    pub fn activation_count(&self) -> u32 {
        self.activation_count
    }

    /// Events queued since the last drain
    pub fn events(&self) -> &[TriggerEvent] {
        &self.events
    }

    /// Take queued events
    pub fn drain_events(&mut self) -> Vec<TriggerEvent> {
        std::mem::take(&mut self.events)
    }

    /// Query the region and evaluate the result
    pub fn update(&mut self, time: FrameTime, query: &dyn SpatialQuery, scene: &mut dyn Scene) {
        if !self.enabled {
            return;
        }
        let candidates = query.overlapping(&self.region, time);
        self.evaluate(&candidates, time, scene);
    }

    /// Evaluate one tick given the candidates currently inside the region
    pub fn evaluate(
        &mut self,
        candidates: &[TriggerCandidate],
        time: FrameTime,
        scene: &mut dyn Scene,
    ) {
        if !self.enabled {
            return;
        }

        let now = time.now;
        self.cooldowns.retain(|_, expiry| now < *expiry);

        let mut new_zone: HashMap<EntityId, TriggerCandidate> = HashMap::new();
        for candidate in candidates {
            if new_zone.insert(candidate.id, candidate.clone()).is_some() {
                continue;
            }

            if !self.inside_zone.contains_key(&candidate.id) {
                self.events
                    .push(TriggerEvent::enter(self.owner, candidate.id, now));
            }

            if self.is_suppressed(candidate.id, now) {
                continue;
            }

            if self.try_activate(candidate, time, scene) {
                self.run_actions(candidate.id, scene);
            }
        }

        let mut exited: Vec<TriggerCandidate> = self
            .inside_zone
            .drain()
            .filter(|(id, _)| !new_zone.contains_key(id))
            .map(|(_, candidate)| candidate)
            .collect();
        exited.sort_by_key(|candidate| candidate.id);

        for candidate in &exited {
            self.handle_exit(candidate, time, scene);
        }

        self.inside_zone = new_zone;
    }

    fn is_suppressed(&self, entity: EntityId, now: f32) -> bool {
        if self.is_cooling_down(entity, now) {
            return true;
        }
        self.settings.trigger_once_per_entry && self.triggered.contains(&entity)
    }

    /// Check options and notify on success. Returns whether it activated.
    fn try_activate(
        &mut self,
        candidate: &TriggerCandidate,
        time: FrameTime,
        scene: &dyn Scene,
    ) -> bool {
        let ctx = TriggerContext::new(self.owner, time, scene);

        if !self
            .options
            .iter()
            .all(|option| option.should_activate(candidate, &ctx))
        {
            return false;
        }

        self.triggered.insert(candidate.id);
        self.cooldowns
            .insert(candidate.id, time.now + self.settings.trigger_cooldown);
        self.activation_count += 1;

        for option in &mut self.options {
            option.on_activated(candidate, &ctx);
        }
        for reaction in &mut self.reactions {
            reaction.on_activated(candidate, &ctx);
        }

        log::debug!("Trigger {} activated by {}", self.owner, candidate.id);
        self.events
            .push(TriggerEvent::activated(self.owner, candidate.id, time.now));
        true
    }

    fn run_actions(&self, instigator: EntityId, scene: &mut dyn Scene) {
        let Some(runner) = &self.runner else {
            return;
        };
        let mut ctx = ActionContext::new(scene).with_instigator(instigator);
        let report = runner.run_all(&mut ctx);
        if !report.is_success() {
            log::warn!(
                "Trigger {}: {} of {} actions failed for {}",
                self.owner,
                report.faults.len(),
                runner.len(),
                instigator
            );
        }
    }

    fn handle_exit(&mut self, candidate: &TriggerCandidate, time: FrameTime, scene: &dyn Scene) {
        self.triggered.remove(&candidate.id);
        self.events
            .push(TriggerEvent::exit(self.owner, candidate.id, time.now));

        if !self.settings.reset_state_on_exit {
            return;
        }

        let ctx = TriggerContext::new(self.owner, time, scene);
        for reaction in &mut self.reactions {
            reaction.on_reset(candidate, &ctx);
        }
        log::debug!("Trigger {} reset for {}", self.owner, candidate.id);
        self.events
            .push(TriggerEvent::reset(self.owner, candidate.id, time.now));
    }
}

impl fmt::Debug for GenericTrigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GenericTrigger")
            .field("owner", &self.owner)
            .field("region", &self.region)
            .field("settings", &self.settings)
            .field("enabled", &self.enabled)
            .field("options", &self.options.len())
            .field("reactions", &self.reactions.len())
            .field("inside", &self.inside_zone.len())
            .field("activation_count", &self.activation_count)
            .finish()
    }
}
