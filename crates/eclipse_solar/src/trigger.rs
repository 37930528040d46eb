//! State-gated action trigger
//!
//! Holds a set of `(source, required state)` conditions. When their
//! conjunction goes from unmet to met the attached runner fires. An empty
//! condition list is never met.
//!
//! Change notifications only mark the trigger dirty; the host calls
//! [`SolarStateActionTrigger::process`] during its evaluation phase, after
//! every state mutation of the tick has been applied.

use crate::state::{SolarState, SolarStateSource};
use eclipse_actions::{ActionContext, ActionRunner, RunReport, Scene};
use eclipse_core::EntityId;
use eclipse_event::{StateSource, SubscriberId};
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// A source that must be in a given state
#[derive(Clone)]
pub struct SolarStateCondition {
    source: Option<Arc<dyn StateSource<SolarState>>>,
    required: SolarState,
}

impl SolarStateCondition {
    /// Condition on an observable source
    pub fn new(source: SolarStateSource, required: SolarState) -> Self {
        Self::from_source(Arc::new(source), required)
    }

    /// Condition on any state source
    pub fn from_source(source: Arc<dyn StateSource<SolarState>>, required: SolarState) -> Self {
        Self {
            source: Some(source),
            required,
        }
    }

    /// Condition with no source; it is never met
    pub fn unbound(required: SolarState) -> Self {
        Self {
            source: None,
            required,
        }
    }

    pub fn required(&self) -> SolarState {
        self.required
    }

    pub fn source(&self) -> Option<&Arc<dyn StateSource<SolarState>>> {
        self.source.as_ref()
    }

    /// Whether the source currently holds the required state
    pub fn is_met(&self) -> bool {
        self.source
            .as_ref()
            .is_some_and(|source| source.current() == self.required)
    }
}

impl fmt::Debug for SolarStateCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SolarStateCondition")
            .field("source", &self.source.as_ref().map(|s| s.name().to_string()))
            .field("required", &self.required)
            .finish()
    }
}

/// Runs actions when every solar condition holds
pub struct SolarStateActionTrigger {
    owner: Option<EntityId>,
    conditions: Vec<SolarStateCondition>,
    runner: Option<ActionRunner>,
    trigger_once: bool,
    has_fired: bool,
    /// Conjunction result at the last check
    was_met: bool,
    dirty: Arc<AtomicBool>,
    subscriptions: Vec<(Arc<dyn StateSource<SolarState>>, SubscriberId)>,
}

impl SolarStateActionTrigger {
    /// Create a trigger and subscribe to every condition's source
    ///
    /// The trigger starts dirty, so conditions that already hold fire on the
    /// first [`process`](Self::process).
    pub fn new(conditions: Vec<SolarStateCondition>) -> Self {
        let dirty = Arc::new(AtomicBool::new(true));
        let mut subscriptions = Vec::new();

        for (index, condition) in conditions.iter().enumerate() {
            let Some(source) = condition.source.clone() else {
                log::warn!("Solar condition {} has no state source and is never met", index);
                continue;
            };
            let flag = dirty.clone();
            let id = source.subscribe(Box::new(move |_| flag.store(true, Ordering::SeqCst)));
            subscriptions.push((source, id));
        }

        Self {
            owner: None,
            conditions,
            runner: None,
            trigger_once: true,
            has_fired: false,
            was_met: false,
            dirty,
            subscriptions,
        }
    }

    /// Attach the runner fired on activation
    pub fn with_runner(mut self, runner: ActionRunner) -> Self {
        self.runner = Some(runner);
        self
    }

    /// Fire only the first time (default) or on every unmet-to-met edge
    pub fn with_trigger_once(mut self, trigger_once: bool) -> Self {
        self.trigger_once = trigger_once;
        self
    }

    /// Entity passed to actions as instigator
    pub fn with_owner(mut self, owner: EntityId) -> Self {
        self.owner = Some(owner);
        self
    }

    pub fn conditions(&self) -> &[SolarStateCondition] {
        &self.conditions
    }

    pub fn trigger_once(&self) -> bool {
        self.trigger_once
    }

    pub fn has_fired(&self) -> bool {
        self.has_fired
    }

    /// Whether a source changed since the last check
    pub fn is_dirty(&self) -> bool {
        self.dirty.load(Ordering::SeqCst)
    }

    /// True when there is at least one condition and all of them hold
    pub fn are_all_conditions_met(&self) -> bool {
        !self.conditions.is_empty() && self.conditions.iter().all(SolarStateCondition::is_met)
    }

    /// Check conditions if a source changed since the last check
    pub fn process(&mut self, scene: &mut dyn Scene) -> Option<RunReport> {
        if !self.dirty.swap(false, Ordering::SeqCst) {
            return None;
        }
        self.check_conditions(scene)
    }

    /// Check conditions now and fire on an unmet-to-met edge
    ///
    /// Returns the run report when the trigger fired.
    pub fn check_conditions(&mut self, scene: &mut dyn Scene) -> Option<RunReport> {
        let met = self.are_all_conditions_met();
        let rising = met && !self.was_met;
        self.was_met = met;

        if !rising {
            return None;
        }
        if self.trigger_once && self.has_fired {
            log::debug!("Solar trigger already fired; ignoring");
            return None;
        }
        Some(self.fire(scene))
    }

    /// Fire regardless of conditions
    pub fn manual_trigger(&mut self, scene: &mut dyn Scene) -> RunReport {
        self.fire(scene)
    }

    /// Clear the fired flag and resample the conditions
    ///
    /// Never fires: if the conditions still hold, the next firing needs
    /// them to become unmet and then met again.
    pub fn reset_trigger(&mut self) {
        self.has_fired = false;
        self.was_met = self.are_all_conditions_met();
        self.dirty.store(false, Ordering::SeqCst);
    }

    fn fire(&mut self, scene: &mut dyn Scene) -> RunReport {
        self.has_fired = true;

        let Some(runner) = &self.runner else {
            log::warn!("Solar trigger fired without an action runner");
            return RunReport::default();
        };

        log::debug!("Solar trigger firing {} actions", runner.len());
        let mut ctx = ActionContext::new(scene);
        if let Some(owner) = self.owner {
            ctx = ctx.with_instigator(owner);
        }
        runner.run_all(&mut ctx)
    }
}

impl Drop for SolarStateActionTrigger {
    fn drop(&mut self) {
        for (source, id) in self.subscriptions.drain(..) {
            source.unsubscribe(id);
        }
    }
}

impl fmt::Debug for SolarStateActionTrigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SolarStateActionTrigger")
            .field("conditions", &self.conditions)
            .field("trigger_once", &self.trigger_once)
            .field("has_fired", &self.has_fired)
            .field("was_met", &self.was_met)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eclipse_actions::{FnAction, MemoryScene};
    use std::sync::atomic::AtomicU32;

    fn counting_runner(count: &Arc<AtomicU32>) -> ActionRunner {
        let count = count.clone();
        ActionRunner::new().with_action(FnAction::new("count", move |_| {
            count.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }))
    }

    #[test]
    fn test_empty_conditions_never_met() {
        let mut scene = MemoryScene::new();
        let mut trigger = SolarStateActionTrigger::new(Vec::new());

        assert!(!trigger.are_all_conditions_met());
        assert!(trigger.process(&mut scene).is_none());
        assert!(!trigger.has_fired());
    }

    #[test]
    fn test_unbound_condition_never_met() {
        let condition = SolarStateCondition::unbound(SolarState::Sun);
        assert!(!condition.is_met());
    }

    #[test]
    fn test_fires_on_first_process_when_already_met() {
        let mut scene = MemoryScene::new();
        let sky = SolarStateSource::new("sky", SolarState::Moon);
        let count = Arc::new(AtomicU32::new(0));
        let mut trigger =
            SolarStateActionTrigger::new(vec![SolarStateCondition::new(sky, SolarState::Moon)])
                .with_runner(counting_runner(&count));

        assert!(trigger.process(&mut scene).is_some());
        assert!(trigger.process(&mut scene).is_none());
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_change_marks_dirty() {
        let mut scene = MemoryScene::new();
        let sky = SolarStateSource::new("sky", SolarState::Sun);
        let mut trigger = SolarStateActionTrigger::new(vec![SolarStateCondition::new(
            sky.clone(),
            SolarState::Eclipse,
        )]);
        trigger.process(&mut scene);
        assert!(!trigger.is_dirty());

        sky.set(SolarState::Moon);
        assert!(trigger.is_dirty());
    }

    #[test]
    fn test_drop_unsubscribes() {
        let sky = SolarStateSource::new("sky", SolarState::Sun);
        let trigger = SolarStateActionTrigger::new(vec![
            SolarStateCondition::new(sky.clone(), SolarState::Sun),
            SolarStateCondition::new(sky.clone(), SolarState::Sun),
        ]);
        assert_eq!(sky.subscriber_count(), 2);

        drop(trigger);
        assert_eq!(sky.subscriber_count(), 0);
    }

    #[test]
    fn test_manual_trigger_bypasses_conditions() {
        let mut scene = MemoryScene::new();
        let count = Arc::new(AtomicU32::new(0));
        let mut trigger =
            SolarStateActionTrigger::new(Vec::new()).with_runner(counting_runner(&count));

        let report = trigger.manual_trigger(&mut scene);

        assert!(report.is_success());
        assert!(trigger.has_fired());
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_missing_runner_still_marks_fired() {
        let mut scene = MemoryScene::new();
        let sky = SolarStateSource::new("sky", SolarState::Sun);
        let mut trigger =
            SolarStateActionTrigger::new(vec![SolarStateCondition::new(sky, SolarState::Sun)]);

        let report = trigger.process(&mut scene);

        assert_eq!(report.map(|r| r.executed), Some(0));
        assert!(trigger.has_fired());
    }
}
