//! Ordered action lists with fault policy

use crate::action::{Action, ActionContext, ActionKind};
use eclipse_core::Error;
use std::fmt;
use std::sync::Arc;

/// A failure recorded while running an action
#[derive(Debug, Clone, PartialEq)]
pub struct ActionFault {
    /// Position of the action in the runner
    pub index: usize,
    /// Action name
    pub action: String,
    /// What went wrong
    pub error: Error,
}

/// Outcome of a runner invocation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunReport {
    /// Number of actions whose `execute` was called
    pub executed: usize,
    /// Faults in execution order
    pub faults: Vec<ActionFault>,
    /// Whether remaining actions were skipped because of a fault
    pub aborted: bool,
}

impl RunReport {
    /// No faults were recorded
    pub fn is_success(&self) -> bool {
        self.faults.is_empty()
    }
}

/// An ordered sequence of actions.
///
/// Insertion order is execution order and duplicates are allowed. Running
/// borrows the runner immutably, so the list cannot change mid-run.
#[derive(Clone)]
pub struct ActionRunner {
    actions: Vec<Arc<dyn Action>>,
    /// Abort the remaining actions of a run after the first execution fault
    stop_on_error: bool,
}

impl ActionRunner {
    /// Create an empty runner that stops on error
    pub fn new() -> Self {
        Self {
            actions: Vec::new(),
            stop_on_error: true,
        }
    }

    /// Create a runner from built-in action kinds
    pub fn from_kinds<I: IntoIterator<Item = ActionKind>>(kinds: I) -> Self {
        let mut runner = Self::new();
        for kind in kinds {
            runner.add(kind);
        }
        runner
    }

    /// Append an action
    pub fn with_action<A: Action + 'static>(mut self, action: A) -> Self {
        self.add(action);
        self
    }

    /// Append shared actions
    pub fn with_actions<I: IntoIterator<Item = Arc<dyn Action>>>(mut self, actions: I) -> Self {
        self.actions.extend(actions);
        self
    }

    /// Set the fault policy
    pub fn with_stop_on_error(mut self, stop_on_error: bool) -> Self {
        self.stop_on_error = stop_on_error;
        self
    }

    /// Current fault policy
    pub fn stop_on_error(&self) -> bool {
        self.stop_on_error
    }

    /// Change the fault policy
    pub fn set_stop_on_error(&mut self, stop_on_error: bool) {
        self.stop_on_error = stop_on_error;
    }

    /// Append an action
    pub fn add<A: Action + 'static>(&mut self, action: A) {
        self.actions.push(Arc::new(action));
    }

    /// Append a shared action
    pub fn add_shared(&mut self, action: Arc<dyn Action>) {
        self.actions.push(action);
    }

    /// Insert an action at `index` (`index == len` appends).
    /// Returns false and logs a warning if `index` is past the end.
    pub fn insert<A: Action + 'static>(&mut self, index: usize, action: A) -> bool {
        if index > self.actions.len() {
            log::warn!(
                "ActionRunner::insert: index {} out of range (len {})",
                index,
                self.actions.len()
            );
            return false;
        }
        self.actions.insert(index, Arc::new(action));
        true
    }

    /// Remove the action at `index`. Out of range is a logged no-op.
    pub fn remove_at(&mut self, index: usize) -> Option<Arc<dyn Action>> {
        if index >= self.actions.len() {
            log::warn!(
                "ActionRunner::remove_at: index {} out of range (len {})",
                index,
                self.actions.len()
            );
            return None;
        }
        Some(self.actions.remove(index))
    }

    /// Remove every action
    pub fn clear(&mut self) {
        self.actions.clear();
    }

    /// Get an action
    pub fn get(&self, index: usize) -> Option<&Arc<dyn Action>> {
        self.actions.get(index)
    }

    /// Number of actions
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    /// Check if there are no actions
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Iterate actions in order
    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn Action>> {
        self.actions.iter()
    }

    /// Run every action in order
    pub fn run_all(&self, ctx: &mut ActionContext<'_>) -> RunReport {
        self.run_range(0, ctx)
    }

    /// Run actions starting at `start`. Out of range is a logged no-op.
    pub fn run_from(&self, start: usize, ctx: &mut ActionContext<'_>) -> RunReport {
        if start >= self.actions.len() {
            log::warn!(
                "ActionRunner::run_from: index {} out of range (len {})",
                start,
                self.actions.len()
            );
            return RunReport::default();
        }
        self.run_range(start, ctx)
    }

    /// Run exactly one action. A fault is reported but aborts nothing.
    pub fn run_action(&self, index: usize, ctx: &mut ActionContext<'_>) -> RunReport {
        let mut report = RunReport::default();
        let Some(action) = self.actions.get(index) else {
            log::warn!(
                "ActionRunner::run_action: index {} out of range (len {})",
                index,
                self.actions.len()
            );
            return report;
        };

        report.executed = 1;
        if let Err(fault) = Self::execute_one(index, action.as_ref(), ctx) {
            report.faults.push(fault);
        }
        report
    }

    fn run_range(&self, start: usize, ctx: &mut ActionContext<'_>) -> RunReport {
        let mut report = RunReport::default();

        for (index, action) in self.actions.iter().enumerate().skip(start) {
            report.executed += 1;
            if let Err(fault) = Self::execute_one(index, action.as_ref(), ctx) {
                let configuration = fault.error.is_configuration();
                report.faults.push(fault);
                // Configuration errors only skip the action that hit them
                if self.stop_on_error && !configuration {
                    report.aborted = index + 1 < self.actions.len();
                    if report.aborted {
                        log::warn!(
                            "ActionRunner stopped after fault at {}; {} action(s) skipped",
                            index,
                            self.actions.len() - index - 1
                        );
                    }
                    break;
                }
            }
        }

        report
    }

    fn execute_one(
        index: usize,
        action: &dyn Action,
        ctx: &mut ActionContext<'_>,
    ) -> Result<(), ActionFault> {
        action.execute(ctx).map_err(|error| {
            if error.is_configuration() {
                log::warn!("Action {} ({}) skipped: {}", index, action.name(), error);
            } else {
                log::error!("Action {} ({}) failed: {}", index, action.name(), error);
            }
            ActionFault {
                index,
                action: action.name().to_string(),
                error,
            }
        })
    }
}

impl Default for ActionRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Vec<ActionKind>> for ActionRunner {
    fn from(kinds: Vec<ActionKind>) -> Self {
        Self::from_kinds(kinds)
    }
}

impl fmt::Debug for ActionRunner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionRunner")
            .field(
                "actions",
                &self.actions.iter().map(|a| a.name()).collect::<Vec<_>>(),
            )
            .field("stop_on_error", &self.stop_on_error)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::FnAction;
    use crate::scene::{MemoryScene, Scene, SceneEntity};
    use eclipse_core::EntityId;

    fn failing(name: &str) -> FnAction {
        FnAction::new(name, |_| Err(Error::Message("boom".into())))
    }

    #[test]
    fn test_default_policy_stops_on_error() {
        assert!(ActionRunner::new().stop_on_error());
    }

    #[test]
    fn test_run_all_in_order() {
        let mut scene = MemoryScene::new();
        let a = scene.spawn(SceneEntity::new("a").inactive());
        let b = scene.spawn(SceneEntity::new("b"));

        let runner = ActionRunner::new()
            .with_action(ActionKind::set_active(a, true))
            .with_action(ActionKind::set_active(b, false));

        let report = runner.run_all(&mut ActionContext::new(&mut scene));

        assert_eq!(report.executed, 2);
        assert!(report.is_success());
        assert_eq!(scene.is_active(a), Some(true));
        assert_eq!(scene.is_active(b), Some(false));
    }

    #[test]
    fn test_stop_on_error_reports_abort() {
        let mut scene = MemoryScene::new();
        let runner = ActionRunner::new()
            .with_action(failing("first"))
            .with_action(ActionKind::log("never"));

        let report = runner.run_all(&mut ActionContext::new(&mut scene));

        assert_eq!(report.executed, 1);
        assert!(report.aborted);
        assert_eq!(report.faults[0].index, 0);
        assert_eq!(report.faults[0].action, "first");
    }

    #[test]
    fn test_fault_on_last_action_is_not_abort() {
        let mut scene = MemoryScene::new();
        let runner = ActionRunner::new()
            .with_action(ActionKind::log("ok"))
            .with_action(failing("last"));

        let report = runner.run_all(&mut ActionContext::new(&mut scene));
        assert_eq!(report.executed, 2);
        assert!(!report.aborted);
        assert_eq!(report.faults.len(), 1);
    }

    #[test]
    fn test_run_from() {
        let mut scene = MemoryScene::new();
        let a = scene.spawn(SceneEntity::new("a"));
        let b = scene.spawn(SceneEntity::new("b"));

        let runner = ActionRunner::new()
            .with_action(ActionKind::set_active(a, false))
            .with_action(ActionKind::set_active(b, false));

        let report = runner.run_from(1, &mut ActionContext::new(&mut scene));
        assert_eq!(report.executed, 1);
        assert_eq!(scene.is_active(a), Some(true));
        assert_eq!(scene.is_active(b), Some(false));

        let report = runner.run_from(2, &mut ActionContext::new(&mut scene));
        assert_eq!(report, RunReport::default());
    }

    #[test]
    fn test_run_action_single() {
        let mut scene = MemoryScene::new();
        let runner = ActionRunner::new()
            .with_action(failing("bad"))
            .with_action(ActionKind::log("fine"));

        let report = runner.run_action(0, &mut ActionContext::new(&mut scene));
        assert_eq!(report.executed, 1);
        assert_eq!(report.faults.len(), 1);
        assert!(!report.aborted);

        let report = runner.run_action(1, &mut ActionContext::new(&mut scene));
        assert!(report.is_success());

        let report = runner.run_action(9, &mut ActionContext::new(&mut scene));
        assert_eq!(report.executed, 0);
    }

    #[test]
    fn test_mutators() {
        let mut runner = ActionRunner::new();
        runner.add(ActionKind::log("one"));
        runner.add(ActionKind::log("three"));

        assert!(runner.insert(1, ActionKind::log("two")));
        assert!(!runner.insert(7, ActionKind::log("nope")));
        assert_eq!(runner.len(), 3);

        let removed = runner.remove_at(0);
        assert_eq!(removed.map(|a| a.name().to_string()), Some("log".to_string()));
        assert!(runner.remove_at(5).is_none());
        assert_eq!(runner.len(), 2);

        runner.clear();
        assert!(runner.is_empty());
    }

    #[test]
    fn test_duplicates_run_twice() {
        let mut scene = MemoryScene::new();
        let lamp = scene.spawn(SceneEntity::new("lamp"));
        let toggle: Arc<dyn Action> = Arc::new(ActionKind::toggle_active(lamp));

        let runner = ActionRunner::new().with_actions([toggle.clone(), toggle]);
        let report = runner.run_all(&mut ActionContext::new(&mut scene));

        assert_eq!(report.executed, 2);
        assert_eq!(scene.is_active(lamp), Some(true));
    }

    #[test]
    fn test_from_kinds() {
        let runner: ActionRunner = vec![
            ActionKind::log("a"),
            ActionKind::destroy(EntityId::new(1)),
        ]
        .into();
        assert_eq!(runner.len(), 2);
        assert_eq!(runner.get(1).map(|a| a.name()), Some("destroy"));
    }
}
