//! Integration tests for action runners
//!
//! Ordering and fault isolation across heterogeneous action lists

use eclipse_actions::*;
use eclipse_core::{EntityId, Error};
use parking_lot::Mutex;
use std::sync::Arc;

type Journal = Arc<Mutex<Vec<usize>>>;

fn recording(journal: &Journal, id: usize, fail: bool) -> FnAction {
    let journal = journal.clone();
    FnAction::new(format!("record_{}", id), move |_| {
        journal.lock().push(id);
        if fail {
            Err(Error::Message(format!("action {} failed", id)))
        } else {
            Ok(())
        }
    })
}

#[test]
fn test_continue_on_error_runs_everything_in_order() {
    let journal: Journal = Arc::default();
    let mut scene = MemoryScene::new();

    let runner = ActionRunner::new()
        .with_stop_on_error(false)
        .with_action(recording(&journal, 0, false))
        .with_action(recording(&journal, 1, true))
        .with_action(recording(&journal, 2, false))
        .with_action(recording(&journal, 3, true))
        .with_action(recording(&journal, 4, false));

    let report = runner.run_all(&mut ActionContext::new(&mut scene));

    assert_eq!(*journal.lock(), vec![0, 1, 2, 3, 4]);
    assert_eq!(report.executed, 5);
    assert_eq!(
        report.faults.iter().map(|f| f.index).collect::<Vec<_>>(),
        vec![1, 3]
    );
    assert!(!report.aborted);
}

#[test]
fn test_stop_on_error_skips_the_rest() {
    for failing_index in 0..4 {
        let journal: Journal = Arc::default();
        let mut scene = MemoryScene::new();

        let mut runner = ActionRunner::new();
        for id in 0..4 {
            runner.add(recording(&journal, id, id == failing_index));
        }

        let report = runner.run_all(&mut ActionContext::new(&mut scene));

        let expected: Vec<usize> = (0..=failing_index).collect();
        assert_eq!(*journal.lock(), expected);
        assert_eq!(report.faults.len(), 1);
        assert_eq!(report.aborted, failing_index < 3);
    }
}

#[test]
fn test_scenario_set_active_pair() {
    let mut scene = MemoryScene::new();
    let obj_a = scene.spawn(SceneEntity::new("objA").inactive());
    let obj_b = scene.spawn(SceneEntity::new("objB"));

    let runner = ActionRunner::new()
        .with_stop_on_error(true)
        .with_action(ActionKind::set_active(obj_a, true))
        .with_action(ActionKind::set_active(obj_b, false));

    let report = runner.run_all(&mut ActionContext::new(&mut scene));

    assert_eq!(scene.is_active(obj_a), Some(true));
    assert_eq!(scene.is_active(obj_b), Some(false));
    assert_eq!(report.executed, 2);
    assert!(report.is_success());
}

#[test]
fn test_missing_entity_does_not_escape_runner() {
    let mut scene = MemoryScene::new();
    let lamp = scene.spawn(SceneEntity::new("lamp"));

    let runner = ActionRunner::new()
        .with_stop_on_error(false)
        .with_action(ActionKind::destroy(EntityId::new(999)))
        .with_action(ActionKind::set_active(lamp, false));

    let report = runner.run_all(&mut ActionContext::new(&mut scene));

    assert_eq!(report.faults[0].error, Error::EntityNotFound(EntityId::new(999)));
    assert_eq!(scene.is_active(lamp), Some(false));
}

#[test]
fn test_instigator_flows_to_every_action() {
    let mut scene = MemoryScene::new();
    let player = scene.spawn(SceneEntity::new("player").with_animator());

    let runner = ActionRunner::from_kinds([
        ActionKind::PlayAnimation {
            target: Some(Target::Instigator),
            state: "Stagger".into(),
        },
        ActionKind::SetPosition {
            target: Some(Target::Instigator),
            position: [0.0, 0.0, -5.0],
        },
    ]);

    let mut ctx = ActionContext::new(&mut scene).with_instigator(player);
    let report = runner.run_all(&mut ctx);

    assert!(report.is_success());
    assert_eq!(scene.position(player), Some([0.0, 0.0, -5.0]));
}

#[test]
fn test_configuration_errors_never_stop_the_runner() {
    let mut scene = MemoryScene::new();
    let golem = scene.spawn(SceneEntity::new("golem").with_animator());
    let door = scene.spawn(SceneEntity::new("door"));

    // Default policy stops on error, but neither fault is an execution fault
    let runner = ActionRunner::from_kinds([
        ActionKind::SetPosition {
            target: Some(Target::Instigator),
            position: [1.0, 0.0, 0.0],
        },
        ActionKind::set_animator_bool(golem, "", true),
        ActionKind::set_active(door, false),
    ]);
    assert!(runner.stop_on_error());

    let report = runner.run_all(&mut ActionContext::new(&mut scene));

    assert_eq!(report.executed, 3);
    assert!(!report.aborted);
    assert_eq!(report.faults.len(), 2);
    assert!(matches!(report.faults[0].error, Error::MissingReference(_)));
    assert!(matches!(report.faults[1].error, Error::InvalidParameter(_)));
    assert_eq!(scene.is_active(door), Some(false));
}

#[test]
fn test_execution_fault_after_configuration_error_still_stops() {
    let mut scene = MemoryScene::new();
    let door = scene.spawn(SceneEntity::new("door"));

    let runner = ActionRunner::from_kinds([
        ActionKind::SetPosition {
            target: Some(Target::Instigator),
            position: [1.0, 0.0, 0.0],
        },
        ActionKind::destroy(EntityId::new(999)),
        ActionKind::set_active(door, false),
    ]);

    let report = runner.run_all(&mut ActionContext::new(&mut scene));

    assert_eq!(report.executed, 2);
    assert!(report.aborted);
    assert_eq!(scene.is_active(door), Some(true));
}
