//! Tests for editor-driven construction of a machine followed by validation

use fsmc_graph::*;

/// Build a three-state sequence detector for "11" one edit at a time
fn build_detector() -> (Fsm, [StateId; 3]) {
    let mut fsm = Fsm::new();
    let idle = fsm.add_state("0");
    let one = fsm.add_state("0");
    let hit = fsm.add_state("1");
    fsm.rename_state(idle, "Idle").unwrap();
    fsm.rename_state(one, "SeenOne").unwrap();
    fsm.rename_state(hit, "Hit").unwrap();

    fsm.add_transition(idle, one, "1").unwrap();
    fsm.add_transition(idle, idle, "0").unwrap();
    fsm.add_transition(one, hit, "1").unwrap();
    fsm.add_transition(one, idle, "0").unwrap();
    fsm.add_transition(hit, hit, "1").unwrap();
    fsm.add_transition(hit, idle, "0").unwrap();
    (fsm, [idle, one, hit])
}

#[test]
fn test_complete_detector_is_clean() {
    let (fsm, _) = build_detector();
    let report = validate(&fsm);
    assert!(report.valid);
    assert!(report.errors.is_empty());
    assert!(report.warnings.is_empty());
}

#[test]
fn test_removing_transition_introduces_coverage_warning() {
    let (mut fsm, [_, _, hit]) = build_detector();
    let self_loop = fsm.outgoing(hit, "1").unwrap().id;
    fsm.remove_transition(self_loop).unwrap();

    let report = validate(&fsm);
    assert!(report.valid);
    assert_eq!(
        report.warning_messages(),
        vec!["State \"Hit\" missing transitions for inputs: 1".to_string()]
    );
}

#[test]
fn test_retargeting_requires_remove_then_add() {
    let (mut fsm, [idle, one, hit]) = build_detector();

    let err = fsm.add_transition(one, one, "1").unwrap_err();
    assert!(matches!(err, GraphError::ConflictingTransition { .. }));

    let old = fsm.outgoing(one, "1").unwrap().id;
    fsm.remove_transition(old).unwrap();
    fsm.add_transition(one, one, "1").unwrap();
    assert_eq!(fsm.outgoing(one, "1").unwrap().to, one);

    // Hit is now unreachable but still fully specified
    assert!(validate(&fsm).valid);
    assert_eq!(fsm.outgoing(hit, "0").unwrap().to, idle);
}

#[test]
fn test_snapshot_survives_edit_session() {
    let (mut fsm, [idle, _, hit]) = build_detector();
    fsm.set_accept(hit, true).unwrap();
    fsm.set_initial(idle).unwrap();

    let json = fsm.to_snapshot().to_json().unwrap();
    let reloaded = Fsm::from_snapshot(&FsmSnapshot::from_json(&json).unwrap()).unwrap();

    assert_eq!(reloaded.states(), fsm.states());
    assert_eq!(reloaded.transitions(), fsm.transitions());
    assert!(reloaded.state_by_name("Hit").unwrap().is_accept);
}
