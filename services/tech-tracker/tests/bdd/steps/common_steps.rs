//! BDD step definitions shared across features

use cucumber::then;

use tech_tracker::{Operation, StateEvent};

use crate::world::TechTrackerWorld;

fn parse_operation(s: &str) -> Operation {
    match s {
        "fetch technicians" => Operation::FetchTechnicians,
        "update status" => Operation::UpdateStatus,
        "fetch history" => Operation::FetchHistory,
        other => panic!("Unknown operation: {}", other),
    }
}

#[then(regex = r"^the (?:fetch|update) should succeed$")]
fn request_succeeds(world: &mut TechTrackerWorld) {
    let result = world.last_result.as_ref().expect("no result");
    result.as_ref().unwrap();
}

#[then(regex = r"^the (?:fetch|update) should fail$")]
fn request_fails(world: &mut TechTrackerWorld) {
    let result = world.last_result.as_ref().expect("no result");
    assert!(result.is_err(), "expected failure, got {result:?}");
}

#[then(expr = "subscribers should have been notified of a failed {string}")]
fn failure_notified(world: &mut TechTrackerWorld, operation: String) {
    let expected = parse_operation(&operation);
    let failures = world
        .collect_events()
        .iter()
        .filter(|e| matches!(e, StateEvent::RequestFailed { operation, .. } if *operation == expected))
        .count();
    assert_eq!(failures, 1, "events: {:?}", world.events);
}

#[then("no state change should have been announced")]
fn no_state_change(world: &mut TechTrackerWorld) {
    let changes: Vec<&StateEvent> = world
        .collect_events()
        .iter()
        .filter(|e| !matches!(e, StateEvent::RequestFailed { .. }))
        .collect();
    assert!(changes.is_empty(), "unexpected events: {changes:?}");
}
