//! BDD step definitions for the status update feature

use cucumber::gherkin::Step;
use cucumber::{given, then, when};

use tech_tracker::client::UPDATE_PATH;

use crate::world::TechTrackerWorld;

#[given(expr = "the server rejects updates with status {int}")]
fn server_rejects_updates(world: &mut TechTrackerWorld, status: u16) {
    world.api().with_state(|s| s.update_status = Some(status));
}

#[when(expr = "{string} is set to {string}")]
async fn set_status(world: &mut TechTrackerWorld, name: String, status: String) {
    let client = world.client();
    world.last_result = Some(client.update_status(&name, &status).await);
}

#[then("the server should have received the update body:")]
fn update_body(world: &mut TechTrackerWorld, step: &Step) {
    let expected = step.docstring.as_ref().expect("expected body").trim();
    let requests = world.api().requests_to("POST", UPDATE_PATH);
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].body.as_deref(), Some(expected));
}

#[then("no update should have been sent")]
fn no_update_sent(world: &mut TechTrackerWorld) {
    assert!(world.api().requests_to("POST", UPDATE_PATH).is_empty());
}
