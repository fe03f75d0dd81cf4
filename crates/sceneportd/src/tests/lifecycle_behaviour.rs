//! Behavioural tests for the command server lifecycle.

use std::cell::RefCell;

use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use serde_json::json;

use super::support::{self, TestWorld};

type StepResult = Result<(), String>;

#[fixture]
fn world() -> RefCell<TestWorld> {
    support::world()
}

#[given("a configuration bound to an ephemeral port")]
fn given_ephemeral_port(world: &RefCell<TestWorld>) {
    let _ = world;
}

#[given("a configuration bound to an occupied port")]
fn given_occupied_port(world: &RefCell<TestWorld>) {
    world.borrow_mut().occupy_port();
}

#[given("a failing configuration loader")]
fn given_failing_loader(world: &RefCell<TestWorld>) {
    world.borrow_mut().use_failing_loader();
}

#[when("the server bootstraps")]
fn when_bootstraps(world: &RefCell<TestWorld>) {
    world.borrow_mut().bootstrap();
}

#[when("the server is started")]
fn when_started(world: &RefCell<TestWorld>) {
    world.borrow_mut().start();
}

#[when("the server is started again")]
fn when_started_again(world: &RefCell<TestWorld>) {
    world.borrow_mut().start();
}

#[when("the server is started on the same port")]
fn when_started_on_same_port(world: &RefCell<TestWorld>) {
    world.borrow_mut().start_on_last_port();
}

#[when("the server is stopped")]
fn when_stopped(world: &RefCell<TestWorld>) {
    world.borrow_mut().stop();
}

#[when("a client sends {command}")]
fn when_client_sends(world: &RefCell<TestWorld>, command: String) {
    world.borrow_mut().send(&command, json!({}));
}

#[when("a client creates a point named {name}")]
fn when_client_creates_point(world: &RefCell<TestWorld>, name: String) -> StepResult {
    let mut world = world.borrow_mut();
    world.create_point(&name);
    if world.response().is_success() {
        Ok(())
    } else {
        Err(format!("create_object failed: {:?}", world.response()))
    }
}

#[when("a client asks for the object named {name}")]
fn when_client_asks_for_object(world: &RefCell<TestWorld>, name: String) {
    world
        .borrow_mut()
        .send("get_object_info", json!({"name": name}));
}

#[then("the server is running")]
fn then_running(world: &RefCell<TestWorld>) {
    assert!(world.borrow().is_running(), "server should be running");
}

#[then("the server is not running")]
fn then_not_running(world: &RefCell<TestWorld>) {
    assert!(!world.borrow().is_running(), "server should be stopped");
}

#[then("starting failed")]
fn then_start_failed(world: &RefCell<TestWorld>) {
    assert!(
        world.borrow().start_error().is_some(),
        "start should have reported an error"
    );
}

#[then("bootstrap fails")]
fn then_bootstrap_fails(world: &RefCell<TestWorld>) {
    assert!(
        world.borrow().bootstrap_error().is_some(),
        "bootstrap succeeded unexpectedly"
    );
}

#[then("the response status is {status}")]
fn then_response_status(world: &RefCell<TestWorld>, status: String) -> StepResult {
    let world = world.borrow();
    let actual = if world.response().is_success() {
        "success"
    } else {
        "error"
    };
    if actual == status {
        Ok(())
    } else {
        Err(format!("expected {status}, got {:?}", world.response()))
    }
}

#[then("the response message is {message}")]
fn then_response_message(world: &RefCell<TestWorld>, message: String) {
    assert_eq!(
        world.borrow().response().message(),
        Some(message.as_str())
    );
}

#[then("the reporter recorded {first} before {second}")]
fn then_recorded_in_order(world: &RefCell<TestWorld>, first: String, second: String) -> StepResult {
    let names = world.borrow().reporter.event_names();
    let first_at = names.iter().position(|name| *name == first);
    let second_at = names.iter().rposition(|name| *name == second);
    match (first_at, second_at) {
        (Some(first_at), Some(second_at)) if first_at < second_at => Ok(()),
        _ => Err(format!("expected {first} before {second}, got {names:?}")),
    }
}

#[then("the reporter recorded exactly one {event} event")]
fn then_recorded_once(world: &RefCell<TestWorld>, event: String) {
    let names = world.borrow().reporter.event_names();
    let count = names.iter().filter(|name| **name == event).count();
    assert_eq!(count, 1, "expected one {event} in {names:?}");
}

#[scenario(
    path = "tests/features/server_lifecycle.feature",
    name = "A bootstrapped server answers commands until stopped"
)]
fn serves_until_stopped(world: RefCell<TestWorld>) {
    let _ = world;
}

#[scenario(
    path = "tests/features/server_lifecycle.feature",
    name = "Starting a running server keeps the first listener"
)]
fn double_start_is_a_no_op(world: RefCell<TestWorld>) {
    let _ = world;
}

#[scenario(
    path = "tests/features/server_lifecycle.feature",
    name = "An occupied port leaves the server stopped"
)]
fn occupied_port_fails_cleanly(world: RefCell<TestWorld>) {
    let _ = world;
}

#[scenario(
    path = "tests/features/server_lifecycle.feature",
    name = "The document survives a restart on the same port"
)]
fn restart_keeps_the_document(world: RefCell<TestWorld>) {
    let _ = world;
}

#[scenario(
    path = "tests/features/server_lifecycle.feature",
    name = "Unknown commands are reported without closing the server"
)]
fn unknown_commands_are_contained(world: RefCell<TestWorld>) {
    let _ = world;
}

#[scenario(
    path = "tests/features/server_lifecycle.feature",
    name = "A failing configuration stops bootstrap"
)]
fn failing_configuration(world: RefCell<TestWorld>) {
    let _ = world;
}
