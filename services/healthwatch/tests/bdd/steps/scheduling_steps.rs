//! BDD step definitions for scheduling feature

use std::time::Duration;

use cucumber::{given, then, when};

use healthwatch::history::HISTORY_CAPACITY;

use crate::world::{parse_status, HealthWorld};

#[given(expr = "the backend will report {string}")]
fn backend_reports(world: &mut HealthWorld, statuses: String) {
    world.outcomes = statuses.split(',').map(parse_status).collect();
}

#[given("the scheduler waits before its first probe")]
fn delayed_start(world: &mut HealthWorld) {
    world.polling.probe_on_start = false;
}

#[given("probes take a while to complete")]
fn hold_probes(world: &mut HealthWorld) {
    world.hold_probes = true;
}

#[when("the scheduler starts")]
fn scheduler_starts(world: &mut HealthWorld) {
    world.start();
}

#[when(expr = "{int} second(s) pass(es)")]
fn seconds_pass(world: &mut HealthWorld, seconds: u64) {
    world.advance(Duration::from_secs(seconds));
}

#[when(expr = "{int} minute(s) pass(es)")]
fn minutes_pass(world: &mut HealthWorld, minutes: u64) {
    world.advance(Duration::from_secs(minutes * 60));
}

#[when("the probe in flight completes")]
fn probe_completes(world: &mut HealthWorld) {
    world.complete_probe();
}

#[then(expr = "the armed delays should be {string}")]
fn armed_delays(world: &mut HealthWorld, expected: String) {
    let expected: Vec<u64> = expected
        .split(',')
        .map(|d| d.trim().parse().expect("delay in ms"))
        .collect();
    let actual: Vec<u64> = world
        .armed_delays
        .iter()
        .take(expected.len())
        .map(|d| d.as_millis() as u64)
        .collect();
    assert_eq!(actual, expected);
}

#[then(expr = "the next probe should be due in {int} ms")]
fn next_probe_due(world: &mut HealthWorld, expected: u64) {
    let deadline = world.deadline.expect("no timer armed");
    assert_eq!(deadline - world.now, Duration::from_millis(expected));
}

#[then(expr = "{int} probe(s) should have run")]
fn probes_run(world: &mut HealthWorld, expected: usize) {
    assert_eq!(world.probe_times.len(), expected);
}

#[then(expr = "{int} notification(s) should have been sent")]
fn notifications_sent(world: &mut HealthWorld, expected: u32) {
    assert_eq!(world.notifications, expected);
}

#[then(expr = "the latest sample should be {word}")]
fn latest_sample(world: &mut HealthWorld, status: String) {
    let latest = world.machine().latest().map(|s| s.status());
    assert_eq!(latest, Some(parse_status(&status)));
}

#[then("the history should be full, newest first")]
fn history_full(world: &mut HealthWorld) {
    let history = world.machine().history().all();
    assert_eq!(history.len(), HISTORY_CAPACITY);
    assert!(history
        .windows(2)
        .all(|w| w[0].timestamp_epoch_ms > w[1].timestamp_epoch_ms));
    let newest = world.probe_times.last().expect("no probes").as_millis() as u64;
    assert_eq!(history[0].timestamp_epoch_ms, newest);
}

#[then(expr = "the failure count should be {int}")]
fn failure_count(world: &mut HealthWorld, expected: u32) {
    assert_eq!(world.machine().fail_count(), expected);
}

#[then("a probe should be in flight")]
fn probe_in_flight(world: &mut HealthWorld) {
    assert!(world.probe_in_flight);
    assert!(world.machine().fetching());
}
