//! BDD step definitions for suspend and resume feature

use std::time::Duration;

use cucumber::{then, when};

use healthwatch::machine::SUSPENDED_RECHECK;

use crate::world::{parse_event, HealthWorld};

#[when(expr = "the host becomes {word}")]
fn host_becomes(world: &mut HealthWorld, event: String) {
    world.presence(parse_event(&event));
}

#[when("the host window gains focus")]
fn host_focus(world: &mut HealthWorld) {
    world.presence(parse_event("focus"));
}

#[then("probing should be suspended")]
fn suspended(world: &mut HealthWorld) {
    assert!(world.machine().suspended());
}

#[then("probing should not be suspended")]
fn not_suspended(world: &mut HealthWorld) {
    assert!(!world.machine().suspended());
}

#[then("only the suspended recheck should be armed")]
fn recheck_armed(world: &mut HealthWorld) {
    assert_eq!(world.armed_delays.last().copied(), Some(SUSPENDED_RECHECK));
    let deadline = world.deadline.expect("no timer armed");
    assert!(deadline - world.now <= SUSPENDED_RECHECK);
}

#[then(expr = "no probe should have run in the last {int} second(s)")]
fn no_recent_probe(world: &mut HealthWorld, seconds: u64) {
    let since = world.now.saturating_sub(Duration::from_secs(seconds));
    assert_eq!(world.probes_since(since), 0);
}

#[then("a probe should have run just now")]
fn probe_just_now(world: &mut HealthWorld) {
    assert_eq!(world.probe_times.last().copied(), Some(world.now));
}
