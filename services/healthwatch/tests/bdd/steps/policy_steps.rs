//! BDD step definitions for delay policy feature

use std::time::Duration;

use cucumber::{given, then, when};

use healthwatch::config::PollingConfig;
use healthwatch::policy::DelayPolicy;

use crate::world::{parse_status, sample, HealthWorld};

#[given("the default polling configuration")]
fn default_polling(world: &mut HealthWorld) {
    world.polling = PollingConfig::default();
}

#[given(expr = "a backoff jitter of {float}")]
fn backoff_jitter(world: &mut HealthWorld, jitter: f64) {
    world.polling.backoff_jitter = jitter;
}

#[given(expr = "an error base of {int} ms and a backoff cap of {int} ms")]
fn error_base_and_cap(world: &mut HealthWorld, base: u64, max: u64) {
    world.polling.error_base_ms = base;
    world.polling.backoff_max_ms = max;
}

#[when(expr = "the next delay is computed for a(n) {word} sample after {int} failure(s)")]
fn compute_delay(world: &mut HealthWorld, status: String, failures: u32) {
    let policy = DelayPolicy::new(&world.polling);
    let sample = sample(parse_status(&status), Duration::ZERO);
    world.delay = Some(policy.next_delay(Some(&sample), failures));
}

#[when("the next delay is computed with no prior sample")]
fn compute_initial_delay(world: &mut HealthWorld) {
    let policy = DelayPolicy::new(&world.polling);
    world.delay = Some(policy.next_delay(None, 0));
}

#[then(expr = "the delay should be {int} ms")]
fn delay_is(world: &mut HealthWorld, expected: u64) {
    let delay = world.delay.expect("no delay computed");
    assert_eq!(delay, Duration::from_millis(expected));
}

#[then(expr = "the delay should be between {int} and {int} ms")]
fn delay_between(world: &mut HealthWorld, low: u64, high: u64) {
    let delay = world.delay.expect("no delay computed").as_millis() as u64;
    assert!(
        (low..=high).contains(&delay),
        "Expected delay in [{}, {}], got {}",
        low,
        high,
        delay
    );
}
