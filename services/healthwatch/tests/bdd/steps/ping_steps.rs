//! BDD step definitions for manual ping feature

use cucumber::when;

use crate::world::HealthWorld;

#[when("the user requests a manual ping")]
fn manual_ping(world: &mut HealthWorld) {
    world.manual_ping();
}

#[when(expr = "the user requests {int} manual pings")]
fn manual_pings(world: &mut HealthWorld, count: usize) {
    for _ in 0..count {
        world.manual_ping();
    }
}
