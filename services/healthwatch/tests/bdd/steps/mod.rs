//! BDD step definitions for healthwatch

pub mod ping_steps;
pub mod policy_steps;
pub mod presence_steps;
pub mod scheduling_steps;
