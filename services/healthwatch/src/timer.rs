//! A single re-armable deadline.
//!
//! Arming always replaces whatever was pending, so there is never more
//! than one scheduled wake-up.

use std::time::Duration;

use tokio::time::Instant;

#[derive(Debug, Default)]
pub struct RearmTimer {
    deadline: Option<Instant>,
    armed_for: Option<Duration>,
}

impl RearmTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancel any pending deadline and arm a new one `delay` from now
    pub fn arm(&mut self, delay: Duration) {
        self.deadline = Some(Instant::now() + delay);
        self.armed_for = Some(delay);
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
        self.armed_for = None;
    }

    /// The delay the pending deadline was armed with
    pub fn armed_for(&self) -> Option<Duration> {
        self.armed_for
    }

    pub fn remaining(&self) -> Option<Duration> {
        self.deadline
            .map(|deadline| deadline.saturating_duration_since(Instant::now()))
    }

    /// Resolves when the pending deadline passes; never resolves while
    /// disarmed. Does not disarm the timer.
    pub async fn fired(&self) {
        match self.deadline {
            Some(deadline) => tokio::time::sleep_until(deadline).await,
            None => std::future::pending().await,
        }
    }
}
