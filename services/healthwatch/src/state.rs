//! Read-only views of scheduler state handed to consumers

use serde::{Deserialize, Serialize};

use crate::sample::HealthSample;

/// Where the scheduler is in its probe cycle
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SchedulerPhase {
    /// No timer and no probe: before start or after teardown
    #[default]
    Idle,
    Probing,
    Armed,
    /// Hidden or offline, only the recheck timer runs
    Suspended,
}

/// Snapshot of everything UI collaborators may read
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HealthSnapshot {
    pub latest: Option<HealthSample>,
    /// Newest first, at most [`HISTORY_CAPACITY`](crate::history::HISTORY_CAPACITY) entries
    pub history: Vec<HealthSample>,
    pub fetching: bool,
    pub open: bool,
    pub fail_count: u32,
    pub suspended: bool,
    pub phase: SchedulerPhase,
    /// Delay the pending timer was armed with
    pub next_delay_ms: Option<u64>,
    pub ui_enabled: bool,
}
