//! Scheduler state machine.
//!
//! Synchronous and clock-free: every input returns a [`Directive`] telling
//! the owning task what to do next. The async side lives in
//! [`scheduler`](crate::scheduler).
//!
//! ```text
//!   Idle ──start──▶ Probing ──record──▶ Armed ──timer──▶ Probing ...
//!                      ▲                  │
//!     manual ping ─────┘                  └── hidden/offline ──▶ Suspended (30 s recheck)
//! ```

use std::time::Duration;

use crate::config::PollingConfig;
use crate::history::SampleHistory;
use crate::policy::DelayPolicy;
use crate::presence::{Presence, PresenceEvent};
use crate::sample::HealthSample;
use crate::state::{HealthSnapshot, SchedulerPhase};

/// Recheck interval while hidden or offline
pub const SUSPENDED_RECHECK: Duration = Duration::from_secs(30);

/// What the owner of the machine must do next
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Directive {
    /// Start a probe now
    StartProbe,
    /// Cancel any pending timer and arm one for this delay
    Arm(Duration),
    /// Nothing to do until the next input
    Wait,
}

/// Result of recording a probe's sample
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Recorded {
    pub directive: Directive,
    /// The failure counter just went from 0 to 1
    pub notify: bool,
}

#[derive(Debug)]
pub struct SchedulerMachine {
    policy: DelayPolicy,
    probe_on_start: bool,
    history: SampleHistory,
    fail_count: u32,
    fetching: bool,
    ping_queued: bool,
    presence: Presence,
    open: bool,
}

impl SchedulerMachine {
    pub fn new(policy: DelayPolicy, probe_on_start: bool) -> Self {
        Self {
            policy,
            probe_on_start,
            history: SampleHistory::new(),
            fail_count: 0,
            fetching: false,
            ping_queued: false,
            presence: Presence::default(),
            open: false,
        }
    }

    pub fn from_config(config: &PollingConfig) -> Self {
        Self::new(DelayPolicy::new(config), config.probe_on_start)
    }

    /// First input after construction
    pub fn start(&mut self) -> Directive {
        if self.probe_on_start {
            self.run()
        } else {
            Directive::Arm(self.policy.next_delay(None, 0))
        }
    }

    /// Timer fired: probe unless suspended
    pub fn run(&mut self) -> Directive {
        if self.fetching {
            return Directive::Wait;
        }
        if self.presence.suspended() {
            tracing::debug!(
                "Probe skipped (hidden={}, online={}), rechecking in {:?}",
                self.presence.hidden,
                self.presence.online,
                SUSPENDED_RECHECK
            );
            return Directive::Arm(SUSPENDED_RECHECK);
        }
        self.fetching = true;
        Directive::StartProbe
    }

    /// Reset backoff and probe immediately. A ping that arrives while a
    /// probe is outstanding runs as soon as that probe is recorded.
    pub fn manual_ping(&mut self) -> Directive {
        self.fail_count = 0;
        if self.fetching {
            self.ping_queued = true;
            return Directive::Wait;
        }
        self.run()
    }

    /// Record the outcome of the outstanding probe
    pub fn record(&mut self, sample: HealthSample) -> Recorded {
        self.fetching = false;

        let preceding_failures = self.fail_count;
        let failed = sample.is_failure();
        self.fail_count = if failed {
            self.fail_count.saturating_add(1)
        } else {
            0
        };
        let notify = failed && self.fail_count == 1;

        let delay = self.policy.next_delay(Some(&sample), preceding_failures);
        self.history.push(sample);

        let directive = if std::mem::take(&mut self.ping_queued) {
            self.manual_ping()
        } else {
            Directive::Arm(delay)
        };

        Recorded { directive, notify }
    }

    /// Record a host signal. Returns true when it should be handled as a
    /// manual ping.
    pub fn presence(&mut self, event: PresenceEvent) -> bool {
        self.presence.apply(event)
    }

    /// Forget the outstanding probe and any queued ping. Recorded samples
    /// and the failure count are kept.
    pub fn teardown(&mut self) {
        self.fetching = false;
        self.ping_queued = false;
    }

    pub fn set_open(&mut self, open: bool) {
        self.open = open;
    }

    pub fn latest(&self) -> Option<&HealthSample> {
        self.history.latest()
    }

    pub fn history(&self) -> &SampleHistory {
        &self.history
    }

    pub fn fail_count(&self) -> u32 {
        self.fail_count
    }

    pub fn fetching(&self) -> bool {
        self.fetching
    }

    pub fn open(&self) -> bool {
        self.open
    }

    pub fn suspended(&self) -> bool {
        self.presence.suspended()
    }

    pub fn policy(&self) -> &DelayPolicy {
        &self.policy
    }

    /// `armed_for` is the delay of the pending timer, if any
    pub fn snapshot(&self, armed_for: Option<Duration>, ui_enabled: bool) -> HealthSnapshot {
        let phase = if self.fetching {
            SchedulerPhase::Probing
        } else if armed_for.is_none() {
            SchedulerPhase::Idle
        } else if self.suspended() {
            SchedulerPhase::Suspended
        } else {
            SchedulerPhase::Armed
        };

        HealthSnapshot {
            latest: self.latest().cloned(),
            history: self.history.all(),
            fetching: self.fetching,
            open: self.open,
            fail_count: self.fail_count,
            suspended: self.suspended(),
            phase,
            next_delay_ms: armed_for.map(|d| d.as_millis() as u64),
            ui_enabled,
        }
    }
}
