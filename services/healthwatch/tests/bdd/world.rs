//! BDD test world for healthwatch
//!
//! Scheduling scenarios drive a [`SchedulerMachine`] against a simulated
//! clock: one pending deadline, probes that complete instantly unless held.

use std::collections::VecDeque;
use std::time::Duration;

use cucumber::World;
use healthwatch::config::PollingConfig;
use healthwatch::machine::{Directive, SchedulerMachine};
use healthwatch::presence::PresenceEvent;
use healthwatch::sample::{HealthSample, HealthStatus};

#[derive(Debug, Default, World)]
pub struct HealthWorld {
    pub polling: PollingConfig,

    // Delay policy
    pub delay: Option<Duration>,

    // Scheduling
    pub machine: Option<SchedulerMachine>,
    pub now: Duration,
    pub deadline: Option<Duration>,
    pub outcomes: VecDeque<HealthStatus>,
    pub hold_probes: bool,
    pub probe_in_flight: bool,
    pub probe_times: Vec<Duration>,
    pub armed_delays: Vec<Duration>,
    pub notifications: u32,
}

pub fn parse_status(s: &str) -> HealthStatus {
    match s.trim() {
        "Healthy" => HealthStatus::Healthy,
        "Degraded" => HealthStatus::Degraded,
        "Error" => HealthStatus::Error,
        other => panic!("Unknown status: {}", other),
    }
}

pub fn parse_event(s: &str) -> PresenceEvent {
    serde_json::from_value(serde_json::Value::String(s.to_string()))
        .unwrap_or_else(|_| panic!("Unknown presence event: {}", s))
}

/// A sample classifying as `status`, stamped with `at`
pub fn sample(status: HealthStatus, at: Duration) -> HealthSample {
    let timestamp = at.as_millis() as u64;
    match status {
        HealthStatus::Error => HealthSample::failure(timestamp),
        other => HealthSample {
            timestamp_epoch_ms: timestamp,
            ok: true,
            db_ok: Some(other == HealthStatus::Healthy),
            api_latency_ms: Some(20.0),
            db_latency_ms: Some(4.0),
            server_version: None,
        },
    }
}

impl HealthWorld {
    pub fn machine(&mut self) -> &mut SchedulerMachine {
        self.machine.as_mut().expect("scheduler not started")
    }

    pub fn start(&mut self) {
        let mut machine = SchedulerMachine::from_config(&self.polling);
        let directive = machine.start();
        self.machine = Some(machine);
        self.apply(directive);
    }

    pub fn apply(&mut self, directive: Directive) {
        match directive {
            Directive::StartProbe => {
                self.deadline = None;
                self.probe_times.push(self.now);
                self.probe_in_flight = true;
                if !self.hold_probes {
                    self.complete_probe();
                }
            }
            Directive::Arm(delay) => {
                self.deadline = Some(self.now + delay);
                self.armed_delays.push(delay);
            }
            Directive::Wait => {}
        }
    }

    pub fn complete_probe(&mut self) {
        assert!(self.probe_in_flight, "no probe in flight");
        self.probe_in_flight = false;

        let status = self.outcomes.pop_front().unwrap_or(HealthStatus::Healthy);
        let now = self.now;
        let recorded = self.machine().record(sample(status, now));
        if recorded.notify {
            self.notifications += 1;
        }
        self.deadline = None;
        self.apply(recorded.directive);
    }

    /// Move the clock forward, firing every deadline that falls due
    pub fn advance(&mut self, by: Duration) {
        let target = self.now + by;
        while let Some(deadline) = self.deadline.filter(|d| *d <= target) {
            self.now = deadline;
            self.deadline = None;
            let directive = self.machine().run();
            self.apply(directive);
        }
        self.now = target;
    }

    pub fn manual_ping(&mut self) {
        self.deadline = None;
        let directive = self.machine().manual_ping();
        self.apply(directive);
    }

    pub fn presence(&mut self, event: PresenceEvent) {
        if self.machine().presence(event) {
            self.manual_ping();
        }
    }

    pub fn probes_since(&self, since: Duration) -> usize {
        self.probe_times.iter().filter(|t| **t >= since).count()
    }
}
