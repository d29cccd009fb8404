//! Scheduler task and the consumer-facing handle.
//!
//! One task owns the [`SchedulerMachine`], the single [`RearmTimer`] and at
//! most one in-flight probe. Consumers talk to it through a
//! [`SchedulerHandle`]: actions go in over a command channel, state comes
//! out as [`HealthSnapshot`]s on a watch channel.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::machine::{Directive, SchedulerMachine};
use crate::notifier::{Notification, Notifier};
use crate::presence::{PresenceEvent, PresenceListener};
use crate::prober::Prober;
use crate::sample::HealthSample;
use crate::state::HealthSnapshot;
use crate::timer::RearmTimer;

type ProbeFuture = Pin<Box<dyn Future<Output = HealthSample> + Send>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    ManualPing,
    Presence(PresenceEvent),
    SetOpen(bool),
}

pub struct HealthScheduler {
    machine: SchedulerMachine,
    prober: Arc<dyn Prober>,
    notifiers: Vec<Arc<dyn Notifier>>,
    timer: RearmTimer,
    in_flight: Option<ProbeFuture>,
    commands: mpsc::UnboundedReceiver<Command>,
    snapshots: watch::Sender<HealthSnapshot>,
    ui_enabled: bool,
    cancel: CancellationToken,
}

impl HealthScheduler {
    pub fn new(
        machine: SchedulerMachine,
        prober: Arc<dyn Prober>,
        notifiers: Vec<Arc<dyn Notifier>>,
        ui_enabled: bool,
        cancel: CancellationToken,
    ) -> (Self, SchedulerHandle) {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let initial = machine.snapshot(None, ui_enabled);
        let (snapshot_tx, snapshot_rx) = watch::channel(initial);

        let scheduler = Self {
            machine,
            prober,
            notifiers,
            timer: RearmTimer::new(),
            in_flight: None,
            commands: command_rx,
            snapshots: snapshot_tx,
            ui_enabled,
            cancel,
        };
        let handle = SchedulerHandle {
            commands: command_tx,
            snapshots: snapshot_rx,
        };
        (scheduler, handle)
    }

    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }

    /// Drive the probe cycle until the cancellation token fires
    pub async fn run(mut self) {
        tracing::info!("Health scheduler started");

        let directive = self.machine.start();
        self.apply(directive);
        self.publish();

        loop {
            tokio::select! {
                _ = self.cancel.cancelled() => {
                    tracing::debug!("Health scheduler cancelled");
                    break;
                }
                Some(command) = self.commands.recv() => {
                    self.handle_command(command);
                }
                sample = next_sample(&mut self.in_flight) => {
                    self.complete_probe(sample);
                }
                _ = self.timer.fired() => {
                    self.timer.cancel();
                    let directive = self.machine.run();
                    self.apply(directive);
                }
            }
            self.publish();
        }

        self.timer.cancel();
        self.in_flight = None;
        self.machine.teardown();
        self.publish();
        tracing::info!("Health scheduler stopped");
    }

    fn handle_command(&mut self, command: Command) {
        tracing::debug!("Scheduler command: {:?}", command);
        match command {
            Command::ManualPing => self.manual_ping(),
            Command::Presence(event) => {
                if self.machine.presence(event) {
                    self.manual_ping();
                }
            }
            Command::SetOpen(open) => self.machine.set_open(open),
        }
    }

    fn manual_ping(&mut self) {
        if let Some(remaining) = self.timer.remaining() {
            tracing::debug!("Manual ping replaces check due in {:?}", remaining);
        }
        self.timer.cancel();
        let directive = self.machine.manual_ping();
        self.apply(directive);
    }

    fn complete_probe(&mut self, sample: HealthSample) {
        self.in_flight = None;

        let timestamp = sample.timestamp_epoch_ms;
        let status = sample.status();
        let recorded = self.machine.record(sample);

        tracing::debug!(
            "Recorded {} sample (fail_count={}), next: {:?}",
            status,
            self.machine.fail_count(),
            recorded.directive
        );

        // Notifiers must never block the scheduler loop
        if recorded.notify {
            let notifiers = self.notifiers.clone();
            let notification = Notification::health_check_failed(timestamp);
            tokio::spawn(async move {
                dispatch(&notifiers, &notification).await;
            });
        }

        self.timer.cancel();
        self.apply(recorded.directive);
    }

    fn apply(&mut self, directive: Directive) {
        match directive {
            Directive::StartProbe => {
                self.timer.cancel();
                let prober = Arc::clone(&self.prober);
                let probe: ProbeFuture = Box::pin(async move { prober.probe().await });
                self.in_flight = Some(probe);
            }
            Directive::Arm(delay) => {
                tracing::debug!("Next health check in {:?}", delay);
                self.timer.arm(delay);
            }
            Directive::Wait => {}
        }
    }

    fn publish(&self) {
        let snapshot = self
            .machine
            .snapshot(self.timer.armed_for(), self.ui_enabled);
        self.snapshots.send_replace(snapshot);
    }
}

async fn dispatch(notifiers: &[Arc<dyn Notifier>], notification: &Notification) {
    for notifier in notifiers {
        if let Err(e) = notifier.notify(notification).await {
            tracing::warn!(
                "Notification via '{}' failed: {}",
                notifier.type_name(),
                e
            );
        }
    }
}

async fn next_sample(in_flight: &mut Option<ProbeFuture>) -> HealthSample {
    match in_flight {
        Some(probe) => probe.as_mut().await,
        None => std::future::pending().await,
    }
}

/// Cheap, cloneable access to the running scheduler
#[derive(Debug, Clone)]
pub struct SchedulerHandle {
    commands: mpsc::UnboundedSender<Command>,
    snapshots: watch::Receiver<HealthSnapshot>,
}

impl SchedulerHandle {
    fn send(&self, command: Command) -> crate::Result<()> {
        self.commands
            .send(command)
            .map_err(|_| crate::HealthWatchError::SchedulerStopped)
    }

    /// Reset backoff and probe now
    pub fn manual_ping(&self) -> crate::Result<()> {
        self.send(Command::ManualPing)
    }

    /// Show or hide the health panel
    pub fn set_open(&self, open: bool) -> crate::Result<()> {
        self.send(Command::SetOpen(open))
    }

    pub fn presence(&self, event: PresenceEvent) -> crate::Result<()> {
        self.send(Command::Presence(event))
    }

    pub fn snapshot(&self) -> HealthSnapshot {
        self.snapshots.borrow().clone()
    }

    pub fn latest(&self) -> Option<HealthSample> {
        self.snapshots.borrow().latest.clone()
    }

    pub fn history(&self) -> Vec<HealthSample> {
        self.snapshots.borrow().history.clone()
    }

    pub fn fetching(&self) -> bool {
        self.snapshots.borrow().fetching
    }

    pub fn open(&self) -> bool {
        self.snapshots.borrow().open
    }

    /// Receive every published snapshot
    pub fn subscribe(&self) -> watch::Receiver<HealthSnapshot> {
        self.snapshots.clone()
    }

    pub fn is_running(&self) -> bool {
        !self.commands.is_closed()
    }
}

impl PresenceListener for SchedulerHandle {
    fn on_presence(&self, event: PresenceEvent) {
        if let Err(e) = self.presence(event) {
            tracing::debug!("Dropped presence event {}: {}", event, e);
        }
    }
}
