//! Healthwatch - adaptive backend health polling
//!
//! Probes a backend health endpoint on a cadence that follows the observed
//! health: relaxed while healthy, tighter while degraded, exponential
//! backoff while failing. Probing pauses while the host is hidden or
//! offline and can be forced at any time.

pub mod config;
pub mod dashboard;
pub mod error;
pub mod history;
pub mod io;
pub mod machine;
pub mod notifier;
pub mod policy;
pub mod presence;
pub mod prober;
pub mod sample;
pub mod scheduler;
pub mod state;
pub mod timer;

pub use config::{load_config, Config};
pub use error::{HealthWatchError, Result};
pub use presence::{PresenceEvent, PresenceListener};
pub use sample::{HealthSample, HealthStatus};
pub use scheduler::SchedulerHandle;
pub use state::HealthSnapshot;

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::io::ReqwestHttpClient;
use crate::machine::SchedulerMachine;
use crate::notifier::{LogNotifier, Notifier};
use crate::prober::{HttpProber, Prober};
use crate::scheduler::HealthScheduler;

/// Build the probe pipeline from `config` and start the scheduler task.
/// The task stops when `cancel` fires.
pub fn spawn_scheduler(
    config: &Config,
    cancel: CancellationToken,
) -> Result<(SchedulerHandle, JoinHandle<()>)> {
    let http: Arc<dyn io::HttpClient> =
        Arc::new(ReqwestHttpClient::with_timeout(config.probe.timeout())?);
    let prober = HttpProber::new(config.probe.endpoint_url.clone(), http);
    tracing::info!("Probing {}", prober.url());
    let prober: Arc<dyn Prober> = Arc::new(prober);
    let notifiers: Vec<Arc<dyn Notifier>> = vec![Arc::new(LogNotifier)];

    let machine = SchedulerMachine::from_config(&config.polling);
    tracing::debug!("Delay policy: {:?}", machine.policy());

    let (scheduler, handle) =
        HealthScheduler::new(machine, prober, notifiers, config.ui_enabled, cancel);
    Ok((handle, scheduler.spawn()))
}

/// Run the healthwatch service with the given configuration
pub async fn run(config: Config) -> Result<()> {
    let cancel = CancellationToken::new();

    let (handle, scheduler_task) = spawn_scheduler(&config, cancel.clone())?;

    // Setup shutdown handler
    let cancel_for_signal = cancel.clone();
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for ctrl-c: {}", e);
            return;
        }
        tracing::info!("Shutdown signal received");
        cancel_for_signal.cancel();
    });

    // Start dashboard if enabled
    if config.dashboard.enabled {
        let dashboard_port = config.dashboard.port;
        let addr = SocketAddr::from(([0, 0, 0, 0], dashboard_port));
        let cancel_for_dashboard = cancel.clone();

        tokio::spawn(async move {
            if let Err(e) = dashboard::serve(handle, addr, cancel_for_dashboard).await {
                tracing::error!(
                    "Dashboard on port {} failed: {}. Continuing without dashboard.",
                    dashboard_port,
                    e
                );
            }
        });
    }

    tracing::info!("Healthwatch started");

    // Blocks until cancelled
    if let Err(e) = scheduler_task.await {
        tracing::error!("Health scheduler task failed: {}", e);
    }
    tracing::info!("Healthwatch stopped");

    Ok(())
}
