//! Health samples and their classification

use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

/// One classified result of a single health probe
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthSample {
    pub timestamp_epoch_ms: u64,
    pub ok: bool,
    /// Backend-reported database health, `None` when the backend did not say
    pub db_ok: Option<bool>,
    pub api_latency_ms: Option<f64>,
    pub db_latency_ms: Option<f64>,
    pub server_version: Option<String>,
}

impl HealthSample {
    /// A sample for a probe that failed at the transport or HTTP layer
    pub fn failure(timestamp_epoch_ms: u64) -> Self {
        Self {
            timestamp_epoch_ms,
            ok: false,
            db_ok: Some(false),
            api_latency_ms: None,
            db_latency_ms: None,
            server_version: None,
        }
    }

    pub fn status(&self) -> HealthStatus {
        match (self.ok, self.db_ok) {
            (false, _) => HealthStatus::Error,
            (true, Some(false)) => HealthStatus::Degraded,
            (true, _) => HealthStatus::Healthy,
        }
    }

    pub fn is_failure(&self) -> bool {
        self.status() == HealthStatus::Error
    }
}

/// Wall-clock milliseconds since the Unix epoch, for sample timestamps
pub fn current_epoch_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

/// Derived health classification of a sample
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthStatus {
    Healthy,
    Degraded,
    Error,
}

impl fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HealthStatus::Healthy => write!(f, "Healthy"),
            HealthStatus::Degraded => write!(f, "Degraded"),
            HealthStatus::Error => write!(f, "Error"),
        }
    }
}
