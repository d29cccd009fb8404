//! Configuration types for the healthwatch service

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const ENV_INTERVAL_OK: &str = "HEALTH_INTERVAL_OK";
pub const ENV_INTERVAL_DEGRADED: &str = "HEALTH_INTERVAL_DEGRADED";
pub const ENV_INTERVAL_ERROR: &str = "HEALTH_INTERVAL_ERROR";
pub const ENV_BACKOFF_MAX_MS: &str = "HEALTH_BACKOFF_MAX_MS";
pub const ENV_BACKOFF_JITTER: &str = "HEALTH_BACKOFF_JITTER";
pub const ENV_ENDPOINT_URL: &str = "HEALTH_ENDPOINT_URL";
pub const ENV_UI: &str = "HEALTH_UI";

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub probe: ProbeConfig,
    #[serde(default)]
    pub polling: PollingConfig,
    #[serde(default)]
    pub dashboard: DashboardConfig,
    /// Whether UI collaborators should render the health drawer and badge
    #[serde(default)]
    pub ui_enabled: bool,
}

/// Where and how to probe
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbeConfig {
    #[serde(default = "default_endpoint_url")]
    pub endpoint_url: String,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            endpoint_url: default_endpoint_url(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl ProbeConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Adaptive polling cadence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PollingConfig {
    #[serde(default = "default_healthy_interval_ms")]
    pub healthy_interval_ms: u64,
    #[serde(default = "default_degraded_interval_ms")]
    pub degraded_interval_ms: u64,
    #[serde(default = "default_error_base_ms")]
    pub error_base_ms: u64,
    #[serde(default = "default_backoff_max_ms")]
    pub backoff_max_ms: u64,
    /// Fraction in `(0, 1]`; anything else disables jitter
    #[serde(default)]
    pub backoff_jitter: f64,
    #[serde(default = "default_true")]
    pub probe_on_start: bool,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            healthy_interval_ms: default_healthy_interval_ms(),
            degraded_interval_ms: default_degraded_interval_ms(),
            error_base_ms: default_error_base_ms(),
            backoff_max_ms: default_backoff_max_ms(),
            backoff_jitter: 0.0,
            probe_on_start: true,
        }
    }
}

/// Dashboard configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_dashboard_port")]
    pub port: u16,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            port: default_dashboard_port(),
        }
    }
}

impl Config {
    /// Apply environment overrides read through `lookup`.
    ///
    /// Numeric variables that are empty, unparseable, non-finite or negative
    /// leave the current value untouched.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let millis = |name: &str, current: &mut u64| {
            if let Some(value) = env_number(name, &lookup) {
                tracing::debug!("{} overrides {} -> {}", name, current, value);
                *current = value.round() as u64;
            }
        };
        millis(ENV_INTERVAL_OK, &mut self.polling.healthy_interval_ms);
        millis(ENV_INTERVAL_DEGRADED, &mut self.polling.degraded_interval_ms);
        millis(ENV_INTERVAL_ERROR, &mut self.polling.error_base_ms);
        millis(ENV_BACKOFF_MAX_MS, &mut self.polling.backoff_max_ms);

        if let Some(jitter) = env_number(ENV_BACKOFF_JITTER, &lookup) {
            self.polling.backoff_jitter = jitter;
        }

        if let Some(url) = lookup(ENV_ENDPOINT_URL).filter(|u| !u.trim().is_empty()) {
            self.probe.endpoint_url = url.trim().to_string();
        }

        if let Some(flag) = lookup(ENV_UI) {
            self.ui_enabled = flag.trim().eq_ignore_ascii_case("on");
        }
    }

    /// Apply overrides from the process environment
    pub fn apply_process_env(&mut self) {
        self.apply_env(|name| std::env::var(name).ok());
    }
}

fn env_number<F>(name: &str, lookup: &F) -> Option<f64>
where
    F: Fn(&str) -> Option<String>,
{
    let raw = lookup(name)?;
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    match raw.parse::<f64>() {
        Ok(n) if n.is_finite() && n >= 0.0 => Some(n),
        _ => {
            tracing::warn!("Ignoring invalid value {:?} for {}", raw, name);
            None
        }
    }
}

fn default_endpoint_url() -> String {
    "http://localhost:3000/api/health".to_string()
}

fn default_timeout_ms() -> u64 {
    10_000
}

fn default_healthy_interval_ms() -> u64 {
    60_000
}

fn default_degraded_interval_ms() -> u64 {
    15_000
}

fn default_error_base_ms() -> u64 {
    5_000
}

fn default_backoff_max_ms() -> u64 {
    60_000
}

fn default_true() -> bool {
    true
}

fn default_dashboard_port() -> u16 {
    11120
}

/// Load configuration from a JSON file
pub fn load_config(path: &Path) -> crate::Result<Config> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        crate::HealthWatchError::Config(format!("Failed to read config file {:?}: {}", path, e))
    })?;
    let config: Config = serde_json::from_str(&content)?;
    Ok(config)
}
