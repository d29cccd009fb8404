//! Error types for the healthwatch service

/// Errors that can occur around the polling engine.
///
/// Probe failures are not represented here: they become
/// [`HealthSample`](crate::sample::HealthSample)s.
#[derive(Debug, thiserror::Error)]
pub enum HealthWatchError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Notifier error: {0}")]
    Notifier(String),

    #[error("Dashboard error: {0}")]
    Dashboard(String),

    #[error("Health scheduler is not running")]
    SchedulerStopped,
}

/// Result type alias for healthwatch operations
pub type Result<T> = std::result::Result<T, HealthWatchError>;
