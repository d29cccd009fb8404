//! Notifier trait for surfacing health alerts to the user

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Message sent on the first failure of a failure streak
pub const HEALTH_CHECK_FAILED: &str = "Health check failed";

/// A notification to be sent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub message: String,
    pub timestamp_epoch_ms: u64,
}

impl Notification {
    pub fn health_check_failed(timestamp_epoch_ms: u64) -> Self {
        Self {
            message: HEALTH_CHECK_FAILED.to_string(),
            timestamp_epoch_ms,
        }
    }
}

/// Trait for sending notifications
#[async_trait]
pub trait Notifier: Send + Sync + std::fmt::Debug {
    /// Get the notifier type name (e.g. "log")
    fn type_name(&self) -> &str;

    /// Send a notification
    async fn notify(&self, notification: &Notification) -> crate::Result<()>;
}

/// Emits notifications as `warn` events
#[derive(Debug, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    fn type_name(&self) -> &str {
        "log"
    }

    async fn notify(&self, notification: &Notification) -> crate::Result<()> {
        tracing::warn!("{}", notification.message);
        Ok(())
    }
}
