//! Prober: one health check against the backend endpoint

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use tokio::time::Instant;

use crate::io::HttpClient;
use crate::sample::{current_epoch_ms, HealthSample};

/// Recognized fields of the health endpoint's JSON body
#[derive(Debug, Deserialize)]
struct HealthResponse {
    #[serde(rename = "dbOk")]
    db_ok: Option<bool>,
    latency_ms: Option<f64>,
    #[serde(rename = "dbLatencyMs")]
    db_latency_ms: Option<f64>,
    #[serde(rename = "serverVersion")]
    server_version: Option<String>,
}

/// Performs a single health probe. Never fails: every outcome is a sample.
#[async_trait]
pub trait Prober: Send + Sync + std::fmt::Debug {
    async fn probe(&self) -> HealthSample;
}

/// Probes a fixed URL over HTTP
pub struct HttpProber {
    url: String,
    http: Arc<dyn HttpClient>,
}

impl std::fmt::Debug for HttpProber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpProber").field("url", &self.url).finish()
    }
}

impl HttpProber {
    pub fn new(url: impl Into<String>, http: Arc<dyn HttpClient>) -> Self {
        let url = url.into();
        tracing::debug!("Created HttpProber for {}", url);
        Self { url, http }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl Prober for HttpProber {
    async fn probe(&self) -> HealthSample {
        let started = Instant::now();

        let response = match self.http.get(&self.url).await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!("Health check against {} failed: {}", self.url, e);
                return HealthSample::failure(current_epoch_ms());
            }
        };

        if !response.is_success() {
            tracing::warn!(
                "Health check against {} failed: HTTP {}",
                self.url,
                response.status
            );
            return HealthSample::failure(current_epoch_ms());
        }

        let parsed = match serde_json::from_str::<HealthResponse>(&response.body) {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!("Unreadable health response from {}: {}", self.url, e);
                return HealthSample::failure(current_epoch_ms());
            }
        };

        let measured_ms = started.elapsed().as_millis() as f64;
        let sample = HealthSample {
            timestamp_epoch_ms: current_epoch_ms(),
            ok: true,
            db_ok: parsed.db_ok,
            api_latency_ms: Some(parsed.latency_ms.unwrap_or(measured_ms)),
            db_latency_ms: parsed.db_latency_ms,
            server_version: parsed.server_version,
        };

        tracing::debug!(
            "Health check against {}: {} (api {:?} ms)",
            self.url,
            sample.status(),
            sample.api_latency_ms
        );
        sample
    }
}
