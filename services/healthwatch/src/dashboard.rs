//! JSON API over the scheduler handle

use std::net::SocketAddr;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde::Deserialize;
use tokio_util::sync::CancellationToken;
use tower_http::cors::CorsLayer;

use crate::presence::PresenceEvent;
use crate::scheduler::SchedulerHandle;

/// Dashboard application state
#[derive(Clone)]
pub struct DashboardState {
    pub scheduler: SchedulerHandle,
}

#[derive(Debug, Deserialize)]
struct OpenRequest {
    open: bool,
}

#[derive(Debug, Deserialize)]
struct PresenceRequest {
    event: PresenceEvent,
}

/// Build the dashboard axum router
pub fn build_router(scheduler: SchedulerHandle) -> Router {
    let dashboard_state = DashboardState { scheduler };

    Router::new()
        .route("/api/health", get(snapshot_handler))
        .route("/api/health/latest", get(latest_handler))
        .route("/api/health/history", get(history_handler))
        .route("/api/health/ping", post(ping_handler))
        .route("/api/health/open", put(open_handler))
        .route("/api/presence", post(presence_handler))
        .route("/health", get(health_handler))
        .layer(CorsLayer::permissive())
        .with_state(dashboard_state)
}

/// Serve the dashboard on `addr` until `cancel` fires
pub async fn serve(
    scheduler: SchedulerHandle,
    addr: SocketAddr,
    cancel: CancellationToken,
) -> crate::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Dashboard listening on http://{}", listener.local_addr()?);

    axum::serve(listener, build_router(scheduler))
        .with_graceful_shutdown(async move {
            cancel.cancelled().await;
        })
        .await
        .map_err(|e| crate::HealthWatchError::Dashboard(format!("Serving dashboard: {}", e)))?;

    tracing::debug!("Dashboard stopped");
    Ok(())
}

async fn snapshot_handler(State(dashboard): State<DashboardState>) -> impl IntoResponse {
    Json(dashboard.scheduler.snapshot())
}

async fn latest_handler(State(dashboard): State<DashboardState>) -> impl IntoResponse {
    Json(dashboard.scheduler.latest())
}

async fn history_handler(State(dashboard): State<DashboardState>) -> impl IntoResponse {
    Json(dashboard.scheduler.history())
}

async fn ping_handler(State(dashboard): State<DashboardState>) -> Response {
    accepted(dashboard.scheduler.manual_ping(), StatusCode::ACCEPTED)
}

async fn open_handler(
    State(dashboard): State<DashboardState>,
    Json(request): Json<OpenRequest>,
) -> Response {
    accepted(
        dashboard.scheduler.set_open(request.open),
        StatusCode::NO_CONTENT,
    )
}

async fn presence_handler(
    State(dashboard): State<DashboardState>,
    Json(request): Json<PresenceRequest>,
) -> Response {
    tracing::debug!("Presence event from dashboard: {}", request.event);
    accepted(
        dashboard.scheduler.presence(request.event),
        StatusCode::ACCEPTED,
    )
}

async fn health_handler() -> impl IntoResponse {
    "OK"
}

fn accepted(result: crate::Result<()>, status: StatusCode) -> Response {
    match result {
        Ok(()) => status.into_response(),
        Err(e) => (StatusCode::SERVICE_UNAVAILABLE, e.to_string()).into_response(),
    }
}
