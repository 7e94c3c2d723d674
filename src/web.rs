use crate::hostinfo;
use crate::radio;
use crate::scanner::ScanEngine;
use crate::speedtest::{RunRequest, SpeedTestCache};
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info};

/// Everything the handlers need: the scan engine and the speed-test cache.
/// Owned here and shared by reference; no ambient globals.
pub struct AppState {
    pub scanner: ScanEngine,
    pub speedtest: Arc<SpeedTestCache>,
}

type SharedState = Arc<AppState>;

pub async fn start_web_server(state: SharedState, port: u16) -> anyhow::Result<()> {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/api/scan", get(scan_handler))
        .route("/api/speedtest", get(speedtest_handler))
        .route("/api/speedtest/run", post(speedtest_run_handler))
        .route("/api/hostinfo", get(hostinfo_handler))
        .route("/api/sysinfo", get(sysinfo_handler))
        .layer(cors)
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(format!("127.0.0.1:{}", port)).await?;
    info!("API listening on port {}", port);
    axum::serve(listener, app).await?;
    Ok(())
}

/// Every call runs a full reconciliation pass; there is no scan cache, so
/// cost is dominated by the gateway probe's deadline.
async fn scan_handler(State(state): State<SharedState>) -> impl IntoResponse {
    match state.scanner.scan().await {
        Ok(report) => Json(serde_json::json!(report)).into_response(),
        Err(e) => {
            error!("network scan failed: {:#}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({
                    "error": "Failed to scan network"
                })),
            )
                .into_response()
        }
    }
}

async fn speedtest_handler(State(state): State<SharedState>) -> impl IntoResponse {
    Json(state.speedtest.snapshot())
}

async fn speedtest_run_handler(State(state): State<SharedState>) -> impl IntoResponse {
    match state.speedtest.trigger_run() {
        RunRequest::Started => Json(serde_json::json!({
            "status": "started"
        }))
        .into_response(),
        RunRequest::AlreadyRunning => (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({
                "status": "already_running"
            })),
        )
            .into_response(),
    }
}

async fn hostinfo_handler() -> impl IntoResponse {
    Json(hostinfo::collect())
}

async fn sysinfo_handler() -> impl IntoResponse {
    match radio::collect().await {
        Ok(Some(radio)) => Json(serde_json::json!(radio)).into_response(),
        Ok(None) => Json(serde_json::json!({
            "error": "No active Wi-Fi"
        }))
        .into_response(),
        Err(e) => {
            error!("radio query failed: {:#}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({
                    "error": e.to_string()
                })),
            )
                .into_response()
        }
    }
}
