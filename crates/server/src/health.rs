use axum::extract::State;
use axum::Json;
use serde::Serialize;
use sqlx::{Pool, Postgres};
use std::sync::OnceLock;
use std::time::Instant;

use crate::config;

static START_TIME: OnceLock<Instant> = OnceLock::new();

/// Record the process start time. Call once during startup.
pub fn record_start_time() {
    START_TIME.get_or_init(Instant::now);
}

/// Liveness report: database reachability, uptime, and which of the
/// optional subsystems are switched on.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub db: String,
    pub uptime_seconds: u64,
    pub version: String,
    pub ledger_enabled: bool,
    pub integrity_sweep_enabled: bool,
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse)
    ),
    tag = "health"
)]
pub async fn health_check(State(pool): State<Pool<Postgres>>) -> Json<HealthResponse> {
    let db = match sqlx::query_scalar::<_, i32>("SELECT 1").fetch_one(&pool).await {
        Ok(_) => "connected".to_string(),
        Err(e) => format!("error: {e}"),
    };

    let flags = config::feature_flags();

    Json(HealthResponse {
        status: "ok".to_string(),
        db,
        uptime_seconds: START_TIME.get().map(|t| t.elapsed().as_secs()).unwrap_or(0),
        version: env!("CARGO_PKG_VERSION").to_string(),
        ledger_enabled: flags.ledger,
        integrity_sweep_enabled: flags.integrity_sweep,
    })
}
