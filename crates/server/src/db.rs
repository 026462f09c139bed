use axum::extract::FromRef;
use sqlx::postgres::PgPoolOptions;
use sqlx::{Pool, Postgres};
use std::sync::Arc;

use crate::activity::ActivityRecorder;
use crate::ledger::LedgerMirror;
use crate::pinning::PinningClient;

/// Shared application state passed to Axum handlers via `State`.
///
/// Every external collaborator lives here as an explicitly passed handle —
/// no process-wide singletons — so tests can build isolated instances.
/// Derives `FromRef` so handlers can extract `State<PgPool>` directly.
#[derive(Clone, FromRef)]
pub struct AppState {
    pub pool: Pool<Postgres>,
    pub pinning: Arc<PinningClient>,
    /// Present only when the `ledger` feature flag is on and LEDGER_* env
    /// configuration is complete.
    pub ledger: Option<Arc<LedgerMirror>>,
    pub activity: ActivityRecorder,
}

impl AppState {
    pub fn new(pool: Pool<Postgres>, pinning: PinningClient, ledger: Option<LedgerMirror>) -> Self {
        Self {
            activity: ActivityRecorder::new(pool.clone()),
            pool,
            pinning: Arc::new(pinning),
            ledger: ledger.map(Arc::new),
        }
    }
}

/// Create a new database connection pool from environment variables.
/// Uses `connect_lazy` so no connections open until the first query.
pub fn create_pool() -> Pool<Postgres> {
    // Load .env file if present (ignored in production where env vars are set directly).
    let _ = dotenvy::dotenv();

    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let max_connections: u32 = std::env::var("DATABASE_MAX_CONNECTIONS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(10);

    PgPoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(std::time::Duration::from_secs(5))
        .connect_lazy(&database_url)
        .expect("Failed to create database pool")
}

/// Run database migrations against the given pool.
pub async fn run_migrations(pool: &Pool<Postgres>) {
    sqlx::migrate!("../../migrations")
        .run(pool)
        .await
        .expect("Failed to run database migrations");
}
