use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use server::config;
use server::db::{self, AppState};
use server::ledger::{LedgerConfig, LedgerMirror};
use server::pinning::PinningClient;
use server::telemetry::{init_telemetry, TelemetryConfig};

#[tokio::main]
async fn main() {
    init_telemetry(&TelemetryConfig::default());

    config::load_feature_flags();
    let flags = config::feature_flags();
    server::health::record_start_time();

    let pool = db::create_pool();
    db::run_migrations(&pool).await;

    let pinning = PinningClient::from_env();

    let ledger = if flags.ledger {
        match LedgerConfig::from_env() {
            Some(cfg) => Some(LedgerMirror::new(cfg)),
            None => {
                warn!("ledger flag is on but LEDGER_* configuration is incomplete; mirror disabled");
                None
            }
        }
    } else {
        None
    };

    let state = AppState::new(pool.clone(), pinning, ledger);

    if flags.integrity_sweep {
        server::integrity::spawn_integrity_sweep(
            pool,
            state.pinning.clone(),
            config::integrity_sweep_interval_secs(),
        );
    }

    // Max upload size (default 50 MB) — configurable via MAX_UPLOAD_BYTES env var.
    let max_body: usize = std::env::var("MAX_UPLOAD_BYTES")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(50 * 1024 * 1024);

    let router = server::openapi::api_router(state)
        .layer(axum::extract::DefaultBodyLimit::max(max_body))
        .layer(axum::middleware::from_fn(
            server::auth::middleware::auth_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid));

    let addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind listen address");
    info!(%addr, "custodia-server listening");

    axum::serve(listener, router)
        .await
        .expect("Server exited with an error");
}
