use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Telemetry configuration.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub service_name: String,
    /// Emit JSON log lines instead of the human-readable format.
    pub json_format: bool,
    /// Default log level filter when RUST_LOG is unset.
    pub log_level: String,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            service_name: "custodia-server".to_string(),
            json_format: std::env::var("LOG_FORMAT").as_deref() == Ok("json"),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
        }
    }
}

/// Initialize tracing output. Call once at startup; a second call is a no-op
/// (try_init swallows the AlreadyInit error), which keeps tests safe.
pub fn init_telemetry(config: &TelemetryConfig) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let registry = tracing_subscriber::registry().with(env_filter);

    if config.json_format {
        let fmt_layer = tracing_subscriber::fmt::layer()
            .json()
            .with_current_span(true)
            .with_target(true);
        let _ = registry.with(fmt_layer).try_init();
    } else {
        let fmt_layer = tracing_subscriber::fmt::layer().with_target(true);
        let _ = registry.with(fmt_layer).try_init();
    }

    tracing::info!(service = %config.service_name, "telemetry initialized");
}
