use serde::Deserialize;
use std::sync::OnceLock;

static FLAGS: OnceLock<FeatureFlags> = OnceLock::new();

/// Path to the config file, relative to the project root.
const CONFIG_PATH: &str = "config.toml";

/// Feature flags controlling the optional subsystems.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FeatureFlags {
    /// Mirror selected lifecycle events to the ledger contract.
    #[serde(default)]
    pub ledger: bool,
    /// Run the periodic evidence-availability sweep.
    #[serde(default)]
    pub integrity_sweep: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct AppConfig {
    #[serde(default)]
    features: FeatureFlags,
}

/// Read `config.toml`, parse feature flags, and store them in the global
/// `OnceLock`. Safe to call multiple times — only the first call has effect.
///
/// If the file is missing or unparseable, all flags default to `false`.
pub fn load_feature_flags() {
    FLAGS.get_or_init(|| match std::fs::read_to_string(CONFIG_PATH) {
        Ok(contents) => {
            let config: AppConfig = toml::from_str(&contents).unwrap_or_else(|e| {
                tracing::warn!("failed to parse {CONFIG_PATH}: {e} — defaulting all flags off");
                AppConfig::default()
            });
            tracing::info!(?config.features, "feature flags loaded");
            config.features
        }
        Err(e) => {
            tracing::info!("{CONFIG_PATH} not found ({e}) — defaulting all flags off");
            FeatureFlags::default()
        }
    });
}

/// Get the loaded feature flags. Returns all-false defaults if
/// `load_feature_flags()` hasn't been called yet (safe fallback).
pub fn feature_flags() -> &'static FeatureFlags {
    static DEFAULT: FeatureFlags = FeatureFlags {
        ledger: false,
        integrity_sweep: false,
    };
    FLAGS.get().unwrap_or(&DEFAULT)
}

/// Seconds between integrity-sweep passes (default 15 minutes).
pub fn integrity_sweep_interval_secs() -> u64 {
    std::env::var("INTEGRITY_SWEEP_INTERVAL_SECS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(900)
}
