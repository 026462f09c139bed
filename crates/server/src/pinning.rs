use serde::Deserialize;
use shared_types::AppError;
use std::time::Duration;

/// Receipt handed back by the pinning service for a durably pinned artifact.
#[derive(Debug, Clone, PartialEq)]
pub struct PinReceipt {
    /// Content-addressed hash (CID).
    pub hash: String,
    /// Public gateway URL for the pinned content.
    pub url: String,
}

/// Pinning service configuration, from environment variables.
#[derive(Debug, Clone)]
pub struct PinningConfig {
    /// Pinning API base, e.g. `https://api.pinata.cloud`.
    pub api_url: String,
    /// Bearer credential for the pinning API.
    pub api_key: Option<String>,
    /// Gateway base used for retrieval and availability checks.
    pub gateway_url: String,
    pub timeout: Duration,
}

impl PinningConfig {
    pub fn from_env() -> Self {
        Self {
            api_url: std::env::var("PINNING_API_URL")
                .unwrap_or_else(|_| "https://api.pinata.cloud".to_string()),
            api_key: std::env::var("PINNING_API_KEY").ok(),
            gateway_url: std::env::var("PINNING_GATEWAY_URL")
                .unwrap_or_else(|_| "https://gateway.pinata.cloud".to_string()),
            timeout: Duration::from_secs(
                std::env::var("PINNING_TIMEOUT_SECS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(30),
            ),
        }
    }
}

#[derive(Debug, Deserialize)]
struct PinApiResponse {
    #[serde(alias = "IpfsHash", alias = "Hash")]
    hash: String,
}

/// HTTP client for the content-addressed pinning service.
///
/// `pin_bytes` is the only mutating call; `check_availability` is a
/// reachability probe against the gateway, not a content proof.
pub struct PinningClient {
    config: PinningConfig,
    http: reqwest::Client,
}

impl PinningClient {
    pub fn new(config: PinningConfig) -> Self {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .expect("Failed to build pinning HTTP client");
        Self { config, http }
    }

    pub fn from_env() -> Self {
        Self::new(PinningConfig::from_env())
    }

    /// Gateway URL for a pinned hash.
    pub fn gateway_url(&self, hash: &str) -> String {
        format!("{}/ipfs/{}", self.config.gateway_url.trim_end_matches('/'), hash)
    }

    /// Pin a file's bytes. Returns the content hash and gateway URL on
    /// success; any transport or API failure is a dependency error and
    /// the caller must not create an evidence record.
    pub async fn pin_bytes(&self, file_name: &str, bytes: Vec<u8>) -> Result<PinReceipt, AppError> {
        let part = reqwest::multipart::Part::bytes(bytes).file_name(file_name.to_string());
        let form = reqwest::multipart::Form::new().part("file", part);

        let endpoint = format!(
            "{}/pinning/pinFileToIPFS",
            self.config.api_url.trim_end_matches('/')
        );
        let mut request = self.http.post(&endpoint).multipart(form);
        if let Some(key) = &self.config.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| AppError::dependency(format!("Pinning service unreachable: {e}")))?;

        if !response.status().is_success() {
            return Err(AppError::dependency(format!(
                "Pinning service rejected upload: HTTP {}",
                response.status()
            )));
        }

        let body: PinApiResponse = response
            .json()
            .await
            .map_err(|e| AppError::dependency(format!("Pinning service returned bad body: {e}")))?;

        let url = self.gateway_url(&body.hash);
        Ok(PinReceipt {
            hash: body.hash,
            url,
        })
    }

    /// Gateway reachability probe for a pinned hash. This is an
    /// existence check only — it does not recompute or compare the
    /// content hash, so a replaced pin with the same CID path would
    /// still pass.
    pub async fn check_availability(&self, hash: &str) -> Result<bool, AppError> {
        let url = self.gateway_url(hash);
        let response = self
            .http
            .head(&url)
            .send()
            .await
            .map_err(|e| AppError::dependency(format!("Pinning gateway unreachable: {e}")))?;

        Ok(response.status().is_success())
    }
}
