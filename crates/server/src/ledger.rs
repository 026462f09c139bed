//! Ledger mirror
//!
//! Submits selected lifecycle events (role registration, case creation
//! and approval, verdicts) as transactions against the evidence-registry
//! contract. Two capabilities, deliberately separate:
//!
//! - `notify_*`: fire-and-forget. The call runs on a spawned task and a
//!   failure is logged at WARN, never propagated.
//! - `approve_case`: synchronous dependency. The caller fails the whole
//!   operation on error; this is the one blocking mirror path.
//!
//! No retry, no nonce management beyond the signer, no idempotency key —
//! a caller that retries a failed submission produces a second
//! transaction.

use alloy::primitives::Address;
use alloy::providers::{Provider, ProviderBuilder};
use alloy::signers::local::PrivateKeySigner;
use alloy::sol;
use sqlx::{Pool, Postgres};
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use shared_types::AppError;

// Generate contract bindings
sol! {
    #[sol(rpc)]
    interface IEvidenceRegistry {
        function registerRole(string role, address account) external;

        function createCase(string caseId, string title) external;

        function approveCase(string caseId) external;

        function recordVerdict(string caseId, string decision) external;

        function getCaseStatus(string caseId) external view returns (uint8);

        function getEvidenceHash(string caseId, uint256 index) external view returns (string);
    }
}

/// Ledger mirror configuration.
#[derive(Debug, Clone)]
pub struct LedgerConfig {
    /// RPC URL of the primary network.
    pub rpc_url: String,
    /// Preconfigured fallback network. Held for operators; no automatic
    /// failover happens.
    pub fallback_rpc_url: Option<String>,
    /// Evidence-registry contract address.
    pub contract_address: Address,
    /// Admin signing key for all mirror transactions.
    pub admin_key: String,
    /// Chain ID of the primary network.
    pub chain_id: u64,
}

impl LedgerConfig {
    /// Load configuration from environment variables. Returns None when
    /// the required variables are absent — the mirror then stays off.
    pub fn from_env() -> Option<Self> {
        let rpc_url = std::env::var("LEDGER_RPC_URL").ok()?;
        let contract_address = std::env::var("LEDGER_CONTRACT_ADDRESS")
            .ok()
            .and_then(|s| s.parse().ok())?;
        let admin_key = std::env::var("LEDGER_ADMIN_KEY").ok()?;
        let fallback_rpc_url = std::env::var("LEDGER_FALLBACK_RPC_URL").ok();
        let chain_id = std::env::var("LEDGER_CHAIN_ID")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(11155111);

        Some(Self {
            rpc_url,
            fallback_rpc_url,
            contract_address,
            admin_key,
            chain_id,
        })
    }
}

/// Receipt metadata for a submitted transaction.
#[derive(Debug, Clone, PartialEq)]
pub struct TxOutcome {
    pub tx_hash: String,
    pub block_number: Option<u64>,
}

/// Fixed 20% safety margin on top of a gas estimate.
fn with_margin(gas: u64) -> u64 {
    gas + gas / 5
}

/// Ledger mirror service.
pub struct LedgerMirror {
    config: LedgerConfig,
}

impl LedgerMirror {
    pub fn new(config: LedgerConfig) -> Self {
        if let Some(fallback) = &config.fallback_rpc_url {
            debug!(%fallback, "ledger fallback network configured");
        }
        Self { config }
    }

    pub fn chain_id(&self) -> u64 {
        self.config.chain_id
    }

    fn signer(&self) -> Result<PrivateKeySigner, AppError> {
        self.config
            .admin_key
            .parse()
            .map_err(|e| AppError::internal(format!("Invalid ledger admin key: {e}")))
    }

    fn rpc_url(&self) -> Result<reqwest::Url, AppError> {
        self.config
            .rpc_url
            .parse()
            .map_err(|e| AppError::internal(format!("Invalid ledger RPC URL: {e}")))
    }

    /// Mirror a role registration: `registerRole(role, wallet)`.
    pub async fn register_role(&self, role: &str, wallet: &str) -> Result<TxOutcome, AppError> {
        let account: Address = wallet
            .parse()
            .map_err(|e| AppError::bad_request(format!("Invalid wallet address: {e}")))?;

        let signer = self.signer()?;
        let provider = ProviderBuilder::new()
            .with_recommended_fillers()
            .wallet(alloy::network::EthereumWallet::from(signer))
            .on_http(self.rpc_url()?);

        let contract = IEvidenceRegistry::new(self.config.contract_address, &provider);
        let call = contract.registerRole(role.to_string(), account);

        Self::submit(&provider, call).await
    }

    /// Mirror case creation: `createCase(caseId, title)`.
    pub async fn create_case(&self, case_id: &str, title: &str) -> Result<TxOutcome, AppError> {
        let signer = self.signer()?;
        let provider = ProviderBuilder::new()
            .with_recommended_fillers()
            .wallet(alloy::network::EthereumWallet::from(signer))
            .on_http(self.rpc_url()?);

        let contract = IEvidenceRegistry::new(self.config.contract_address, &provider);
        let call = contract.createCase(case_id.to_string(), title.to_string());

        Self::submit(&provider, call).await
    }

    /// Mirror case approval: `approveCase(caseId)`. The caller treats a
    /// failure here as fatal to the approval operation.
    pub async fn approve_case(&self, ledger_case_id: &str) -> Result<TxOutcome, AppError> {
        let signer = self.signer()?;
        let provider = ProviderBuilder::new()
            .with_recommended_fillers()
            .wallet(alloy::network::EthereumWallet::from(signer))
            .on_http(self.rpc_url()?);

        let contract = IEvidenceRegistry::new(self.config.contract_address, &provider);
        let call = contract.approveCase(ledger_case_id.to_string());

        Self::submit(&provider, call).await
    }

    /// Mirror a verdict: `recordVerdict(caseId, decision)`.
    pub async fn record_verdict(
        &self,
        ledger_case_id: &str,
        decision: &str,
    ) -> Result<TxOutcome, AppError> {
        let signer = self.signer()?;
        let provider = ProviderBuilder::new()
            .with_recommended_fillers()
            .wallet(alloy::network::EthereumWallet::from(signer))
            .on_http(self.rpc_url()?);

        let contract = IEvidenceRegistry::new(self.config.contract_address, &provider);
        let call = contract.recordVerdict(ledger_case_id.to_string(), decision.to_string());

        Self::submit(&provider, call).await
    }

    /// Read the case status byte straight from the contract. Uncached.
    pub async fn get_case_status(&self, ledger_case_id: &str) -> Result<u8, AppError> {
        let provider = ProviderBuilder::new().on_http(self.rpc_url()?);
        let contract = IEvidenceRegistry::new(self.config.contract_address, &provider);

        let result = contract
            .getCaseStatus(ledger_case_id.to_string())
            .call()
            .await
            .map_err(|e| AppError::dependency(format!("Contract call failed: {e}")))?;

        Ok(result._0)
    }

    /// Read one recorded evidence hash from the contract. Uncached.
    pub async fn get_evidence_hash(
        &self,
        ledger_case_id: &str,
        index: u64,
    ) -> Result<String, AppError> {
        let provider = ProviderBuilder::new().on_http(self.rpc_url()?);
        let contract = IEvidenceRegistry::new(self.config.contract_address, &provider);

        let result = contract
            .getEvidenceHash(
                ledger_case_id.to_string(),
                alloy::primitives::U256::from(index),
            )
            .call()
            .await
            .map_err(|e| AppError::dependency(format!("Contract call failed: {e}")))?;

        Ok(result._0)
    }

    /// Estimate gas, add the fixed safety margin, price the transaction
    /// at the current network gas price, then sign, submit, and wait for
    /// the receipt. Nonce handling stays with the provider fillers.
    async fn submit<Pr, P, D>(
        provider: &Pr,
        call: alloy::contract::CallBuilder<alloy::transports::http::Http<reqwest::Client>, P, D>,
    ) -> Result<TxOutcome, AppError>
    where
        Pr: Provider<alloy::transports::http::Http<reqwest::Client>>,
        P: Provider<alloy::transports::http::Http<reqwest::Client>>,
        D: alloy::contract::CallDecoder,
    {
        let estimated = call
            .estimate_gas()
            .await
            .map_err(|e| AppError::dependency(format!("Gas estimation failed: {e}")))?;
        let gas_price = provider
            .get_gas_price()
            .await
            .map_err(|e| AppError::dependency(format!("Failed to fetch gas price: {e}")))?;

        let call = call.gas(with_margin(estimated)).gas_price(gas_price);
        let pending = call
            .send()
            .await
            .map_err(|e| AppError::dependency(format!("Failed to send transaction: {e}")))?;

        info!("Transaction sent: {:?}", pending.tx_hash());

        let receipt = pending
            .get_receipt()
            .await
            .map_err(|e| AppError::dependency(format!("Failed to get receipt: {e}")))?;

        Ok(TxOutcome {
            tx_hash: format!("{:#x}", receipt.transaction_hash),
            block_number: receipt.block_number,
        })
    }

    // ── Fire-and-forget notifications ───────────────────────────────

    /// Mirror a role registration without blocking the caller.
    pub fn notify_register_role(self: &Arc<Self>, role: String, wallet: String) {
        let mirror = Arc::clone(self);
        tokio::spawn(async move {
            match mirror.register_role(&role, &wallet).await {
                Ok(outcome) => info!(tx = %outcome.tx_hash, %role, "role registration mirrored"),
                Err(e) => warn!(%role, error = %e, "role registration mirror failed"),
            }
        });
    }

    /// Mirror case creation without blocking the caller. On confirmation
    /// the case row is stamped with its ledger identifier, which later
    /// gates approval.
    pub fn notify_create_case(
        self: &Arc<Self>,
        pool: Pool<Postgres>,
        row_id: Uuid,
        case_id: String,
        title: String,
    ) {
        let mirror = Arc::clone(self);
        tokio::spawn(async move {
            match mirror.create_case(&case_id, &title).await {
                Ok(outcome) => {
                    info!(tx = %outcome.tx_hash, %case_id, "case creation mirrored");
                    if let Err(e) =
                        crate::repo::case::set_ledger_case_id(&pool, row_id, &case_id).await
                    {
                        warn!(%case_id, error = %e, "failed to stamp ledger case id");
                    }
                }
                Err(e) => warn!(%case_id, error = %e, "case creation mirror failed"),
            }
        });
    }

    /// Mirror a verdict without blocking the caller.
    pub fn notify_record_verdict(self: &Arc<Self>, ledger_case_id: String, decision: String) {
        let mirror = Arc::clone(self);
        tokio::spawn(async move {
            match mirror.record_verdict(&ledger_case_id, &decision).await {
                Ok(outcome) => {
                    info!(tx = %outcome.tx_hash, case = %ledger_case_id, "verdict mirrored")
                }
                Err(e) => warn!(case = %ledger_case_id, error = %e, "verdict mirror failed"),
            }
        });
    }
}
