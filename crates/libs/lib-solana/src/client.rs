//! # Solana RPC Client
//!
//! Wrapper around the nonblocking Solana RPC client with network selection,
//! error classification and bounded confirmation polling. Implements
//! [`RpcConnection`] for the token flows.
//!
//! ## RPC Endpoints
//!
//! - Mainnet with a Helius API key: `https://mainnet.helius-rpc.com/?api-key={key}`
//! - Mainnet without a key: `https://api.mainnet-beta.solana.com` (~10 req/sec)
//! - Devnet: `https://api.devnet.solana.com`
//!
//! A custom URL (`SOLANA_RPC_URL`) overrides all of the above.
//!
//! ## Errors
//!
//! Preflight failures keep their program logs in [`AppError::Submission`] so
//! [`lib_core::error::friendly_hint`] can match them. HTTP 429 surfaces as
//! [`AppError::RateLimited`].
//!
//! ```rust,no_run
//! use lib_solana::client::{Network, SolanaClient};
//!
//! let client = SolanaClient::builder()
//!     .network(Network::Mainnet)
//!     .helius_api_key("your-api-key".to_string())
//!     .build();
//! ```

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use lib_core::error::classify_rpc_error;
use lib_core::{AppError, Config, Result};
use solana_client::client_error::{ClientError, ClientErrorKind};
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_client::rpc_request::{RpcError, RpcResponseErrorData, TokenAccountsFilter};
use solana_commitment_config::CommitmentConfig;
use solana_sdk::hash::Hash;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::Signature;
use solana_sdk::transaction::Transaction;
use tracing::{debug, info, instrument, warn};

use crate::service::RpcConnection;
use crate::types::{ProgramVariant, RawTokenAccount};

/// Solana network selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Network {
    /// Solana mainnet-beta (production network)
    Mainnet,
    /// Solana devnet (test network)
    #[default]
    Devnet,
}

impl FromStr for Network {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mainnet" | "mainnet-beta" => Ok(Network::Mainnet),
            "devnet" => Ok(Network::Devnet),
            other => Err(AppError::Config(format!("Unknown network: {}", other))),
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Network::Mainnet => f.write_str("mainnet"),
            Network::Devnet => f.write_str("devnet"),
        }
    }
}

/// Confirmation polling bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfirmPolicy {
    pub attempts: u32,
    pub interval: Duration,
}

impl Default for ConfirmPolicy {
    fn default() -> Self {
        Self {
            attempts: 60,
            interval: Duration::from_millis(500),
        }
    }
}

/// High-level Solana RPC client wrapper.
pub struct SolanaClient {
    rpc: Arc<RpcClient>,
    network: Network,
    confirm: ConfirmPolicy,
}

/// Builder for configuring SolanaClient.
#[derive(Debug, Clone, Default)]
pub struct SolanaClientBuilder {
    network: Network,
    helius_api_key: Option<String>,
    custom_rpc_url: Option<String>,
    confirm: ConfirmPolicy,
}

impl SolanaClientBuilder {
    /// Set the Solana network.
    pub fn network(mut self, network: Network) -> Self {
        self.network = network;
        self
    }

    /// Set the Helius API key for premium RPC access.
    pub fn helius_api_key(mut self, key: String) -> Self {
        self.helius_api_key = Some(key);
        self
    }

    /// Set a custom RPC URL (overrides network-based URL).
    pub fn custom_rpc_url(mut self, url: String) -> Self {
        self.custom_rpc_url = Some(url);
        self
    }

    pub fn confirm_policy(mut self, confirm: ConfirmPolicy) -> Self {
        self.confirm = confirm;
        self
    }

    pub fn rpc_url(&self) -> String {
        if let Some(custom_url) = &self.custom_rpc_url {
            return custom_url.clone();
        }
        match self.network {
            Network::Mainnet => match &self.helius_api_key {
                Some(key) => format!("https://mainnet.helius-rpc.com/?api-key={}", key),
                None => "https://api.mainnet-beta.solana.com".to_string(),
            },
            Network::Devnet => "https://api.devnet.solana.com".to_string(),
        }
    }

    /// Build the SolanaClient with configured settings.
    pub fn build(self) -> SolanaClient {
        let url = self.rpc_url();
        info!(network = %self.network, "Connecting to Solana RPC");
        let rpc = Arc::new(RpcClient::new_with_commitment(url, CommitmentConfig::confirmed()));
        SolanaClient {
            rpc,
            network: self.network,
            confirm: self.confirm,
        }
    }
}

impl SolanaClient {
    pub fn builder() -> SolanaClientBuilder {
        SolanaClientBuilder::default()
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let mut builder = Self::builder()
            .network(config.network.parse()?)
            .confirm_policy(ConfirmPolicy {
                attempts: config.confirm_poll_attempts.max(1),
                interval: Duration::from_millis(config.confirm_poll_interval_ms),
            });
        if let Some(key) = &config.helius_api_key {
            builder = builder.helius_api_key(key.clone());
        }
        if let Some(url) = &config.rpc_url {
            builder = builder.custom_rpc_url(url.clone());
        }
        Ok(builder.build())
    }

    pub fn network(&self) -> Network {
        self.network
    }

    /// Check if the RPC endpoint is healthy and responsive.
    pub async fn health_check(&self) -> Result<()> {
        self.rpc.get_version().await.map_err(map_client_error)?;
        Ok(())
    }
}

/// Classify a client error, keeping preflight logs.
fn map_client_error(err: ClientError) -> AppError {
    if let ClientErrorKind::RpcError(RpcError::RpcResponseError {
        message,
        data: RpcResponseErrorData::SendTransactionPreflightFailure(simulation),
        ..
    }) = err.kind()
    {
        return AppError::Submission {
            message: message.clone(),
            logs: simulation.logs.clone().unwrap_or_default(),
        };
    }
    classify_rpc_error(err.to_string())
}

#[async_trait]
impl RpcConnection for SolanaClient {
    #[instrument(skip(self), fields(%owner, %program))]
    async fn token_accounts_by_owner(
        &self,
        owner: &Pubkey,
        program: ProgramVariant,
    ) -> Result<Vec<RawTokenAccount>> {
        let keyed = self
            .rpc
            .get_token_accounts_by_owner(owner, TokenAccountsFilter::ProgramId(program.program_id()))
            .await
            .map_err(map_client_error)?;

        let accounts: Vec<RawTokenAccount> = keyed
            .into_iter()
            .filter_map(|keyed| {
                let parsed = serde_json::to_value(&keyed.account.data)
                    .ok()
                    .and_then(|data| RawTokenAccount::from_parsed(&keyed.pubkey, &data));
                if parsed.is_none() {
                    warn!(account = %keyed.pubkey, "Skipping token account with unexpected shape");
                }
                parsed
            })
            .collect();

        debug!(count = accounts.len(), "Token accounts fetched");
        Ok(accounts)
    }

    async fn account_exists(&self, address: &Pubkey) -> Result<bool> {
        Ok(self.account_data(address).await?.is_some())
    }

    async fn account_data(&self, address: &Pubkey) -> Result<Option<Vec<u8>>> {
        let response = self
            .rpc
            .get_account_with_commitment(address, self.rpc.commitment())
            .await
            .map_err(map_client_error)?;
        Ok(response.value.map(|account| account.data))
    }

    async fn token_balance(&self, account: &Pubkey) -> Result<u64> {
        let balance = self
            .rpc
            .get_token_account_balance(account)
            .await
            .map_err(map_client_error)?;
        balance
            .amount
            .parse()
            .map_err(|e| AppError::Rpc(format!("Invalid token balance {:?}: {}", balance.amount, e)))
    }

    async fn token_delegate(&self, account: &Pubkey) -> Result<Option<Pubkey>> {
        let token_account = self
            .rpc
            .get_token_account(account)
            .await
            .map_err(map_client_error)?
            .ok_or_else(|| AppError::Rpc(format!("Token account {} not found", account)))?;
        token_account
            .delegate
            .map(|d| Pubkey::from_str(&d).map_err(|e| AppError::Rpc(format!("Invalid delegate {}: {}", d, e))))
            .transpose()
    }

    async fn latest_blockhash(&self) -> Result<Hash> {
        self.rpc.get_latest_blockhash().await.map_err(map_client_error)
    }

    async fn minimum_balance_for_rent_exemption(&self, data_len: usize) -> Result<u64> {
        self.rpc
            .get_minimum_balance_for_rent_exemption(data_len)
            .await
            .map_err(map_client_error)
    }

    #[instrument(skip(self, transaction))]
    async fn send_transaction(&self, transaction: &Transaction) -> Result<Signature> {
        let signature = self
            .rpc
            .send_transaction(transaction)
            .await
            .map_err(|e| match map_client_error(e) {
                AppError::Rpc(message) => AppError::Submission { message, logs: vec![] },
                other => other,
            })?;
        info!(%signature, "Transaction sent");
        Ok(signature)
    }

    #[instrument(skip(self))]
    async fn confirm_transaction(&self, signature: &Signature) -> Result<()> {
        for attempt in 1..=self.confirm.attempts {
            let status = self
                .rpc
                .get_signature_status_with_commitment(signature, CommitmentConfig::confirmed())
                .await
                .map_err(map_client_error)?;
            match status {
                Some(Ok(())) => {
                    debug!(attempt, "Transaction confirmed");
                    return Ok(());
                }
                Some(Err(e)) => return Err(AppError::Confirmation(format!("Transaction failed: {:?}", e))),
                None => tokio::time::sleep(self.confirm.interval).await,
            }
        }
        Err(AppError::Confirmation(format!(
            "Transaction {} was not confirmed after {} attempts",
            signature, self.confirm.attempts
        )))
    }
}
