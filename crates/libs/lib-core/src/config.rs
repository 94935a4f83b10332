//! # Application Configuration
//!
//! Configuration is read from the environment (and `.env` through `dotenvy`),
//! validated once at startup, and then passed explicitly to the services that
//! need it.
//!
//! | Variable | Default |
//! |----------|---------|
//! | `SOLANA_NETWORK` | `devnet` |
//! | `SOLANA_RPC_URL` | derived from network (and `HELIUS_API_KEY`) |
//! | `KEYPAIR_PATH` | none, a fresh keypair is generated |
//! | `STORAGE_UPLOAD_URL` | none, NFT metadata upload disabled |
//! | `STORAGE_GATEWAY_URL` | `https://arweave.net` |
//! | `JUPITER_API_URL` | `https://quote-api.jup.ag/v6` |
//! | `RETRY_MAX_ATTEMPTS` / `RETRY_BASE_DELAY_MS` | `3` / `1000` |
//! | `CONFIRM_POLL_ATTEMPTS` / `CONFIRM_POLL_INTERVAL_MS` | `60` / `500` |
//! | `LOG_DIR` | `logs` |

use std::path::PathBuf;

use lib_utils::{get_env, get_env_or, get_env_parse_or};

use crate::error::{AppError, Result};

pub const DEFAULT_GATEWAY_URL: &str = "https://arweave.net";
pub const DEFAULT_JUPITER_API_URL: &str = "https://quote-api.jup.ag/v6";

/// Application configuration loaded from environment variables.
#[derive(Clone, Debug)]
pub struct Config {
    /// `devnet` or `mainnet`
    pub network: String,

    /// Explicit RPC endpoint, takes precedence over the network default.
    pub rpc_url: Option<String>,

    pub helius_api_key: Option<String>,

    /// Keypair file (JSON byte array or base58 string).
    pub keypair_path: Option<PathBuf>,

    /// Content storage upload endpoint.
    pub storage_upload_url: Option<String>,

    /// Gateway prefix used to build `{gateway}/{id}` URIs.
    pub storage_gateway_url: String,

    pub jupiter_api_url: String,

    /// Attempts made by the rate-limit retry policy (including the first).
    pub retry_max_attempts: u32,

    pub retry_base_delay_ms: u64,

    pub confirm_poll_attempts: u32,

    pub confirm_poll_interval_ms: u64,

    pub log_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            network: "devnet".to_string(),
            rpc_url: None,
            helius_api_key: None,
            keypair_path: None,
            storage_upload_url: None,
            storage_gateway_url: DEFAULT_GATEWAY_URL.to_string(),
            jupiter_api_url: DEFAULT_JUPITER_API_URL.to_string(),
            retry_max_attempts: 3,
            retry_base_delay_ms: 1000,
            confirm_poll_attempts: 60,
            confirm_poll_interval_ms: 500,
            log_dir: PathBuf::from("logs"),
        }
    }
}

impl Config {
    /// Load `.env` (if present), read the environment, and validate.
    pub fn load() -> Result<Self> {
        if let Err(e) = dotenvy::dotenv() {
            tracing::debug!("No .env file loaded: {}", e);
        }
        let config = Self::from_env()?;
        config.validate()?;
        tracing::info!(network = %config.network, "Configuration loaded");
        Ok(config)
    }

    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();
        let optional = |name: &'static str| get_env(name).ok().filter(|v| !v.trim().is_empty());

        Ok(Self {
            network: get_env_or("SOLANA_NETWORK", &defaults.network).to_lowercase(),
            rpc_url: optional("SOLANA_RPC_URL"),
            helius_api_key: optional("HELIUS_API_KEY"),
            keypair_path: optional("KEYPAIR_PATH").map(PathBuf::from),
            storage_upload_url: optional("STORAGE_UPLOAD_URL"),
            storage_gateway_url: get_env_or("STORAGE_GATEWAY_URL", DEFAULT_GATEWAY_URL),
            jupiter_api_url: get_env_or("JUPITER_API_URL", DEFAULT_JUPITER_API_URL),
            retry_max_attempts: get_env_parse_or("RETRY_MAX_ATTEMPTS", defaults.retry_max_attempts)?,
            retry_base_delay_ms: get_env_parse_or("RETRY_BASE_DELAY_MS", defaults.retry_base_delay_ms)?,
            confirm_poll_attempts: get_env_parse_or("CONFIRM_POLL_ATTEMPTS", defaults.confirm_poll_attempts)?,
            confirm_poll_interval_ms: get_env_parse_or(
                "CONFIRM_POLL_INTERVAL_MS",
                defaults.confirm_poll_interval_ms,
            )?,
            log_dir: PathBuf::from(get_env_or("LOG_DIR", "logs")),
        })
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<()> {
        if !matches!(self.network.as_str(), "devnet" | "mainnet") {
            return Err(AppError::Config(format!(
                "SOLANA_NETWORK must be 'devnet' or 'mainnet', got '{}'",
                self.network
            )));
        }

        if self.retry_max_attempts == 0 {
            return Err(AppError::Config("RETRY_MAX_ATTEMPTS must be at least 1".to_string()));
        }

        if self.confirm_poll_attempts == 0 {
            return Err(AppError::Config("CONFIRM_POLL_ATTEMPTS must be at least 1".to_string()));
        }

        for (name, url) in [
            ("STORAGE_GATEWAY_URL", Some(&self.storage_gateway_url)),
            ("JUPITER_API_URL", Some(&self.jupiter_api_url)),
            ("STORAGE_UPLOAD_URL", self.storage_upload_url.as_ref()),
            ("SOLANA_RPC_URL", self.rpc_url.as_ref()),
        ] {
            if let Some(url) = url {
                if !url.starts_with("http://") && !url.starts_with("https://") {
                    return Err(AppError::Config(format!("{} must be an http(s) URL", name)));
                }
            }
        }

        Ok(())
    }
}
