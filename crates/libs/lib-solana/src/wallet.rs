//! # Keypair Wallet
//!
//! Local [`WalletSigner`] backed by an ed25519 keypair.
//!
//! Accepted key formats:
//!
//! - JSON byte array, as written by `solana-keygen` (64 bytes, or a 32-byte secret)
//! - base58 string of the same bytes
//!
//! Without `KEYPAIR_PATH` a fresh keypair is generated for the session.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use lib_core::{AppError, Config, Result};
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::{Keypair, Signer};
use solana_sdk::transaction::Transaction;
use thiserror::Error;
use tracing::{info, warn};

use crate::service::WalletSigner;

#[derive(Debug, Error)]
pub enum WalletError {
    #[error("Failed to read keypair file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Keypair is neither a JSON byte array nor base58")]
    Format,

    #[error("Keypair must be 32 or 64 bytes, got {0}")]
    Length(usize),

    #[error("Invalid keypair bytes: {0}")]
    Invalid(String),

    #[error("Signing failed: {0}")]
    Signing(String),
}

impl From<WalletError> for AppError {
    fn from(err: WalletError) -> Self {
        match err {
            WalletError::Signing(msg) => AppError::Rejected(msg),
            other => AppError::Config(other.to_string()),
        }
    }
}

pub struct KeypairWallet {
    keypair: Keypair,
}

impl KeypairWallet {
    pub fn new(keypair: Keypair) -> Self {
        Self { keypair }
    }

    pub fn generate() -> Self {
        Self::new(Keypair::new())
    }

    /// Parse a keypair from file contents.
    pub fn from_encoded(encoded: &str) -> std::result::Result<Self, WalletError> {
        let trimmed = encoded.trim();
        let bytes: Vec<u8> = if trimmed.starts_with('[') {
            serde_json::from_str(trimmed).map_err(|_| WalletError::Format)?
        } else {
            bs58::decode(trimmed).into_vec().map_err(|_| WalletError::Format)?
        };
        Self::from_bytes(&bytes)
    }

    pub fn from_bytes(bytes: &[u8]) -> std::result::Result<Self, WalletError> {
        let keypair = match bytes.len() {
            64 => Keypair::try_from(bytes).map_err(|e| WalletError::Invalid(e.to_string()))?,
            32 => {
                let mut secret = [0u8; 32];
                secret.copy_from_slice(bytes);
                Keypair::new_from_array(secret)
            }
            n => return Err(WalletError::Length(n)),
        };
        Ok(Self::new(keypair))
    }

    pub fn from_file(path: &Path) -> std::result::Result<Self, WalletError> {
        let contents = std::fs::read_to_string(path).map_err(|source| WalletError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_encoded(&contents)
    }

    /// Wallet from `KEYPAIR_PATH`, or a generated one when unset.
    pub fn from_config(config: &Config) -> Result<Self> {
        match &config.keypair_path {
            Some(path) => {
                let wallet = Self::from_file(path)?;
                info!(pubkey = %wallet.pubkey(), "Loaded keypair from {}", path.display());
                Ok(wallet)
            }
            None => {
                let wallet = Self::generate();
                warn!(pubkey = %wallet.pubkey(), "KEYPAIR_PATH not set, using a generated keypair");
                Ok(wallet)
            }
        }
    }
}

#[async_trait]
impl WalletSigner for KeypairWallet {
    fn pubkey(&self) -> Pubkey {
        self.keypair.pubkey()
    }

    async fn sign_transaction(&self, transaction: &mut Transaction) -> Result<()> {
        let blockhash = transaction.message.recent_blockhash;
        transaction
            .try_partial_sign(&[&self.keypair], blockhash)
            .map_err(|e| WalletError::Signing(e.to_string()).into())
    }
}
