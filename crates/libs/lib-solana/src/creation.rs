//! # Token/NFT Creation
//!
//! Two branches behind one entry point:
//!
//! - **Fungible**: new mint keypair, rent-exempt mint account, initialize,
//!   create the owner's associated account, mint the whole supply. One
//!   transaction signed by the mint keypair and the wallet.
//! - **NFT**: upload a JSON metadata document to content storage, then mint
//!   through the metadata program with the resulting URI.
//!
//! Metadata program calls are wrapped in [`with_rate_limit_retry`].

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use lib_core::{AppError, NotificationService, Result};
use lib_utils::{validate_max_length, validate_not_empty};
use serde::Serialize;
use solana_sdk::message::Message;
use solana_sdk::signature::{Keypair, Signer};
use solana_sdk::transaction::Transaction;
use tracing::{error, info, instrument};

use crate::retry::{with_rate_limit_retry, RetryPolicy};
use crate::service::{ContentStore, MetadataSdk, NftRequest, RpcConnection, WalletSigner};
use crate::spl_token::{new_mint_instructions, scale_amount, MINT_SIZE};
use crate::types::{AssetDetail, CreatedAsset, ProgramVariant};

pub const DEFAULT_DECIMALS: u8 = 9;
pub const NFT_SELLER_FEE_BASIS_POINTS: u16 = 500;
const NFT_DESCRIPTION: &str = "NFT description";

/// Token Metadata length limits (bytes).
pub const MAX_NAME_LENGTH: usize = 32;
pub const MAX_SYMBOL_LENGTH: usize = 10;

/// NFT program choices offered in the form. All three mint through the
/// Token Metadata program.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NftProgram {
    TokenMetadata,
    Core,
    Bubblegum,
}

impl NftProgram {
    pub const ALL: [NftProgram; 3] = [NftProgram::TokenMetadata, NftProgram::Core, NftProgram::Bubblegum];

    pub fn key(&self) -> &'static str {
        match self {
            NftProgram::TokenMetadata => "tokenMetadata",
            NftProgram::Core => "core",
            NftProgram::Bubblegum => "bubblegum",
        }
    }
}

impl fmt::Display for NftProgram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for NftProgram {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|p| p.key() == s)
            .ok_or_else(|| AppError::Config("Invalid NFT program selected".to_string()))
    }
}

/// Form input for the creation flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateRequest {
    pub name: String,
    pub symbol: String,
    /// Whole tokens, decimal string (fungible only).
    pub supply: String,
    pub decimals: u8,
    /// Token program for fungible tokens.
    pub standard: ProgramVariant,
    pub is_nft: bool,
    /// One of [`NftProgram`]'s keys.
    pub nft_program: String,
    /// Image URI written into the NFT metadata document.
    pub image_uri: String,
}

impl Default for CreateRequest {
    fn default() -> Self {
        Self {
            name: String::new(),
            symbol: String::new(),
            supply: String::new(),
            decimals: DEFAULT_DECIMALS,
            standard: ProgramVariant::Token,
            is_nft: false,
            nft_program: NftProgram::TokenMetadata.key().to_string(),
            image_uri: String::new(),
        }
    }
}

/// JSON document uploaded for an NFT.
#[derive(Debug, Serialize)]
pub struct NftMetadataDocument<'a> {
    pub name: &'a str,
    pub symbol: &'a str,
    pub description: &'a str,
    pub image: &'a str,
}

/// Upload an NFT metadata document and return its public URI.
pub async fn upload_metadata_document(
    store: &dyn ContentStore,
    document: &NftMetadataDocument<'_>,
) -> Result<String> {
    let body = serde_json::to_vec(document)?;
    let id = store.upload(body, &[("Content-Type", "application/json")]).await?;
    Ok(store.uri_for(&id))
}

pub struct CreationFlow {
    rpc: Arc<dyn RpcConnection>,
    wallet: Arc<dyn WalletSigner>,
    metadata: Arc<dyn MetadataSdk>,
    storage: Option<Arc<dyn ContentStore>>,
    retry: RetryPolicy,
}

impl CreationFlow {
    pub fn new(
        rpc: Arc<dyn RpcConnection>,
        wallet: Arc<dyn WalletSigner>,
        metadata: Arc<dyn MetadataSdk>,
        storage: Option<Arc<dyn ContentStore>>,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            rpc,
            wallet,
            metadata,
            storage,
            retry,
        }
    }

    fn validate(request: &CreateRequest) -> Result<()> {
        let check = |r: std::result::Result<(), String>| r.map_err(AppError::Validation);
        check(validate_not_empty(&request.name, "Name"))?;
        check(validate_not_empty(&request.symbol, "Symbol"))?;
        check(validate_max_length(request.name.trim(), MAX_NAME_LENGTH, "Name"))?;
        check(validate_max_length(request.symbol.trim(), MAX_SYMBOL_LENGTH, "Symbol"))?;
        if request.is_nft {
            request.nft_program.parse::<NftProgram>()?;
            check(validate_not_empty(&request.image_uri, "Image URI"))?;
        } else {
            check(validate_not_empty(&request.supply, "Supply"))?;
        }
        Ok(())
    }

    /// Create the asset described by `request`.
    #[instrument(skip(self, request), fields(name = %request.name, is_nft = request.is_nft))]
    pub async fn create(&self, request: &CreateRequest) -> Result<CreatedAsset> {
        Self::validate(request)?;
        if request.is_nft {
            self.create_nft(request).await
        } else {
            self.create_fungible(request).await
        }
    }

    async fn create_fungible(&self, request: &CreateRequest) -> Result<CreatedAsset> {
        let supply = scale_amount(&request.supply, request.decimals)?;
        let program = request.standard;
        let owner = self.wallet.pubkey();
        let mint = Keypair::new();
        let mint_pubkey = mint.pubkey();

        let rent = self.rpc.minimum_balance_for_rent_exemption(MINT_SIZE).await?;
        let instructions = new_mint_instructions(program, &owner, &mint_pubkey, request.decimals, supply, rent)?;

        let blockhash = self.rpc.latest_blockhash().await?;
        let mut message = Message::new(&instructions, Some(&owner));
        message.recent_blockhash = blockhash;
        let mut transaction = Transaction::new_unsigned(message);
        transaction
            .try_partial_sign(&[&mint], blockhash)
            .map_err(|e| AppError::Internal(format!("Failed to sign with mint keypair: {}", e)))?;
        self.wallet.sign_transaction(&mut transaction).await?;

        let signature = self.rpc.send_transaction(&transaction).await?;
        self.rpc.confirm_transaction(&signature).await?;

        info!(mint = %mint_pubkey, %program, supply, "Token created");
        Ok(CreatedAsset {
            mint: mint_pubkey,
            name: request.name.trim().to_string(),
            symbol: request.symbol.trim().to_string(),
            detail: AssetDetail::Supply(request.supply.trim().to_string()),
            signature,
            is_nft: false,
        })
    }

    async fn create_nft(&self, request: &CreateRequest) -> Result<CreatedAsset> {
        let storage = self.storage.as_ref().ok_or_else(|| {
            AppError::Config("Content storage is not configured (set STORAGE_UPLOAD_URL)".to_string())
        })?;
        let name = request.name.trim();
        let symbol = request.symbol.trim();

        let uri = upload_metadata_document(
            storage.as_ref(),
            &NftMetadataDocument {
                name,
                symbol,
                description: NFT_DESCRIPTION,
                image: request.image_uri.trim(),
            },
        )
        .await?;

        let nft_request = NftRequest {
            name: name.to_string(),
            symbol: symbol.to_string(),
            uri: uri.clone(),
            seller_fee_basis_points: NFT_SELLER_FEE_BASIS_POINTS,
            is_collection: false,
        };
        let created = with_rate_limit_retry(&self.retry, "create_nft", || {
            self.metadata.create_nft(&nft_request)
        })
        .await?;

        info!(mint = %created.mint, %uri, "NFT created");
        Ok(CreatedAsset {
            mint: created.mint,
            name: name.to_string(),
            symbol: symbol.to_string(),
            detail: AssetDetail::MetadataUri(uri),
            signature: created.signature,
            is_nft: true,
        })
    }

    /// [`create`](Self::create) with notifications; `on_created` runs only on success.
    pub async fn run<F>(
        &self,
        request: &CreateRequest,
        notifications: &NotificationService,
        on_created: F,
    ) -> Option<CreatedAsset>
    where
        F: FnOnce(&CreatedAsset),
    {
        match self.create(request).await {
            Ok(asset) => {
                let kind = if asset.is_nft { "NFT" } else { "Token" };
                notifications.success(format!("{} created successfully! Mint address: {}", kind, asset.mint));
                on_created(&asset);
                Some(asset)
            }
            Err(e) => {
                error!("Error creating token: {}", e);
                let message = match &e {
                    AppError::Validation(msg) => msg.clone(),
                    _ => format!("Failed to create token: {}", e.user_message()),
                };
                notifications.error(message);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discovery::TokenDiscovery;
    use crate::test_support::{MockLedger, MockMetadata, MockStore, MockWallet};
    use std::time::Duration;

    struct Fixture {
        ledger: Arc<MockLedger>,
        wallet: Arc<MockWallet>,
        metadata: Arc<MockMetadata>,
        store: Arc<MockStore>,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                ledger: Arc::new(MockLedger::new()),
                wallet: Arc::new(MockWallet::new()),
                metadata: Arc::new(MockMetadata::new()),
                store: Arc::new(MockStore::new()),
            }
        }

        fn flow(&self) -> CreationFlow {
            CreationFlow::new(
                self.ledger.clone(),
                self.wallet.clone(),
                self.metadata.clone(),
                Some(self.store.clone()),
                RetryPolicy {
                    max_attempts: 3,
                    base_delay: Duration::from_millis(10),
                },
            )
        }
    }

    fn fungible(name: &str, symbol: &str, supply: &str, decimals: u8) -> CreateRequest {
        CreateRequest {
            name: name.to_string(),
            symbol: symbol.to_string(),
            supply: supply.to_string(),
            decimals,
            ..CreateRequest::default()
        }
    }

    fn nft(program: &str) -> CreateRequest {
        CreateRequest {
            name: "Art".to_string(),
            symbol: "ART".to_string(),
            is_nft: true,
            nft_program: program.to_string(),
            image_uri: "https://example.com/art.png".to_string(),
            ..CreateRequest::default()
        }
    }

    #[tokio::test]
    async fn test_created_token_is_discovered_with_full_supply() {
        // Arrange
        let fx = Fixture::new();
        let notifications = NotificationService::new();
        let mut callback_mint = None;

        // Act
        let asset = fx
            .flow()
            .run(&fungible("Test", "TST", "100", 9), &notifications, |a| callback_mint = Some(a.mint))
            .await
            .unwrap();
        let holdings = TokenDiscovery::new(fx.ledger.clone(), fx.metadata.clone())
            .discover(&fx.wallet.pubkey())
            .await
            .unwrap();

        // Assert
        assert_eq!(callback_mint, Some(asset.mint));
        assert_eq!(holdings.len(), 1);
        assert_eq!(holdings[0].mint, asset.mint);
        assert_eq!(holdings[0].raw_amount, 100 * 10u64.pow(9));
        assert_eq!(holdings[0].decimals, 9);
        assert_eq!(asset.detail, AssetDetail::Supply("100".to_string()));
        assert_eq!(
            notifications.snapshot()[0].message,
            format!("Token created successfully! Mint address: {}", asset.mint)
        );
    }

    #[tokio::test]
    async fn test_token_2022_standard_creates_token_2022_holding() {
        let fx = Fixture::new();
        let request = CreateRequest {
            standard: ProgramVariant::Token2022,
            ..fungible("Next", "NXT", "5", 2)
        };

        let asset = fx.flow().create(&request).await.unwrap();

        let holding = fx.ledger.holding(&fx.wallet.pubkey(), &asset.mint);
        assert_eq!(holding.program, ProgramVariant::Token2022);
        assert_eq!(holding.raw_amount, 500);
    }

    #[tokio::test]
    async fn test_nft_uploads_metadata_then_mints() {
        let fx = Fixture::new();

        let asset = fx.flow().create(&nft("core")).await.unwrap();

        let uploads = fx.store.uploads();
        assert_eq!(uploads.len(), 1);
        assert_eq!(uploads[0].1, vec![("Content-Type".to_string(), "application/json".to_string())]);
        let document: serde_json::Value = serde_json::from_slice(&uploads[0].0).unwrap();
        assert_eq!(document["name"], "Art");
        assert_eq!(document["image"], "https://example.com/art.png");

        let created = fx.metadata.created();
        assert_eq!(created[0].seller_fee_basis_points, 500);
        assert_eq!(created[0].uri, "https://arweave.net/content-1");
        assert_eq!(asset.detail, AssetDetail::MetadataUri("https://arweave.net/content-1".to_string()));
        assert!(asset.is_nft);
    }

    #[tokio::test]
    async fn test_unknown_nft_program_rejected_before_network() {
        let fx = Fixture::new();

        let err = fx.flow().create(&nft("candyMachine")).await.unwrap_err();

        assert!(matches!(err, AppError::Config(_)));
        assert!(fx.store.uploads().is_empty());
        assert_eq!(fx.metadata.create_calls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_nft_creation_retries_rate_limits() {
        let fx = Fixture::new();
        fx.metadata.fail_create_with(vec![
            AppError::RateLimited("429 Too Many Requests".to_string()),
            AppError::RateLimited("429 Too Many Requests".to_string()),
        ]);

        let asset = fx.flow().create(&nft("tokenMetadata")).await;

        assert!(asset.is_ok());
        assert_eq!(fx.metadata.create_calls(), 3);
    }

    #[tokio::test]
    async fn test_nft_creation_does_not_retry_other_errors() {
        let fx = Fixture::new();
        fx.metadata.fail_create_with(vec![AppError::Rpc("node is behind".to_string())]);
        let notifications = NotificationService::new();

        let asset = fx.flow().run(&nft("bubblegum"), &notifications, |_| panic!("not created")).await;

        assert!(asset.is_none());
        assert_eq!(fx.metadata.create_calls(), 1);
        assert_eq!(notifications.snapshot()[0].message, "Failed to create token: node is behind");
    }

    #[tokio::test]
    async fn test_missing_supply_is_validation_error() {
        let fx = Fixture::new();
        let err = fx.flow().create(&fungible("Test", "TST", " ", 9)).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(fx.ledger.call_count(), 0);
    }

    #[tokio::test]
    async fn test_confirmation_error_fails_creation() {
        let fx = Fixture::new();
        fx.ledger.fail_confirmation("InstructionError(1, Custom(0))");

        let err = fx.flow().create(&fungible("Test", "TST", "1", 0)).await.unwrap_err();

        assert!(matches!(err, AppError::Confirmation(_)));
    }
}
