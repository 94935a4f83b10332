//! # Collection Management
//!
//! Create collection NFTs and attach existing NFTs to them. Every network step
//! runs under the rate-limit retry.

use std::str::FromStr;
use std::sync::Arc;

use lib_core::{AppError, NotificationService, Result};
use lib_utils::validate_not_empty;
use solana_sdk::pubkey::Pubkey;
use tracing::{error, info, instrument};

use crate::creation::{upload_metadata_document, NftMetadataDocument};
use crate::retry::{with_rate_limit_retry, RetryPolicy};
use crate::service::{ContentStore, MetadataSdk, NftRequest, RpcConnection};
use crate::spl_token::MINT_SIZE;
use crate::types::{CollectionMembership, CollectionRecord, TokenMetadata};

const COLLECTION_DESCRIPTION: &str = "Collection description";
const MINT_NOT_FOUND: &str = "NFT mint account not found";
const NOT_A_MINT: &str = "Address is not a token account mint";
const UNEXPECTED_SHAPE: &str = "Unexpected account shape";

pub struct CollectionManager {
    rpc: Arc<dyn RpcConnection>,
    metadata: Arc<dyn MetadataSdk>,
    storage: Option<Arc<dyn ContentStore>>,
    retry: RetryPolicy,
}

impl CollectionManager {
    pub fn new(
        rpc: Arc<dyn RpcConnection>,
        metadata: Arc<dyn MetadataSdk>,
        storage: Option<Arc<dyn ContentStore>>,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            rpc,
            metadata,
            storage,
            retry,
        }
    }

    #[instrument(skip(self))]
    pub async fn create_collection(
        &self,
        name: &str,
        symbol: &str,
        image_uri: &str,
    ) -> Result<CollectionRecord> {
        for (value, field) in [(name, "Name"), (symbol, "Symbol")] {
            validate_not_empty(value, field).map_err(AppError::Validation)?;
        }
        let storage = self.storage.as_ref().ok_or_else(|| {
            AppError::Config("Content storage is not configured (set STORAGE_UPLOAD_URL)".to_string())
        })?;

        let document = NftMetadataDocument {
            name: name.trim(),
            symbol: symbol.trim(),
            description: COLLECTION_DESCRIPTION,
            image: image_uri.trim(),
        };
        let metadata_uri = upload_metadata_document(storage.as_ref(), &document).await?;

        let request = NftRequest {
            name: name.trim().to_string(),
            symbol: symbol.trim().to_string(),
            uri: metadata_uri.clone(),
            seller_fee_basis_points: 0,
            is_collection: true,
        };
        let created =
            with_rate_limit_retry(&self.retry, "create_collection", || self.metadata.create_nft(&request)).await?;

        info!(address = %created.mint, "Collection created");
        Ok(CollectionRecord {
            address: created.mint,
            name: request.name,
            symbol: request.symbol,
            metadata_uri,
        })
    }

    /// Mint account must exist and be mint-sized, then its metadata must exist.
    async fn validate_nft_mint(&self, mint: &Pubkey) -> Result<TokenMetadata> {
        let data = self
            .rpc
            .account_data(mint)
            .await?
            .ok_or_else(|| AppError::Precondition(MINT_NOT_FOUND.to_string()))?;
        if data.len() < MINT_SIZE {
            return Err(AppError::Precondition(NOT_A_MINT.to_string()));
        }
        self.find_metadata(mint).await
    }

    async fn find_metadata(&self, mint: &Pubkey) -> Result<TokenMetadata> {
        self.metadata
            .find_by_mint(mint)
            .await?
            .ok_or_else(|| AppError::Precondition(format!("{}: no metadata for {}", UNEXPECTED_SHAPE, mint)))
    }

    #[instrument(skip(self))]
    pub async fn add_to_collection(
        &self,
        nft_mint: &str,
        collection_mint: &str,
    ) -> Result<CollectionMembership> {
        let parse = |s: &str| {
            Pubkey::from_str(s.trim())
                .map_err(|_| AppError::Validation("Invalid mint address format. Please check your input.".to_string()))
        };
        let nft_mint = parse(nft_mint)?;
        let collection_mint = parse(collection_mint)?;

        let nft = with_rate_limit_retry(&self.retry, "validate_nft_mint", || self.validate_nft_mint(&nft_mint)).await?;
        let collection =
            with_rate_limit_retry(&self.retry, "find_collection", || self.find_metadata(&collection_mint)).await?;
        let signature = with_rate_limit_retry(&self.retry, "set_collection", || {
            self.metadata.set_collection(&nft.mint, &collection.mint)
        })
        .await?;

        info!(%nft_mint, %collection_mint, %signature, "NFT added to collection");
        Ok(CollectionMembership {
            nft_mint,
            collection_mint,
            signature,
        })
    }

    pub async fn run_create(
        &self,
        name: &str,
        symbol: &str,
        image_uri: &str,
        notifications: &NotificationService,
    ) -> Option<CollectionRecord> {
        match self.create_collection(name, symbol, image_uri).await {
            Ok(record) => {
                notifications.success("Collection created successfully!");
                Some(record)
            }
            Err(e) => {
                error!("Error creating collection: {}", e);
                notifications.error(format!("Failed to create collection: {}", e.user_message()));
                None
            }
        }
    }

    pub async fn run_add(
        &self,
        nft_mint: &str,
        collection_mint: &str,
        notifications: &NotificationService,
    ) -> Option<CollectionMembership> {
        match self.add_to_collection(nft_mint, collection_mint).await {
            Ok(membership) => {
                notifications.success("NFT added to collection successfully!");
                Some(membership)
            }
            Err(e) => {
                error!("Error adding NFT to collection: {}", e);
                notifications.error(add_failure_message(&e));
                None
            }
        }
    }
}

/// User-facing text for a failed add-to-collection.
pub fn add_failure_message(err: &AppError) -> String {
    let raw = err.to_string();
    if err.is_rate_limited() {
        "Rate limit exceeded. Please try again later.".to_string()
    } else if matches!(err, AppError::Validation(_)) {
        raw
    } else if raw.contains(MINT_NOT_FOUND) {
        "The provided NFT mint address does not exist on the network.".to_string()
    } else if raw.contains("not a token account") {
        "The provided address is not a valid NFT mint address.".to_string()
    } else if raw.contains(UNEXPECTED_SHAPE) {
        "The provided NFT mint address is not a valid NFT.".to_string()
    } else {
        format!("Failed to add NFT to collection: {}", err.user_message())
    }
}
