//! # Service Traits
//!
//! Collaborator seams for dependency injection. Every flow in this crate talks
//! to the chain, the wallet, the metadata program and content storage only
//! through these traits, so tests swap in in-memory implementations.

use async_trait::async_trait;
use lib_core::Result;
use solana_sdk::hash::Hash;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::Signature;
use solana_sdk::transaction::Transaction;

use crate::types::{ProgramVariant, RawTokenAccount, TokenMetadata};

/// RPC operations used by the token flows.
#[async_trait]
pub trait RpcConnection: Send + Sync {
    /// Token accounts owned by `owner` under one program variant.
    async fn token_accounts_by_owner(
        &self,
        owner: &Pubkey,
        program: ProgramVariant,
    ) -> Result<Vec<RawTokenAccount>>;

    async fn account_exists(&self, address: &Pubkey) -> Result<bool>;

    /// Raw account data, `None` if the account does not exist.
    async fn account_data(&self, address: &Pubkey) -> Result<Option<Vec<u8>>>;

    /// Balance of a token account in base units.
    async fn token_balance(&self, account: &Pubkey) -> Result<u64>;

    /// Current delegate of a token account.
    async fn token_delegate(&self, account: &Pubkey) -> Result<Option<Pubkey>>;

    async fn latest_blockhash(&self) -> Result<Hash>;

    async fn minimum_balance_for_rent_exemption(&self, data_len: usize) -> Result<u64>;

    /// Submit a signed transaction once. No confirmation.
    async fn send_transaction(&self, transaction: &Transaction) -> Result<Signature>;

    /// Wait until `signature` is confirmed. An execution error is
    /// [`AppError::Confirmation`](lib_core::AppError::Confirmation).
    async fn confirm_transaction(&self, signature: &Signature) -> Result<()>;
}

/// The connected wallet.
#[async_trait]
pub trait WalletSigner: Send + Sync {
    fn pubkey(&self) -> Pubkey;

    /// Add the wallet's signature. Signatures already present are kept.
    async fn sign_transaction(&self, transaction: &mut Transaction) -> Result<()>;

    async fn sign_all_transactions(&self, transactions: &mut [Transaction]) -> Result<()> {
        for transaction in transactions.iter_mut() {
            self.sign_transaction(transaction).await?;
        }
        Ok(())
    }
}

/// NFT to mint through the metadata program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NftRequest {
    pub name: String,
    pub symbol: String,
    pub uri: String,
    pub seller_fee_basis_points: u16,
    pub is_collection: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CreatedNft {
    pub mint: Pubkey,
    pub signature: Signature,
}

/// NFT metadata operations.
#[async_trait]
pub trait MetadataSdk: Send + Sync {
    /// Metadata of `mint`, `None` if it has no metadata account.
    async fn find_by_mint(&self, mint: &Pubkey) -> Result<Option<TokenMetadata>>;

    /// NFTs (amount 1, decimals 0, with metadata) owned by `owner`.
    async fn find_all_by_owner(&self, owner: &Pubkey) -> Result<Vec<TokenMetadata>>;

    async fn create_nft(&self, request: &NftRequest) -> Result<CreatedNft>;

    /// Point `nft_mint`'s collection field at `collection_mint` (unverified).
    async fn set_collection(
        &self,
        nft_mint: &Pubkey,
        collection_mint: &Pubkey,
    ) -> Result<Signature>;
}

/// Decentralized content storage.
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Upload `data` with `(name, value)` tags and return the content id.
    async fn upload(&self, data: Vec<u8>, tags: &[(&str, &str)]) -> Result<String>;

    /// Public URI of uploaded content.
    fn uri_for(&self, id: &str) -> String;
}
