//! # Solana Library
//!
//! Token and NFT flows on Solana: discovery across the SPL Token and
//! Token-2022 programs, token actions, mint creation, NFT collections and
//! Jupiter swaps, plus the RPC, wallet, metadata and storage clients they run
//! against.

// region: --- Modules
pub mod actions;
pub mod client;
pub mod collection;
pub mod creation;
pub mod discovery;
pub mod jupiter;
pub mod metadata;
pub mod retry;
pub mod service;
pub mod spl_token;
pub mod storage;
pub mod swap;
pub mod types;
pub mod wallet;

#[cfg(test)]
mod test_support;
// endregion: --- Modules

// Re-export commonly used types from root for convenience
pub use actions::{ActionKind, ActionOrchestrator, ActionOutcome, ActionStage, PendingAction, ProgressObserver};
pub use client::{Network, SolanaClient};
pub use collection::CollectionManager;
pub use creation::{CreateRequest, CreationFlow, NftProgram};
pub use discovery::TokenDiscovery;
pub use jupiter::{JupiterClient, SwapAggregator};
pub use metadata::MetaplexClient;
pub use retry::{with_rate_limit_retry, RetryPolicy};
pub use service::{ContentStore, MetadataSdk, RpcConnection, WalletSigner};
pub use storage::HttpContentStore;
pub use swap::{SwapRequest, SwapService};
pub use types::{
    AssetDetail, CollectionMembership, CollectionRecord, CreatedAsset, ProgramVariant, TokenHolding,
    TokenMetadata,
};
pub use wallet::KeypairWallet;
