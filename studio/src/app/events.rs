//! # Application Events
//!
//! Results sent from spawned tasks back to the UI thread.

use lib_solana::jupiter::QuoteResponse;
use lib_solana::{ActionOutcome, CollectionMembership, CollectionRecord, CreatedAsset, TokenHolding, TokenMetadata};
use solana_sdk::signature::Signature;

/// Async task results sent to main thread
#[derive(Debug, Clone)]
pub enum AppEvent {
    /// Discovery finished; `None` when it failed (already notified).
    TokensLoaded(Option<Vec<TokenHolding>>),
    /// Status line of the running action.
    ActionProgress(String),
    /// Action finished; `Some` on success.
    ActionFinished(Option<ActionOutcome>),
    AssetCreated(CreatedAsset),
    NftsLoaded(Vec<TokenMetadata>),
    CollectionCreated(CollectionRecord),
    CollectionMemberAdded(CollectionMembership),
    SwapQuoted(QuoteResponse),
    SwapFinished(Option<Signature>),
    /// A flow ended, successfully or not.
    LoadingFinished,
}
