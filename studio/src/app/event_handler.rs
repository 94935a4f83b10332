//! # Event Handler
//!
//! Applies task results to [`AppState`]. Runs on the UI thread only; the
//! returned [`FollowUp`] tells the caller which flow to start next.

use tracing::{debug, info};

use crate::app::events::AppEvent;
use crate::app::state::AppState;

/// Work to start after an event has been applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FollowUp {
    RefreshTokens,
}

pub fn apply_event(state: &mut AppState, event: AppEvent) -> Option<FollowUp> {
    match event {
        AppEvent::LoadingFinished => {
            state.loading = state.loading.saturating_sub(1);
            None
        }
        AppEvent::TokensLoaded(tokens) => {
            state.manager.tokens_loading = false;
            if let Some(tokens) = tokens {
                debug!(count = tokens.len(), "Token list updated");
                state.manager.set_tokens(tokens);
            }
            None
        }
        AppEvent::ActionProgress(status) => {
            state.status_line = Some(status);
            None
        }
        AppEvent::ActionFinished(Some(outcome)) => {
            info!(signature = %outcome.signature, "Action finished");
            state.manager.clear_inputs();
            state.manager.last_signature = Some(outcome.signature);
            Some(FollowUp::RefreshTokens)
        }
        AppEvent::ActionFinished(None) => None,
        AppEvent::AssetCreated(asset) => {
            state.create.created.insert(0, asset);
            Some(FollowUp::RefreshTokens)
        }
        AppEvent::NftsLoaded(nfts) => {
            state.gallery.loading = false;
            state.gallery.nfts = nfts;
            None
        }
        AppEvent::CollectionCreated(record) => {
            state.collection.collection_mint = record.address.to_string();
            state.collection.created = Some(record);
            None
        }
        AppEvent::CollectionMemberAdded(membership) => {
            state.collection.nft_mint.clear();
            state.collection.added = Some(membership);
            None
        }
        AppEvent::SwapQuoted(quote) => {
            state.swap.quote = Some(quote);
            None
        }
        AppEvent::SwapFinished(Some(signature)) => {
            state.swap.quote = None;
            state.swap.last_signature = Some(signature);
            Some(FollowUp::RefreshTokens)
        }
        AppEvent::SwapFinished(None) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lib_solana::{ActionKind, ActionOutcome, AssetDetail, CreatedAsset, ProgramVariant, TokenHolding};
    use solana_sdk::pubkey::Pubkey;
    use solana_sdk::signature::Signature;

    fn holding(mint: Pubkey) -> TokenHolding {
        TokenHolding {
            account: Pubkey::new_unique(),
            mint,
            program: ProgramVariant::Token,
            raw_amount: 5,
            decimals: 0,
            delegate: None,
            metadata: None,
        }
    }

    #[test]
    fn test_loading_counter_never_underflows() {
        let mut state = AppState {
            loading: 1,
            ..AppState::default()
        };

        apply_event(&mut state, AppEvent::LoadingFinished);
        apply_event(&mut state, AppEvent::LoadingFinished);

        assert_eq!(state.loading, 0);
        assert!(!state.is_loading());
    }

    #[test]
    fn test_successful_action_clears_inputs_and_refreshes() {
        let mut state = AppState::default();
        state.manager.amount = "2".to_string();
        state.manager.recipient = "someone".to_string();
        state.manager.kind = Some(ActionKind::Transfer);

        let follow_up = apply_event(
            &mut state,
            AppEvent::ActionFinished(Some(ActionOutcome {
                signature: Signature::default(),
                message: "Transferred 2 tokens".to_string(),
            })),
        );

        assert_eq!(follow_up, Some(FollowUp::RefreshTokens));
        assert!(state.manager.amount.is_empty());
        assert!(state.manager.recipient.is_empty());
        assert_eq!(state.manager.last_signature, Some(Signature::default()));
    }

    #[test]
    fn test_failed_action_keeps_inputs() {
        let mut state = AppState::default();
        state.manager.amount = "2".to_string();

        let follow_up = apply_event(&mut state, AppEvent::ActionFinished(None));

        assert_eq!(follow_up, None);
        assert_eq!(state.manager.amount, "2");
    }

    #[test]
    fn test_failed_discovery_keeps_previous_tokens() {
        let mut state = AppState::default();
        state.manager.tokens = vec![holding(Pubkey::new_unique())];
        state.manager.tokens_loading = true;

        apply_event(&mut state, AppEvent::TokensLoaded(None));

        assert_eq!(state.manager.tokens.len(), 1);
        assert!(!state.manager.tokens_loading);
    }

    #[test]
    fn test_created_assets_are_newest_first() {
        let mut state = AppState::default();
        let asset = |name: &str, is_nft| CreatedAsset {
            mint: Pubkey::new_unique(),
            name: name.to_string(),
            symbol: "SYM".to_string(),
            detail: AssetDetail::Supply("1".to_string()),
            signature: Signature::default(),
            is_nft,
        };

        assert_eq!(
            apply_event(&mut state, AppEvent::AssetCreated(asset("first", false))),
            Some(FollowUp::RefreshTokens)
        );
        // A new NFT is a holding too, so both kinds refresh the token list.
        assert_eq!(
            apply_event(&mut state, AppEvent::AssetCreated(asset("second", true))),
            Some(FollowUp::RefreshTokens)
        );

        let names: Vec<_> = state.create.created.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["second", "first"]);
    }

    #[test]
    fn test_progress_sets_status_line() {
        let mut state = AppState::default();
        apply_event(&mut state, AppEvent::ActionProgress("Signing transaction...".to_string()));
        assert_eq!(state.status_line.as_deref(), Some("Signing transaction..."));
    }
}
