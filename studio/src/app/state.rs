//! # Application State Types
//!
//! Screen selection plus the per-screen form and result state. Everything here
//! is transient UI state; nothing is persisted.

use lib_solana::jupiter::QuoteResponse;
use lib_solana::{
    ActionKind, CollectionMembership, CollectionRecord, CreateRequest, CreatedAsset, PendingAction, SwapRequest,
    TokenHolding, TokenMetadata,
};
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::Signature;

/// Application screens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Screen {
    /// Token list with burn/transfer/delegate/revoke/close actions
    #[default]
    Manager,
    /// Fungible token and NFT creation form
    Create,
    /// Read-only table of holdings
    Dashboard,
    /// NFTs owned by the wallet
    Gallery,
    /// Collection creation and membership
    Collections,
    /// Jupiter swap
    Swap,
}

impl Screen {
    /// All screens in navigation order
    pub fn all() -> &'static [Screen] {
        &[
            Screen::Manager,
            Screen::Create,
            Screen::Dashboard,
            Screen::Gallery,
            Screen::Collections,
            Screen::Swap,
        ]
    }

    pub fn title(&self) -> &'static str {
        match self {
            Screen::Manager => "Token Manager",
            Screen::Create => "Create Token",
            Screen::Dashboard => "Dashboard",
            Screen::Gallery => "NFT Gallery",
            Screen::Collections => "Collections",
            Screen::Swap => "Swap",
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ManagerState {
    pub tokens: Vec<TokenHolding>,
    pub tokens_loading: bool,
    /// Index into `tokens` of the selected row.
    pub selected: Option<usize>,
    pub kind: Option<ActionKind>,
    pub amount: String,
    pub recipient: String,
    pub last_signature: Option<Signature>,
}

impl ManagerState {
    /// Pending action built from the current selection and form input.
    pub fn pending_action(&self) -> Option<PendingAction> {
        let token = self.tokens.get(self.selected?)?.clone();
        Some(PendingAction {
            token,
            kind: self.kind?,
            amount: self.amount.clone(),
            recipient: self.recipient.clone(),
        })
    }

    /// Replace the token list, keeping the selection on the same mint if it is still held.
    pub fn set_tokens(&mut self, tokens: Vec<TokenHolding>) {
        let selected_mint = self.selected.and_then(|i| self.tokens.get(i)).map(|t| t.mint);
        self.tokens = tokens;
        self.selected = selected_mint.and_then(|mint| self.tokens.iter().position(|t| t.mint == mint));
        if self.selected.is_none() {
            self.kind = None;
        }
    }

    pub fn clear_inputs(&mut self) {
        self.amount.clear();
        self.recipient.clear();
    }
}

#[derive(Debug, Clone, Default)]
pub struct CreateState {
    pub form: CreateRequest,
    /// Newest first.
    pub created: Vec<CreatedAsset>,
}

#[derive(Debug, Clone, Default)]
pub struct GalleryState {
    pub nfts: Vec<TokenMetadata>,
    pub loading: bool,
}

#[derive(Debug, Clone, Default)]
pub struct CollectionState {
    pub name: String,
    pub symbol: String,
    pub image_uri: String,
    pub nft_mint: String,
    pub collection_mint: String,
    pub created: Option<CollectionRecord>,
    pub added: Option<CollectionMembership>,
}

#[derive(Debug, Clone, Default)]
pub struct SwapState {
    pub request: SwapRequest,
    pub quote: Option<QuoteResponse>,
    pub last_signature: Option<Signature>,
}

/// Main application state
#[derive(Debug, Clone, Default)]
pub struct AppState {
    pub current_screen: Screen,
    pub wallet: Option<Pubkey>,
    pub network: String,
    /// Number of flows in progress; the spinner shows while non-zero.
    pub loading: usize,
    /// Progress line of the running action.
    pub status_line: Option<String>,
    pub manager: ManagerState,
    pub create: CreateState,
    pub gallery: GalleryState,
    pub collection: CollectionState,
    pub swap: SwapState,
}

impl AppState {
    pub fn is_loading(&self) -> bool {
        self.loading > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lib_solana::ProgramVariant;

    fn holding(mint: Pubkey) -> TokenHolding {
        TokenHolding {
            account: Pubkey::new_unique(),
            mint,
            program: ProgramVariant::Token,
            raw_amount: 10,
            decimals: 0,
            delegate: None,
            metadata: None,
        }
    }

    #[test]
    fn test_pending_action_needs_selection_and_kind() {
        let mut manager = ManagerState {
            tokens: vec![holding(Pubkey::new_unique())],
            ..ManagerState::default()
        };
        assert!(manager.pending_action().is_none());

        manager.selected = Some(0);
        manager.kind = Some(ActionKind::Burn);
        manager.amount = "3".to_string();

        let action = manager.pending_action().unwrap();
        assert_eq!(action.kind, ActionKind::Burn);
        assert_eq!(action.amount, "3");
    }

    #[test]
    fn test_set_tokens_keeps_selection_by_mint() {
        let (a, b) = (Pubkey::new_unique(), Pubkey::new_unique());
        let mut manager = ManagerState {
            tokens: vec![holding(a), holding(b)],
            selected: Some(1),
            kind: Some(ActionKind::Close),
            ..ManagerState::default()
        };

        manager.set_tokens(vec![holding(b)]);
        assert_eq!(manager.selected, Some(0));
        assert_eq!(manager.kind, Some(ActionKind::Close));

        manager.set_tokens(vec![holding(a)]);
        assert_eq!(manager.selected, None);
        assert_eq!(manager.kind, None);
    }

    #[test]
    fn test_screen_order_starts_with_manager() {
        assert_eq!(Screen::all()[0], Screen::default());
        assert_eq!(Screen::Gallery.title(), "NFT Gallery");
    }
}
