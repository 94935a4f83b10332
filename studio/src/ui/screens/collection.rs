//! # Collections Screen
//!
//! Create a collection NFT, then add existing NFTs to it.

use lib_core::NotificationService;

use crate::app::{AppState, UiAction};
use crate::ui::theme::Theme;
use crate::ui::widgets::forms;
use crate::ui::widgets::links::{labelled_value, ExplorerTarget};

pub fn render(
    ui: &mut egui::Ui,
    state: &mut AppState,
    theme: &Theme,
    notifications: &NotificationService,
    actions: &mut Vec<UiAction>,
) {
    let busy = state.is_loading();
    let network = state.network.as_str();
    let collection = &mut state.collection;

    forms::heading(ui, "Create Collection", theme);
    forms::text_input(ui, "Name", &mut collection.name, "Collection name");
    forms::text_input(ui, "Symbol", &mut collection.symbol, "Symbol");
    forms::text_input(ui, "Image URI", &mut collection.image_uri, "https://...");
    ui.add_space(6.0);
    if forms::primary_button(ui, "Create Collection", !busy, theme) {
        actions.push(UiAction::CreateCollection);
    }
    if let Some(record) = &collection.created {
        ui.add_space(6.0);
        ui.colored_label(theme.success, format!("{} ({})", record.name, record.symbol));
        let address = record.address.to_string();
        labelled_value(ui, "Address", &address, ExplorerTarget::Address, network, theme, notifications);
        ui.hyperlink_to("Metadata", &record.metadata_uri);
    }

    ui.add_space(16.0);
    ui.separator();

    forms::heading(ui, "Add NFT to Collection", theme);
    forms::text_input(ui, "NFT mint", &mut collection.nft_mint, "NFT mint address");
    forms::text_input(ui, "Collection mint", &mut collection.collection_mint, "Collection mint address");
    forms::hint(ui, "The collection field is set unverified.", theme);
    ui.add_space(6.0);
    if forms::primary_button(ui, "Add to Collection", !busy, theme) {
        actions.push(UiAction::AddToCollection);
    }
    if let Some(membership) = &collection.added {
        ui.add_space(6.0);
        ui.colored_label(
            theme.success,
            format!("{} is now in {}", membership.nft_mint, membership.collection_mint),
        );
        let (nft, signature) = (membership.nft_mint.to_string(), membership.signature.to_string());
        labelled_value(ui, "NFT", &nft, ExplorerTarget::Address, network, theme, notifications);
        labelled_value(ui, "Signature", &signature, ExplorerTarget::Transaction, network, theme, notifications);
    }
}
