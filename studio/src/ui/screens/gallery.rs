//! # NFT Gallery Screen

use crate::app::{AppState, UiAction};
use crate::ui::theme::Theme;
use crate::ui::widgets::{forms, tables};

pub fn render(ui: &mut egui::Ui, state: &AppState, theme: &Theme, actions: &mut Vec<UiAction>) {
    let gallery = &state.gallery;

    ui.horizontal(|ui| {
        forms::heading(ui, "NFT Gallery", theme);
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            if ui.add_enabled(!gallery.loading, egui::Button::new("⟳ Refresh")).clicked() {
                actions.push(UiAction::LoadNfts);
            }
        });
    });

    if gallery.nfts.is_empty() {
        let primary = if gallery.loading { "Loading NFTs..." } else { "No NFTs found" };
        tables::render_empty_state(ui, primary, None, theme);
        return;
    }

    egui::ScrollArea::vertical().id_salt("gallery").show(ui, |ui| {
        ui.horizontal_wrapped(|ui| {
            for nft in &gallery.nfts {
                egui::Frame::group(ui.style()).show(ui, |ui| {
                    ui.set_width(220.0);
                    ui.label(egui::RichText::new(&nft.name).strong());
                    ui.colored_label(theme.dim, &nft.symbol);
                    ui.monospace(tables::short_address(&nft.mint.to_string()))
                        .on_hover_text(nft.mint.to_string());
                    if let Some(collection) = &nft.collection {
                        let key = tables::short_address(&collection.key.to_string());
                        ui.colored_label(theme.info, format!("Collection {}", key));
                    }
                    if !nft.uri.is_empty() {
                        ui.hyperlink_to("Metadata", &nft.uri);
                    }
                });
            }
        });
    });
}
