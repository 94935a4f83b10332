//! # Create Screen
//!
//! Fungible token or NFT form, plus the assets created this session.

use lib_core::NotificationService;
use lib_solana::{AssetDetail, NftProgram, ProgramVariant};

use crate::app::{AppState, UiAction};
use crate::ui::theme::Theme;
use crate::ui::widgets::links::{self, ExplorerTarget};
use crate::ui::widgets::{forms, tables};

pub fn render(
    ui: &mut egui::Ui,
    state: &mut AppState,
    theme: &Theme,
    notifications: &NotificationService,
    actions: &mut Vec<UiAction>,
) {
    let busy = state.is_loading();
    let network = state.network.as_str();
    let create = &mut state.create;
    let form = &mut create.form;

    forms::heading(ui, if form.is_nft { "Create NFT" } else { "Create Token" }, theme);

    ui.horizontal(|ui| {
        ui.radio_value(&mut form.is_nft, false, "Fungible token");
        ui.radio_value(&mut form.is_nft, true, "NFT");
    });
    ui.add_space(6.0);

    forms::text_input(ui, "Name", &mut form.name, "Up to 32 characters");
    forms::text_input(ui, "Symbol", &mut form.symbol, "Up to 10 characters");

    if form.is_nft {
        forms::text_input(ui, "Image URI", &mut form.image_uri, "https://...");
        egui::ComboBox::from_label("NFT program")
            .selected_text(form.nft_program.clone())
            .show_ui(ui, |ui| {
                for program in NftProgram::ALL {
                    ui.selectable_value(&mut form.nft_program, program.key().to_string(), program.key());
                }
            });
    } else {
        forms::text_input(ui, "Supply", &mut form.supply, "Whole tokens, e.g. 1000000");
        ui.add(egui::Slider::new(&mut form.decimals, 0..=9).text("Decimals"));
        ui.horizontal(|ui| {
            ui.label("Token standard");
            for variant in ProgramVariant::ALL {
                ui.radio_value(&mut form.standard, variant, variant.label());
            }
        });
    }
    ui.add_space(8.0);

    let label = if form.is_nft { "Create NFT" } else { "Create Token" };
    if forms::primary_button(ui, label, !busy, theme) {
        actions.push(UiAction::CreateAsset);
    }

    ui.add_space(16.0);
    ui.separator();
    forms::heading(ui, "Created this session", theme);

    if create.created.is_empty() {
        tables::render_empty_state(ui, "Nothing created yet", None, theme);
        return;
    }

    let config = tables::TableConfig {
        num_columns: 4,
        ..Default::default()
    };
    tables::render_table(ui, "created_assets", config, &["Name", "Mint", "Detail", "Signature"], theme, |ui| {
        for asset in &create.created {
            ui.label(format!("{} ({})", asset.name, asset.symbol));
            let mint = asset.mint.to_string();
            links::value_cell(ui, &mint, ExplorerTarget::Address, network, notifications);
            match &asset.detail {
                AssetDetail::Supply(supply) => ui.label(format!("Supply {}", supply)),
                AssetDetail::MetadataUri(uri) => ui.hyperlink_to("Metadata", uri),
            };
            let signature = asset.signature.to_string();
            links::value_cell(ui, &signature, ExplorerTarget::Transaction, network, notifications);
            ui.end_row();
        }
    });
}
