//! # Dashboard Screen
//!
//! Read-only overview of discovered holdings.

use crate::app::{AppState, UiAction};
use crate::ui::theme::Theme;
use crate::ui::widgets::{forms, tables};

pub fn render(ui: &mut egui::Ui, state: &AppState, theme: &Theme, actions: &mut Vec<UiAction>) {
    let manager = &state.manager;

    ui.horizontal(|ui| {
        forms::heading(ui, "Dashboard", theme);
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            if ui.add_enabled(!manager.tokens_loading, egui::Button::new("⟳ Refresh")).clicked() {
                actions.push(UiAction::RefreshTokens);
            }
        });
    });

    if manager.tokens.is_empty() {
        tables::render_empty_state(ui, "No tokens found", Some("Create a token to see it here."), theme);
        return;
    }

    let config = tables::TableConfig {
        num_columns: 5,
        scrollable: true,
        ..Default::default()
    };
    tables::render_table(
        ui,
        "dashboard_tokens",
        config,
        &["Token", "Mint", "Balance", "Decimals", "Program"],
        theme,
        |ui| {
            for token in &manager.tokens {
                ui.label(token.display_name());
                ui.monospace(tables::short_address(&token.mint.to_string()))
                    .on_hover_text(token.mint.to_string());
                ui.monospace(token.ui_amount());
                ui.label(token.decimals.to_string());
                ui.colored_label(theme.dim, token.program.label());
                ui.end_row();
            }
        },
    );
}
