//! # Token Manager Screen
//!
//! Holdings list on the left; the selected token's action form on the right.

use lib_solana::ActionKind;

use crate::app::{AppState, ManagerState, UiAction};
use crate::ui::theme::Theme;
use crate::ui::widgets::{forms, tables};

pub fn render(ui: &mut egui::Ui, state: &mut AppState, theme: &Theme, actions: &mut Vec<UiAction>) {
    let busy = state.is_loading();
    let manager = &mut state.manager;

    ui.horizontal(|ui| {
        forms::heading(ui, "Token Manager", theme);
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            if ui.add_enabled(!manager.tokens_loading, egui::Button::new("⟳ Refresh")).clicked() {
                actions.push(UiAction::RefreshTokens);
            }
        });
    });

    ui.columns(2, |columns| {
        render_token_list(&mut columns[0], manager, theme);
        render_action_form(&mut columns[1], manager, busy, theme, actions);
    });
}

fn render_token_list(ui: &mut egui::Ui, manager: &mut ManagerState, theme: &Theme) {
    if manager.tokens.is_empty() {
        let primary = if manager.tokens_loading { "Loading tokens..." } else { "No tokens found" };
        tables::render_empty_state(ui, primary, None, theme);
        return;
    }

    let config = tables::TableConfig {
        num_columns: 3,
        scrollable: true,
        ..Default::default()
    };
    let mut clicked = None;
    tables::render_table(ui, "manager_tokens", config, &["Token", "Balance", "Program"], theme, |ui| {
        for (i, token) in manager.tokens.iter().enumerate() {
            let selected = manager.selected == Some(i);
            if ui.selectable_label(selected, token.display_name()).clicked() {
                clicked = Some(i);
            }
            ui.monospace(token.ui_amount());
            ui.colored_label(theme.dim, token.program.label());
            ui.end_row();
        }
    });

    if let Some(i) = clicked {
        if manager.selected != Some(i) {
            manager.selected = Some(i);
            manager.kind = None;
            manager.clear_inputs();
        }
    }
}

fn render_action_form(
    ui: &mut egui::Ui,
    manager: &mut ManagerState,
    busy: bool,
    theme: &Theme,
    actions: &mut Vec<UiAction>,
) {
    let Some(token) = manager.selected.and_then(|i| manager.tokens.get(i)).cloned() else {
        forms::hint(ui, "Select a token to manage it.", theme);
        return;
    };

    ui.label(egui::RichText::new(token.display_name()).strong());
    ui.monospace(format!("Mint: {}", token.mint));
    ui.monospace(format!("Account: {}", token.account));
    ui.label(format!("Balance: {} (decimals {})", token.ui_amount(), token.decimals));
    if let Some(delegate) = token.delegate {
        ui.colored_label(theme.info, format!("Delegate: {}", delegate));
    }
    ui.add_space(8.0);

    ui.horizontal_wrapped(|ui| {
        for kind in ActionKind::ALL {
            let label = capitalize(kind.verb());
            if ui.selectable_label(manager.kind == Some(kind), label).clicked() {
                manager.kind = Some(kind);
            }
        }
    });

    let Some(kind) = manager.kind else {
        return;
    };
    ui.add_space(8.0);

    if kind.needs_amount() {
        forms::text_input(ui, "Amount", &mut manager.amount, "e.g. 1.5");
    }
    if kind.needs_recipient() {
        let label = if kind == ActionKind::Delegate { "Delegate" } else { "Recipient" };
        forms::text_input(ui, label, &mut manager.recipient, "Wallet address");
    }
    ui.add_space(8.0);

    if forms::primary_button(ui, &capitalize(kind.verb()), !busy, theme) {
        actions.push(UiAction::SubmitAction);
    }

    if let Some(signature) = &manager.last_signature {
        ui.add_space(8.0);
        ui.colored_label(theme.dim, "Last transaction:");
        ui.monospace(signature.to_string());
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
