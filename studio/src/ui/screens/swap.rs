//! # Swap Screen
//!
//! Quote first, then execute the quoted route.

use crate::app::{AppState, UiAction};
use crate::ui::theme::Theme;
use crate::ui::widgets::forms;

pub fn render(ui: &mut egui::Ui, state: &mut AppState, theme: &Theme, actions: &mut Vec<UiAction>) {
    let busy = state.is_loading();
    let swap = &mut state.swap;

    forms::heading(ui, "Swap", theme);
    let mut edited = false;
    edited |= forms::text_input(ui, "Input mint", &mut swap.request.input_mint, "Mint to sell").changed();
    edited |= forms::text_input(ui, "Output mint", &mut swap.request.output_mint, "Mint to buy").changed();
    edited |= forms::text_input(ui, "Amount", &mut swap.request.amount, "Base units").changed();
    if edited {
        swap.quote = None;
    }
    ui.add_space(6.0);

    ui.horizontal(|ui| {
        if forms::primary_button(ui, "Get Quote", !busy, theme) {
            actions.push(UiAction::FetchQuote);
        }
        if forms::primary_button(ui, "Swap", !busy && swap.quote.is_some(), theme) {
            actions.push(UiAction::ExecuteSwap);
        }
    });

    if let Some(quote) = &swap.quote {
        ui.add_space(10.0);
        egui::Grid::new("swap_quote").num_columns(2).spacing([12.0, 4.0]).show(ui, |ui| {
            ui.colored_label(theme.dim, "In");
            ui.monospace(&quote.in_amount);
            ui.end_row();
            ui.colored_label(theme.dim, "Out");
            ui.monospace(&quote.out_amount);
            ui.end_row();
            ui.colored_label(theme.dim, "Price impact");
            ui.label(format!("{:.4}%", quote.price_impact_pct));
            ui.end_row();
            ui.colored_label(theme.dim, "Slippage");
            ui.label(format!("{} bps", quote.slippage_bps));
            ui.end_row();
            ui.colored_label(theme.dim, "Route");
            ui.label(quote.route_labels().join(" → "));
            ui.end_row();
        });
    }

    if let Some(signature) = &swap.last_signature {
        ui.add_space(10.0);
        ui.colored_label(theme.dim, "Last swap:");
        ui.monospace(signature.to_string());
    }
}
