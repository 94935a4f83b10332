//! # Navigation Bar
//!
//! Screen tabs on the left; wallet, network and the theme toggle on the right.

use crate::app::{AppState, Screen, UiAction};
use crate::ui::theme::Theme;
use crate::ui::widgets::tables::short_address;

pub fn render(ui: &mut egui::Ui, state: &AppState, theme: &Theme, actions: &mut Vec<UiAction>) {
    ui.horizontal(|ui| {
        ui.set_height(32.0);
        for screen in Screen::all() {
            let selected = state.current_screen == *screen;
            if ui.selectable_label(selected, screen.title()).clicked() && !selected {
                actions.push(UiAction::Navigate(*screen));
            }
        }

        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            let toggle = if theme.dark { "☀ Light" } else { "🌙 Dark" };
            if ui.button(toggle).clicked() {
                actions.push(UiAction::ToggleTheme);
            }
            ui.colored_label(theme.dim, &state.network);
            match &state.wallet {
                Some(wallet) => {
                    ui.monospace(short_address(&wallet.to_string()))
                        .on_hover_text(wallet.to_string());
                }
                None => {
                    ui.colored_label(theme.error, "No wallet");
                }
            }
        });
    });
}
