//! # Status Bar
//!
//! Spinner while any flow runs, plus the latest action status.

use crate::app::AppState;
use crate::ui::theme::Theme;

pub fn render(ui: &mut egui::Ui, state: &AppState, theme: &Theme) {
    ui.horizontal(|ui| {
        if state.is_loading() {
            ui.spinner();
            ui.colored_label(theme.info, "Working...");
        } else {
            ui.colored_label(theme.dim, "Ready");
        }
        if let Some(status) = &state.status_line {
            ui.separator();
            ui.label(status);
        }
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            ui.colored_label(theme.dim, format!("{} tokens", state.manager.tokens.len()));
        });
    });
}
