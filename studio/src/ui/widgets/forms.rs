//! # Form Components

use crate::ui::theme::Theme;

/// Labelled single-line text input.
pub fn text_input(
    ui: &mut egui::Ui,
    label: &str,
    value: &mut String,
    hint: &str,
) -> egui::Response {
    ui.label(label);
    ui.add(egui::TextEdit::singleline(value).hint_text(hint).desired_width(360.0))
}

/// Primary button, disabled while `enabled` is false.
pub fn primary_button(ui: &mut egui::Ui, text: &str, enabled: bool, theme: &Theme) -> bool {
    let button = egui::Button::new(egui::RichText::new(text).strong()).stroke(egui::Stroke::new(1.0, theme.accent));
    ui.add_enabled(enabled, button).clicked()
}

/// Render a form heading
pub fn heading(ui: &mut egui::Ui, text: &str, theme: &Theme) {
    ui.label(egui::RichText::new(text).heading().strong().color(theme.accent));
    ui.add_space(10.0);
}

/// Render a help/hint text
pub fn hint(ui: &mut egui::Ui, text: &str, theme: &Theme) {
    ui.colored_label(theme.dim, text);
}
