//! # Notification Panel
//!
//! Lists the shared notification queue, oldest first. Entries stay until the
//! user dismisses them.

use lib_core::Notification;

use crate::app::UiAction;
use crate::ui::theme::Theme;

pub fn render(
    ui: &mut egui::Ui,
    notifications: &[Notification],
    theme: &Theme,
    actions: &mut Vec<UiAction>,
) {
    ui.heading("Notifications");
    ui.separator();

    egui::ScrollArea::vertical().id_salt("notifications").show(ui, |ui| {
        for notification in notifications {
            let color = theme.severity_color(notification.severity);
            egui::Frame::group(ui.style())
                .stroke(egui::Stroke::new(1.0, color))
                .show(ui, |ui| {
                    ui.set_width(ui.available_width());
                    ui.horizontal(|ui| {
                        ui.colored_label(color, format!("{:?}", notification.severity));
                        ui.colored_label(theme.dim, notification.created_at.format("%H:%M:%S").to_string());
                        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                            if ui.small_button("✕").clicked() {
                                actions.push(UiAction::Dismiss(notification.id));
                            }
                        });
                    });
                    ui.label(&notification.message);
                });
            ui.add_space(4.0);
        }
    });
}
