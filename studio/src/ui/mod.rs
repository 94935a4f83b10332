//! # GUI Rendering
//!
//! Per-frame layout: navigation bar on top, status bar at the bottom, the
//! notification panel on the right while it has entries, and the current
//! screen in the middle.

pub mod screens;
pub mod theme;
pub mod widgets;

use crate::app::{App, Screen};
use theme::Theme;

/// Main render function - called every frame by eframe
pub fn render(ctx: &egui::Context, app: &mut App) {
    let dark = app.context.theme.is_dark();
    Theme::activate(ctx, dark);
    let theme = Theme::for_mode(dark);
    let notification_service = &app.context.notifications;
    let notifications = notification_service.snapshot();

    let mut actions = Vec::new();
    {
        // Tasks never take this lock; only the UI thread writes state.
        let mut state = app.state.write();

        egui::TopBottomPanel::top("nav_bar").show(ctx, |ui| {
            widgets::nav_bar::render(ui, &state, &theme, &mut actions);
        });

        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            widgets::status_bar::render(ui, &state, &theme);
        });

        if !notifications.is_empty() {
            egui::SidePanel::right("notifications")
                .resizable(true)
                .default_width(300.0)
                .show(ctx, |ui| {
                    widgets::notifications::render(ui, &notifications, &theme, &mut actions);
                });
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().id_salt("screen").show(ui, |ui| match state.current_screen {
                Screen::Manager => screens::manager::render(ui, &mut state, &theme, &mut actions),
                Screen::Create => {
                    screens::create::render(ui, &mut state, &theme, notification_service, &mut actions)
                }
                Screen::Dashboard => screens::dashboard::render(ui, &state, &theme, &mut actions),
                Screen::Gallery => screens::gallery::render(ui, &state, &theme, &mut actions),
                Screen::Collections => {
                    screens::collection::render(ui, &mut state, &theme, notification_service, &mut actions)
                }
                Screen::Swap => screens::swap::render(ui, &mut state, &theme, &mut actions),
            });
        });
    }

    for action in actions {
        app.dispatch(action);
    }
}
