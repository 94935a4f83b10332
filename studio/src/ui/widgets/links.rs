//! # Result Links
//!
//! Address and signature fields shown after a flow completes: a shortened
//! value, a copy button and a Solana Explorer link for the current network.

use lib_core::NotificationService;

use crate::ui::theme::Theme;
use crate::ui::widgets::tables::short_address;

pub const COPIED_MESSAGE: &str = "Copied to clipboard!";

/// What an explorer link points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExplorerTarget {
    Address,
    Transaction,
}

/// Solana Explorer URL for `value` on `network`.
pub fn explorer_url(target: ExplorerTarget, value: &str, network: &str) -> String {
    let path = match target {
        ExplorerTarget::Address => "address",
        ExplorerTarget::Transaction => "tx",
    };
    match network {
        "mainnet" | "mainnet-beta" => format!("https://explorer.solana.com/{}/{}", path, value),
        cluster => format!("https://explorer.solana.com/{}/{}?cluster={}", path, value, cluster),
    }
}

pub fn copy_to_clipboard(ctx: &egui::Context, value: &str, notifications: &NotificationService) {
    ctx.copy_text(value.to_string());
    notifications.success(COPIED_MESSAGE);
}

/// Shortened value, copy button and explorer link on one line.
pub fn value_cell(
    ui: &mut egui::Ui,
    value: &str,
    target: ExplorerTarget,
    network: &str,
    notifications: &NotificationService,
) {
    ui.horizontal(|ui| {
        ui.monospace(short_address(value)).on_hover_text(value);
        if ui.small_button("📋").on_hover_text("Copy to clipboard").clicked() {
            copy_to_clipboard(ui.ctx(), value, notifications);
        }
        ui.hyperlink_to("Explorer", explorer_url(target, value, network));
    });
}

/// [`value_cell`] with a leading label.
pub fn labelled_value(
    ui: &mut egui::Ui,
    label: &str,
    value: &str,
    target: ExplorerTarget,
    network: &str,
    theme: &Theme,
    notifications: &NotificationService,
) {
    ui.horizontal(|ui| {
        ui.colored_label(theme.dim, format!("{}:", label));
        value_cell(ui, value, target, network, notifications);
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use lib_core::Severity;

    #[test]
    fn test_explorer_url_follows_network() {
        assert_eq!(
            explorer_url(ExplorerTarget::Address, "Mint111", "devnet"),
            "https://explorer.solana.com/address/Mint111?cluster=devnet"
        );
        assert_eq!(
            explorer_url(ExplorerTarget::Transaction, "5sig", "mainnet"),
            "https://explorer.solana.com/tx/5sig"
        );
    }

    #[test]
    fn test_copy_puts_value_on_clipboard_and_notifies() {
        // Arrange
        let ctx = egui::Context::default();
        let notifications = NotificationService::new();

        // Act
        let output = ctx.run(egui::RawInput::default(), |ctx| {
            copy_to_clipboard(ctx, "So11111111111111111111111111111111111111112", &notifications);
        });

        // Assert
        assert!(output.platform_output.commands.iter().any(|command| matches!(
            command,
            egui::OutputCommand::CopyText(text) if text == "So11111111111111111111111111111111111111112"
        )));
        let queue = notifications.snapshot();
        assert_eq!(queue.len(), 1);
        assert_eq!(queue[0].message, COPIED_MESSAGE);
        assert_eq!(queue[0].severity, Severity::Success);
    }
}
