//! # Token Studio
//!
//! Entry point: load configuration, start logging, enter a Tokio runtime for
//! the network flows, then run the egui window on the main thread.

use anyhow::Context as _;
use lib_core::{AppContext, Config};
use studio::app::{App, Services};
use studio::ui::theme::Theme;
use tracing::info;

fn main() -> anyhow::Result<()> {
    let config = Config::load().context("Failed to load configuration")?;
    let _log_guard = studio::logger::init(&config.log_dir)?;

    info!(network = %config.network, "Starting Token Studio");

    let runtime = tokio::runtime::Runtime::new().context("Failed to create Tokio runtime")?;
    // Flows are spawned from the UI thread with tokio::spawn.
    let _enter = runtime.enter();

    let services = Services::from_config(&config).context("Failed to initialize services")?;
    let network = config.network.clone();

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([800.0, 560.0])
            .with_title("Token Studio"),
        ..Default::default()
    };

    eframe::run_native(
        "Token Studio",
        native_options,
        Box::new(move |cc| {
            Theme::install(&cc.egui_ctx);
            Ok(Box::new(App::new(services, AppContext::new(), network)))
        }),
    )
    .map_err(|e| anyhow::anyhow!("GUI Error: {}", e))?;

    info!("Token Studio closed");
    Ok(())
}
