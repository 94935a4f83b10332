//! # Swap Tasks
//!
//! Quote fetching and swap execution.

use std::sync::Arc;

use async_channel::Sender;
use lib_core::NotificationService;
use lib_solana::jupiter::QuoteResponse;
use lib_solana::swap::failure_message;
use lib_solana::SwapRequest;
use tokio::spawn;
use tracing::error;

use super::LoadingGuard;
use crate::app::events::AppEvent;
use crate::app::services::Services;

pub(crate) fn fetch_quote(
    services: Services,
    notifications: Arc<NotificationService>,
    event_tx: Sender<AppEvent>,
    request: SwapRequest,
) {
    spawn(async move {
        let _guard = LoadingGuard::new(event_tx.clone());
        match services.swap().quote(&request).await {
            Ok(quote) => {
                let _ = event_tx.send(AppEvent::SwapQuoted(quote)).await;
            }
            Err(e) => {
                error!("Error fetching swap quote: {}", e);
                notifications.error(failure_message(&e));
            }
        }
    });
}

pub(crate) fn execute_swap(
    services: Services,
    notifications: Arc<NotificationService>,
    event_tx: Sender<AppEvent>,
    quote: QuoteResponse,
) {
    spawn(async move {
        let _guard = LoadingGuard::new(event_tx.clone());
        let signature = match services.swap().execute(&quote).await {
            Ok(signature) => {
                notifications.success("Swap completed successfully!");
                Some(signature)
            }
            Err(e) => {
                error!("Error during swap: {}", e);
                notifications.error(failure_message(&e));
                None
            }
        };
        let _ = event_tx.send(AppEvent::SwapFinished(signature)).await;
    });
}
