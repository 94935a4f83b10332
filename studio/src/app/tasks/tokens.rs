//! # Token Tasks
//!
//! Discovery, NFT listing and token actions.

use std::sync::Arc;

use async_channel::Sender;
use lib_core::NotificationService;
use lib_solana::{ActionStage, PendingAction};
use tokio::spawn;
use tracing::error;

use super::LoadingGuard;
use crate::app::events::AppEvent;
use crate::app::services::Services;

/// Discover the wallet's holdings across both token programs.
pub(crate) fn fetch_tokens(
    services: Services,
    notifications: Arc<NotificationService>,
    event_tx: Sender<AppEvent>,
) {
    spawn(async move {
        let _guard = LoadingGuard::new(event_tx.clone());
        let owner = services.wallet.pubkey();
        let tokens = services.discovery().refresh(&owner, &notifications).await;
        let _ = event_tx.send(AppEvent::TokensLoaded(tokens)).await;
    });
}

/// NFTs owned by the wallet. Failures are logged and leave the gallery empty.
pub(crate) fn fetch_nfts(services: Services, event_tx: Sender<AppEvent>) {
    spawn(async move {
        let _guard = LoadingGuard::new(event_tx.clone());
        let owner = services.wallet.pubkey();
        let nfts = match services.metadata.find_all_by_owner(&owner).await {
            Ok(nfts) => nfts,
            Err(e) => {
                error!("Error fetching NFTs: {}", e);
                Vec::new()
            }
        };
        let _ = event_tx.send(AppEvent::NftsLoaded(nfts)).await;
    });
}

/// Run one token action, streaming stage changes to the status line.
pub(crate) fn run_action(
    services: Services,
    notifications: Arc<NotificationService>,
    event_tx: Sender<AppEvent>,
    action: PendingAction,
) {
    let progress_tx = event_tx.clone();
    let observer = Arc::new(move |_stage: ActionStage, status: &str| {
        if !status.is_empty() {
            let _ = progress_tx.try_send(AppEvent::ActionProgress(status.to_string()));
        }
    });

    spawn(async move {
        let _guard = LoadingGuard::new(event_tx.clone());
        let outcome = services
            .orchestrator()
            .with_observer(observer)
            .run(&action, &notifications)
            .await;
        let _ = event_tx.send(AppEvent::ActionFinished(outcome)).await;
    });
}
