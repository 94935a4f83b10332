//! # Collection Tasks

use std::sync::Arc;

use async_channel::Sender;
use lib_core::NotificationService;
use tokio::spawn;

use super::LoadingGuard;
use crate::app::events::AppEvent;
use crate::app::services::Services;

pub(crate) fn create_collection(
    services: Services,
    notifications: Arc<NotificationService>,
    event_tx: Sender<AppEvent>,
    name: String,
    symbol: String,
    image_uri: String,
) {
    spawn(async move {
        let _guard = LoadingGuard::new(event_tx.clone());
        if let Some(record) = services
            .collections()
            .run_create(&name, &symbol, &image_uri, &notifications)
            .await
        {
            let _ = event_tx.send(AppEvent::CollectionCreated(record)).await;
        }
    });
}

pub(crate) fn add_to_collection(
    services: Services,
    notifications: Arc<NotificationService>,
    event_tx: Sender<AppEvent>,
    nft_mint: String,
    collection_mint: String,
) {
    spawn(async move {
        let _guard = LoadingGuard::new(event_tx.clone());
        if let Some(membership) = services
            .collections()
            .run_add(&nft_mint, &collection_mint, &notifications)
            .await
        {
            let _ = event_tx.send(AppEvent::CollectionMemberAdded(membership)).await;
        }
    });
}
