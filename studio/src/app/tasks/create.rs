//! # Creation Task

use std::sync::Arc;

use async_channel::Sender;
use lib_core::NotificationService;
use lib_solana::CreateRequest;
use tokio::spawn;

use super::LoadingGuard;
use crate::app::events::AppEvent;
use crate::app::services::Services;

pub(crate) fn create_asset(
    services: Services,
    notifications: Arc<NotificationService>,
    event_tx: Sender<AppEvent>,
    request: CreateRequest,
) {
    spawn(async move {
        let _guard = LoadingGuard::new(event_tx.clone());
        let created_tx = event_tx.clone();
        services
            .creation()
            .run(&request, &notifications, move |asset| {
                let _ = created_tx.try_send(AppEvent::AssetCreated(asset.clone()));
            })
            .await;
    });
}
