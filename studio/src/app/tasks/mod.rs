//! # Async Tasks
//!
//! Every user-triggered flow runs as a spawned Tokio task that reports back
//! through the event channel. Each task holds a [`LoadingGuard`] so the loading
//! indicator is cleared on every exit path, panics included.

pub mod collection;
pub mod create;
pub mod swap;
pub mod tokens;

use async_channel::Sender;

use crate::app::events::AppEvent;

/// Sends [`AppEvent::LoadingFinished`] when dropped.
pub struct LoadingGuard {
    event_tx: Sender<AppEvent>,
}

impl LoadingGuard {
    pub fn new(event_tx: Sender<AppEvent>) -> Self {
        Self { event_tx }
    }
}

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        // Unbounded channel; only fails once the UI is gone.
        let _ = self.event_tx.try_send(AppEvent::LoadingFinished);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_guard_reports_on_panic() {
        let (tx, rx) = async_channel::unbounded();

        let handle = tokio::spawn(async move {
            let _guard = LoadingGuard::new(tx);
            panic!("flow failed");
        });

        assert!(handle.await.is_err());
        assert!(matches!(rx.try_recv(), Ok(AppEvent::LoadingFinished)));
    }

    #[test]
    fn test_guard_reports_once_on_drop() {
        let (tx, rx) = async_channel::unbounded();
        drop(LoadingGuard::new(tx));
        assert!(matches!(rx.try_recv(), Ok(AppEvent::LoadingFinished)));
        assert!(rx.try_recv().is_err());
    }
}
