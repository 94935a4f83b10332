//! # Shared Context
//!
//! Process-wide services every screen reads: the notification queue and the
//! theme flag. Both are cheap to clone through [`AppContext`].

mod notification;
mod theme;

use std::sync::Arc;

pub use notification::{Notification, NotificationId, NotificationService, Severity};
pub use theme::ThemeService;

/// Handle to the shared services.
#[derive(Clone, Default)]
pub struct AppContext {
    pub notifications: Arc<NotificationService>,
    pub theme: Arc<ThemeService>,
}

impl AppContext {
    pub fn new() -> Self {
        Self::default()
    }
}
