//! # Notification Service
//!
//! An ordered queue of transient user-facing messages. Any component may append;
//! entries leave the queue only when dismissed by id.
//!
//! The queue is unbounded. A long session that never dismisses anything keeps
//! every message in memory.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::Serialize;

/// Unique id handed out by [`NotificationService::add`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct NotificationId(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Severity {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone, Serialize)]
pub struct Notification {
    pub id: NotificationId,
    pub message: String,
    pub severity: Severity,
    pub created_at: DateTime<Utc>,
}

#[derive(Default)]
pub struct NotificationService {
    queue: Mutex<Vec<Notification>>,
    next_id: AtomicU64,
}

impl NotificationService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a notification and return its id.
    pub fn add(&self, message: impl Into<String>, severity: Severity) -> NotificationId {
        let id = NotificationId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let message = message.into();
        tracing::debug!(id = id.0, ?severity, "Notification: {}", message);

        self.queue.lock().push(Notification {
            id,
            message,
            severity,
            created_at: Utc::now(),
        });
        id
    }

    pub fn info(&self, message: impl Into<String>) -> NotificationId {
        self.add(message, Severity::Info)
    }

    pub fn success(&self, message: impl Into<String>) -> NotificationId {
        self.add(message, Severity::Success)
    }

    pub fn error(&self, message: impl Into<String>) -> NotificationId {
        self.add(message, Severity::Error)
    }

    /// Remove the notification with `id`. Returns false if it was already gone.
    pub fn remove(&self, id: NotificationId) -> bool {
        let mut queue = self.queue.lock();
        let before = queue.len();
        queue.retain(|n| n.id != id);
        queue.len() != before
    }

    /// Current queue, oldest first.
    pub fn snapshot(&self) -> Vec<Notification> {
        self.queue.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.queue.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.lock().is_empty()
    }
}
