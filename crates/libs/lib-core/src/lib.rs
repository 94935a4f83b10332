//! # Core Library
//!
//! Configuration, the application-wide error taxonomy, and the shared
//! notification/theme context used by every screen.

pub mod config;
pub mod context;
pub mod error;

// Re-export commonly used types
pub use config::Config;
pub use context::{AppContext, Notification, NotificationId, NotificationService, Severity, ThemeService};
pub use error::{AppError, Result};
