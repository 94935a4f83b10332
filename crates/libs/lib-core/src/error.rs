//! # Centralized Error Handling
//!
//! [`AppError`] is the single error type used by the service crates and the UI.
//! Variants follow the failure taxonomy of a token action:
//!
//! 1. **Input** - [`Validation`](AppError::Validation), [`Config`](AppError::Config)
//! 2. **Preconditions** - [`Precondition`](AppError::Precondition) (non-zero balance on
//!    close, missing delegate on revoke)
//! 3. **Collaborators** - [`Rejected`](AppError::Rejected) (wallet),
//!    [`RateLimited`](AppError::RateLimited) / [`Rpc`](AppError::Rpc) (RPC),
//!    [`Storage`](AppError::Storage) (content upload)
//! 4. **Transaction lifecycle** - [`Submission`](AppError::Submission) (send failed,
//!    carries program logs), [`Confirmation`](AppError::Confirmation) (landed but failed)
//!
//! Only [`RateLimited`](AppError::RateLimited) is ever retried.
//!
//! ## Friendly hints
//!
//! Raw RPC failures are hard to read. [`friendly_hint`] maps known program log
//! fragments to a sentence a user can act on; when nothing matches the raw
//! message is shown instead.
//!
//! ```rust
//! use lib_core::error::friendly_hint;
//!
//! let logs = vec!["Program log: Error: insufficient funds".to_string()];
//! assert!(friendly_hint(&logs).unwrap().starts_with("Insufficient funds"));
//! ```

use thiserror::Error;

/// Convenience type alias for `Result<T, AppError>`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Known log fragments and the message shown for them.
const LOG_HINTS: &[(&str, &str)] = &[
    (
        "insufficient funds",
        "Insufficient funds to complete this transaction. Please check your balance and try again.",
    ),
    (
        "Non-native account can only be closed if its balance is zero",
        "Cannot close account with non-zero balance. Please transfer or burn remaining tokens first.",
    ),
];

/// Application-wide error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Missing required field, malformed address or amount, unsupported selection.
    #[error("{0}")]
    Validation(String),

    /// The RPC or metadata backend answered with HTTP 429 / "Too Many Requests".
    #[error("Rate limited: {0}")]
    RateLimited(String),

    /// On-chain state forbids the action.
    #[error("{0}")]
    Precondition(String),

    /// The wallet refused to sign.
    #[error("Wallet rejected the request: {0}")]
    Rejected(String),

    /// Sending the transaction failed (preflight or transport).
    #[error("Transaction submission failed: {message}")]
    Submission { message: String, logs: Vec<String> },

    /// The transaction landed but executed with an error.
    #[error("Transaction failed to confirm: {0}")]
    Confirmation(String),

    /// Any other RPC failure.
    #[error("RPC error: {0}")]
    Rpc(String),

    /// Content storage upload or gateway failure.
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Whether the retry policy should try again.
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, AppError::RateLimited(_))
    }

    /// Friendly replacement for this error, if one of the known patterns matches
    /// either its program logs or its message.
    pub fn hint(&self) -> Option<&'static str> {
        if let AppError::Submission { logs, .. } = self {
            if let Some(hint) = friendly_hint(logs) {
                return Some(hint);
            }
        }
        hint_for_text(&self.to_string())
    }

    /// Message suitable for a notification.
    pub fn user_message(&self) -> String {
        if let Some(hint) = self.hint() {
            return hint.to_string();
        }
        match self {
            AppError::Validation(msg)
            | AppError::Precondition(msg)
            | AppError::Rejected(msg)
            | AppError::Confirmation(msg)
            | AppError::Rpc(msg)
            | AppError::Storage(msg) => msg.clone(),
            AppError::Submission { message, .. } => message.clone(),
            AppError::RateLimited(_) => "Rate limit exceeded. Please try again later.".to_string(),
            AppError::Config(_) | AppError::Internal(_) => self.to_string(),
        }
    }
}

/// Classify a raw RPC/transport error string.
pub fn classify_rpc_error(raw: impl Into<String>) -> AppError {
    let raw = raw.into();
    if is_rate_limit_message(&raw) {
        AppError::RateLimited(raw)
    } else {
        AppError::Rpc(raw)
    }
}

/// HTTP 429 in any of the shapes RPC providers return it.
pub fn is_rate_limit_message(raw: &str) -> bool {
    raw.contains("429") || raw.to_ascii_lowercase().contains("too many requests")
}

/// First hint whose pattern appears in any of the log lines.
pub fn friendly_hint(logs: &[String]) -> Option<&'static str> {
    logs.iter().find_map(|line| hint_for_text(line))
}

fn hint_for_text(text: &str) -> Option<&'static str> {
    LOG_HINTS
        .iter()
        .find(|(pattern, _)| text.contains(pattern))
        .map(|(_, hint)| *hint)
}

/// Convert `serde_json::Error` to `AppError`.
impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Internal(format!("JSON error: {}", err))
    }
}

impl From<lib_utils::EnvError> for AppError {
    fn from(err: lib_utils::EnvError) -> Self {
        AppError::Config(err.to_string())
    }
}
