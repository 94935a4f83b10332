//! # Utilities Library
//!
//! Shared helpers for environment variables and form input validation.

pub mod envs;
pub mod validation;

// Re-export commonly used functions
pub use envs::{EnvError, get_env, get_env_or, get_env_parse, get_env_parse_or};
pub use validation::{validate_decimal, validate_max_length, validate_not_empty};
