//! # Environment Variables
//!
//! Utilities for reading and parsing environment variables.

use std::env;
use std::str::FromStr;

/// Get an environment variable by name.
pub fn get_env(name: &'static str) -> Result<String, EnvError> {
    env::var(name).map_err(|_| EnvError::MissingEnv(name))
}

/// Get an environment variable, falling back to `default` when unset or blank.
pub fn get_env_or(name: &'static str, default: &str) -> String {
    match get_env(name) {
        Ok(val) if !val.trim().is_empty() => val,
        _ => default.to_string(),
    }
}

/// Get and parse an environment variable.
pub fn get_env_parse<T: FromStr>(name: &'static str) -> Result<T, EnvError> {
    let val = get_env(name)?;
    val.trim().parse::<T>().map_err(|_| EnvError::WrongFormat(name))
}

/// Parse an optional environment variable.
///
/// Unset means `default`; set but unparsable is still an error so typos in
/// `.env` surface at startup instead of silently taking the default.
pub fn get_env_parse_or<T: FromStr>(name: &'static str, default: T) -> Result<T, EnvError> {
    match get_env_parse(name) {
        Ok(val) => Ok(val),
        Err(EnvError::MissingEnv(_)) => Ok(default),
        Err(e) => Err(e),
    }
}

// region:    --- Error
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum EnvError {
    #[error("missing environment variable {0}")]
    MissingEnv(&'static str),
    #[error("environment variable {0} has the wrong format")]
    WrongFormat(&'static str),
}
// endregion: --- Error
