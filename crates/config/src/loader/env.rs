//! Environment variable parsing for configuration.
//!
//! Invariants:
//! - Empty or whitespace-only environment variables are treated as unset.
//! - Returned values are trimmed.
//! - Invalid numeric values return `ConfigError::InvalidValue`.

use std::path::PathBuf;
use std::time::Duration;

use super::builder::ConfigLoader;
use super::error::ConfigError;
use crate::constants::{ENV_SEQUENCE_TIMEOUT_MS, ENV_STORE_PATH};

/// Read an environment variable, returning None if unset, empty, or whitespace-only.
/// Returns the trimmed value if present.
pub fn env_var_or_none(key: &str) -> Option<String> {
    std::env::var(key).ok().and_then(|s| {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            None
        } else if trimmed.len() == s.len() {
            Some(s)
        } else {
            Some(trimmed.to_string())
        }
    })
}

/// Apply environment variable configuration to the loader.
pub(super) fn apply_env(loader: &mut ConfigLoader) -> Result<(), ConfigError> {
    if let Some(timeout) = env_var_or_none(ENV_SEQUENCE_TIMEOUT_MS) {
        let ms: u64 = timeout.parse().map_err(|_| ConfigError::InvalidValue {
            var: ENV_SEQUENCE_TIMEOUT_MS.to_string(),
            message: "must be a whole number of milliseconds".to_string(),
        })?;
        loader.set_sequence_timeout(Some(Duration::from_millis(ms)));
    }
    if let Some(path) = env_var_or_none(ENV_STORE_PATH) {
        loader.set_store_path(Some(PathBuf::from(path)));
    }
    Ok(())
}
