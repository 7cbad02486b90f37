//! Builder for the runtime UI configuration.
//!
//! Invariants:
//! - `build()` validates the sequence timeout range.
//! - Without an explicit store path the platform config directory is used.

use std::path::PathBuf;
use std::time::Duration;

use tracing::debug;

use super::env::apply_env;
use super::error::ConfigError;
use crate::constants::{
    DEFAULT_SEQUENCE_TIMEOUT_MS, ENV_DOTENV_DISABLED, MAX_SEQUENCE_TIMEOUT_MS,
};
use crate::persistence::default_store_path;

/// Resolved runtime configuration for the UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UiConfig {
    /// Inactivity window after which a partial key sequence is dropped.
    pub sequence_timeout: Duration,
    /// Location of the local preference store.
    pub store_path: PathBuf,
}

/// Configuration loader that builds a [`UiConfig`] from layered sources.
#[derive(Debug, Default, Clone)]
pub struct ConfigLoader {
    sequence_timeout: Option<Duration>,
    store_path: Option<PathBuf>,
}

impl ConfigLoader {
    /// Create a new configuration loader.
    pub fn new() -> Self {
        Self::default()
    }

    fn dotenv_disabled() -> bool {
        matches!(
            std::env::var(ENV_DOTENV_DISABLED).ok().as_deref(),
            Some("true") | Some("1")
        )
    }

    /// Load environment variables from .env file if present.
    ///
    /// If `DOTENV_DISABLED` is set to "true" or "1", the .env file is not loaded.
    /// Missing `.env` files are silently ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if the `.env` file exists but cannot be read or parsed.
    pub fn load_dotenv(self) -> Result<Self, ConfigError> {
        if Self::dotenv_disabled() {
            return Ok(self);
        }

        match dotenvy::dotenv() {
            Ok(_) => Ok(self),
            Err(e) if Self::is_not_found(&e) => Ok(self),
            Err(dotenvy::Error::LineParse(_, idx)) => {
                Err(ConfigError::DotenvParse { error_index: idx })
            }
            Err(dotenvy::Error::Io(io_err)) => Err(ConfigError::DotenvIo {
                kind: io_err.kind(),
            }),
            Err(_) => Err(ConfigError::DotenvUnknown),
        }
    }

    fn is_not_found(err: &dotenvy::Error) -> bool {
        matches!(
            err,
            dotenvy::Error::Io(io_err) if io_err.kind() == std::io::ErrorKind::NotFound
        )
    }

    /// Apply `STASH_*` environment variables.
    pub fn from_env(mut self) -> Result<Self, ConfigError> {
        apply_env(&mut self)?;
        Ok(self)
    }

    /// Set the key sequence timeout.
    pub fn with_sequence_timeout(mut self, timeout: Duration) -> Self {
        self.sequence_timeout = Some(timeout);
        self
    }

    /// Set the local store path.
    pub fn with_store_path(mut self, path: PathBuf) -> Self {
        self.store_path = Some(path);
        self
    }

    pub(super) fn set_sequence_timeout(&mut self, timeout: Option<Duration>) {
        if timeout.is_some() {
            self.sequence_timeout = timeout;
        }
    }

    pub(super) fn set_store_path(&mut self, path: Option<PathBuf>) {
        if path.is_some() {
            self.store_path = path;
        }
    }

    /// Build the final configuration.
    pub fn build(self) -> Result<UiConfig, ConfigError> {
        let sequence_timeout = self
            .sequence_timeout
            .unwrap_or(Duration::from_millis(DEFAULT_SEQUENCE_TIMEOUT_MS));
        let ms = u64::try_from(sequence_timeout.as_millis()).unwrap_or(u64::MAX);
        if ms == 0 || ms > MAX_SEQUENCE_TIMEOUT_MS {
            return Err(ConfigError::InvalidSequenceTimeout { ms });
        }

        let store_path = match self.store_path {
            Some(path) => path,
            None => default_store_path().map_err(|e| {
                debug!("no platform store path: {e:#}");
                ConfigError::NoStorePath
            })?,
        };

        Ok(UiConfig {
            sequence_timeout,
            store_path,
        })
    }
}
