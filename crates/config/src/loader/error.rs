//! Error types for configuration loading.
//!
//! Invariants:
//! - All error variants include context for debugging (variable names, values).
//! - Dotenv errors NEVER include raw .env line contents.

use std::io::ErrorKind;

use thiserror::Error;

use crate::constants::MAX_SEQUENCE_TIMEOUT_MS;

/// Errors that can occur during configuration loading.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value for {var}: {message}")]
    InvalidValue { var: String, message: String },

    #[error("Invalid sequence timeout {ms}ms: must be between 1 and {MAX_SEQUENCE_TIMEOUT_MS}")]
    InvalidSequenceTimeout { ms: u64 },

    #[error("Unable to determine a local store path. Set STASH_UI_STORE_PATH or pass --store-path.")]
    NoStorePath,

    /// Failed to parse the `.env` file due to invalid syntax.
    ///
    /// Only the byte index of the failure is reported.
    #[error(
        "Failed to parse .env file at position {error_index}. Hint: set DOTENV_DISABLED=1 to skip .env loading"
    )]
    DotenvParse { error_index: usize },

    /// Failed to read the `.env` file due to an I/O error.
    #[error("Failed to read .env file: {kind}")]
    DotenvIo { kind: ErrorKind },

    /// Unknown dotenv error (future variants from dotenvy crate).
    #[error("Failed to load .env file")]
    DotenvUnknown,
}
