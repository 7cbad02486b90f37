//! Configuration loader for environment variables and defaults.
//!
//! Responsibilities:
//! - Load runtime configuration from `.env` files, environment variables and
//!   platform defaults.
//! - Provide a builder-pattern `ConfigLoader` for layered configuration merging.
//! - Enforce `DOTENV_DISABLED` gate to prevent accidental dotenv loading in tests.
//!
//! Does NOT handle:
//! - Persisting preferences back to disk (see `persistence`).
//! - Parsing key combinations (see `combo`).
//!
//! Invariants / Assumptions:
//! - Values set after `from_env()` (CLI flags) take precedence over environment values.
//! - `load_dotenv()` must be called explicitly to enable `.env` file loading.

mod builder;
mod env;
mod error;

pub use builder::{ConfigLoader, UiConfig};
pub use env::env_var_or_none;
pub use error::ConfigError;
