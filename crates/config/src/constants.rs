//! Centralized constants for the Stash UI workspace.
//!
//! This module contains default values used across crates to avoid
//! magic number duplication and improve maintainability.

// =============================================================================
// Hotkey Defaults
// =============================================================================

/// Default inactivity window after which a partially typed key sequence is dropped.
pub const DEFAULT_SEQUENCE_TIMEOUT_MS: u64 = 1000;

/// Maximum allowed sequence timeout in milliseconds.
pub const MAX_SEQUENCE_TIMEOUT_MS: u64 = 10_000;

// =============================================================================
// Local Store
// =============================================================================

/// Application directory name used for platform config paths.
pub const APP_DIR_NAME: &str = "stash-ui";

/// File name of the local preference store.
pub const STORE_FILE_NAME: &str = "local-store.json";

/// Store key holding interface preferences (query config, lightbox).
pub const INTERFACE_KEY: &str = "interface";

/// Store key holding the changelog read-state.
pub const CHANGELOG_KEY: &str = "changelog";

// =============================================================================
// Environment Variables
// =============================================================================

/// Overrides the key sequence timeout (milliseconds).
pub const ENV_SEQUENCE_TIMEOUT_MS: &str = "STASH_HOTKEY_SEQUENCE_TIMEOUT_MS";

/// Overrides the local store file path.
pub const ENV_STORE_PATH: &str = "STASH_UI_STORE_PATH";

/// When set, `.env` files are never loaded.
pub const ENV_DOTENV_DISABLED: &str = "DOTENV_DISABLED";

// =============================================================================
// UI
// =============================================================================

/// Tick interval for redrawing the terminal UI when idle.
pub const DEFAULT_UI_TICK_MS: u64 = 250;

/// Number of dispatched hotkeys kept in the on-screen history.
pub const HOTKEY_HISTORY_LEN: usize = 8;
