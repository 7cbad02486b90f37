//! Path helpers for the local store location.

use std::path::PathBuf;

use anyhow::Context;

use crate::constants::{APP_DIR_NAME, STORE_FILE_NAME};

/// Returns the default path to the local preference store.
///
/// - Linux/macOS: `~/.config/stash-ui/local-store.json`
/// - Windows: `%AppData%\stash-ui\local-store.json`
pub fn default_store_path() -> Result<PathBuf, anyhow::Error> {
    let proj_dirs = directories::ProjectDirs::from("", "", APP_DIR_NAME)
        .context("Failed to determine project directories")?;

    Ok(proj_dirs.config_dir().join(STORE_FILE_NAME))
}
