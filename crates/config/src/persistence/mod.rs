//! Local persistence for UI preferences.
//!
//! Responsibilities:
//! - Determine the platform path of the local preference store.
//! - Read and write preference items (`LocalStore`, `LocalItem`) with
//!   deep-merge updates.
//! - Back up corrupt store files before they are overwritten.
//!
//! Does NOT handle:
//! - Loading environment variables (see `loader`).
//! - Anything served by the remote API: these are device-local settings only.
//!
//! Invariants:
//! - Writes are atomic (temp file + rename).
//! - A write only happens when the merged value differs from the cached one.
//! - Corrupt store files are backed up before being overwritten.

use std::path::{Path, PathBuf};

mod path;
mod state;
mod store;

pub use path::default_store_path;
pub use state::{ChangelogConfig, ImageLightboxConfig, InterfaceConfig, QueryConfig, StoreError};
pub use store::{LocalItem, LocalStore, deep_merge};

/// Creates a backup of a corrupt store file before it is overwritten.
///
/// The original file is renamed to a path with a `.corrupt.{timestamp}`
/// extension so its contents stay recoverable.
pub(crate) fn create_corrupt_backup(path: &Path) -> Result<PathBuf, std::io::Error> {
    let timestamp = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();

    let backup_path = path.with_extension(format!("corrupt.{}", timestamp));

    std::fs::rename(path, &backup_path)?;

    Ok(backup_path)
}
