//! The local preference store.
//!
//! Responsibilities:
//! - Hold one JSON document mapping item keys to values, mirrored on disk.
//! - Resolve typed items with defaults and keep an in-memory cache of every
//!   value resolved or written through the store.
//! - Apply partial updates with deep-merge semantics.
//!
//! Invariants:
//! - Objects merge key-by-key; arrays and scalars in a patch replace wholesale.
//! - Unchanged merges never touch the disk.
//! - A stored string is decoded as JSON before use (older clients stored
//!   serialized strings).

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use super::create_corrupt_backup;
use super::state::{ChangelogConfig, InterfaceConfig, StoreError};
use crate::constants::{CHANGELOG_KEY, INTERFACE_KEY};

/// Deep-merge `patch` into `base`.
///
/// Objects are merged recursively; any other patch value (including arrays
/// and `null`) replaces the base value entirely.
///
/// ```
/// use serde_json::json;
/// use stash_config::persistence::deep_merge;
///
/// let merged = deep_merge(
///     json!({"a": {"x": 1, "y": 2}, "list": [1, 2, 3]}),
///     json!({"a": {"y": 5}, "list": [9]}),
/// );
/// assert_eq!(merged, json!({"a": {"x": 1, "y": 5}, "list": [9]}));
/// ```
pub fn deep_merge(base: Value, patch: Value) -> Value {
    match (base, patch) {
        (Value::Object(mut base), Value::Object(patch)) => {
            for (key, patch_value) in patch {
                let merged = match base.remove(&key) {
                    Some(base_value) => deep_merge(base_value, patch_value),
                    None => patch_value,
                };
                base.insert(key, merged);
            }
            Value::Object(base)
        }
        (_, patch) => patch,
    }
}

/// A typed view of one store key.
pub struct LocalItem<T> {
    key: String,
    data: T,
    error: Option<StoreError>,
}

impl<T> LocalItem<T> {
    /// The store key this item is bound to.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Current value (the default when nothing usable was stored).
    pub fn data(&self) -> &T {
        &self.data
    }

    /// The error hit while resolving this item, if any.
    pub fn error(&self) -> Option<&StoreError> {
        self.error.as_ref()
    }

    /// Consume the item, returning its value.
    pub fn into_data(self) -> T {
        self.data
    }
}

impl<T: fmt::Debug> fmt::Debug for LocalItem<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocalItem")
            .field("key", &self.key)
            .field("data", &self.data)
            .field("error", &self.error.as_ref().map(ToString::to_string))
            .finish()
    }
}

/// File-backed key-value store for device-local UI preferences.
#[derive(Debug)]
pub struct LocalStore {
    path: PathBuf,
    document: Map<String, Value>,
    cache: HashMap<String, Value>,
    open_error: Option<StoreError>,
}

impl LocalStore {
    /// Open the store at `path`.
    ///
    /// A missing file yields an empty store. A file that is not a JSON object
    /// is backed up and the store starts empty; the failure is kept in
    /// [`open_error`](Self::open_error).
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let (document, open_error) = match read_document(&path) {
            Ok(document) => (document, None),
            Err(err @ StoreError::Parse { .. }) => {
                match create_corrupt_backup(&path) {
                    Ok(backup) => warn!(
                        path = %path.display(),
                        backup = %backup.display(),
                        error = %err,
                        "Local store is corrupt; backed up and starting empty"
                    ),
                    Err(e) => warn!(
                        path = %path.display(),
                        error = %e,
                        "Local store is corrupt and could not be backed up"
                    ),
                }
                (Map::new(), Some(err))
            }
            Err(err) => {
                warn!(path = %path.display(), error = %err, "Local store unreadable");
                (Map::new(), Some(err))
            }
        };

        Self {
            path,
            document,
            cache: HashMap::new(),
            open_error,
        }
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The error hit while opening the store, if any.
    pub fn open_error(&self) -> Option<&StoreError> {
        self.open_error.as_ref()
    }

    /// Resolve the item stored under `key`, falling back to `default`.
    pub fn item<T>(&mut self, key: &str, default: T) -> LocalItem<T>
    where
        T: Serialize + DeserializeOwned,
    {
        let raw = match self.cache.get(key) {
            Some(cached) => Some(cached.clone()),
            None => self.document.get(key).cloned(),
        };

        let (data, error) = match raw.map(decode_legacy_string) {
            None | Some(Ok(Value::Null)) => (default, None),
            Some(Ok(value)) => match serde_json::from_value::<T>(value) {
                Ok(data) => (data, None),
                Err(e) => (default, Some(decode_error(key, e))),
            },
            Some(Err(e)) => (default, Some(decode_error(key, e))),
        };

        if let Some(err) = &error {
            warn!(key, error = %err, "Falling back to default for local store item");
        }

        match serde_json::to_value(&data) {
            Ok(resolved) => {
                self.cache.insert(key.to_string(), resolved);
            }
            Err(e) => debug!(key, error = %e, "Resolved item is not serializable"),
        }

        LocalItem {
            key: key.to_string(),
            data,
            error,
        }
    }

    /// Interface preferences (`"interface"`).
    pub fn interface_config(&mut self) -> LocalItem<InterfaceConfig> {
        self.item(INTERFACE_KEY, InterfaceConfig::default())
    }

    /// Changelog read-state (`"changelog"`).
    pub fn changelog_config(&mut self) -> LocalItem<ChangelogConfig> {
        self.item(CHANGELOG_KEY, ChangelogConfig::default())
    }

    /// Deep-merge `patch` into the item and persist the result.
    ///
    /// Returns `Ok(false)` when the merge left the value unchanged (no write).
    ///
    /// # Errors
    ///
    /// Returns an error if the merged value no longer fits `T` or the file
    /// cannot be written. On error the item and cache are left untouched.
    pub fn set_data<T>(&mut self, item: &mut LocalItem<T>, patch: Value) -> Result<bool, StoreError>
    where
        T: Serialize + DeserializeOwned,
    {
        let previous = serde_json::to_value(&item.data)?;
        let merged = deep_merge(previous, patch);
        let data: T =
            serde_json::from_value(merged).map_err(|e| decode_error(&item.key, e))?;
        let normalized = serde_json::to_value(&data)?;

        if self.cache.get(&item.key) == Some(&normalized) {
            debug!(key = %item.key, "Local store item unchanged; skipping write");
            return Ok(false);
        }

        let previous_doc = self.document.insert(item.key.clone(), normalized.clone());
        if let Err(e) = self.persist() {
            match previous_doc {
                Some(value) => self.document.insert(item.key.clone(), value),
                None => self.document.remove(&item.key),
            };
            return Err(e);
        }

        self.cache.insert(item.key.clone(), normalized);
        item.data = data;
        item.error = None;
        debug!(key = %item.key, "Local store item updated");
        Ok(true)
    }

    /// Like [`set_data`](Self::set_data) with a patch computed from the current value.
    pub fn update_data<T, F>(&mut self, item: &mut LocalItem<T>, f: F) -> Result<bool, StoreError>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce(&T) -> Value,
    {
        let patch = f(&item.data);
        self.set_data(item, patch)
    }

    /// Write the document atomically.
    fn persist(&self) -> Result<(), StoreError> {
        if matches!(self.open_error, Some(StoreError::Read { .. })) {
            return Err(StoreError::Unreadable {
                path: self.path.clone(),
            });
        }

        let write_err = |source| StoreError::Write {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(write_err)?;
        }

        let content = serde_json::to_string_pretty(&self.document)?;
        let temp_path = self.path.with_extension("tmp");
        std::fs::write(&temp_path, content).map_err(write_err)?;
        std::fs::rename(&temp_path, &self.path).map_err(write_err)?;
        Ok(())
    }
}

fn read_document(path: &Path) -> Result<Map<String, Value>, StoreError> {
    // Bytes, not a string: invalid UTF-8 must surface as a parse failure so the
    // file gets backed up like any other corrupt store.
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Map::new()),
        Err(source) => {
            return Err(StoreError::Read {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Map::new());
    }

    serde_json::from_slice::<Map<String, Value>>(&bytes).map_err(|source| StoreError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn decode_legacy_string(value: Value) -> Result<Value, serde_json::Error> {
    match value {
        Value::String(s) => serde_json::from_str(&s),
        other => Ok(other),
    }
}

fn decode_error(key: &str, e: serde_json::Error) -> StoreError {
    StoreError::Decode {
        key: key.to_string(),
        message: e.to_string(),
    }
}
