//! Preference types and store errors.
//!
//! Invariants:
//! - Every field is optional or defaulted so partial documents always load.
//! - Field names are serialized camelCase to stay compatible with stores
//!   written by the web client.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Per-list query preferences (display mode and pagination).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct QueryConfig {
    /// Display mode index (grid, list, wall, ...).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disp: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items_per_page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_page: Option<u32>,
}

/// Image lightbox preferences.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ImageLightboxConfig {
    /// Slideshow delay in seconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slideshow_delay: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_mode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale_up: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reset_zoom_on_nav: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scroll_mode: Option<String>,
}

/// Interface preferences stored under the `"interface"` key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct InterfaceConfig {
    /// Query preferences keyed by list name (e.g. "performers", "images").
    pub query_config: BTreeMap<String, QueryConfig>,
    pub image_lightbox: ImageLightboxConfig,
}

/// Which release notes the user has already dismissed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChangelogConfig {
    /// Version string -> seen.
    pub versions: BTreeMap<String, bool>,
}

/// Errors that can occur when reading or writing the local store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Failed to read local store at {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse local store at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Failed to write local store at {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Local store at {path} was unreadable when opened; refusing to overwrite it")]
    Unreadable { path: PathBuf },

    #[error("Failed to serialize local store: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Stored value for '{key}' does not match the expected shape: {message}")]
    Decode { key: String, message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interface_config_camel_case() {
        let mut config = InterfaceConfig::default();
        config.query_config.insert(
            "performers".to_string(),
            QueryConfig {
                items_per_page: Some(40),
                ..Default::default()
            },
        );
        let value = serde_json::to_value(&config).unwrap();
        assert_eq!(value["queryConfig"]["performers"]["itemsPerPage"], 40);
        assert!(value["queryConfig"]["performers"].get("disp").is_none());
    }

    #[test]
    fn test_partial_document_loads() {
        let config: InterfaceConfig =
            serde_json::from_str(r#"{"imageLightbox":{"slideshowDelay":5}}"#).unwrap();
        assert_eq!(config.image_lightbox.slideshow_delay, Some(5));
        assert!(config.query_config.is_empty());
    }

    #[test]
    fn test_changelog_default_is_empty() {
        let config: ChangelogConfig = serde_json::from_str("{}").unwrap();
        assert!(config.versions.is_empty());
    }
}
