//! Configuration and local persistence for the Stash UI.
//!
//! This crate provides key-combination parsing for the hotkey layer, the
//! runtime configuration loader, and the device-local preference store.

pub mod combo;
pub mod constants;
mod loader;
pub mod persistence;

pub use combo::{Combination, ComboError, KeyCodeName, KeyStroke, ModifierFlags};
pub use loader::{ConfigError, ConfigLoader, UiConfig, env_var_or_none};
pub use persistence::{
    ChangelogConfig, ImageLightboxConfig, InterfaceConfig, LocalItem, LocalStore, QueryConfig,
    StoreError,
};
