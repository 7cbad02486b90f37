//! Stash TUI Library
//!
//! This library provides the hotkey registry and the performer page demo
//! built on it: application state, panels, and rendering.
//!
//! # Example
//!
//! ```rust
//! use std::time::Duration;
//! use stash_tui::hotkeys::{HotkeyRegistry, SequenceListener, callback};
//!
//! let registry = HotkeyRegistry::new(SequenceListener::new(Duration::from_secs(1)));
//! let disposer = registry.bind("r 3", callback(|event| println!("{} fired", event.combo)));
//! assert!(registry.dispatch("r 3"));
//! disposer.dispose();
//! assert!(!registry.is_bound("r 3"));
//! ```

pub mod action;
pub mod app;
pub mod cli;
pub mod hotkeys;
pub mod runtime;
pub mod ui;

// Re-export commonly used types at the crate root
pub use action::{Action, ActionQueue, Tab};
pub use app::App;
pub use hotkeys::{ComboSet, HotkeyRegistry, HotkeyScope, SequenceListener};
