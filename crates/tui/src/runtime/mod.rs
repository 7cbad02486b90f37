//! Runtime components for the TUI application.
//!
//! This module contains the runtime infrastructure for the TUI:
//! - Terminal management (TerminalGuard)
//! - File logging setup
//!
//! Does NOT handle:
//! - UI rendering or input handling (see `stash_tui::app` and `stash_tui::ui`).
//!
//! Invariants:
//! - All modules are initialized during application startup in `main()`.

pub mod logging;
pub mod terminal;
