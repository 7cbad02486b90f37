//! Command-line argument parsing for stash-tui.
//!
//! Responsibilities:
//! - Define CLI argument structure using clap derive macros.
//! - Provide parsed CLI arguments to the main application.
//!
//! Does NOT handle:
//! - Configuration loading or validation (see `stash_config::ConfigLoader`).
//! - Terminal state management (see `runtime::terminal`).
//!
//! Invariants:
//! - CLI arguments are parsed once at startup via `Cli::parse()`.

use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

/// Command-line arguments for stash-tui.
///
/// Configuration precedence (highest to lowest):
/// 1. CLI arguments (e.g., --store-path, --sequence-timeout-ms)
/// 2. Environment variables (e.g., STASH_UI_STORE_PATH)
/// 3. Default values
#[derive(Debug, Parser)]
#[command(
    name = "stash-tui",
    about = "Keyboard-driven performer page with layered hotkeys",
    version,
    after_help = "Examples:\n  stash-tui\n  stash-tui --store-path ./store.json\n  stash-tui --sequence-timeout-ms 1500\n  stash-tui --log-dir /tmp/stash-tui --fresh\n"
)]
pub struct Cli {
    /// Directory for log files
    #[arg(long, default_value = "logs")]
    pub log_dir: PathBuf,

    /// Path to the local preference store
    #[arg(long)]
    pub store_path: Option<PathBuf>,

    /// Milliseconds allowed between the keys of a sequence such as "r 3"
    #[arg(long)]
    pub sequence_timeout_ms: Option<u64>,

    /// Start with fresh state, ignoring any persisted state
    #[arg(long)]
    pub fresh: bool,
}

impl Cli {
    /// The sequence timeout override, if given.
    pub fn sequence_timeout(&self) -> Option<Duration> {
        self.sequence_timeout_ms.map(Duration::from_millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["stash-tui"]);
        assert_eq!(cli.log_dir, PathBuf::from("logs"));
        assert!(cli.store_path.is_none());
        assert!(cli.sequence_timeout().is_none());
        assert!(!cli.fresh);
    }

    #[test]
    fn test_cli_store_path_flag() {
        let cli = Cli::parse_from(["stash-tui", "--store-path", "/tmp/store.json"]);
        assert_eq!(cli.store_path, Some(PathBuf::from("/tmp/store.json")));
    }

    #[test]
    fn test_cli_sequence_timeout_flag() {
        let cli = Cli::parse_from(["stash-tui", "--sequence-timeout-ms", "1500"]);
        assert_eq!(cli.sequence_timeout(), Some(Duration::from_millis(1500)));
    }

    #[test]
    fn test_cli_sequence_timeout_rejects_text() {
        let result = Cli::try_parse_from(["stash-tui", "--sequence-timeout-ms", "soon"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_fresh_flag() {
        let cli = Cli::parse_from(["stash-tui", "--fresh"]);
        assert!(cli.fresh);
    }
}
