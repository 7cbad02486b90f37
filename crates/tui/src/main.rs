//! Stash TUI - keyboard-driven performer page.
//!
//! Responsibilities:
//! - Orchestrate application startup and shutdown.
//! - Initialize terminal, logging, configuration, and the hotkey registry.
//! - Run the main event loop.
//!
//! Does NOT handle:
//! - Hotkey dispatch rules (see `stash_tui::hotkeys`).
//! - Preference persistence (see `stash_config::LocalStore`).
//!
//! Invariants:
//! - The TUI enters raw mode and alternate screen on startup.
//! - `load_dotenv()` is called at startup to support `.env` configuration.
//! - Configuration precedence: CLI args > env vars > defaults.
//! - The registry is `Rc`-based, so the loop runs on a current-thread runtime.

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{Event, EventStream};
use futures_util::StreamExt;
use stash_config::constants::DEFAULT_UI_TICK_MS;
use stash_config::{ConfigLoader, LocalStore};
use stash_tui::app::App;
use stash_tui::cli::Cli;
use stash_tui::hotkeys::{HotkeyRegistry, SequenceListener};
use stash_tui::runtime::{logging::init_file_logging, terminal::TerminalGuard};
use stash_tui::ui;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Must live for entire main() duration to ensure logs are flushed
    let _log_guard = init_file_logging(&cli.log_dir)?;

    let mut loader = ConfigLoader::new()
        .load_dotenv()?
        .from_env()
        .context("Invalid environment configuration")?;
    if let Some(timeout) = cli.sequence_timeout() {
        loader = loader.with_sequence_timeout(timeout);
    }
    if let Some(path) = cli.store_path.clone() {
        loader = loader.with_store_path(path);
    }
    let config = loader.build().context("Invalid configuration")?;
    tracing::info!(
        store = %config.store_path.display(),
        sequence_timeout = ?config.sequence_timeout,
        "Configuration loaded"
    );

    let store = LocalStore::open(&config.store_path);
    let registry = HotkeyRegistry::new(SequenceListener::new(config.sequence_timeout));
    let mut app = App::new(registry.clone(), store, cli.fresh);

    let mut guard = TerminalGuard::enter()?;
    let mut reader = EventStream::new();
    let mut tick_interval =
        tokio::time::interval(tokio::time::Duration::from_millis(DEFAULT_UI_TICK_MS));

    let result: Result<()> = async {
        loop {
            guard.terminal().draw(|f| ui::render(f, &app))?;
            if app.should_quit() {
                break;
            }

            tokio::select! {
                event = reader.next() => match event {
                    Some(Ok(Event::Key(key))) => app.handle_key(&key),
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        tracing::error!(error = %e, "Terminal event stream failed");
                        return Err(e.into());
                    }
                    None => break,
                },
                _ = tick_interval.tick() => {}
            }
        }
        Ok(())
    }
    .await;

    drop(app);
    registry.shutdown();
    drop(guard);
    tracing::info!("Shut down");

    result
}
