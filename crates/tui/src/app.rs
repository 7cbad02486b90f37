//! Application state for the performer page demo.
//!
//! Responsibilities:
//! - Own the hotkey panels and apply the actions their callbacks queue.
//! - Persist the performer's favourite flag and rating in the local store.
//! - Track a short history of fired combinations for display.
//!
//! Does NOT handle:
//! - Rendering (see `ui`).
//! - Terminal I/O or the event loop (see `main.rs`).
//!
//! Invariants:
//! - Callbacks only enqueue actions; all state changes happen in `process_actions`.
//! - While the help overlay is open the registry is globally paused.

mod panels;

use std::collections::VecDeque;
use std::time::Instant;

use crossterm::event::{KeyEvent, KeyEventKind};
use serde::{Deserialize, Serialize};
use serde_json::json;
use stash_config::{LocalItem, LocalStore, StoreError};
use stash_config::constants::HOTKEY_HISTORY_LEN;
use tracing::{debug, info, warn};

use crate::action::{Action, ActionQueue, Tab};
use crate::hotkeys::{HotkeyRegistry, HotkeyScope};

pub use panels::{EditPanel, PerformerPanel, RATING_COMBOS, SAVE_COMBO};

/// Local store key for the performer record.
pub const PERFORMER_KEY: &str = "performer";

/// The performer fields the demo edits.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PerformerRecord {
    pub favorite: bool,
    pub rating: Option<u8>,
}

/// Main application state.
pub struct App {
    registry: HotkeyRegistry,
    actions: ActionQueue,
    store: LocalStore,
    performer: LocalItem<PerformerRecord>,
    editor: Option<EditPanel>,
    performer_panel: PerformerPanel,
    global: HotkeyScope,
    tab: Tab,
    rating_locked: bool,
    help_open: bool,
    history: VecDeque<String>,
    status: Option<String>,
    quit: bool,
}

impl App {
    /// Build the app and mount its panels on `registry`.
    ///
    /// With `fresh`, the stored performer record is reset to defaults.
    pub fn new(registry: HotkeyRegistry, mut store: LocalStore, fresh: bool) -> Self {
        let mut performer = store.item(PERFORMER_KEY, PerformerRecord::default());
        let mut status = store
            .open_error()
            .map(|e| format!("Local store reset: {e}"));

        if fresh {
            let reset = serde_json::to_value(PerformerRecord::default())
                .map_err(StoreError::from)
                .and_then(|defaults| store.set_data(&mut performer, defaults));
            if let Err(e) = reset {
                warn!(error = %e, "Failed to reset performer record");
                status = Some(format!("Could not reset stored state: {e}"));
            }
        }

        let actions = ActionQueue::new();
        let global = registry.scope();
        global.bind("q", actions.emitter(Action::Quit));
        global.bind("?", actions.emitter(Action::ShowHelp));
        global.bind("p", actions.emitter(Action::ToggleRatingLock));
        let performer_panel = PerformerPanel::mount(&registry, &actions);

        info!(fresh, "Performer page mounted");
        Self {
            registry,
            actions,
            store,
            performer,
            editor: None,
            performer_panel,
            global,
            tab: Tab::Details,
            rating_locked: false,
            help_open: false,
            history: VecDeque::with_capacity(HOTKEY_HISTORY_LEN),
            status,
            quit: false,
        }
    }

    /// Feed a terminal key event.
    pub fn handle_key(&mut self, key: &KeyEvent) {
        self.handle_key_at(key, Instant::now());
    }

    /// [`handle_key`](Self::handle_key) with an explicit timestamp.
    pub fn handle_key_at(&mut self, key: &KeyEvent, at: Instant) {
        if self.help_open {
            if key.kind == KeyEventKind::Press {
                self.help_open = false;
                self.registry.unpause(None);
            }
            return;
        }
        self.registry.handle_key_at(key, at);
        self.process_actions();
    }

    /// Apply every queued action, including any queued while applying.
    pub fn process_actions(&mut self) {
        loop {
            let batch = self.actions.drain();
            if batch.is_empty() {
                break;
            }
            for (combo, action) in batch {
                self.record(combo);
                self.apply(action);
            }
        }
    }

    fn record(&mut self, combo: String) {
        if self.history.len() == HOTKEY_HISTORY_LEN {
            self.history.pop_front();
        }
        self.history.push_back(combo);
    }

    fn apply(&mut self, action: Action) {
        debug!(?action, "Applying action");
        match action {
            Action::Quit => self.quit = true,
            Action::ShowHelp => {
                self.help_open = true;
                self.registry.pause(None);
            }
            Action::ToggleFavorite => {
                let favorite = !self.performer.data().favorite;
                self.persist(json!({ "favorite": favorite }));
            }
            Action::SetRating(rating) => self.persist(json!({ "rating": rating })),
            Action::SelectTab(tab) => self.tab = tab,
            Action::OpenEditor => {
                if self.editor.is_none() {
                    self.performer_panel.unbind_tabs();
                    let rating = self.performer.data().rating;
                    self.editor = Some(EditPanel::mount(&self.registry, &self.actions, rating));
                }
            }
            Action::SetDraftRating(rating) => {
                if let Some(editor) = self.editor.as_mut() {
                    editor.set_draft_rating(rating);
                }
            }
            Action::SaveDraft => {
                if let Some(rating) = self.editor.as_ref().map(EditPanel::draft_rating) {
                    self.persist(json!({ "rating": rating }));
                    self.close_editor();
                    self.status = Some("Saved".to_string());
                }
            }
            Action::DiscardDraft => {
                if self.editor.is_some() {
                    self.close_editor();
                    self.status = Some("Changes discarded".to_string());
                }
            }
            Action::CloseEditor => self.close_editor(),
            Action::ToggleRatingLock => {
                self.rating_locked = !self.rating_locked;
                for combo in RATING_COMBOS {
                    if self.rating_locked {
                        self.registry.pause(Some(combo));
                    } else {
                        self.registry.unpause(Some(combo));
                    }
                }
            }
        }
    }

    fn close_editor(&mut self) {
        if self.editor.take().is_some() {
            self.performer_panel.bind_tabs();
        }
    }

    fn persist(&mut self, patch: serde_json::Value) {
        if let Err(e) = self.store.set_data(&mut self.performer, patch) {
            warn!(error = %e, "Failed to persist performer");
            self.status = Some(format!("Could not save: {e}"));
        }
    }

    pub fn registry(&self) -> &HotkeyRegistry {
        &self.registry
    }

    pub fn performer(&self) -> &PerformerRecord {
        self.performer.data()
    }

    pub fn tab(&self) -> Tab {
        self.tab
    }

    pub fn editor(&self) -> Option<&EditPanel> {
        self.editor.as_ref()
    }

    pub fn rating_locked(&self) -> bool {
        self.rating_locked
    }

    pub fn help_open(&self) -> bool {
        self.help_open
    }

    /// Most recent fired combinations, oldest first.
    pub fn history(&self) -> impl Iterator<Item = &str> {
        self.history.iter().map(String::as_str)
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn should_quit(&self) -> bool {
        self.quit
    }

    /// Bindings owned by the app-wide scope.
    pub fn global_scope(&self) -> &HotkeyScope {
        &self.global
    }
}
