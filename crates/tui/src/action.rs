//! Actions emitted by hotkey callbacks.
//!
//! Responsibilities:
//! - Define the `Action` enum that hotkey callbacks produce.
//! - Queue actions so callbacks never touch `App` state directly.
//!
//! Does NOT handle:
//! - Applying actions (see `app::App`).
//! - Deciding which keys produce which actions (see `app::panels`).
//!
//! Invariants:
//! - Actions are applied in the order their combinations fired.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::fmt;
use std::rc::Rc;

use crate::hotkeys::HotkeyEvent;

/// Tabs of the performer page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tab {
    Details,
    Scenes,
    Galleries,
    Images,
    Movies,
}

impl Tab {
    /// Every tab with the key that selects it, in display order.
    pub const ALL: [(Tab, &'static str); 5] = [
        (Tab::Details, "a"),
        (Tab::Scenes, "s"),
        (Tab::Galleries, "l"),
        (Tab::Images, "i"),
        (Tab::Movies, "m"),
    ];

    pub fn label(self) -> &'static str {
        match self {
            Tab::Details => "Details",
            Tab::Scenes => "Scenes",
            Tab::Galleries => "Galleries",
            Tab::Images => "Images",
            Tab::Movies => "Movies",
        }
    }
}

/// Something a hotkey asked the application to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Quit,
    ShowHelp,
    ToggleFavorite,
    /// Set the saved rating; `None` clears it.
    SetRating(Option<u8>),
    SelectTab(Tab),
    OpenEditor,
    CloseEditor,
    /// Change the editor's unsaved rating.
    SetDraftRating(Option<u8>),
    SaveDraft,
    DiscardDraft,
    /// Pause or resume the rating combinations.
    ToggleRatingLock,
}

/// FIFO of `(combination, action)` pairs shared between callbacks and the app.
#[derive(Clone, Default)]
pub struct ActionQueue {
    pending: Rc<RefCell<VecDeque<(String, Action)>>>,
}

impl ActionQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// A hotkey callback that enqueues `action` tagged with the firing combination.
    pub fn emitter(&self, action: Action) -> impl Fn(&HotkeyEvent) + 'static {
        let pending = Rc::clone(&self.pending);
        move |event| {
            pending
                .borrow_mut()
                .push_back((event.combo.clone(), action.clone()));
        }
    }

    /// Take everything queued so far.
    pub fn drain(&self) -> Vec<(String, Action)> {
        self.pending.borrow_mut().drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.pending.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.borrow().is_empty()
    }
}

impl fmt::Debug for ActionQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionQueue")
            .field("pending", &self.pending.borrow())
            .finish()
    }
}
