//! Test helpers for hotkey testing.
//!
//! Provides key event constructors and a registry fixture that records which
//! callbacks ran.

#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use stash_tui::hotkeys::{HotkeyCallback, HotkeyEvent, HotkeyRegistry, SequenceListener, callback};

/// Create a character key event.
pub fn key(c: char) -> KeyEvent {
    KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE)
}

/// Create a Ctrl+character key event.
pub fn ctrl_key(c: char) -> KeyEvent {
    KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
}

/// Create an Escape key event.
pub fn esc_key() -> KeyEvent {
    KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE)
}

/// A registry with the default one-second sequence timeout.
pub fn registry() -> HotkeyRegistry {
    HotkeyRegistry::new(SequenceListener::new(Duration::from_secs(1)))
}

/// Shared log of callback labels, in firing order.
pub type Log = Rc<RefCell<Vec<&'static str>>>;

pub fn log() -> Log {
    Rc::new(RefCell::new(Vec::new()))
}

/// A closure that appends `label` to `log`, for scope bindings.
pub fn pusher(log: &Log, label: &'static str) -> impl Fn(&HotkeyEvent) + 'static {
    let log = Rc::clone(log);
    move |_| log.borrow_mut().push(label)
}

/// Like [`pusher`], wrapped for direct registry bindings.
pub fn recorder(log: &Log, label: &'static str) -> HotkeyCallback {
    callback(pusher(log, label))
}

/// Type every character of `keys` at `at`.
pub fn type_at(registry: &HotkeyRegistry, keys: &str, at: Instant) {
    for c in keys.chars() {
        registry.handle_key_at(&key(c), at);
    }
}
