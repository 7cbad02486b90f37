//! Keystroke listeners: turn terminal key events into completed combinations.
//!
//! Bridges the config crate's combination parser with crossterm key events.
//!
//! Responsibilities:
//! - Track which combinations are attached and which are paused.
//! - Buffer strokes of multi-key sequences with an inactivity timeout.
//! - Convert between crossterm `KeyEvent`s and parsed `KeyStroke`s.
//!
//! Does NOT handle:
//! - Parsing combination strings (handled by `stash_config::combo`).
//! - Choosing which callback runs (handled by `HotkeyRegistry`).

use std::collections::HashSet;
use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use stash_config::combo::{Combination, KeyCodeName, KeyStroke, ModifierFlags, parse_combination};
use tracing::{debug, warn};

/// The keyboard source a [`HotkeyRegistry`](super::HotkeyRegistry) drives.
///
/// The registry attaches a combination when its stack gains its first
/// callback and detaches it when the stack empties.
pub trait KeyListener {
    /// Start reporting `combo`. Attaching twice is a no-op.
    fn listen(&mut self, combo: &str);

    /// Stop reporting `combo`. Unknown combinations are ignored.
    fn forget(&mut self, combo: &str);

    /// Suspend reporting for one combination, or for all when `None`.
    fn pause(&mut self, combo: Option<&str>);

    /// Resume reporting for one combination, or lift the global pause when `None`.
    fn unpause(&mut self, combo: Option<&str>);

    /// Returns true if `combo` is currently suppressed (individually or globally).
    fn is_paused(&self, combo: &str) -> bool;

    /// Feed one key event; returns the attached combinations it completed.
    fn on_key(&mut self, key: &KeyEvent, at: Instant) -> Vec<String>;

    /// Detach everything and reset pause state.
    fn clear(&mut self);
}

#[derive(Debug)]
struct Attached {
    combo: String,
    parsed: Option<Combination>,
}

/// Crossterm listener with Mousetrap-style sequence handling.
///
/// - Strokes of a sequence must arrive within `timeout` of each other.
/// - While the buffer is a proper prefix of some attached sequence, shorter
///   exact matches wait: with both `"s"` and `"s s"` attached, a single `s`
///   never fires `"s"`.
/// - A stroke that continues nothing restarts the buffer from that stroke.
#[derive(Debug)]
pub struct SequenceListener {
    attached: Vec<Attached>,
    paused: HashSet<String>,
    paused_all: bool,
    pending: Vec<KeyStroke>,
    last_press: Option<Instant>,
    timeout: Duration,
}

enum Resolution {
    Waiting,
    Complete(Vec<String>),
    NoMatch,
}

impl SequenceListener {
    /// Create a listener with the given inactivity timeout between strokes.
    pub fn new(timeout: Duration) -> Self {
        Self {
            attached: Vec::new(),
            paused: HashSet::new(),
            paused_all: false,
            pending: Vec::new(),
            last_press: None,
            timeout,
        }
    }

    /// Inactivity window between strokes of one sequence.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Strokes typed so far toward an unfinished sequence.
    pub fn pending(&self) -> &[KeyStroke] {
        &self.pending
    }

    fn active(&self) -> impl Iterator<Item = (&str, &Combination)> {
        self.attached.iter().filter_map(|a| {
            let parsed = a.parsed.as_ref()?;
            if self.is_paused(&a.combo) {
                None
            } else {
                Some((a.combo.as_str(), parsed))
            }
        })
    }

    fn resolve(&self) -> Resolution {
        if self.active().any(|(_, c)| c.continues(&self.pending)) {
            return Resolution::Waiting;
        }

        let complete: Vec<String> = self
            .active()
            .filter(|(_, c)| c.strokes() == self.pending.as_slice())
            .map(|(combo, _)| combo.to_string())
            .collect();

        if complete.is_empty() {
            Resolution::NoMatch
        } else {
            Resolution::Complete(complete)
        }
    }
}

impl KeyListener for SequenceListener {
    fn listen(&mut self, combo: &str) {
        if self.attached.iter().any(|a| a.combo == combo) {
            return;
        }
        let parsed = match parse_combination(combo) {
            Ok(parsed) => Some(parsed),
            Err(e) => {
                warn!(combo, error = %e, "Hotkey combination cannot be matched");
                None
            }
        };
        self.attached.push(Attached {
            combo: combo.to_string(),
            parsed,
        });
    }

    fn forget(&mut self, combo: &str) {
        self.attached.retain(|a| a.combo != combo);
    }

    fn pause(&mut self, combo: Option<&str>) {
        match combo {
            Some(combo) => {
                self.paused.insert(combo.to_string());
            }
            None => self.paused_all = true,
        }
    }

    fn unpause(&mut self, combo: Option<&str>) {
        match combo {
            Some(combo) => {
                self.paused.remove(combo);
            }
            None => self.paused_all = false,
        }
    }

    fn is_paused(&self, combo: &str) -> bool {
        self.paused_all || self.paused.contains(combo)
    }

    fn on_key(&mut self, key: &KeyEvent, at: Instant) -> Vec<String> {
        if key.kind != KeyEventKind::Press {
            return Vec::new();
        }
        let Some(stroke) = stroke_from_event(key) else {
            return Vec::new();
        };

        if let Some(last) = self.last_press
            && at.saturating_duration_since(last) > self.timeout
        {
            self.pending.clear();
        }
        self.last_press = Some(at);
        self.pending.push(stroke);

        let mut resolution = self.resolve();
        if matches!(resolution, Resolution::NoMatch) && self.pending.len() > 1 {
            self.pending.clear();
            self.pending.push(stroke);
            resolution = self.resolve();
        }

        match resolution {
            Resolution::Waiting => {
                debug!(pending = self.pending.len(), "Waiting for next stroke");
                Vec::new()
            }
            Resolution::Complete(combos) => {
                self.pending.clear();
                combos
            }
            Resolution::NoMatch => {
                self.pending.clear();
                Vec::new()
            }
        }
    }

    fn clear(&mut self) {
        self.attached.clear();
        self.paused.clear();
        self.paused_all = false;
        self.pending.clear();
        self.last_press = None;
    }
}

/// Converts a crossterm key event into a stroke.
///
/// Returns `None` for keys a combination cannot name (modifier-only presses,
/// media keys, ...).
pub fn stroke_from_event(key: &KeyEvent) -> Option<KeyStroke> {
    let code = match key.code {
        KeyCode::Char(' ') => KeyCodeName::Space,
        KeyCode::Char(c) => KeyCodeName::Char(c),
        KeyCode::F(n) => KeyCodeName::F(n),
        KeyCode::Esc => KeyCodeName::Esc,
        KeyCode::Enter => KeyCodeName::Enter,
        KeyCode::Tab => KeyCodeName::Tab,
        KeyCode::BackTab => KeyCodeName::BackTab,
        KeyCode::Backspace => KeyCodeName::Backspace,
        KeyCode::Delete => KeyCodeName::Delete,
        KeyCode::Insert => KeyCodeName::Insert,
        KeyCode::Home => KeyCodeName::Home,
        KeyCode::End => KeyCodeName::End,
        KeyCode::PageUp => KeyCodeName::PageUp,
        KeyCode::PageDown => KeyCodeName::PageDown,
        KeyCode::Up => KeyCodeName::Up,
        KeyCode::Down => KeyCodeName::Down,
        KeyCode::Left => KeyCodeName::Left,
        KeyCode::Right => KeyCodeName::Right,
        _ => return None,
    };

    let mut modifiers = ModifierFlags {
        ctrl: key.modifiers.contains(KeyModifiers::CONTROL),
        shift: key.modifiers.contains(KeyModifiers::SHIFT),
        alt: key.modifiers.contains(KeyModifiers::ALT),
        meta: key
            .modifiers
            .intersects(KeyModifiers::SUPER | KeyModifiers::META),
    };
    match code {
        KeyCodeName::Char(_) => modifiers.shift = false,
        KeyCodeName::BackTab => modifiers.shift = true,
        _ => {}
    }

    Some(KeyStroke { code, modifiers })
}

/// Converts a parsed stroke into the crossterm key event a terminal would report.
fn stroke_to_event(stroke: &KeyStroke) -> KeyEvent {
    let code = match stroke.code {
        KeyCodeName::Char(c) => KeyCode::Char(c),
        KeyCodeName::F(n) => KeyCode::F(n),
        KeyCodeName::Esc => KeyCode::Esc,
        KeyCodeName::Enter => KeyCode::Enter,
        KeyCodeName::Space => KeyCode::Char(' '),
        KeyCodeName::Tab => KeyCode::Tab,
        KeyCodeName::BackTab => KeyCode::BackTab,
        KeyCodeName::Backspace => KeyCode::Backspace,
        KeyCodeName::Delete => KeyCode::Delete,
        KeyCodeName::Insert => KeyCode::Insert,
        KeyCodeName::Home => KeyCode::Home,
        KeyCodeName::End => KeyCode::End,
        KeyCodeName::PageUp => KeyCode::PageUp,
        KeyCodeName::PageDown => KeyCode::PageDown,
        KeyCodeName::Up => KeyCode::Up,
        KeyCodeName::Down => KeyCode::Down,
        KeyCodeName::Left => KeyCode::Left,
        KeyCodeName::Right => KeyCode::Right,
    };

    let mut modifiers = KeyModifiers::NONE;
    if stroke.modifiers.ctrl {
        modifiers |= KeyModifiers::CONTROL;
    }
    if stroke.modifiers.shift {
        modifiers |= KeyModifiers::SHIFT;
    }
    if stroke.modifiers.alt {
        modifiers |= KeyModifiers::ALT;
    }
    if stroke.modifiers.meta {
        modifiers |= KeyModifiers::SUPER;
    }

    KeyEvent::new(code, modifiers)
}

/// The key events that type out `combo`, in order.
///
/// Used to replay combinations (tests, macros) through the same path as real input.
pub fn key_events_for(combo: &Combination) -> Vec<KeyEvent> {
    combo.strokes().iter().map(stroke_to_event).collect()
}
