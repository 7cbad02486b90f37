//! Hotkey registry: a process-wide keystroke dispatch table plus per-consumer scopes.
//!
//! Responsibilities:
//! - Keep, for every literal combination string, a stack of callbacks where the
//!   most recently bound callback shadows older ones (`HotkeyRegistry`).
//! - Give each consumer "one binding per identity" semantics so re-binding
//!   replaces instead of stacking (`HotkeyScope`).
//! - Turn terminal key events into completed combinations (`KeyListener`,
//!   `SequenceListener`).
//!
//! Does NOT handle:
//! - Deciding what a hotkey does; callbacks belong to the consumers.
//! - Normalizing combination strings: `"ctrl+s"` and `"Ctrl+S"` are different
//!   table entries even though the listener may match both.
//!
//! Invariants:
//! - Dispatching a combination runs exactly the head of its stack, or nothing.
//! - A combination's listener is attached iff its stack is non-empty.
//! - The table is never borrowed while a callback runs, so callbacks may bind
//!   and unbind freely.
//!
//! The registry is single-threaded (`Rc`), matching the UI event loop it serves.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

use crossterm::event::KeyEvent;

mod disposer;
mod listener;
mod scope;
mod table;

pub use disposer::{BindingGuard, Disposer};
pub use listener::{KeyListener, SequenceListener, key_events_for, stroke_from_event};
pub use scope::HotkeyScope;
pub use table::HotkeyRegistry;

/// What a callback receives when its combination fires.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HotkeyEvent {
    /// The literal combination string the callback was bound under.
    pub combo: String,
    /// The final key event of the sequence; `None` for programmatic dispatch.
    pub key: Option<KeyEvent>,
}

/// A bound callback. Identity (for unbinding) is the `Rc` allocation.
pub type HotkeyCallback = Rc<dyn Fn(&HotkeyEvent)>;

/// Wrap a closure as a [`HotkeyCallback`].
pub fn callback<F>(f: F) -> HotkeyCallback
where
    F: Fn(&HotkeyEvent) + 'static,
{
    Rc::new(f)
}

/// One combination or a set of combinations bound together.
///
/// Also serves as the identity key of a [`HotkeyScope`] binding: a single
/// combination compares by value, a set compares by reference. Clone a set to
/// re-bind under the same identity; building a new one, even with the same
/// contents, makes a new identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Hotkeys {
    Single(String),
    Many(ComboSet),
}

impl Hotkeys {
    /// The combination strings, in the order given.
    pub fn combos(&self) -> impl Iterator<Item = &str> {
        let slice: &[String] = match self {
            Self::Single(combo) => std::slice::from_ref(combo),
            Self::Many(set) => set.as_slice(),
        };
        slice.iter().map(String::as_str)
    }
}

/// A shared list of combinations whose identity is its allocation.
#[derive(Clone)]
pub struct ComboSet(Rc<[String]>);

impl ComboSet {
    pub fn new<I, S>(combos: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(combos.into_iter().map(Into::into).collect())
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

impl PartialEq for ComboSet {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for ComboSet {}

impl Hash for ComboSet {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::ptr::hash(Rc::as_ptr(&self.0).cast::<String>(), state);
    }
}

impl fmt::Debug for ComboSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.0.iter()).finish()
    }
}

impl fmt::Display for Hotkeys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Single(combo) => write!(f, "{combo}"),
            Self::Many(set) => write!(f, "[{}]", set.as_slice().join(", ")),
        }
    }
}

impl From<&str> for Hotkeys {
    fn from(combo: &str) -> Self {
        Self::Single(combo.to_string())
    }
}

impl From<String> for Hotkeys {
    fn from(combo: String) -> Self {
        Self::Single(combo)
    }
}

impl From<ComboSet> for Hotkeys {
    fn from(set: ComboSet) -> Self {
        Self::Many(set)
    }
}

impl From<&ComboSet> for Hotkeys {
    fn from(set: &ComboSet) -> Self {
        Self::Many(set.clone())
    }
}

impl From<Vec<String>> for Hotkeys {
    fn from(combos: Vec<String>) -> Self {
        Self::Many(ComboSet::new(combos))
    }
}

impl From<Vec<&str>> for Hotkeys {
    fn from(combos: Vec<&str>) -> Self {
        Self::Many(ComboSet::new(combos))
    }
}

impl From<&[&str]> for Hotkeys {
    fn from(combos: &[&str]) -> Self {
        Self::Many(ComboSet::new(combos.iter().copied()))
    }
}

impl<const N: usize> From<[&str; N]> for Hotkeys {
    fn from(combos: [&str; N]) -> Self {
        Self::Many(ComboSet::new(combos))
    }
}

impl From<&Hotkeys> for Hotkeys {
    fn from(hotkeys: &Hotkeys) -> Self {
        hotkeys.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_combos() {
        let hotkeys = Hotkeys::from("s s");
        assert_eq!(hotkeys.combos().collect::<Vec<_>>(), vec!["s s"]);
    }

    #[test]
    fn test_many_combos_keep_order() {
        let hotkeys = Hotkeys::from(["r 1", "r 2"]);
        assert_eq!(hotkeys.combos().collect::<Vec<_>>(), vec!["r 1", "r 2"]);
    }

    #[test]
    fn test_single_identity_is_by_value() {
        assert_eq!(Hotkeys::from("a"), Hotkeys::from("a".to_string()));
        assert_ne!(Hotkeys::from("a"), Hotkeys::from(["a"]));
    }

    #[test]
    fn test_set_identity_is_by_reference() {
        let set = ComboSet::new(["a", "b"]);
        assert_eq!(Hotkeys::from(&set), Hotkeys::from(set.clone()));
        assert_ne!(Hotkeys::from(["a", "b"]), Hotkeys::from(["a", "b"]));
    }

    #[test]
    fn test_display() {
        assert_eq!(Hotkeys::from("e").to_string(), "e");
        assert_eq!(Hotkeys::from(["s a", "s n"]).to_string(), "[s a, s n]");
    }
}
