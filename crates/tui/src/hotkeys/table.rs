//! The binding table shared by every consumer.

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::rc::{Rc, Weak};
use std::time::Instant;

use crossterm::event::KeyEvent;
use tracing::debug;

use super::disposer::Disposer;
use super::listener::KeyListener;
use super::scope::HotkeyScope;
use super::{HotkeyCallback, HotkeyEvent, Hotkeys};

pub(super) struct BindingTable {
    bound: HashMap<String, VecDeque<HotkeyCallback>>,
    listener: Box<dyn KeyListener>,
}

impl BindingTable {
    fn bind_single(&mut self, combo: &str, callback: &HotkeyCallback) {
        match self.bound.get_mut(combo) {
            Some(stack) => stack.push_front(Rc::clone(callback)),
            None => {
                self.bound
                    .insert(combo.to_string(), VecDeque::from([Rc::clone(callback)]));
                self.listener.listen(combo);
            }
        }
        debug!(combo, depth = self.depth(combo), "Hotkey bound");
    }

    fn unbind_single(&mut self, combo: &str, callback: &HotkeyCallback) {
        let Some(stack) = self.bound.get_mut(combo) else {
            return;
        };
        if let Some(pos) = stack.iter().position(|cb| Rc::ptr_eq(cb, callback)) {
            stack.remove(pos);
            debug!(combo, depth = stack.len(), "Hotkey unbound");
        }
        if stack.is_empty() {
            self.bound.remove(combo);
            self.listener.forget(combo);
        }
    }

    fn depth(&self, combo: &str) -> usize {
        self.bound.get(combo).map_or(0, VecDeque::len)
    }

    fn head(&self, combo: &str) -> Option<HotkeyCallback> {
        self.bound.get(combo).and_then(|stack| stack.front().cloned())
    }
}

/// Handle to the process-wide hotkey binding table.
///
/// Construct once at application start and hand clones to consumers; every
/// clone refers to the same table. Call [`shutdown`](Self::shutdown) at exit
/// to detach all listeners.
///
/// ```
/// use std::time::Duration;
/// use stash_tui::hotkeys::{HotkeyRegistry, SequenceListener, callback};
///
/// let registry = HotkeyRegistry::new(SequenceListener::new(Duration::from_secs(1)));
/// let older = registry.bind("r 3", callback(|_| println!("older")));
/// let newer = registry.bind("r 3", callback(|_| println!("newer")));
/// assert_eq!(registry.depth("r 3"), 2);
/// newer.dispose();
/// older.dispose();
/// assert!(!registry.is_bound("r 3"));
/// ```
#[derive(Clone)]
pub struct HotkeyRegistry {
    inner: Rc<RefCell<BindingTable>>,
}

impl HotkeyRegistry {
    /// Create an empty registry driving `listener`.
    pub fn new<L>(listener: L) -> Self
    where
        L: KeyListener + 'static,
    {
        Self {
            inner: Rc::new(RefCell::new(BindingTable {
                bound: HashMap::new(),
                listener: Box::new(listener),
            })),
        }
    }

    pub(super) fn downgrade(&self) -> Weak<RefCell<BindingTable>> {
        Rc::downgrade(&self.inner)
    }

    pub(super) fn from_weak(weak: &Weak<RefCell<BindingTable>>) -> Option<Self> {
        weak.upgrade().map(|inner| Self { inner })
    }

    /// Push `callback` onto the stack of every combination in `hotkeys`.
    ///
    /// The returned disposer removes exactly this callback from exactly these
    /// combinations.
    pub fn bind(&self, hotkeys: impl Into<Hotkeys>, callback: HotkeyCallback) -> Disposer {
        let hotkeys = hotkeys.into();
        {
            let mut table = self.inner.borrow_mut();
            for combo in hotkeys.combos() {
                table.bind_single(combo, &callback);
            }
        }

        let weak = self.downgrade();
        Disposer::new(move || {
            if let Some(registry) = HotkeyRegistry::from_weak(&weak) {
                registry.unbind(&hotkeys, &callback);
            }
        })
    }

    /// Remove `callback` from every combination in `hotkeys`.
    ///
    /// Combinations or callbacks that are not bound are ignored.
    pub fn unbind(&self, hotkeys: &Hotkeys, callback: &HotkeyCallback) {
        let mut table = self.inner.borrow_mut();
        for combo in hotkeys.combos() {
            table.unbind_single(combo, callback);
        }
    }

    /// Suspend dispatch for `combo`, or for everything when `None`.
    pub fn pause(&self, combo: Option<&str>) {
        self.inner.borrow_mut().listener.pause(combo);
        debug!(combo = combo.unwrap_or("*"), "Hotkeys paused");
    }

    /// Resume dispatch for `combo`, or lift the global pause when `None`.
    pub fn unpause(&self, combo: Option<&str>) {
        self.inner.borrow_mut().listener.unpause(combo);
        debug!(combo = combo.unwrap_or("*"), "Hotkeys unpaused");
    }

    /// Returns true if `combo` is currently paused, individually or globally.
    pub fn is_paused(&self, combo: &str) -> bool {
        self.inner.borrow().listener.is_paused(combo)
    }

    /// Run the head callback of `combo` as if its keys had been typed.
    ///
    /// Returns false when nothing is bound or the combination is paused.
    pub fn dispatch(&self, combo: &str) -> bool {
        self.fire(combo, None)
    }

    /// Feed a terminal key event; runs the head callback of every combination
    /// it completes. Returns true if any callback ran.
    pub fn handle_key(&self, key: &KeyEvent) -> bool {
        self.handle_key_at(key, Instant::now())
    }

    /// [`handle_key`](Self::handle_key) with an explicit timestamp.
    pub fn handle_key_at(&self, key: &KeyEvent, at: Instant) -> bool {
        let completed = self.inner.borrow_mut().listener.on_key(key, at);
        let mut fired = false;
        for combo in completed {
            fired |= self.fire(&combo, Some(*key));
        }
        fired
    }

    fn fire(&self, combo: &str, key: Option<KeyEvent>) -> bool {
        let head = {
            let table = self.inner.borrow();
            if table.listener.is_paused(combo) {
                return false;
            }
            table.head(combo)
        };
        let Some(head) = head else {
            return false;
        };

        debug!(combo, "Dispatching hotkey");
        head(&HotkeyEvent {
            combo: combo.to_string(),
            key,
        });
        true
    }

    /// Returns true if at least one callback is bound to `combo`.
    pub fn is_bound(&self, combo: &str) -> bool {
        self.inner.borrow().bound.contains_key(combo)
    }

    /// Number of callbacks stacked on `combo`.
    pub fn depth(&self, combo: &str) -> usize {
        self.inner.borrow().depth(combo)
    }

    /// All bound combinations, sorted.
    pub fn combinations(&self) -> Vec<String> {
        let mut combos: Vec<String> = self.inner.borrow().bound.keys().cloned().collect();
        combos.sort();
        combos
    }

    /// Create a consumer scope bound to this registry.
    pub fn scope(&self) -> HotkeyScope {
        HotkeyScope::new(self.clone())
    }

    /// Detach every listener and empty the table.
    ///
    /// Outstanding disposers and scopes become no-ops for the removed bindings.
    pub fn shutdown(&self) {
        let stacks = {
            let mut table = self.inner.borrow_mut();
            table.listener.clear();
            std::mem::take(&mut table.bound)
        };
        debug!(count = stacks.len(), "Hotkey registry shut down");
        // Callbacks may own guards or scopes that unbind on drop; the table
        // must not be borrowed when they go.
        drop(stacks);
    }
}

impl fmt::Debug for HotkeyRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let table = self.inner.borrow();
        let mut stacks: Vec<(&str, usize)> = table
            .bound
            .iter()
            .map(|(combo, stack)| (combo.as_str(), stack.len()))
            .collect();
        stacks.sort();
        f.debug_struct("HotkeyRegistry")
            .field("stacks", &stacks)
            .finish()
    }
}
