//! Per-consumer hotkey scopes.
//!
//! A scope owns at most one callback per identity. Binding an identity it
//! already owns first evicts its previous callback, so a component can re-bind
//! on every state change without stacking copies of itself. Dropping the scope
//! releases everything it still owns.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use super::disposer::Disposer;
use super::table::HotkeyRegistry;
use super::{HotkeyCallback, HotkeyEvent, Hotkeys};

type Owned = Rc<RefCell<HashMap<Hotkeys, HotkeyCallback>>>;

/// A consumer's view of the [`HotkeyRegistry`].
///
/// ```
/// use std::time::Duration;
/// use stash_tui::hotkeys::{HotkeyRegistry, SequenceListener};
///
/// let registry = HotkeyRegistry::new(SequenceListener::new(Duration::from_secs(1)));
/// let panel = registry.scope();
/// panel.bind("f", |_| println!("favourite v1"));
/// panel.bind("f", |_| println!("favourite v2"));
/// assert_eq!(registry.depth("f"), 1);
/// drop(panel);
/// assert!(!registry.is_bound("f"));
/// ```
pub struct HotkeyScope {
    registry: HotkeyRegistry,
    owned: Owned,
}

impl HotkeyScope {
    pub(super) fn new(registry: HotkeyRegistry) -> Self {
        Self {
            registry,
            owned: Rc::new(RefCell::new(HashMap::new())),
        }
    }

    /// The shared registry this scope binds into.
    pub fn context(&self) -> &HotkeyRegistry {
        &self.registry
    }

    /// Bind `f` under `hotkeys`, replacing this scope's previous callback for
    /// the same identity.
    ///
    /// The returned disposer only unbinds if the identity still maps to this
    /// callback; a stale disposer never evicts a newer binding.
    pub fn bind<F>(&self, hotkeys: impl Into<Hotkeys>, f: F) -> Disposer
    where
        F: Fn(&HotkeyEvent) + 'static,
    {
        let hotkeys = hotkeys.into();
        let callback: HotkeyCallback = Rc::new(f);

        let previous = self.owned.borrow_mut().remove(&hotkeys);
        if let Some(previous) = previous {
            self.registry.unbind(&hotkeys, &previous);
        }

        // The scope tracks ownership itself; the table's disposer is not needed.
        let _ = self.registry.bind(hotkeys.clone(), Rc::clone(&callback));
        self.owned
            .borrow_mut()
            .insert(hotkeys.clone(), Rc::clone(&callback));

        let owned = Rc::downgrade(&self.owned);
        let registry = self.registry.downgrade();
        Disposer::new(move || {
            let Some(owned) = owned.upgrade() else {
                return;
            };
            let still_current = owned
                .borrow()
                .get(&hotkeys)
                .is_some_and(|current| Rc::ptr_eq(current, &callback));
            if !still_current {
                return;
            }
            owned.borrow_mut().remove(&hotkeys);
            if let Some(registry) = HotkeyRegistry::from_weak(&registry) {
                registry.unbind(&hotkeys, &callback);
            }
        })
    }

    /// Unbind this scope's callback for `hotkeys`. Unknown identities are ignored.
    pub fn unbind(&self, hotkeys: impl Into<Hotkeys>) {
        let hotkeys = hotkeys.into();
        let previous = self.owned.borrow_mut().remove(&hotkeys);
        if let Some(previous) = previous {
            self.registry.unbind(&hotkeys, &previous);
        }
    }

    /// Returns true if this scope currently owns a binding for `hotkeys`.
    pub fn owns(&self, hotkeys: impl Into<Hotkeys>) -> bool {
        self.owned.borrow().contains_key(&hotkeys.into())
    }

    /// Number of identities this scope owns.
    pub fn len(&self) -> usize {
        self.owned.borrow().len()
    }

    /// Returns true if the scope owns no bindings.
    pub fn is_empty(&self) -> bool {
        self.owned.borrow().is_empty()
    }
}

impl fmt::Debug for HotkeyScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let owned: Vec<String> = self.owned.borrow().keys().map(ToString::to_string).collect();
        f.debug_struct("HotkeyScope").field("owned", &owned).finish()
    }
}

impl Drop for HotkeyScope {
    fn drop(&mut self) {
        let owned: Vec<(Hotkeys, HotkeyCallback)> = self.owned.borrow_mut().drain().collect();
        for (hotkeys, callback) in owned {
            self.registry.unbind(&hotkeys, &callback);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::time::Duration;

    use super::*;
    use crate::hotkeys::{ComboSet, SequenceListener, callback};

    fn registry() -> HotkeyRegistry {
        HotkeyRegistry::new(SequenceListener::new(Duration::from_secs(1)))
    }

    #[test]
    fn rebinding_replaces_instead_of_stacking() {
        let registry = registry();
        let scope = registry.scope();
        let hits = Rc::new(Cell::new(0));

        let h1 = Rc::clone(&hits);
        scope.bind("o", move |_| h1.set(h1.get() + 1));
        let h2 = Rc::clone(&hits);
        scope.bind("o", move |_| h2.set(h2.get() + 10));

        assert_eq!(registry.depth("o"), 1);
        registry.dispatch("o");
        assert_eq!(hits.get(), 10);
    }

    #[test]
    fn rebinding_keeps_other_consumers_underneath() {
        let registry = registry();
        let global = registry.scope();
        let panel = registry.scope();
        let which = Rc::new(Cell::new(""));

        let w = Rc::clone(&which);
        global.bind("d d", move |_| w.set("global"));
        let w = Rc::clone(&which);
        panel.bind("d d", move |_| w.set("panel v1"));
        let w = Rc::clone(&which);
        panel.bind("d d", move |_| w.set("panel v2"));

        assert_eq!(registry.depth("d d"), 2);
        registry.dispatch("d d");
        assert_eq!(which.get(), "panel v2");

        panel.unbind("d d");
        registry.dispatch("d d");
        assert_eq!(which.get(), "global");
    }

    #[test]
    fn unbind_never_bound_is_noop() {
        let registry = registry();
        let scope = registry.scope();
        let _ = registry.bind("e", callback(|_| {}));
        scope.unbind("e");
        assert_eq!(registry.depth("e"), 1);
    }

    #[test]
    fn stale_disposer_does_not_evict_newer_binding() {
        let registry = registry();
        let scope = registry.scope();
        let first = scope.bind("f", |_| {});
        scope.bind("f", |_| {});

        first.dispose();
        assert!(scope.owns("f"));
        assert_eq!(registry.depth("f"), 1);
    }

    #[test]
    fn current_disposer_unbinds() {
        let registry = registry();
        let scope = registry.scope();
        let disposer = scope.bind("f", |_| {});
        disposer.dispose();
        assert!(!scope.owns("f"));
        assert!(!registry.is_bound("f"));
    }

    #[test]
    fn drop_releases_owned_bindings_only() {
        let registry = registry();
        let other = registry.scope();
        other.bind("r 3", |_| {});
        {
            let scope = registry.scope();
            scope.bind("r 3", |_| {});
            scope.bind(["a", "s"], |_| {});
            assert_eq!(scope.len(), 2);
            assert_eq!(registry.depth("r 3"), 2);
        }
        assert_eq!(registry.depth("r 3"), 1);
        assert!(!registry.is_bound("a"));
        assert!(other.owns("r 3"));
    }

    #[test]
    fn disposer_after_scope_dropped_is_noop() {
        let registry = registry();
        let scope = registry.scope();
        let disposer = scope.bind("e", |_| {});
        drop(scope);
        disposer.dispose();
        assert!(!registry.is_bound("e"));
    }

    #[test]
    fn array_identity_is_distinct_from_single() {
        let registry = registry();
        let scope = registry.scope();
        let set = ComboSet::new(["e"]);
        scope.bind(&set, |_| {});
        scope.bind("e", |_| {});
        assert_eq!(registry.depth("e"), 2);
        assert!(scope.owns(&set));
        assert!(scope.owns("e"));
    }

    #[test]
    fn same_set_handle_replaces() {
        let registry = registry();
        let scope = registry.scope();
        let tabs = ComboSet::new(["a", "b"]);
        scope.bind(&tabs, |_| {});
        scope.bind(&tabs, |_| {});
        assert_eq!(registry.depth("a"), 1);
        assert_eq!(scope.len(), 1);

        scope.unbind(&tabs);
        assert!(!registry.is_bound("b"));
    }

    #[test]
    fn separately_built_arrays_stack() {
        let registry = registry();
        let scope = registry.scope();
        scope.bind(vec!["a", "b"], |_| {});
        scope.bind(vec!["a", "b"], |_| {});
        assert_eq!(registry.depth("a"), 2);
        assert_eq!(scope.len(), 2);

        // A fresh array is a new identity and owns nothing.
        scope.unbind(["a", "b"]);
        assert_eq!(registry.depth("a"), 2);
    }

    #[test]
    fn context_is_shared_registry() {
        let registry = registry();
        let scope = registry.scope();
        scope.context().pause(Some("e"));
        assert!(registry.is_paused("e"));
    }
}
