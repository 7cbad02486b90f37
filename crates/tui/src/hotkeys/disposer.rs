//! Disposers: values that undo exactly the bind call that produced them.

use std::fmt;

/// Undoes one `bind` call.
///
/// Dropping a `Disposer` without calling [`dispose`](Self::dispose) leaves the
/// binding in place; consumers that unbind by identity may ignore it. Use
/// [`into_guard`](Self::into_guard) to tie the binding to a value's lifetime.
pub struct Disposer {
    undo: Option<Box<dyn FnOnce()>>,
}

impl Disposer {
    pub(crate) fn new<F>(undo: F) -> Self
    where
        F: FnOnce() + 'static,
    {
        Self {
            undo: Some(Box::new(undo)),
        }
    }

    /// A disposer that does nothing.
    pub fn noop() -> Self {
        Self { undo: None }
    }

    /// Remove the binding. Safe to call after the registry or scope is gone.
    pub fn dispose(mut self) {
        if let Some(undo) = self.undo.take() {
            undo();
        }
    }

    /// Convert into a guard that disposes when dropped.
    pub fn into_guard(self) -> BindingGuard {
        BindingGuard {
            disposer: Some(self),
        }
    }
}

impl fmt::Debug for Disposer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Disposer")
            .field("armed", &self.undo.is_some())
            .finish()
    }
}

/// Disposes its binding on drop.
#[derive(Debug)]
pub struct BindingGuard {
    disposer: Option<Disposer>,
}

impl BindingGuard {
    /// Keep the binding past the guard's lifetime.
    pub fn release(mut self) -> Disposer {
        self.disposer.take().unwrap_or_else(Disposer::noop)
    }
}

impl Drop for BindingGuard {
    fn drop(&mut self) {
        if let Some(disposer) = self.disposer.take() {
            disposer.dispose();
        }
    }
}
