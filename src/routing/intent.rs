//! Thread-scoped routing intent for the blocking model.
//!
//! Each thread carries at most one [`RouteTarget`]. The raw setters
//! ([`ThreadIntent::set`], [`ThreadIntent::clear`]) exist for interceptors that
//! manage the lifecycle themselves; everything else should go through
//! [`ThreadIntent::scope`] or [`ThreadIntent::with_intent`], which restore the
//! previous value when the scope ends, including on panic.
//!
//! Open scopes are kept on a per-thread stack. A guard dropped while a newer
//! scope is still open only marks its frame closed; the value it saved is
//! restored once every newer scope has ended. Guards may therefore be dropped
//! in any order and the thread still ends up with the intent it had before the
//! outermost scope.
//!
//! A thread returned to a pool with an intent still set will misroute the next
//! unit of work that runs on it.

use super::RouteTarget;
use std::cell::{Cell, RefCell};
use std::marker::PhantomData;
use tracing::{trace, warn};

thread_local! {
    static INTENT: Cell<Option<RouteTarget>> = const { Cell::new(None) };
    static SCOPES: RefCell<Vec<ScopeFrame>> = const { RefCell::new(Vec::new()) };
}

#[derive(Debug, Clone, Copy)]
struct ScopeFrame {
    previous: Option<RouteTarget>,
    open: bool,
}

/// Accessor for the current thread's routing intent.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadIntent;

impl ThreadIntent {
    /// The intent set on this thread, if any.
    pub fn current() -> Option<RouteTarget> {
        INTENT.with(Cell::get)
    }

    /// Overwrite this thread's intent. Last write wins.
    pub fn set(target: RouteTarget) {
        trace!(target = %target, "Thread intent set");
        INTENT.with(|cell| cell.set(Some(target)));
    }

    /// Remove this thread's intent.
    pub fn clear() {
        INTENT.with(|cell| cell.set(None));
    }

    /// Number of scopes on this thread whose values have not been restored yet.
    pub fn depth() -> usize {
        SCOPES.with(|scopes| scopes.borrow().len())
    }

    /// Set `target` until the returned guard is dropped.
    #[must_use = "the intent is restored as soon as the guard is dropped"]
    pub fn scope(target: RouteTarget) -> IntentGuard {
        let previous = INTENT.with(|cell| cell.replace(Some(target)));
        let depth = SCOPES.with(|scopes| {
            let mut scopes = scopes.borrow_mut();
            scopes.push(ScopeFrame {
                previous,
                open: true,
            });
            scopes.len() - 1
        });
        IntentGuard {
            depth,
            previous,
            _not_send: PhantomData,
        }
    }

    /// Run `f` with `target` as this thread's intent.
    pub fn with_intent<R>(target: RouteTarget, f: impl FnOnce() -> R) -> R {
        let _guard = Self::scope(target);
        f()
    }
}

/// Restores the prior intent (or its absence) on drop.
///
/// Not `Send`: the guard must be dropped on the thread whose intent it changed.
#[derive(Debug)]
pub struct IntentGuard {
    depth: usize,
    previous: Option<RouteTarget>,
    _not_send: PhantomData<*const ()>,
}

impl IntentGuard {
    /// The intent that will be restored.
    pub fn previous(&self) -> Option<RouteTarget> {
        self.previous
    }
}

impl Drop for IntentGuard {
    fn drop(&mut self) {
        SCOPES.with(|scopes| {
            let mut scopes = scopes.borrow_mut();
            if self.depth + 1 != scopes.len() {
                // A newer scope is still open; it restores our value when it closes.
                if let Some(frame) = scopes.get_mut(self.depth) {
                    warn!(depth = self.depth, "Intent scope closed out of order");
                    frame.open = false;
                }
                return;
            }

            let mut restore = self.previous;
            scopes.pop();
            while let Some(frame) = scopes.last().copied().filter(|f| !f.open) {
                restore = frame.previous;
                scopes.pop();
            }
            INTENT.with(|cell| cell.set(restore));
        });
    }
}
