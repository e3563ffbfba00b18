//! Routing provider for the blocking, thread-per-request model.
//!
//! The route is taken from the calling thread's [`ThreadIntent`], which an
//! interceptor (or the caller) sets before the unit of work runs. With no
//! intent set, acquisitions go to the read pool: write routing is opt-in.
//!
//! This provider never looks at a transaction's read-only flag. The async
//! provider does the opposite; see [`AsyncRoutingProvider`](super::AsyncRoutingProvider).

use super::intent::{IntentGuard, ThreadIntent};
use super::{BlockingConnectionSource, ConnectionProviderPair, RouteTarget};
use crate::error::RoutingResult;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct BlockingRoutingProvider<P> {
    providers: ConnectionProviderPair<P>,
}

impl<P: BlockingConnectionSource> BlockingRoutingProvider<P> {
    pub fn new(providers: ConnectionProviderPair<P>) -> Self {
        Self { providers }
    }

    pub fn providers(&self) -> &ConnectionProviderPair<P> {
        &self.providers
    }

    /// The target the next acquisition on this thread would use.
    pub fn resolve_target(&self) -> RouteTarget {
        ThreadIntent::current().unwrap_or(RouteTarget::DEFAULT)
    }

    /// Acquire from the pool chosen by this thread's intent.
    ///
    /// Downstream failures are returned as-is; there is no fallback to the
    /// other pool.
    pub fn acquire(&self) -> RoutingResult<P::Connection> {
        let target = self.resolve_target();
        debug!(target = %target, "Routing blocking acquisition");
        self.providers.get(target).acquire()
    }

    pub fn mark_write(&self) {
        ThreadIntent::set(RouteTarget::Write);
    }

    pub fn mark_read(&self) {
        ThreadIntent::set(RouteTarget::Read);
    }

    /// Must run on every exit path of a unit of work started with a mark.
    pub fn clear(&self) {
        ThreadIntent::clear();
    }

    /// Scope `target` to the returned guard.
    #[must_use = "the intent is restored as soon as the guard is dropped"]
    pub fn scope(&self, target: RouteTarget) -> IntentGuard {
        ThreadIntent::scope(target)
    }

    /// Run `f` with `target` in scope, restoring the prior intent afterwards.
    pub fn with_intent<R>(&self, target: RouteTarget, f: impl FnOnce() -> R) -> R {
        ThreadIntent::with_intent(target, f)
    }

    /// Interceptor entry point: route `f` by its transaction's read-only flag.
    pub fn transactional<R>(&self, read_only: bool, f: impl FnOnce() -> R) -> R {
        self.with_intent(RouteTarget::from_read_only(read_only), f)
    }
}

impl<P: BlockingConnectionSource> BlockingConnectionSource for BlockingRoutingProvider<P> {
    type Connection = P::Connection;

    fn acquire(&self) -> RoutingResult<Self::Connection> {
        BlockingRoutingProvider::acquire(self)
    }
}
