//! Routing provider for the async, context-propagated model.
//!
//! Unlike [`BlockingRoutingProvider`](super::BlockingRoutingProvider), this
//! provider does not read an explicitly marked intent. It infers the route from
//! the active transaction:
//!
//! | transaction            | route |
//! |------------------------|-------|
//! | active, read-only      | read  |
//! | active, read-write     | write |
//! | none / not actual      | read  |
//!
//! Integrators moving code between the two models should be aware that the
//! policies differ: blocking code that forgets to mark intent goes to the
//! replica even inside a read-write transaction, async code does not.

use super::context::{self, TaskTransactionState, TransactionState};
use super::{ConnectionProviderPair, ConnectionSource, RouteTarget};
use crate::error::RoutingResult;
use std::future::Future;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct AsyncRoutingProvider<P, S = TaskTransactionState> {
    providers: ConnectionProviderPair<P>,
    transactions: S,
}

impl<P: ConnectionSource> AsyncRoutingProvider<P> {
    /// Route using the task-local transaction context.
    pub fn new(providers: ConnectionProviderPair<P>) -> Self {
        Self::with_transaction_state(providers, TaskTransactionState)
    }
}

impl<P: ConnectionSource, S: TransactionState> AsyncRoutingProvider<P, S> {
    /// Route using a caller-supplied transaction source.
    pub fn with_transaction_state(providers: ConnectionProviderPair<P>, transactions: S) -> Self {
        Self {
            providers,
            transactions,
        }
    }

    pub fn providers(&self) -> &ConnectionProviderPair<P> {
        &self.providers
    }

    /// The target an acquisition from the current task would use.
    pub fn resolve_target(&self) -> RouteTarget {
        self.transactions
            .current_read_only()
            .map(RouteTarget::from_read_only)
            .unwrap_or(RouteTarget::DEFAULT)
    }

    /// Acquire from the pool chosen by the current transaction.
    ///
    /// The target is resolved when the returned future is first polled, so
    /// the future can be built outside a transaction scope and awaited inside
    /// it.
    pub fn acquire(&self) -> impl Future<Output = RoutingResult<P::Connection>> + Send {
        async move {
            let target = self.resolve_target();
            debug!(target = %target, "Routing async acquisition");
            self.providers.get(target).acquire().await
        }
    }

    /// Run `fut` in a read-only transaction scope.
    pub async fn with_read<F: Future>(&self, fut: F) -> F::Output {
        context::with_intent(RouteTarget::Read, fut).await
    }

    /// Run `fut` in a read-write transaction scope.
    pub async fn with_write<F: Future>(&self, fut: F) -> F::Output {
        context::with_intent(RouteTarget::Write, fut).await
    }
}

impl<P: ConnectionSource, S: TransactionState> ConnectionSource for AsyncRoutingProvider<P, S> {
    type Connection = P::Connection;

    fn acquire(&self) -> impl Future<Output = RoutingResult<Self::Connection>> + Send {
        AsyncRoutingProvider::acquire(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::context::TransactionContext;
    use crate::routing::intent::ThreadIntent;

    struct Named(&'static str);

    impl ConnectionSource for Named {
        type Connection = &'static str;

        async fn acquire(&self) -> RoutingResult<Self::Connection> {
            Ok(self.0)
        }
    }

    struct Fixed(Option<bool>);

    impl TransactionState for Fixed {
        fn current_read_only(&self) -> Option<bool> {
            self.0
        }
    }

    fn pair() -> ConnectionProviderPair<Named> {
        ConnectionProviderPair::new(Named("write"), Named("read"))
    }

    #[tokio::test]
    async fn test_no_transaction_routes_to_read() {
        let router = AsyncRoutingProvider::new(pair());
        assert_eq!(router.acquire().await.unwrap(), "read");
    }

    #[tokio::test]
    async fn test_read_only_transaction_routes_to_read() {
        let router = AsyncRoutingProvider::new(pair());
        let conn = TransactionContext::scope(TransactionContext::read_only(), router.acquire())
            .await
            .unwrap();
        assert_eq!(conn, "read");
    }

    #[tokio::test]
    async fn test_read_write_transaction_routes_to_write() {
        let router = AsyncRoutingProvider::new(pair());
        let conn = router.with_write(async { router.acquire().await }).await.unwrap();
        assert_eq!(conn, "write");
    }

    #[tokio::test]
    async fn test_non_transactional_scope_routes_to_read() {
        let router = AsyncRoutingProvider::new(pair());
        let conn = TransactionContext::scope(
            TransactionContext::non_transactional(false),
            async { router.acquire().await },
        )
        .await
        .unwrap();
        assert_eq!(conn, "read");
    }

    #[tokio::test]
    async fn test_thread_intent_is_ignored() {
        let router = AsyncRoutingProvider::new(pair());
        let _guard = ThreadIntent::scope(RouteTarget::Write);
        assert_eq!(router.acquire().await.unwrap(), "read");
    }

    #[tokio::test]
    async fn test_target_resolved_at_first_poll() {
        let router = AsyncRoutingProvider::new(pair());
        let pending = router.acquire();
        let conn = TransactionContext::scope(TransactionContext::read_write(), pending)
            .await
            .unwrap();
        assert_eq!(conn, "write");
    }

    #[tokio::test]
    async fn test_custom_transaction_state() {
        let cases = [
            (Some(true), "read"),
            (Some(false), "write"),
            (None, "read"),
        ];
        for (state, expected) in cases {
            let router = AsyncRoutingProvider::with_transaction_state(pair(), Fixed(state));
            assert_eq!(router.acquire().await.unwrap(), expected);
        }
    }
}
