//! Task-scoped transaction context for the async model.
//!
//! The context is stored in a tokio task-local, which is owned by the future
//! rather than by the thread polling it. A request that suspends on one worker
//! and resumes on another still sees the same context, and dropping the future
//! (completion, error, or cancellation) drops the context with it.
//!
//! Tokio task-local variables are not inherited across spawned tasks. Wrap the
//! spawned future with [`propagate`] to carry the current transaction along.

use super::RouteTarget;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::future::Future;
use tokio::task_local;

task_local! {
    static TRANSACTION: TransactionContext;
}

/// Attributes of the transaction a future runs in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransactionContext {
    transaction_id: String,
    read_only: bool,
    /// False for a synchronization scope that has no physical transaction.
    active: bool,
    started_at: DateTime<Utc>,
}

impl TransactionContext {
    /// An active transaction with the given read-only flag.
    pub fn new(read_only: bool) -> Self {
        Self {
            transaction_id: generate_transaction_id(),
            read_only,
            active: true,
            started_at: Utc::now(),
        }
    }

    pub fn read_only() -> Self {
        Self::new(true)
    }

    pub fn read_write() -> Self {
        Self::new(false)
    }

    /// A scope carrying transaction attributes without an actual transaction.
    ///
    /// Routing treats this the same as no transaction at all.
    pub fn non_transactional(read_only: bool) -> Self {
        Self {
            active: false,
            ..Self::new(read_only)
        }
    }

    pub fn transaction_id(&self) -> &str {
        &self.transaction_id
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// The context of the task currently being polled, if any.
    pub fn current() -> Option<Self> {
        TRANSACTION.try_with(Clone::clone).ok()
    }

    /// Run `fut` with `ctx` in scope. Nested scopes shadow outer ones.
    pub async fn scope<F>(ctx: TransactionContext, fut: F) -> F::Output
    where
        F: Future,
    {
        TRANSACTION.scope(ctx, fut).await
    }
}

/// Run `fut` inside a transaction whose read-only flag matches `target`.
pub async fn with_intent<F>(target: RouteTarget, fut: F) -> F::Output
where
    F: Future,
{
    let ctx = TransactionContext::new(target == RouteTarget::Read);
    TransactionContext::scope(ctx, fut).await
}

/// Capture the caller's transaction context and attach it to `fut`.
///
/// The capture happens when `propagate` is called, so call it in the parent
/// task and hand the result to `tokio::spawn`.
pub fn propagate<F>(fut: F) -> impl Future<Output = F::Output>
where
    F: Future,
{
    let captured = TransactionContext::current();
    async move {
        match captured {
            Some(ctx) => TRANSACTION.scope(ctx, fut).await,
            None => fut.await,
        }
    }
}

/// Reports the transaction the current unit of work runs in.
pub trait TransactionState: Send + Sync {
    /// `Some(read_only)` when an actual transaction is active, else `None`.
    fn current_read_only(&self) -> Option<bool>;
}

/// Reads the task-local [`TransactionContext`].
#[derive(Debug, Clone, Copy, Default)]
pub struct TaskTransactionState;

impl TransactionState for TaskTransactionState {
    fn current_read_only(&self) -> Option<bool> {
        TransactionContext::current()
            .filter(TransactionContext::is_active)
            .map(|ctx| ctx.read_only)
    }
}

fn generate_transaction_id() -> String {
    format!("tx_{}", uuid::Uuid::new_v4().simple())
}
