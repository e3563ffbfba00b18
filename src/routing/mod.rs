//! Read/write routing.
//!
//! This module decides, per connection acquisition, whether the write primary
//! or the read replica serves it:
//! - `target`: route targets and routing modes
//! - `mode`: the process-wide mode registry
//! - `pair`: the write/read provider pair
//! - `intent`: thread-scoped intent for the blocking model
//! - `context`: task-scoped transaction context for the async model
//! - `blocking` / `nonblocking`: the two routing providers

pub mod blocking;
pub mod context;
pub mod intent;
pub mod mode;
pub mod nonblocking;
pub mod pair;
pub mod source;
pub mod target;

pub use blocking::BlockingRoutingProvider;
pub use context::{TaskTransactionState, TransactionContext, TransactionState, propagate};
pub use intent::{IntentGuard, ThreadIntent};
pub use mode::ModeRegistry;
pub use nonblocking::AsyncRoutingProvider;
pub use pair::ConnectionProviderPair;
pub use source::{BlockingConnectionSource, ConnectionSource};
pub use target::{RouteTarget, RoutingMode};
