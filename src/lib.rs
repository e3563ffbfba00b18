//! Read/write connection routing.
//!
//! This library routes each connection acquisition to either a write primary
//! or a read replica. Two providers cover the two execution models:
//! - [`BlockingRoutingProvider`](routing::BlockingRoutingProvider) reads an
//!   explicitly marked, thread-scoped intent.
//! - [`AsyncRoutingProvider`](routing::AsyncRoutingProvider) infers the route
//!   from the read-only flag of the task's active transaction.
//!
//! Both default to the read replica when nothing says otherwise.

pub mod config;
pub mod db;
pub mod error;
pub mod router;
pub mod routing;
pub mod runtime;

pub use config::Config;
pub use error::{RoutingError, RoutingResult};
pub use router::Router;
pub use routing::{RouteTarget, RoutingMode};
