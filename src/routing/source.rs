//! Connection provider traits.
//!
//! Physical pools and routing providers implement the same trait, so callers
//! that hold a `ConnectionSource` cannot tell whether they were given a plain
//! pool or a router.

use crate::error::RoutingResult;
use std::future::Future;
use std::sync::Arc;

/// A provider that hands out connections asynchronously.
pub trait ConnectionSource: Send + Sync {
    type Connection: Send;

    /// Acquire one connection.
    fn acquire(&self) -> impl Future<Output = RoutingResult<Self::Connection>> + Send;
}

/// A provider that hands out connections by blocking the calling thread.
pub trait BlockingConnectionSource: Send + Sync {
    type Connection;

    /// Acquire one connection.
    fn acquire(&self) -> RoutingResult<Self::Connection>;
}

impl<T: ConnectionSource> ConnectionSource for Arc<T> {
    type Connection = T::Connection;

    fn acquire(&self) -> impl Future<Output = RoutingResult<Self::Connection>> + Send {
        (**self).acquire()
    }
}

impl<T: BlockingConnectionSource> BlockingConnectionSource for Arc<T> {
    type Connection = T::Connection;

    fn acquire(&self) -> RoutingResult<Self::Connection> {
        (**self).acquire()
    }
}
