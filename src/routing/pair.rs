//! The write/read provider pair.

use super::RouteTarget;
use crate::error::{RoutingError, RoutingResult};

/// Exactly two providers, one per route target. Immutable once built.
#[derive(Debug, Clone)]
pub struct ConnectionProviderPair<P> {
    write: P,
    read: P,
}

impl<P> ConnectionProviderPair<P> {
    pub fn new(write: P, read: P) -> Self {
        Self { write, read }
    }

    /// Build from optional providers, failing on whichever side is missing.
    pub fn try_new(write: Option<P>, read: Option<P>) -> RoutingResult<Self> {
        let write = write
            .ok_or_else(|| RoutingError::misconfiguration("writer", "connection provider missing"))?;
        let read = read
            .ok_or_else(|| RoutingError::misconfiguration("reader", "connection provider missing"))?;
        Ok(Self { write, read })
    }

    pub fn get(&self, target: RouteTarget) -> &P {
        match target {
            RouteTarget::Write => &self.write,
            RouteTarget::Read => &self.read,
        }
    }

    pub fn write(&self) -> &P {
        &self.write
    }

    pub fn read(&self) -> &P {
        &self.read
    }

    /// Both providers, write first.
    pub fn iter(&self) -> impl Iterator<Item = (RouteTarget, &P)> {
        [(RouteTarget::Write, &self.write), (RouteTarget::Read, &self.read)].into_iter()
    }

    /// Transform both providers, keeping their roles.
    pub fn map<Q>(self, mut f: impl FnMut(P) -> Q) -> ConnectionProviderPair<Q> {
        ConnectionProviderPair {
            write: f(self.write),
            read: f(self.read),
        }
    }
}
