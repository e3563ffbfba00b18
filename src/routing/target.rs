//! Route targets and routing modes.

use serde::{Deserialize, Serialize};

/// Which physical pool an acquisition goes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RouteTarget {
    /// Read replica
    Read,
    /// Write primary
    Write,
}

impl RouteTarget {
    /// Target used when nothing else has been decided.
    pub const DEFAULT: RouteTarget = RouteTarget::Read;

    /// Derive the target from a transaction's read-only flag.
    pub fn from_read_only(read_only: bool) -> Self {
        if read_only { Self::Read } else { Self::Write }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Read => "read",
            Self::Write => "write",
        }
    }
}

impl Default for RouteTarget {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl std::fmt::Display for RouteTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Propagation model the process runs under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoutingMode {
    /// Thread-per-request; intent lives in thread-local storage.
    #[default]
    Sync,
    /// Multiplexed tasks; intent travels with the task's transaction context.
    Async,
}

impl RoutingMode {
    /// Parse a configured mode. Only "async" (any case) selects `Async`.
    pub fn parse_lenient(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("async") {
            Self::Async
        } else {
            Self::Sync
        }
    }
}

impl std::fmt::Display for RoutingMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sync => write!(f, "sync"),
            Self::Async => write!(f, "async"),
        }
    }
}
