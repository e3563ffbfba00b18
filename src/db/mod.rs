//! Physical database access.
//!
//! This module provides the providers the routers delegate to:
//! - Connection pools for MySQL, PostgreSQL and SQLite
//! - Blocking wrappers for thread-per-request callers
//! - Database dispatch macros for reducing code duplication
//! - Periodic pool statistics

#[macro_use]
pub mod macros;
pub mod monitor;
pub mod pool;
pub mod types;

pub use monitor::{PoolMonitor, PoolStats, RuntimeStats};
pub use pool::{BlockingConnection, BlockingPool, DbConnection, DbPool, NamedPool, PooledConnection};
pub use types::DatabaseType;
