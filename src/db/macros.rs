//! Database dispatch macros for reducing code duplication.
//!
//! Connections are held as database-specific `PoolConnection`s; these macros
//! expand the per-driver match arms at compile time.

/// Macro for generating match arms over `PooledConnection` variants.
///
/// # Example
///
/// ```ignore
/// impl_conn_dispatch!(&mut self.inner, {
///     MySql(c) => run_mysql(c),
///     Postgres(c) => run_postgres(c),
///     SQLite(c) => run_sqlite(c),
/// });
/// ```
#[macro_export]
macro_rules! impl_conn_dispatch {
    ($conn:expr, { $($variant:ident($c:ident) => $body:expr),+ $(,)? }) => {
        match $conn {
            $(
                $crate::db::pool::PooledConnection::$variant($c) => $body,
            )+
        }
    };
}

pub use impl_conn_dispatch;
