//! Error types for the routing layer.
//!
//! Misconfiguration is fatal and only surfaces at startup. Everything else is a
//! downstream failure from the physical pool, passed through to the caller
//! without retry and without falling back to the other route.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RoutingError {
    #[error("Misconfiguration: {component} - {reason}")]
    Misconfiguration { component: String, reason: String },

    #[error("Connection failed: {message}")]
    Connection { message: String, suggestion: String },

    #[error("Database error: {message}")]
    Database {
        message: String,
        /// e.g., "42P01" for undefined table
        sql_state: Option<String>,
        suggestion: String,
    },

    #[error("Timeout: {operation} exceeded {elapsed_secs}s")]
    Timeout {
        operation: String,
        elapsed_secs: u64,
    },

    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl RoutingError {
    /// Create a misconfiguration error for a startup component.
    pub fn misconfiguration(component: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Misconfiguration {
            component: component.into(),
            reason: reason.into(),
        }
    }

    /// Create a connection error with a helpful suggestion.
    pub fn connection(message: impl Into<String>, suggestion: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
            suggestion: suggestion.into(),
        }
    }

    /// Create a database error with optional SQL state.
    pub fn database(
        message: impl Into<String>,
        sql_state: Option<String>,
        suggestion: impl Into<String>,
    ) -> Self {
        Self::Database {
            message: message.into(),
            sql_state,
            suggestion: suggestion.into(),
        }
    }

    /// Create a timeout error.
    pub fn timeout(operation: impl Into<String>, elapsed_secs: u64) -> Self {
        Self::Timeout {
            operation: operation.into(),
            elapsed_secs,
        }
    }

    /// Create an invalid input error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Get the suggestion for this error, if available.
    pub fn suggestion(&self) -> Option<&str> {
        match self {
            Self::Connection { suggestion, .. } => Some(suggestion),
            Self::Database { suggestion, .. } => Some(suggestion),
            _ => None,
        }
    }

    /// True for errors that abort startup rather than a single acquisition.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Misconfiguration { .. })
    }
}

/// Convert sqlx errors to RoutingError.
impl From<sqlx::Error> for RoutingError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Configuration(msg) => RoutingError::connection(
                msg.to_string(),
                "Check the connection string format and credentials",
            ),
            sqlx::Error::Database(db_err) => {
                let code = db_err.code().map(|c| c.to_string());
                RoutingError::database(
                    db_err.message(),
                    code,
                    "Check the SQL syntax and referenced objects",
                )
            }
            sqlx::Error::RowNotFound => RoutingError::database(
                "No rows returned",
                None,
                "Verify the query conditions match existing data",
            ),
            // The limit lives on the pool; NamedPool reports it as a Timeout.
            sqlx::Error::PoolTimedOut => RoutingError::connection(
                "Timed out waiting for a pooled connection",
                "Raise --acquire-timeout or --max-connections",
            ),
            sqlx::Error::PoolClosed => {
                RoutingError::connection("Connection pool is closed", "Rebuild the router")
            }
            sqlx::Error::Io(io_err) => RoutingError::connection(
                format!("I/O error: {}", io_err),
                "Check network connectivity and database server status",
            ),
            sqlx::Error::Tls(tls_err) => RoutingError::connection(
                format!("TLS error: {}", tls_err),
                "Verify TLS configuration and certificates",
            ),
            sqlx::Error::Protocol(msg) => RoutingError::connection(
                format!("Protocol error: {}", msg),
                "Check database server compatibility",
            ),
            sqlx::Error::ColumnDecode { index, source } => {
                RoutingError::internal(format!("Failed to decode column {}: {}", index, source))
            }
            sqlx::Error::Decode(source) => {
                RoutingError::internal(format!("Decode error: {}", source))
            }
            sqlx::Error::WorkerCrashed => RoutingError::internal("Database worker crashed"),
            _ => RoutingError::internal(format!("Unknown database error: {}", err)),
        }
    }
}

/// Result type alias for routing operations.
pub type RoutingResult<T> = Result<T, RoutingError>;
