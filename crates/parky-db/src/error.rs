//! # Store Error Types
//!
//! Error types for ticket store operations.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  SQLite Error (sqlx::Error)      CoreError (parky-core)                 │
//! │       │                               │                                 │
//! │       └───────────────┬───────────────┘                                 │
//! │                       ▼                                                 │
//! │  DbError (this module) ← Adds context and categorization               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ApiError (in parky-server) ← status code + JSON body                  │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Categories
//! - **Fatal at startup**: `ConnectionFailed`, `MigrationFailed`
//! - **Recoverable, expected**: `NotFound`, `AlreadyPaid`
//! - **Recoverable, store I/O**: everything else; callers decide whether to
//!   retry or answer with a server error

use parky_core::{CoreError, TicketId};
use thiserror::Error;

/// Ticket store errors.
#[derive(Debug, Error)]
pub enum DbError {
    /// No ticket is stored under the requested id.
    ///
    /// ## When This Occurs
    /// - The id was never issued
    /// - The stored value is empty
    #[error("Cannot find a ticket with ID: {id}")]
    NotFound { id: TicketId },

    /// A payment was already recorded for the ticket.
    #[error("Ticket {id} has already been paid")]
    AlreadyPaid { id: TicketId },

    /// Database connection failed.
    ///
    /// ## When This Occurs
    /// - Database file can't be created
    /// - File permissions issue
    /// - Disk full
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Migration failed.
    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// Query execution failed.
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// A transaction could not begin or commit.
    #[error("Transaction failed: {0}")]
    TransactionFailed(String),

    /// Pool exhausted (all connections in use).
    #[error("Connection pool exhausted")]
    PoolExhausted,

    /// A stored value could not be encoded or decoded.
    #[error("Serialization failed: {0}")]
    Serialization(String),

    /// Internal store error.
    #[error("Internal database error: {0}")]
    Internal(String),
}

impl DbError {
    /// Creates a NotFound error for a ticket id.
    pub fn not_found(id: TicketId) -> Self {
        DbError::NotFound { id }
    }

    /// Whether the store cannot be used at all after this error.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            DbError::ConnectionFailed(_) | DbError::MigrationFailed(_)
        )
    }
}

/// Convert sqlx errors to DbError.
///
/// ## Error Mapping
/// ```text
/// sqlx::Error::Database       → DbError::QueryFailed
/// sqlx::Error::PoolTimedOut   → DbError::PoolExhausted
/// sqlx::Error::PoolClosed     → DbError::ConnectionFailed
/// Other                       → DbError::Internal
/// ```
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(db_err) => DbError::QueryFailed(db_err.message().to_string()),

            sqlx::Error::PoolTimedOut => DbError::PoolExhausted,

            sqlx::Error::PoolClosed => DbError::ConnectionFailed("Pool is closed".to_string()),

            _ => DbError::Internal(err.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::MigrationFailed(err.to_string())
    }
}

impl From<serde_json::Error> for DbError {
    fn from(err: serde_json::Error) -> Self {
        DbError::Serialization(err.to_string())
    }
}

impl From<CoreError> for DbError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::AlreadyPaid(id) => DbError::AlreadyPaid { id },
            err @ CoreError::InvalidTicketId(_) => DbError::Internal(err.to_string()),
        }
    }
}

/// Result type for store operations.
pub type DbResult<T> = Result<T, DbError>;
