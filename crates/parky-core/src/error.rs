//! # Error Types
//!
//! Domain-specific error types for parky-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  parky-core errors (this file)                                         │
//! │  └── CoreError        - Ticket rule violations                         │
//! │                                                                         │
//! │  parky-db errors (separate crate)                                      │
//! │  └── DbError          - Store operation failures                       │
//! │                                                                         │
//! │  HTTP errors (in parky-server)                                         │
//! │  └── ApiError         - What clients see (status + JSON body)          │
//! │                                                                         │
//! │  Flow: CoreError → DbError → ApiError → Client                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

use crate::ticket::TicketId;

/// Ticket rule violations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    /// Ticket ids are positive integers assigned from a sequence starting at 1.
    #[error("Invalid ticket id: {0}")]
    InvalidTicketId(String),

    /// The ticket has already been settled.
    ///
    /// ## When This Occurs
    /// - A second payment attempt for the same ticket
    /// - Two concurrent payments; the later one sees the committed first
    #[error("Ticket {0} has already been paid")]
    AlreadyPaid(TicketId),
}

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            CoreError::AlreadyPaid(42).to_string(),
            "Ticket 42 has already been paid"
        );
        assert_eq!(
            CoreError::InvalidTicketId("-3".to_string()).to_string(),
            "Invalid ticket id: -3"
        );
    }
}
