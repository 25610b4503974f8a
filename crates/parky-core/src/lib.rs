//! # parky-core: Pure Business Logic for Parky
//!
//! This crate holds the parking ticket entity and its fee model. It has no
//! database, network or file system access.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Parky Architecture                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    parky-server (HTTP)                          │   │
//! │  │   POST /tickets ─► GET /tickets/{id} ─► POST /payments/{id}     │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 parky-db (TicketStore)                          │   │
//! │  │        create / find / save / pay in SQLite transactions        │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ parky-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐                  │   │
//! │  │   │  ticket   │  │   money   │  │   error   │                  │   │
//! │  │   │  Ticket   │  │   Money   │  │ CoreError │                  │   │
//! │  │   │ FeeTier   │  │  Display  │  │           │                  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘                  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK                             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`ticket`] - The `Ticket` entity and the tiered fee schedule
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use chrono::{Duration, Utc};
//! use parky_core::Ticket;
//!
//! let now = Utc::now();
//! let ticket = Ticket::issue(1, now - Duration::hours(2));
//!
//! // Two hours parked: one compounding increase over the base rate
//! assert_eq!(ticket.owing_at(now).cents(), 450);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod money;
pub mod ticket;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult};
pub use money::Money;
pub use ticket::{parse_ticket_id, FeeTier, Ticket, TicketId};

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Name of the durable collection that holds ticket records.
pub const TICKETS_BUCKET: &str = "Tickets";

/// Base parking rate in cents, charged for the first hour.
pub const BASE_RATE_CENTS: i64 = 300;
