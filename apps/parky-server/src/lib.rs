//! # Parky Server
//!
//! HTTP API for issuing, pricing and paying parking tickets.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                           Parky Server                                  │
//! │                                                                         │
//! │  POST /tickets ─────────┐                                               │
//! │  GET  /tickets/{id} ────┼──► routes ──► TicketStore ──► SQLite          │
//! │  POST /payments/{id} ───┘       │                                       │
//! │                                 └──► ApiError (404 / 409 / 400 / 500)   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration
//! Environment variables:
//! - `PARKY_HOST` - Hostname/IP to listen on (default: localhost)
//! - `PARKY_PORT` - Port to listen on (default: 3000)
//! - `PARKY_DATABASE_PATH` - Store file (default: parkypark.db)
//! - `PARKY_BACKDATE_MINUTES` - Backdate new tickets, for demos (default: 0)
//! - `RUST_LOG` - Log filter (default: info)

pub mod config;
pub mod error;
pub mod routes;

use parky_db::TicketStore;

// Re-exports
pub use config::ServerConfig;
pub use error::ApiError;
pub use routes::router;

/// Shared application state.
#[derive(Debug, Clone)]
pub struct AppState {
    pub store: TicketStore,
}

impl AppState {
    pub fn new(store: TicketStore) -> Self {
        AppState { store }
    }
}
