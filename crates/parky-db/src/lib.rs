//! # parky-db: Ticket Store for Parky
//!
//! Durable storage for parking tickets. Records live in a key-value bucket on
//! SQLite; ids come from the bucket's persistent sequence.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Parky Data Flow                                │
//! │                                                                         │
//! │  HTTP handler (POST /payments/{id})                                     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     parky-db (THIS CRATE)                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │  TicketStore  │    │    Bucket     │    │  Migrations  │  │   │
//! │  │   │  (store.rs)   │───►│  (bucket.rs)  │    │  (embedded)  │  │   │
//! │  │   │ create/find/  │    │ get/put/      │    │ 001_buckets  │  │   │
//! │  │   │ save/pay      │    │ next_sequence │    │              │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite file (parkypark.db, WAL mode)                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust,ignore
//! use parky_db::{StoreConfig, TicketStore};
//!
//! let store = TicketStore::open(StoreConfig::new("./parkypark.db")).await?;
//!
//! let ticket = store.create().await?;
//! println!("{}", store.find(ticket.id).await?.show_owing());
//!
//! let paid = store.pay(ticket.id, "tok_visa").await?;
//! store.close().await;
//! ```

pub mod bucket;
pub mod error;
pub mod migrations;
pub mod store;

pub use bucket::{key_for, Bucket};
pub use error::{DbError, DbResult};
pub use store::{StoreConfig, TicketStore, DEFAULT_DATABASE_PATH};
