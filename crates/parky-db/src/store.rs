//! # Ticket Store
//!
//! Connection pool setup and the four ticket operations.
//!
//! ## SQLite Configuration
//! - WAL mode: readers don't block the writer
//! - NORMAL synchronous: durable across application crashes
//! - One writer at a time, enforced by an async lock in front of SQLite's own
//!   write lock so read-modify-write transactions never fail a lock upgrade
//!
//! ## Operations
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  create()    WRITE tx: next sequence → Ticket::issue → put → commit     │
//! │  find(id)    READ  tx: get → decode                                     │
//! │  save(t)     WRITE tx: encode → put (last writer wins) → commit         │
//! │  pay(id, c)  WRITE tx: get → decode → settle → put → commit             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{Duration as TimeOffset, Utc};
use parky_core::{Ticket, TicketId, TICKETS_BUCKET};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::{SqliteConnection, SqlitePool};
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::bucket::{key_for, Bucket};
use crate::error::{DbError, DbResult};
use crate::migrations;

/// Default location of the store file.
pub const DEFAULT_DATABASE_PATH: &str = "parkypark.db";

/// Path that selects a private in-memory database.
const MEMORY_PATH: &str = ":memory:";

// =============================================================================
// Configuration
// =============================================================================

/// Store configuration.
///
/// ## Example
/// ```rust,ignore
/// let config = StoreConfig::new("/var/lib/parky/parkypark.db")
///     .max_connections(8)
///     .time_in_offset(chrono::Duration::minutes(350));
/// ```
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Path to the SQLite database file. Created if missing.
    pub database_path: PathBuf,

    /// Name of the bucket holding tickets.
    /// Default: "Tickets"
    pub bucket: String,

    /// Maximum number of connections in the pool.
    /// Default: 5
    pub max_connections: u32,

    /// Minimum number of connections to keep alive.
    /// Default: 1
    pub min_connections: u32,

    /// Connection acquire timeout.
    /// Default: 30 seconds
    pub connect_timeout: Duration,

    /// Idle timeout before closing a connection.
    /// Default: 10 minutes
    pub idle_timeout: Duration,

    /// Whether to run migrations on open.
    /// Default: true
    pub run_migrations: bool,

    /// How far before "now" a new ticket's `time_in` is placed.
    /// Default: zero. Demo setups backdate tickets to show higher tiers.
    pub time_in_offset: TimeOffset,
}

impl StoreConfig {
    /// Creates a configuration for the given file path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        StoreConfig {
            database_path: path.into(),
            bucket: TICKETS_BUCKET.to_string(),
            max_connections: 5,
            min_connections: 1,
            connect_timeout: Duration::from_secs(30),
            idle_timeout: Duration::from_secs(600),
            run_migrations: true,
            time_in_offset: TimeOffset::zero(),
        }
    }

    /// Sets the maximum number of connections.
    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    /// Sets the minimum number of connections.
    pub fn min_connections(mut self, min: u32) -> Self {
        self.min_connections = min;
        self
    }

    /// Sets the connection timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Sets whether to run migrations on open.
    pub fn run_migrations(mut self, run: bool) -> Self {
        self.run_migrations = run;
        self
    }

    /// Sets the bucket name.
    pub fn bucket(mut self, name: impl Into<String>) -> Self {
        self.bucket = name.into();
        self
    }

    /// Sets the backdating offset applied to new tickets.
    pub fn time_in_offset(mut self, offset: TimeOffset) -> Self {
        self.time_in_offset = offset;
        self
    }

    /// Creates an in-memory configuration (for testing).
    ///
    /// Nothing survives the store being closed.
    pub fn in_memory() -> Self {
        StoreConfig {
            database_path: PathBuf::from(MEMORY_PATH),
            max_connections: 1, // In-memory requires single connection
            min_connections: 1,
            connect_timeout: Duration::from_secs(5),
            idle_timeout: Duration::from_secs(60),
            ..StoreConfig::new(MEMORY_PATH)
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig::new(DEFAULT_DATABASE_PATH)
    }
}

// =============================================================================
// Ticket Store
// =============================================================================

/// Durable, transactional ticket storage.
///
/// Cheap to clone; clones share the pool and the writer lock. Open once at
/// startup, hand clones to request handlers, close once at shutdown.
#[derive(Debug, Clone)]
pub struct TicketStore {
    pool: SqlitePool,
    bucket: Bucket,
    time_in_offset: TimeOffset,
    writer: Arc<Mutex<()>>,
}

impl TicketStore {
    /// Opens the store, creating the file, schema and bucket as needed.
    ///
    /// ## Errors
    /// Any error here means the store is unusable; the process should not
    /// start serving.
    pub async fn open(config: StoreConfig) -> DbResult<Self> {
        info!(
            path = %config.database_path.display(),
            bucket = %config.bucket,
            "Opening ticket store"
        );

        // The path is handed to SQLite as a plain filename, never parsed as a URL
        let base_options = if config.database_path.as_os_str() == MEMORY_PATH {
            SqliteConnectOptions::from_str("sqlite::memory:")
                .map_err(|e| DbError::ConnectionFailed(e.to_string()))?
        } else {
            SqliteConnectOptions::new().filename(&config.database_path)
        };

        let connect_options = base_options
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .foreign_keys(true)
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(config.connect_timeout)
            .idle_timeout(Some(config.idle_timeout))
            .connect_with(connect_options)
            .await
            .map_err(|e| DbError::ConnectionFailed(e.to_string()))?;

        info!(max_connections = config.max_connections, "Store pool created");

        if config.run_migrations {
            migrations::run_migrations(&pool).await?;
        }

        let store = TicketStore {
            pool,
            bucket: Bucket::new(config.bucket),
            time_in_offset: config.time_in_offset,
            writer: Arc::new(Mutex::new(())),
        };

        store.ensure_bucket().await?;
        Ok(store)
    }

    async fn ensure_bucket(&self) -> DbResult<()> {
        let _writer = self.writer.lock().await;
        let mut tx = self.pool.begin().await.map_err(tx_failed)?;
        self.bucket.ensure(&mut tx).await?;
        tx.commit().await.map_err(tx_failed)?;
        Ok(())
    }

    /// Issues a new ticket with the next id from the bucket sequence.
    ///
    /// `time_in` is "now" minus the configured offset.
    pub async fn create(&self) -> DbResult<Ticket> {
        let time_in = Utc::now() - self.time_in_offset;

        let _writer = self.writer.lock().await;
        let mut tx = self.pool.begin().await.map_err(tx_failed)?;

        let sequence = self.bucket.next_sequence(&mut tx).await?;
        let id = id_from_sequence(sequence)?;

        let ticket = Ticket::issue(id, time_in);
        self.put_ticket(&mut tx, &ticket).await?;

        tx.commit().await.map_err(tx_failed)?;

        debug!(id = ticket.id, time_in = %ticket.time_in, "Ticket created");
        Ok(ticket)
    }

    /// Loads a copy of the ticket stored under `id`.
    ///
    /// ## Errors
    /// `DbError::NotFound` if nothing (or an empty value) is stored for `id`.
    pub async fn find(&self, id: TicketId) -> DbResult<Ticket> {
        let mut tx = self.pool.begin().await.map_err(tx_failed)?;
        let ticket = self.load_ticket(&mut tx, id).await?;
        tx.commit().await.map_err(tx_failed)?;

        Ok(ticket)
    }

    /// Overwrites the stored record for `ticket.id`.
    ///
    /// Unconditional: the last writer wins, with no check of what was there.
    pub async fn save(&self, ticket: &Ticket) -> DbResult<()> {
        let _writer = self.writer.lock().await;
        let mut tx = self.pool.begin().await.map_err(tx_failed)?;
        self.put_ticket(&mut tx, ticket).await?;
        tx.commit().await.map_err(tx_failed)?;

        debug!(id = ticket.id, "Ticket saved");
        Ok(())
    }

    /// Settles a ticket: records the amount owed right now and the payment
    /// token, in a single write transaction.
    ///
    /// ## Errors
    /// - `DbError::NotFound` if the ticket does not exist
    /// - `DbError::AlreadyPaid` if a payment was recorded before; the stored
    ///   record is not touched
    pub async fn pay(&self, id: TicketId, card: &str) -> DbResult<Ticket> {
        let _writer = self.writer.lock().await;
        let mut tx = self.pool.begin().await.map_err(tx_failed)?;

        let mut ticket = self.load_ticket(&mut tx, id).await?;
        let owing = ticket.settle(card, Utc::now())?;
        self.put_ticket(&mut tx, &ticket).await?;

        tx.commit().await.map_err(tx_failed)?;

        info!(id, paid_cents = owing.cents(), "Ticket paid");
        Ok(ticket)
    }

    /// Highest id handed out so far (0 before the first ticket).
    pub async fn last_issued_id(&self) -> DbResult<TicketId> {
        let mut conn = self.pool.acquire().await?;
        let sequence = self.bucket.sequence(&mut conn).await?;
        id_from_sequence(sequence)
    }

    /// Checks that the store answers queries and its schema is current.
    pub async fn health_check(&self) -> bool {
        match migrations::migration_status(&self.pool).await {
            Ok((total, applied)) => applied >= total,
            Err(e) => {
                debug!(error = %e, "Health check failed");
                false
            }
        }
    }

    /// Closes the pool, waiting for checked-out connections to come back.
    ///
    /// Every operation fails after this.
    pub async fn close(&self) {
        info!("Closing ticket store");
        self.pool.close().await;
    }

    async fn load_ticket(&self, conn: &mut SqliteConnection, id: TicketId) -> DbResult<Ticket> {
        let value = self.bucket.get(conn, &key_for(id)).await?;

        match value {
            Some(bytes) if !bytes.is_empty() => Ok(serde_json::from_slice(&bytes)?),
            _ => {
                debug!(id, "Ticket not found");
                Err(DbError::not_found(id))
            }
        }
    }

    async fn put_ticket(&self, conn: &mut SqliteConnection, ticket: &Ticket) -> DbResult<()> {
        let value = serde_json::to_vec(ticket)?;
        self.bucket.put(conn, &key_for(ticket.id), &value).await
    }
}

fn id_from_sequence(sequence: u64) -> DbResult<TicketId> {
    TicketId::try_from(sequence)
        .map_err(|_| DbError::Internal(format!("sequence {sequence} exceeds ticket id range")))
}

fn tx_failed(err: sqlx::Error) -> DbError {
    match err {
        sqlx::Error::PoolTimedOut => DbError::PoolExhausted,
        sqlx::Error::PoolClosed => DbError::ConnectionFailed("Pool is closed".to_string()),
        other => DbError::TransactionFailed(other.to_string()),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
