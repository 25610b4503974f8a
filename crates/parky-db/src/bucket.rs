//! # Buckets
//!
//! A small key-value layer on top of SQLite: named buckets of byte keys and
//! values, each bucket with its own persistent sequence.
//!
//! ## Layout
//! ```text
//! buckets                          entries
//! ┌──────────┬──────────┐          ┌──────────┬──────────────────┬─────────┐
//! │ name     │ sequence │          │ bucket   │ key (8 bytes BE) │ value   │
//! ├──────────┼──────────┤          ├──────────┼──────────────────┼─────────┤
//! │ Tickets  │ 3        │ ◄─────── │ Tickets  │ 00..01           │ {json}  │
//! └──────────┴──────────┘          │ Tickets  │ 00..02           │ {json}  │
//!                                  │ Tickets  │ 00..03           │ {json}  │
//!                                  └──────────┴──────────────────┴─────────┘
//! ```
//!
//! Every function takes a `&mut SqliteConnection` so callers can run several
//! of them inside one transaction.

use parky_core::TicketId;
use sqlx::SqliteConnection;
use tracing::debug;

use crate::error::{DbError, DbResult};

/// Encodes a ticket id as its 8-byte big-endian key.
///
/// Big-endian keeps byte order equal to numeric order for positive ids.
#[inline]
pub fn key_for(id: TicketId) -> [u8; 8] {
    id.to_be_bytes()
}

/// Handle on one named bucket.
#[derive(Debug, Clone)]
pub struct Bucket {
    name: String,
}

impl Bucket {
    pub fn new(name: impl Into<String>) -> Self {
        Bucket { name: name.into() }
    }

    /// Creates the bucket if it does not exist yet. An existing bucket keeps
    /// its sequence.
    pub async fn ensure(&self, conn: &mut SqliteConnection) -> DbResult<()> {
        sqlx::query("INSERT OR IGNORE INTO buckets (name, sequence) VALUES (?1, 0)")
            .bind(&self.name)
            .execute(conn)
            .await?;

        debug!(bucket = %self.name, "Bucket ensured");
        Ok(())
    }

    /// Advances and returns the bucket sequence. The first call yields 1.
    ///
    /// Only persists if the surrounding transaction commits; a rolled back
    /// value may be handed out again, a committed one never is.
    pub async fn next_sequence(&self, conn: &mut SqliteConnection) -> DbResult<u64> {
        let sequence: Option<i64> = sqlx::query_scalar(
            "UPDATE buckets SET sequence = sequence + 1 WHERE name = ?1 RETURNING sequence",
        )
        .bind(&self.name)
        .fetch_optional(conn)
        .await?;

        let sequence =
            sequence.ok_or_else(|| DbError::Internal(format!("bucket {} missing", self.name)))?;

        u64::try_from(sequence)
            .map_err(|_| DbError::Internal(format!("bucket {} sequence corrupt", self.name)))
    }

    /// Current sequence value without advancing it.
    pub async fn sequence(&self, conn: &mut SqliteConnection) -> DbResult<u64> {
        let sequence: Option<i64> =
            sqlx::query_scalar("SELECT sequence FROM buckets WHERE name = ?1")
                .bind(&self.name)
                .fetch_optional(conn)
                .await?;

        sequence
            .and_then(|s| u64::try_from(s).ok())
            .ok_or_else(|| DbError::Internal(format!("bucket {} missing", self.name)))
    }

    /// Reads the value stored under `key`.
    pub async fn get(&self, conn: &mut SqliteConnection, key: &[u8]) -> DbResult<Option<Vec<u8>>> {
        let value: Option<Vec<u8>> =
            sqlx::query_scalar("SELECT value FROM entries WHERE bucket = ?1 AND key = ?2")
                .bind(&self.name)
                .bind(key)
                .fetch_optional(conn)
                .await?;

        Ok(value)
    }

    /// Writes `value` under `key`, replacing whatever was there.
    pub async fn put(&self, conn: &mut SqliteConnection, key: &[u8], value: &[u8]) -> DbResult<()> {
        sqlx::query(
            r#"
            INSERT INTO entries (bucket, key, value) VALUES (?1, ?2, ?3)
            ON CONFLICT (bucket, key) DO UPDATE SET value = excluded.value
            "#,
        )
        .bind(&self.name)
        .bind(key)
        .bind(value)
        .execute(conn)
        .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_is_big_endian() {
        assert_eq!(key_for(1), [0, 0, 0, 0, 0, 0, 0, 1]);
        assert_eq!(key_for(258), [0, 0, 0, 0, 0, 0, 1, 2]);
    }

    #[test]
    fn test_key_order_matches_id_order() {
        assert!(key_for(255) < key_for(256));
        assert!(key_for(9) < key_for(1_000_000));
    }
}
