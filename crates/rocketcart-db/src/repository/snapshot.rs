//! # Snapshot Repository
//!
//! Raw access to the `cart_snapshots` table. Payloads are opaque JSON text
//! here; decoding into a `Cart` happens in [`crate::store`].

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;

/// A stored snapshot row.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct SnapshotRecord {
    /// Namespace key, e.g. `@RocketShoes:cart`.
    pub key: String,

    /// Serialized cart (JSON array of line items).
    pub payload: String,

    /// When this key was last written.
    pub updated_at: DateTime<Utc>,
}

/// Repository for cart snapshot rows.
#[derive(Debug, Clone)]
pub struct SnapshotRepository {
    pool: SqlitePool,
}

impl SnapshotRepository {
    /// Creates a new SnapshotRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SnapshotRepository { pool }
    }

    /// Gets the snapshot stored under `key`.
    ///
    /// ## Returns
    /// * `Ok(Some(record))` - A snapshot exists
    /// * `Ok(None)` - Nothing was ever saved under this key
    pub async fn get(&self, key: &str) -> DbResult<Option<SnapshotRecord>> {
        let record = sqlx::query_as::<_, SnapshotRecord>(
            r#"
            SELECT key, payload, updated_at
            FROM cart_snapshots
            WHERE key = ?1
            "#,
        )
        .bind(key)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    /// Writes the snapshot for `key`, replacing any previous one.
    ///
    /// A single upsert statement, so a reader sees either the old or the new
    /// payload, never a partial one.
    pub async fn put(&self, key: &str, payload: &str) -> DbResult<SnapshotRecord> {
        let now = Utc::now();

        debug!(key = %key, bytes = payload.len(), "Writing cart snapshot");

        sqlx::query(
            r#"
            INSERT INTO cart_snapshots (key, payload, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(key) DO UPDATE SET
                payload = excluded.payload,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(key)
        .bind(payload)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(SnapshotRecord {
            key: key.to_string(),
            payload: payload.to_string(),
            updated_at: now,
        })
    }

    /// Deletes the snapshot for `key`.
    ///
    /// ## Returns
    /// `true` if a row was deleted.
    pub async fn delete(&self, key: &str) -> DbResult<bool> {
        let result = sqlx::query("DELETE FROM cart_snapshots WHERE key = ?1")
            .bind(key)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Counts stored snapshots.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM cart_snapshots")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
