//! SQLite cache store
//!
//! Values survive restarts, so a redeployed server keeps its warm cache.

use crate::cache::schema::initialize_schema;
use crate::cache::{CacheResult, ContentCache};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::{Mutex, PoisonError};

/// SQLite-backed cache store
pub struct SqliteCache {
    conn: Mutex<Connection>,
}

impl SqliteCache {
    /// Opens (or creates) the cache database at `path`
    pub fn new(path: &Path) -> CacheResult<Self> {
        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA temp_store = MEMORY;
        ",
        )?;

        initialize_schema(&conn)?;

        let cache = Self {
            conn: Mutex::new(conn),
        };

        let removed = cache.purge_expired_at(Utc::now())?;
        if removed > 0 {
            tracing::debug!("Purged {} expired cache entries from {}", removed, path.display());
        }

        Ok(cache)
    }

    /// Creates an in-memory database
    pub fn open_in_memory() -> CacheResult<Self> {
        let conn = Connection::open_in_memory()?;
        initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Looks up `key` as of `now`; expired rows read as absent
    pub fn get_at(&self, key: &str, now: DateTime<Utc>) -> CacheResult<Option<String>> {
        let conn = self.conn.lock().unwrap_or_else(PoisonError::into_inner);
        let value = conn
            .query_row(
                "SELECT value FROM cache_entries WHERE key = ?1 AND expires_at > ?2",
                params![key, now.timestamp()],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    /// Upserts `value` under `key`, expiring `expire_seconds` after `now`
    pub fn set_at(
        &self,
        key: &str,
        value: &str,
        expire_seconds: u64,
        now: DateTime<Utc>,
    ) -> CacheResult<()> {
        let expires_at = now
            .timestamp()
            .saturating_add(expire_seconds.min(i64::MAX as u64) as i64);
        let conn = self.conn.lock().unwrap_or_else(PoisonError::into_inner);
        conn.execute(
            "INSERT INTO cache_entries (key, value, expires_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, expires_at = excluded.expires_at",
            params![key, value, expires_at],
        )?;
        Ok(())
    }

    /// Deletes rows expired as of `now`, returning how many were removed
    pub fn purge_expired_at(&self, now: DateTime<Utc>) -> CacheResult<usize> {
        let conn = self.conn.lock().unwrap_or_else(PoisonError::into_inner);
        let removed = conn.execute(
            "DELETE FROM cache_entries WHERE expires_at <= ?1",
            params![now.timestamp()],
        )?;
        Ok(removed)
    }
}

impl ContentCache for SqliteCache {
    async fn get(&self, key: &str) -> CacheResult<Option<String>> {
        self.get_at(key, Utc::now())
    }

    async fn set(&self, key: &str, value: &str, expire_seconds: u64) -> CacheResult<()> {
        self.set_at(key, value, expire_seconds, Utc::now())
    }

    fn purge_expired(&self) -> CacheResult<usize> {
        self.purge_expired_at(Utc::now())
    }
}
