//! In-process cache store

use crate::cache::{CacheResult, ContentCache};
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

/// Entry count at which `set_at` sweeps expired entries before inserting
const SWEEP_THRESHOLD: usize = 256;

#[derive(Debug, Clone)]
struct CacheEntry {
    value: String,
    expires_at: DateTime<Utc>,
}

/// Process-local cache with lazy expiry
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: Mutex<HashMap<String, CacheEntry>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up `key` as of `now`, evicting it if expired
    pub fn get_at(&self, key: &str, now: DateTime<Utc>) -> Option<String> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        match entries.get(key) {
            Some(entry) if entry.expires_at > now => Some(entry.value.clone()),
            Some(_) => {
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    /// Stores `value` under `key`, expiring `expire_seconds` after `now`
    pub fn set_at(&self, key: &str, value: &str, expire_seconds: u64, now: DateTime<Utc>) {
        let expires_at = now + Duration::seconds(expire_seconds.min(u32::MAX as u64) as i64);
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);

        if entries.len() >= SWEEP_THRESHOLD {
            entries.retain(|_, entry| entry.expires_at > now);
        }

        entries.insert(
            key.to_string(),
            CacheEntry {
                value: value.to_string(),
                expires_at,
            },
        );
    }

    /// Drops every entry expired as of `now`, returning how many were removed
    pub fn purge_expired_at(&self, now: DateTime<Utc>) -> usize {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        let before = entries.len();
        entries.retain(|_, entry| entry.expires_at > now);
        before - entries.len()
    }

    /// Number of stored entries, including expired ones not yet evicted
    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ContentCache for MemoryCache {
    async fn get(&self, key: &str) -> CacheResult<Option<String>> {
        Ok(self.get_at(key, Utc::now()))
    }

    async fn set(&self, key: &str, value: &str, expire_seconds: u64) -> CacheResult<()> {
        self.set_at(key, value, expire_seconds, Utc::now());
        Ok(())
    }

    fn purge_expired(&self) -> CacheResult<usize> {
        Ok(self.purge_expired_at(Utc::now()))
    }
}
