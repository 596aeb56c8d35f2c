//! In-memory TTL cache for fetched catalogs.
//!
//! Entries are keyed by (entity type, fetch parameters), see [`cache_key`].
//! Expiry is lazy: an entry older than the TTL reads as absent but is only
//! dropped when overwritten, invalidated or the whole cache is cleared.
//!
//! The cache is owned by a single resolver instance. Timestamps come from
//! `tokio::time::Instant`, which follows the paused clock in tests.

use std::collections::HashMap;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::time::Instant;
use tracing::trace;

use crate::types::Catalog;

mod key;

pub use key::cache_key;

/// Default cache TTL (5 minutes).
pub const DEFAULT_TTL_SECS: u64 = 5 * 60;

/// Cached catalog with the time it was stored.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub catalog: Catalog,
    pub stored_at: Instant,
    /// Wall-clock time of the fetch, reported as `loaded_at` on cache hits.
    pub fetched_at: DateTime<Utc>,
}

impl CacheEntry {
    fn is_fresh(&self, ttl: Duration, now: Instant) -> bool {
        now.saturating_duration_since(self.stored_at) <= ttl
    }
}

/// Time-boxed catalog cache.
#[derive(Debug, Clone)]
pub struct TtlCache {
    ttl: Duration,
    entries: HashMap<String, CacheEntry>,
}

impl TtlCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: HashMap::new(),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Get a fresh entry.
    ///
    /// Returns `None` if there is no entry or the entry is older than the TTL.
    pub fn get(&self, key: &str) -> Option<Catalog> {
        self.get_entry(key).map(|entry| entry.catalog.clone())
    }

    /// Like [`TtlCache::get`], but returns the whole entry.
    pub fn get_entry(&self, key: &str) -> Option<&CacheEntry> {
        let entry = self.entries.get(key)?;
        if entry.is_fresh(self.ttl, Instant::now()) {
            Some(entry)
        } else {
            trace!(key = %key.replace('\n', "|"), "cache entry expired");
            None
        }
    }

    /// Store a catalog, replacing any previous entry for the key.
    pub fn put(&mut self, key: impl Into<String>, catalog: Catalog) {
        self.entries.insert(
            key.into(),
            CacheEntry {
                catalog,
                stored_at: Instant::now(),
                fetched_at: Utc::now(),
            },
        );
    }

    /// Drop one entry.
    pub fn invalidate(&mut self, key: &str) -> bool {
        self.entries.remove(key).is_some()
    }

    /// Drop every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of stored entries, expired ones included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for TtlCache {
    fn default() -> Self {
        Self::new(Duration::from_secs(DEFAULT_TTL_SECS))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::EntityId;
    use crate::params::FetchParams;
    use crate::types::{EntityKind, GradeLevel};

    fn grade_levels(n: u64) -> Catalog {
        Catalog::GradeLevels(
            (1..=n)
                .map(|i| GradeLevel {
                    id: EntityId::from(i),
                    code: format!("G{}", i),
                    name: format!("Grade {}", i),
                    order: i as i32,
                    active: true,
                })
                .collect(),
        )
    }

    #[tokio::test(start_paused = true)]
    async fn test_cache_roundtrip() {
        let mut cache = TtlCache::default();
        let key = cache_key(EntityKind::GradeLevel, &FetchParams::new());

        cache.put(key.clone(), grade_levels(3));

        assert_eq!(cache.get(&key), Some(grade_levels(3)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cache_miss() {
        let cache = TtlCache::default();
        assert!(cache.get("nonexistent").is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cache_expiry_is_lazy() {
        let mut cache = TtlCache::new(Duration::from_secs(300));
        cache.put("k", grade_levels(1));

        tokio::time::advance(Duration::from_secs(300)).await;
        assert!(cache.get("k").is_some(), "entry at exactly TTL is fresh");

        tokio::time::advance(Duration::from_secs(1)).await;
        assert!(cache.get("k").is_none());
        // Still stored, only reads as absent.
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_put_refreshes_timestamp() {
        let mut cache = TtlCache::new(Duration::from_secs(10));
        cache.put("k", grade_levels(1));
        tokio::time::advance(Duration::from_secs(8)).await;
        cache.put("k", grade_levels(2));
        tokio::time::advance(Duration::from_secs(8)).await;

        assert_eq!(cache.get("k"), Some(grade_levels(2)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_entry_keeps_fetch_time() {
        let mut cache = TtlCache::default();
        cache.put("k", grade_levels(1));
        let fetched_at = cache.get_entry("k").map(|e| e.fetched_at);

        tokio::time::advance(Duration::from_secs(60)).await;
        assert_eq!(cache.get_entry("k").map(|e| e.fetched_at), fetched_at);

        tokio::time::advance(Duration::from_secs(300)).await;
        assert!(cache.get_entry("k").is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cache_invalidate_and_clear() {
        let mut cache = TtlCache::default();
        cache.put("a", grade_levels(1));
        cache.put("b", grade_levels(2));

        assert!(cache.invalidate("a"));
        assert!(!cache.invalidate("a"));
        assert!(cache.get("a").is_none());

        cache.clear();
        assert!(cache.is_empty());
        assert!(cache.get("b").is_none());
    }
}
