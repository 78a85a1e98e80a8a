//! Time-bounded result cache.
//!
//! This module memoizes fetched tables keyed by statement text and bound
//! parameters, so repeated interactions with the same filters do not go back
//! to the database until the entry's time-to-live has elapsed.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;

use crate::error::Error;
use crate::value::Table;

/// Cache key: the full statement text plus every bound parameter, in order.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct CacheKey {
    sql: String,
    params: Vec<String>,
}

impl CacheKey {
    /// Create a key from a statement and its parameters.
    pub fn new(sql: &str, params: &[String]) -> Self {
        Self {
            sql: sql.to_string(),
            params: params.to_vec(),
        }
    }

    /// Short stable hash of the key, for log correlation.
    pub fn fingerprint(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.hash(&mut hasher);
        hasher.finish()
    }

    /// Statement text.
    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// Bound parameters.
    pub fn params(&self) -> &[String] {
        &self.params
    }
}

/// Cached table with metadata.
#[derive(Debug)]
struct CachedResult {
    table: Arc<Table>,
    created_at: Instant,
    ttl: Duration,
    hit_count: AtomicU64,
}

impl CachedResult {
    fn new(table: Arc<Table>, created_at: Instant, ttl: Duration) -> Self {
        Self {
            table,
            created_at,
            ttl,
            hit_count: AtomicU64::new(0),
        }
    }

    /// An entry is valid iff `now - created_at < ttl`.
    fn is_fresh(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.created_at) < self.ttl
    }

    fn record_hit(&self) -> u64 {
        self.hit_count.fetch_add(1, AtomicOrdering::Relaxed) + 1
    }
}

/// Cache statistics.
#[derive(Debug, Default)]
pub struct CacheStats {
    hits: AtomicU64,
    misses: AtomicU64,
    expirations: AtomicU64,
    evictions: AtomicU64,
    fetch_failures: AtomicU64,
}

impl CacheStats {
    /// Get hit count.
    pub fn hits(&self) -> u64 {
        self.hits.load(AtomicOrdering::Relaxed)
    }

    /// Get miss count (including misses caused by expiry).
    pub fn misses(&self) -> u64 {
        self.misses.load(AtomicOrdering::Relaxed)
    }

    /// Get the number of entries dropped because their TTL elapsed.
    pub fn expirations(&self) -> u64 {
        self.expirations.load(AtomicOrdering::Relaxed)
    }

    /// Get eviction count.
    pub fn evictions(&self) -> u64 {
        self.evictions.load(AtomicOrdering::Relaxed)
    }

    /// Get the number of fetches that failed (and were not cached).
    pub fn fetch_failures(&self) -> u64 {
        self.fetch_failures.load(AtomicOrdering::Relaxed)
    }

    /// Calculate hit rate (0.0 to 1.0).
    pub fn hit_rate(&self) -> f64 {
        let hits = self.hits() as f64;
        let total = hits + self.misses() as f64;
        if total > 0.0 {
            hits / total
        } else {
            0.0
        }
    }
}

/// Process-wide result cache with per-entry time-to-live.
///
/// Entries live in a sharded map, so populating one key never blocks readers
/// of another. The fetch runs without any lock held: two callers missing on
/// the same key at once may both fetch, and the later insert wins. That is
/// harmless for read-only statements.
pub struct ResultCache {
    entries: DashMap<CacheKey, CachedResult>,
    max_entries: usize,
    stats: CacheStats,
}

impl ResultCache {
    /// Create a new cache holding at most `max_entries` results.
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: DashMap::new(),
            max_entries: max_entries.max(1),
            stats: CacheStats::default(),
        }
    }

    /// Return the cached table for `key`, or run `fetch` and cache its result.
    ///
    /// A failed fetch is never cached; the error goes straight back to the
    /// caller and the next call for the same key fetches again.
    pub fn get_or_fetch<F>(&self, key: &CacheKey, ttl: Duration, fetch: F) -> Result<Arc<Table>, Error>
    where
        F: FnOnce() -> Result<Table, Error>,
    {
        self.get_or_fetch_at(key, ttl, Instant::now(), fetch)
    }

    fn get_or_fetch_at<F>(
        &self,
        key: &CacheKey,
        ttl: Duration,
        now: Instant,
        fetch: F,
    ) -> Result<Arc<Table>, Error>
    where
        F: FnOnce() -> Result<Table, Error>,
    {
        if let Some(table) = self.lookup(key, now) {
            return Ok(table);
        }

        let table = match fetch() {
            Ok(table) => Arc::new(table),
            Err(e) => {
                self.stats.fetch_failures.fetch_add(1, AtomicOrdering::Relaxed);
                return Err(e);
            }
        };

        self.store(key.clone(), Arc::clone(&table), ttl, now);
        Ok(table)
    }

    /// Look up a fresh entry. Expired entries are removed and count as misses.
    fn lookup(&self, key: &CacheKey, now: Instant) -> Option<Arc<Table>> {
        let expired = match self.entries.get(key) {
            Some(entry) if entry.is_fresh(now) => {
                let hits = entry.record_hit();
                self.stats.hits.fetch_add(1, AtomicOrdering::Relaxed);
                tracing::debug!(key = key.fingerprint(), hits, "result cache hit");
                return Some(Arc::clone(&entry.table));
            }
            Some(_) => true,
            None => false,
        };

        if expired {
            // Only drop it if nobody replaced it with a fresh one meanwhile
            if self.entries.remove_if(key, |_, e| !e.is_fresh(now)).is_some() {
                self.stats.expirations.fetch_add(1, AtomicOrdering::Relaxed);
                tracing::debug!(key = key.fingerprint(), "result cache entry expired");
            }
        }

        self.stats.misses.fetch_add(1, AtomicOrdering::Relaxed);
        tracing::debug!(key = key.fingerprint(), "result cache miss");
        None
    }

    fn store(&self, key: CacheKey, table: Arc<Table>, ttl: Duration, now: Instant) {
        if self.entries.len() >= self.max_entries && !self.entries.contains_key(&key) {
            self.make_room(now);
        }
        self.entries.insert(key, CachedResult::new(table, now, ttl));
    }

    /// Drop expired entries, then the oldest entry if the cache is still full.
    fn make_room(&self, now: Instant) {
        let before = self.entries.len();
        self.entries.retain(|_, e| e.is_fresh(now));
        let purged = before.saturating_sub(self.entries.len()) as u64;
        self.stats.expirations.fetch_add(purged, AtomicOrdering::Relaxed);

        if self.entries.len() < self.max_entries {
            return;
        }

        let oldest = self
            .entries
            .iter()
            .min_by_key(|e| e.value().created_at)
            .map(|e| e.key().clone());

        if let Some(key) = oldest {
            self.entries.remove(&key);
            self.stats.evictions.fetch_add(1, AtomicOrdering::Relaxed);
            tracing::warn!(key = key.fingerprint(), "result cache full, evicted oldest entry");
        }
    }

    /// Drop one entry.
    pub fn invalidate(&self, key: &CacheKey) -> bool {
        self.entries.remove(key).is_some()
    }

    /// Get cache statistics.
    pub fn stats(&self) -> &CacheStats {
        &self.stats
    }

    /// Get the current number of cached entries, fresh or not.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Clear all cached entries.
    pub fn clear(&self) {
        self.entries.clear();
    }
}

impl Default for ResultCache {
    fn default() -> Self {
        Self::new(256)
    }
}
