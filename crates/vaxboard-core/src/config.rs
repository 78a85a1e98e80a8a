//! Dashboard configuration.

use std::path::PathBuf;
use std::time::Duration;

use crate::error::Error;

/// Default database file.
pub const DEFAULT_DATABASE_PATH: &str = "./vaccination.db";

/// Default result time-to-live in seconds (5 minutes).
pub const DEFAULT_CACHE_TTL_SECS: u64 = 300;

/// Default maximum number of cached results.
pub const DEFAULT_CACHE_MAX_ENTRIES: usize = 256;

/// Default length of top-N rankings.
pub const DEFAULT_TOP_N: usize = 10;

/// Dashboard configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardConfig {
    /// Path to the SQLite database holding the dataset.
    pub database_path: PathBuf,

    /// How long a fetched result may be served from cache.
    pub cache_ttl: Duration,

    /// Maximum number of cached results.
    pub cache_max_entries: usize,

    /// Number of entries in rankings when the caller does not say.
    pub default_top_n: usize,
}

impl DashboardConfig {
    /// Create a configuration for the given database with default settings.
    pub fn new(database_path: impl Into<PathBuf>) -> Self {
        Self {
            database_path: database_path.into(),
            cache_ttl: Duration::from_secs(DEFAULT_CACHE_TTL_SECS),
            cache_max_entries: DEFAULT_CACHE_MAX_ENTRIES,
            default_top_n: DEFAULT_TOP_N,
        }
    }

    /// Set the cache time-to-live.
    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    /// Set the maximum number of cached results.
    pub fn with_cache_max_entries(mut self, max_entries: usize) -> Self {
        self.cache_max_entries = max_entries;
        self
    }

    /// Set the default ranking length.
    pub fn with_default_top_n(mut self, n: usize) -> Self {
        self.default_top_n = n;
        self
    }

    /// Check the configuration for values the loader cannot work with.
    pub fn validate(&self) -> Result<(), Error> {
        if self.cache_ttl.is_zero() {
            return Err(Error::Config("cache TTL must be greater than zero".into()));
        }
        if self.cache_max_entries == 0 {
            return Err(Error::Config("cache must hold at least one entry".into()));
        }
        if self.default_top_n == 0 {
            return Err(Error::Config("top-N length must be at least 1".into()));
        }
        Ok(())
    }
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self::new(DEFAULT_DATABASE_PATH)
    }
}
