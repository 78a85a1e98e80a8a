//! Data loading through the result cache.
//!
//! The loader composes statements, serves them through the shared
//! [`ResultCache`], and decodes the rows. Failures never escape as a panic or
//! a bare `Err`: every public load returns a [`LoadOutcome`] holding an empty
//! value plus the error, so callers can render what they have and report the
//! rest.

mod catalog;
mod statistics;

pub use statistics::{Overview, ELDERLY_MIN_AGE, UNKNOWN_VACCINE};

use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::config::DashboardConfig;
use crate::error::Error;
use crate::executor::QueryExecutor;
use crate::filter::FilterSet;
use crate::query::{compose, sql, ComposedQuery, InPredicate, ResultCache};
use crate::record::ApplicationRecord;
use crate::value::Table;

/// Result of a load: the value, or an empty value paired with the error.
#[derive(Debug, Clone)]
pub struct LoadOutcome<T> {
    /// Loaded value; `T::default()` when `error` is set.
    pub value: T,
    /// Why the load failed, if it did.
    pub error: Option<Error>,
}

impl<T> LoadOutcome<T> {
    /// A successful load.
    pub fn ok(value: T) -> Self {
        Self { value, error: None }
    }

    /// A failed load carrying an empty value.
    pub fn failed(error: Error) -> Self
    where
        T: Default,
    {
        Self {
            value: T::default(),
            error: Some(error),
        }
    }

    /// Check if the load succeeded. An empty value with no error is a success.
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    /// Get the error, if any.
    pub fn error(&self) -> Option<&Error> {
        self.error.as_ref()
    }

    /// Convert into a `Result`, dropping the empty value on failure.
    pub fn into_result(self) -> Result<T, Error> {
        match self.error {
            None => Ok(self.value),
            Some(e) => Err(e),
        }
    }

    /// Transform the value, keeping the error.
    pub fn map<U, F>(self, f: F) -> LoadOutcome<U>
    where
        F: FnOnce(T) -> U,
    {
        LoadOutcome {
            value: f(self.value),
            error: self.error,
        }
    }
}

/// Loads application records and catalog data.
///
/// Cloning is cheap; clones share the executor and the cache.
#[derive(Clone)]
pub struct DataLoader {
    executor: Arc<dyn QueryExecutor>,
    cache: Arc<ResultCache>,
    ttl: Duration,
}

impl DataLoader {
    /// Create a loader over `executor`, caching results in `cache` for `ttl`.
    pub fn new(executor: Arc<dyn QueryExecutor>, cache: Arc<ResultCache>, ttl: Duration) -> Self {
        Self { executor, cache, ttl }
    }

    /// Create a loader with a fresh cache sized and timed by `config`.
    pub fn from_config(executor: Arc<dyn QueryExecutor>, config: &DashboardConfig) -> Result<Self, Error> {
        config.validate()?;
        let cache = Arc::new(ResultCache::new(config.cache_max_entries));
        Ok(Self::new(executor, cache, config.cache_ttl))
    }

    /// The shared result cache.
    pub fn cache(&self) -> &Arc<ResultCache> {
        &self.cache
    }

    /// Time-to-live applied to fetched results.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// The application statement for `filters`.
    ///
    /// Date bounds bind first, then municipalities, dose labels and vaccine
    /// names, each only when selected.
    pub fn applications_query(filters: &FilterSet) -> ComposedQuery {
        let predicates = [
            InPredicate::new(sql::MUNICIPALITY_COLUMN, &filters.municipalities),
            InPredicate::new(sql::DOSE_COLUMN, &filters.dose_types),
            InPredicate::new(sql::VACCINE_COLUMN, &filters.vaccine_names),
        ];
        compose(sql::APPLICATIONS, &filters.date_params(), &predicates)
    }

    /// Load the raw application table for `filters`.
    pub fn load_table(&self, filters: &FilterSet) -> LoadOutcome<Arc<Table>> {
        let query = Self::applications_query(filters);
        self.outcome("applications", &query, self.fetch("applications", &query))
    }

    /// Load application records matching `filters`.
    ///
    /// No matching rows is a success with an empty list.
    pub fn load(&self, filters: &FilterSet) -> LoadOutcome<Vec<ApplicationRecord>> {
        let query = Self::applications_query(filters);
        let result = self.fetch("applications", &query).and_then(|table| {
            ApplicationRecord::from_table(&table).map_err(|e| {
                // The rows will not decode next time either; force a refetch.
                self.cache.invalidate(&query.cache_key());
                restate(e, &query)
            })
        });
        self.outcome("applications", &query, result)
    }

    /// Run `query` through the cache.
    fn fetch(&self, what: &'static str, query: &ComposedQuery) -> Result<Arc<Table>, Error> {
        let started = Instant::now();
        let table = self.cache.get_or_fetch(&query.cache_key(), self.ttl, || {
            self.executor.execute(&query.sql, &query.params)
        })?;

        tracing::info!(
            what,
            rows = table.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "loaded"
        );
        Ok(table)
    }

    /// Report a failed load and fold the result into a [`LoadOutcome`].
    fn outcome<T: Default>(
        &self,
        what: &'static str,
        query: &ComposedQuery,
        result: Result<T, Error>,
    ) -> LoadOutcome<T> {
        match result {
            Ok(value) => LoadOutcome::ok(value),
            Err(e) => {
                tracing::error!(
                    what,
                    error = %e,
                    query = %query.sql,
                    params = ?query.params,
                    "load failed"
                );
                LoadOutcome::failed(e)
            }
        }
    }
}

/// Attach the statement to an error raised while reading its rows.
fn restate(error: Error, query: &ComposedQuery) -> Error {
    match error {
        Error::Query { message, .. } => Error::query(message, &query.sql, &query.params),
        Error::Connection { message, .. } => Error::connection(message, &query.sql, &query.params),
        other => other,
    }
}
