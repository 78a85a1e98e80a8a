//! Vaxboard Core - Query composition, result caching and aggregation.
//!
//! This crate provides the data layer of the vaccination dashboard: filter
//! sets are composed into parameterized statements, results are memoized per
//! statement for a bounded time, rows are decoded into application records,
//! and records are reshaped into named summary tables.

pub mod aggregate;
pub mod config;
pub mod error;
pub mod executor;
pub mod filter;
pub mod loader;
pub mod query;
pub mod record;
pub mod value;

pub use aggregate::{AgeBucket, Dimension, Kpis};
pub use config::DashboardConfig;
pub use error::{Error, ErrorKind};
pub use executor::QueryExecutor;
pub use filter::FilterSet;
pub use loader::{DataLoader, LoadOutcome, Overview};
pub use query::{CacheKey, CacheStats, ComposedQuery, InPredicate, ResultCache};
pub use record::ApplicationRecord;
pub use value::{AggregateTable, Table, Value};

#[cfg(feature = "sqlite")]
pub use executor::SqliteExecutor;
