//! Statement execution capability.
//!
//! The loader never owns a connection; it is handed something that can run a
//! statement with bound parameters and return a table.

#[cfg(feature = "sqlite")]
mod sqlite;

#[cfg(feature = "sqlite")]
pub use sqlite::{SqliteExecutor, SCHEMA};

use std::sync::Arc;

use crate::error::Error;
use crate::value::Table;

/// Runs a statement with positional parameters.
///
/// Implementations report unreachable databases as [`Error::Connection`] and
/// rejected statements as [`Error::Query`], both carrying the statement text
/// and parameters.
pub trait QueryExecutor: Send + Sync {
    /// Execute `sql`, binding `params` to its `?` placeholders in order.
    fn execute(&self, sql: &str, params: &[String]) -> Result<Table, Error>;
}

impl<T: QueryExecutor + ?Sized> QueryExecutor for Arc<T> {
    fn execute(&self, sql: &str, params: &[String]) -> Result<Table, Error> {
        (**self).execute(sql, params)
    }
}

impl<T: QueryExecutor + ?Sized> QueryExecutor for &T {
    fn execute(&self, sql: &str, params: &[String]) -> Result<Table, Error> {
        (**self).execute(sql, params)
    }
}
