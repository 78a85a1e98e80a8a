//! Core error types.

use thiserror::Error;

/// Broad classification of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The execution capability could not be reached.
    Connection,
    /// The statement was rejected or its result could not be decoded.
    Query,
    /// A filter set violated its invariants.
    InvalidFilter,
    /// A configuration value was rejected.
    Config,
}

/// Dashboard core errors.
#[derive(Debug, Clone, Error)]
pub enum Error {
    /// The database could not be reached or opened.
    #[error("connection error: {message}")]
    Connection {
        message: String,
        query: String,
        params: Vec<String>,
    },

    /// The database rejected the statement, or returned rows of the wrong shape.
    #[error("query error: {message} (query: {query})")]
    Query {
        message: String,
        query: String,
        params: Vec<String>,
    },

    /// Invalid filter set.
    #[error("invalid filter: {0}")]
    InvalidFilter(String),

    /// Invalid configuration.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl Error {
    /// Create a connection error for the given statement.
    pub fn connection(message: impl Into<String>, query: &str, params: &[String]) -> Self {
        Error::Connection {
            message: message.into(),
            query: query.to_string(),
            params: params.to_vec(),
        }
    }

    /// Create a query error for the given statement.
    pub fn query(message: impl Into<String>, query: &str, params: &[String]) -> Self {
        Error::Query {
            message: message.into(),
            query: query.to_string(),
            params: params.to_vec(),
        }
    }

    /// Get the kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Connection { .. } => ErrorKind::Connection,
            Error::Query { .. } => ErrorKind::Query,
            Error::InvalidFilter(_) => ErrorKind::InvalidFilter,
            Error::Config(_) => ErrorKind::Config,
        }
    }

    /// The statement that failed, if this error came from the database.
    pub fn query_text(&self) -> Option<&str> {
        match self {
            Error::Connection { query, .. } | Error::Query { query, .. } => Some(query),
            _ => None,
        }
    }

    /// The bound parameters of the statement that failed.
    pub fn params(&self) -> &[String] {
        match self {
            Error::Connection { params, .. } | Error::Query { params, .. } => params,
            _ => &[],
        }
    }
}
