//! Statement composition and result caching.
//!
//! Statements are composed from a fixed base plus optional `IN` predicates,
//! and their results are memoized per (statement, parameters) for a bounded
//! time.

mod cache;
mod compose;
pub mod sql;

pub use cache::{CacheKey, CacheStats, ResultCache};
pub use compose::{compose, count_placeholders, ComposedQuery, InPredicate, PLACEHOLDER};
