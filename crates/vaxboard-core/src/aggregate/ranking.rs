//! Count-by-category rankings.

use std::collections::HashMap;

use crate::record::ApplicationRecord;
use crate::value::{AggregateTable, Value};

use super::dimension::Dimension;

/// Name of the count column in rankings.
pub const COUNT_COLUMN: &str = "count";

/// Sort `(label, count)` pairs by count descending, then label ascending
/// (byte order), and keep at most `limit` of them.
pub fn rank<I>(counts: I, limit: Option<usize>) -> Vec<(String, u64)>
where
    I: IntoIterator<Item = (String, u64)>,
{
    let mut ranked: Vec<(String, u64)> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    if let Some(limit) = limit {
        ranked.truncate(limit);
    }
    ranked
}

/// Count records per value of `dimension`. Records missing the value are skipped.
fn count_by(records: &[ApplicationRecord], dimension: Dimension) -> HashMap<String, u64> {
    let mut counts: HashMap<String, u64> = HashMap::new();
    for value in records.iter().filter_map(|r| dimension.value(r)) {
        match counts.get_mut(value.as_ref()) {
            Some(count) => *count += 1,
            None => {
                counts.insert(value.into_owned(), 1);
            }
        }
    }
    counts
}

fn to_table(name: String, dimension: Dimension, ranked: Vec<(String, u64)>) -> AggregateTable {
    let mut table = AggregateTable::new(name, [dimension.name(), COUNT_COLUMN]);
    for (label, count) in ranked {
        table.table.push_row(vec![Value::Text(label), Value::from(count)]);
    }
    table
}

/// The `n` most frequent values of `dimension`.
///
/// Fewer than `n` distinct values yields all of them, never padding.
pub fn top_n(records: &[ApplicationRecord], dimension: Dimension, n: usize) -> AggregateTable {
    let ranked = rank(count_by(records, dimension), Some(n));
    to_table(format!("top_{}", dimension.name()), dimension, ranked)
}

/// Every value of `dimension` with its count, most frequent first.
pub fn category_counts(records: &[ApplicationRecord], dimension: Dimension) -> AggregateTable {
    let ranked = rank(count_by(records, dimension), None);
    to_table(format!("{}_counts", dimension.name()), dimension, ranked)
}
