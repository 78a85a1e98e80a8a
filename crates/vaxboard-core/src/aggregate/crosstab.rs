//! Two-dimensional count matrices.

use std::collections::{BTreeMap, BTreeSet};

use crate::record::ApplicationRecord;
use crate::value::{AggregateTable, Value};

use super::dimension::Dimension;

/// Count records by (`rows`, `columns`) and lay the counts out as a matrix.
///
/// The output has one row per distinct `rows` value and one column per
/// distinct `columns` value, both in ascending label order, with zeros where
/// a combination never occurs. Records missing either value are left out.
pub fn cross_tab(records: &[ApplicationRecord], rows: Dimension, columns: Dimension) -> AggregateTable {
    let mut cells: BTreeMap<(String, String), u64> = BTreeMap::new();
    let mut column_labels: BTreeSet<String> = BTreeSet::new();

    for record in records {
        let (Some(r), Some(c)) = (rows.value(record), columns.value(record)) else {
            continue;
        };
        column_labels.insert(c.to_string());
        *cells.entry((r.into_owned(), c.into_owned())).or_insert(0) += 1;
    }

    let header = std::iter::once(rows.name().to_string()).chain(column_labels.iter().cloned());
    let mut table = AggregateTable::new(format!("{}_by_{}", rows.name(), columns.name()), header);

    let mut current: Option<(String, Vec<Value>)> = None;
    for ((r, c), count) in cells {
        if current.as_ref().map_or(true, |(label, _)| *label != r) {
            if let Some((label, counts)) = current.take() {
                table.table.push_row(matrix_row(label, counts));
            }
            current = Some((r, vec![Value::Int64(0); column_labels.len()]));
        }
        if let (Some((_, counts)), Some(idx)) =
            (current.as_mut(), column_labels.iter().position(|l| *l == c))
        {
            counts[idx] = Value::from(count);
        }
    }
    if let Some((label, counts)) = current {
        table.table.push_row(matrix_row(label, counts));
    }

    table
}

fn matrix_row(label: String, counts: Vec<Value>) -> Vec<Value> {
    std::iter::once(Value::Text(label)).chain(counts).collect()
}

/// Age bucket by sex: the population pyramid.
pub fn age_pyramid(records: &[ApplicationRecord]) -> AggregateTable {
    cross_tab(records, Dimension::AgeBucket, Dimension::Sex)
}
