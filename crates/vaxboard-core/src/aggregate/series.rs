//! Daily counts split by a category.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::record::{columns, ApplicationRecord};
use crate::value::{AggregateTable, Value};

use super::dimension::Dimension;
use super::ranking::COUNT_COLUMN;

/// Count records per (day, `category`).
///
/// Records without a date are dropped. Records missing the category are kept
/// and counted under a null category, which sorts before any label on the
/// same day. Rows are ordered by day, then category.
pub fn time_series(records: &[ApplicationRecord], category: Dimension) -> AggregateTable {
    let mut counts: BTreeMap<(NaiveDate, Option<String>), u64> = BTreeMap::new();

    for record in records {
        let Some(day) = record.applied_on else {
            continue;
        };
        let label = category.value(record).map(|v| v.into_owned());
        *counts.entry((day, label)).or_insert(0) += 1;
    }

    let mut table = AggregateTable::new(
        format!("{}_by_day", category.name()),
        [columns::APPLIED_ON, category.name(), COUNT_COLUMN],
    );
    for ((day, label), count) in counts {
        table
            .table
            .push_row(vec![Value::Date(day), Value::from(label), Value::from(count)]);
    }
    table
}
