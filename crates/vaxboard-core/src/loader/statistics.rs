//! Dataset-wide statistics computed by the database.
//!
//! These statements ignore the filter set. Rankings are ordered and truncated
//! here rather than in SQL so the limit is never part of the statement text.

use serde::Serialize;

use crate::aggregate::rank;
use crate::error::Error;
use crate::query::{sql, ComposedQuery};
use crate::value::{AggregateTable, Table, Value};

use super::{DataLoader, LoadOutcome};

/// Patients strictly older than this count as elderly.
pub const ELDERLY_MIN_AGE: i64 = 60;

/// Placeholder vaccine name left out of elderly rankings.
pub const UNKNOWN_VACCINE: &str = "SEM INFORMAÇÃO";

const APPLICATIONS_COLUMN: &str = "applications";

/// Headline totals over the whole dataset.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Overview {
    /// Every application in the dataset.
    pub total_doses: u64,
    /// Distinct patients with at least one application.
    pub unique_patients: u64,
    /// `None` when no patient has an age.
    pub average_age: Option<f64>,
}

impl Overview {
    /// Decode the single totals row. Missing columns or a missing row mean
    /// the result does not match the statement.
    fn from_table(table: &Table, query: &ComposedQuery) -> Result<Self, Error> {
        let mismatch = |what: String| Error::query(what, &query.sql, &query.params);
        let row = table
            .row(0)
            .ok_or_else(|| mismatch("overview returned no rows".to_string()))?;
        let column = |name: &str| {
            row.get(name)
                .ok_or_else(|| mismatch(format!("result is missing column `{}`", name)))
        };
        let count = |name: &str| -> Result<u64, Error> {
            Ok(column(name)?
                .as_i64()
                .and_then(|n| u64::try_from(n).ok())
                .unwrap_or(0))
        };

        Ok(Self {
            total_doses: count("total_doses")?,
            unique_patients: count("unique_patients")?,
            average_age: column("average_age")?.as_f64(),
        })
    }
}

impl DataLoader {
    /// Total doses, vaccinated patients and mean patient age.
    pub fn overview(&self) -> LoadOutcome<Overview> {
        let query = ComposedQuery::plain(sql::OVERVIEW);
        let result = self
            .fetch("overview", &query)
            .and_then(|table| Overview::from_table(&table, &query));
        self.outcome("overview", &query, result)
    }

    /// The `n` most applied vaccines. Vaccines never applied rank with zero.
    pub fn top_vaccines(&self, n: usize) -> LoadOutcome<AggregateTable> {
        self.ranking(
            "top_vaccines",
            ComposedQuery::plain(sql::VACCINE_APPLICATIONS),
            "vaccine_name",
            n,
        )
    }

    /// The `n` busiest establishments among those above the mean load.
    pub fn busiest_establishments(&self, n: usize) -> LoadOutcome<AggregateTable> {
        self.ranking(
            "busiest_establishments",
            ComposedQuery::plain(sql::BUSIEST_ESTABLISHMENTS),
            "establishment_name",
            n,
        )
    }

    /// Geolocated establishments with their application totals.
    pub fn establishment_locations(&self) -> LoadOutcome<AggregateTable> {
        self.named("establishment_locations", ComposedQuery::plain(sql::ESTABLISHMENT_LOCATIONS))
    }

    /// Municipalities applying the most doses to elderly patients.
    pub fn elderly_by_municipality(&self, n: usize) -> LoadOutcome<AggregateTable> {
        let query = ComposedQuery {
            sql: sql::ELDERLY_BY_MUNICIPALITY.to_string(),
            params: vec![ELDERLY_MIN_AGE.to_string()],
        };
        self.ranking("elderly_by_municipality", query, "municipality", n)
    }

    /// Vaccines most applied to elderly patients, unknown names excluded.
    pub fn elderly_top_vaccines(&self, n: usize) -> LoadOutcome<AggregateTable> {
        let query = ComposedQuery {
            sql: sql::ELDERLY_VACCINES.to_string(),
            params: vec![ELDERLY_MIN_AGE.to_string(), UNKNOWN_VACCINE.to_string()],
        };
        self.ranking("elderly_top_vaccines", query, "vaccine_name", n)
    }

    /// Every application of the oldest patient, in date order.
    pub fn oldest_patient_applications(&self) -> LoadOutcome<AggregateTable> {
        self.named(
            "oldest_patient_applications",
            ComposedQuery::plain(sql::OLDEST_PATIENT_APPLICATIONS),
        )
    }

    /// Fetch a `(label, applications)` table and keep the top `n` rows.
    fn ranking(
        &self,
        name: &'static str,
        query: ComposedQuery,
        label: &str,
        n: usize,
    ) -> LoadOutcome<AggregateTable> {
        let result = self
            .fetch(name, &query)
            .and_then(|table| ranked(name, &table, label, n, &query));
        self.outcome(name, &query, result)
    }

    fn named(&self, name: &'static str, query: ComposedQuery) -> LoadOutcome<AggregateTable> {
        let result = self.fetch(name, &query).map(|table| AggregateTable {
            name: name.to_string(),
            table: Table::clone(&table),
        });
        self.outcome(name, &query, result)
    }
}

fn ranked(
    name: &str,
    table: &Table,
    label: &str,
    n: usize,
    query: &ComposedQuery,
) -> Result<AggregateTable, Error> {
    let missing = |column: &str| {
        Error::query(
            format!("result is missing column `{}`", column),
            &query.sql,
            &query.params,
        )
    };
    let label_idx = table.column_index(label).ok_or_else(|| missing(label))?;
    let count_idx = table
        .column_index(APPLICATIONS_COLUMN)
        .ok_or_else(|| missing(APPLICATIONS_COLUMN))?;

    let counts = table.rows.iter().filter_map(|row| {
        let label = row.get(label_idx).and_then(Value::to_text)?;
        let count = row
            .get(count_idx)
            .and_then(Value::as_i64)
            .and_then(|c| u64::try_from(c).ok())
            .unwrap_or(0);
        Some((label, count))
    });

    let mut aggregate = AggregateTable::new(name, [label, APPLICATIONS_COLUMN]);
    for (label, count) in rank(counts, Some(n)) {
        aggregate.table.push_row(vec![Value::Text(label), Value::from(count)]);
    }
    Ok(aggregate)
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use super::*;
    use crate::error::ErrorKind;
    use crate::executor::QueryExecutor;
    use crate::query::ResultCache;

    /// Answers every statement with the same table, keeping the params seen.
    struct StubExecutor {
        table: Table,
        params: Mutex<Vec<Vec<String>>>,
    }

    impl QueryExecutor for StubExecutor {
        fn execute(&self, _sql: &str, params: &[String]) -> Result<Table, Error> {
            self.params.lock().unwrap().push(params.to_vec());
            Ok(self.table.clone())
        }
    }

    fn setup(table: Table) -> (Arc<StubExecutor>, DataLoader) {
        let executor = Arc::new(StubExecutor {
            table,
            params: Mutex::new(Vec::new()),
        });
        let loader = DataLoader::new(
            executor.clone(),
            Arc::new(ResultCache::new(16)),
            Duration::from_secs(300),
        );
        (executor, loader)
    }

    #[test]
    fn test_overview_decodes_totals() {
        let table = Table::new(["total_doses", "unique_patients", "average_age"]).with_row(vec![
            Value::Int64(12),
            Value::Int64(5),
            Value::Float64(41.5),
        ]);
        let (_, loader) = setup(table);
        let overview = loader.overview();
        assert!(overview.is_ok());
        assert_eq!(
            overview.value,
            Overview {
                total_doses: 12,
                unique_patients: 5,
                average_age: Some(41.5),
            }
        );
    }

    #[test]
    fn test_overview_without_ages() {
        let table = Table::new(["total_doses", "unique_patients", "average_age"]).with_row(vec![
            Value::Int64(0),
            Value::Int64(0),
            Value::Null,
        ]);
        let (_, loader) = setup(table);
        assert_eq!(loader.overview().value.average_age, None);
    }

    #[test]
    fn test_overview_wrong_shape_is_query_error() {
        let (_, loader) = setup(Table::new(["unexpected"]).with_row(vec![Value::Int64(1)]));
        let outcome = loader.overview();
        assert_eq!(outcome.value, Overview::default());
        let error = outcome.error().unwrap();
        assert_eq!(error.kind(), ErrorKind::Query);
        assert_eq!(error.query_text(), Some(sql::OVERVIEW));
    }

    #[test]
    fn test_overview_without_rows_is_query_error() {
        let (_, loader) = setup(Table::new(["total_doses", "unique_patients", "average_age"]));
        let outcome = loader.overview();
        assert_eq!(outcome.error().map(Error::kind), Some(ErrorKind::Query));
    }

    #[test]
    fn test_top_vaccines_ranked_and_truncated() {
        let table = Table::new(["vaccine_name", "applications"])
            .with_row(vec![Value::from("Penta"), Value::Int64(4)])
            .with_row(vec![Value::from("BCG"), Value::Int64(9)])
            .with_row(vec![Value::from("Hepatite B"), Value::Int64(4)])
            .with_row(vec![Value::from("Febre Amarela"), Value::Int64(0)]);
        let (_, loader) = setup(table);

        let top = loader.top_vaccines(3).value;
        assert_eq!(top.name, "top_vaccines");
        let labels: Vec<_> = top.rows().iter().map(|r| r[0].to_string()).collect();
        assert_eq!(labels, vec!["BCG", "Hepatite B", "Penta"]);
    }

    #[test]
    fn test_elderly_rankings_bind_thresholds() {
        let table = Table::new(["vaccine_name", "applications"])
            .with_row(vec![Value::from("Influenza"), Value::Int64(2)]);
        let (executor, loader) = setup(table);

        loader.elderly_top_vaccines(5);
        let params = executor.params.lock().unwrap();
        assert_eq!(params[0], vec!["60", "SEM INFORMAÇÃO"]);
    }

    #[test]
    fn test_ranking_missing_column_is_query_error() {
        let (_, loader) = setup(Table::new(["something_else"]));
        let outcome = loader.busiest_establishments(5);
        assert!(outcome.value.is_empty());
        assert_eq!(outcome.error().map(Error::kind), Some(ErrorKind::Query));
    }

    #[test]
    fn test_named_tables_pass_through() {
        let table = Table::new(["establishment_id", "latitude", "longitude", "applications"])
            .with_row(vec![
                Value::from("2345"),
                Value::Float64(-8.05),
                Value::Float64(-34.9),
                Value::Int64(3),
            ]);
        let (_, loader) = setup(table.clone());
        let locations = loader.establishment_locations().value;
        assert_eq!(locations.name, "establishment_locations");
        assert_eq!(locations.table, table);
    }
}
