//! Choice lists for the filter controls.

use std::collections::BTreeSet;

use crate::query::{compose, sql, ComposedQuery, InPredicate};

use super::{DataLoader, LoadOutcome};

/// Column every catalog statement projects.
const VALUE_COLUMN: &str = "value";

impl DataLoader {
    /// Every establishment municipality, ascending.
    pub fn municipalities(&self) -> LoadOutcome<Vec<String>> {
        self.catalog("municipalities", &ComposedQuery::plain(sql::MUNICIPALITIES))
    }

    /// Every vaccine name, ascending.
    pub fn vaccine_names(&self) -> LoadOutcome<Vec<String>> {
        self.catalog("vaccine_names", &ComposedQuery::plain(sql::VACCINE_NAMES))
    }

    /// Every dose label, ascending.
    pub fn dose_types(&self) -> LoadOutcome<Vec<String>> {
        self.catalog("dose_types", &ComposedQuery::plain(sql::DOSE_TYPES))
    }

    /// Every vaccination strategy, ascending.
    pub fn strategies(&self) -> LoadOutcome<Vec<String>> {
        self.catalog("strategies", &ComposedQuery::plain(sql::STRATEGIES))
    }

    /// Municipalities in the given state codes, ascending.
    ///
    /// No codes means no municipalities; the database is not queried.
    pub fn municipalities_for_region(&self, region_codes: &BTreeSet<String>) -> LoadOutcome<Vec<String>> {
        if region_codes.is_empty() {
            return LoadOutcome::ok(Vec::new());
        }
        let query = compose(
            sql::MUNICIPALITIES,
            &[],
            &[InPredicate::new(sql::REGION_COLUMN, region_codes)],
        );
        self.catalog("region_municipalities", &query)
    }

    /// Distinct values of a catalog statement, sorted in byte order.
    fn catalog(&self, what: &'static str, query: &ComposedQuery) -> LoadOutcome<Vec<String>> {
        let result = self.fetch(what, query).map(|table| {
            let mut values = table.text_column(VALUE_COLUMN);
            values.sort();
            values.dedup();
            values
        });
        self.outcome(what, query, result)
    }
}
