//! Typed view of one vaccine dose application row.

use chrono::NaiveDate;
use serde::Serialize;

use crate::error::Error;
use crate::value::{Table, Value};

/// Column aliases produced by the application query, in select order.
pub mod columns {
    pub const APPLICATION_ID: &str = "application_id";
    pub const APPLIED_ON: &str = "applied_on";
    pub const DOSE: &str = "dose";
    pub const SITE: &str = "site";
    pub const ROUTE: &str = "route";
    pub const BATCH: &str = "batch";
    pub const ESTABLISHMENT_ID: &str = "establishment_id";
    pub const VACCINE_ID: &str = "vaccine_id";
    pub const PATIENT_ID: &str = "patient_id";
    pub const STRATEGY_ID: &str = "strategy_id";
    pub const SEX: &str = "sex";
    pub const PATIENT_MUNICIPALITY: &str = "patient_municipality";
    pub const PATIENT_STATE: &str = "patient_state";
    pub const AGE: &str = "age";
    pub const RACE_COLOR: &str = "race_color";
    pub const VACCINE_NAME: &str = "vaccine_name";
    pub const ESTABLISHMENT_NAME: &str = "establishment_name";
    pub const ESTABLISHMENT_MUNICIPALITY: &str = "establishment_municipality";
    pub const ESTABLISHMENT_TYPE: &str = "establishment_type";
    pub const LATITUDE: &str = "latitude";
    pub const LONGITUDE: &str = "longitude";
    pub const STRATEGY: &str = "strategy";

    /// Every column the application query selects.
    pub const ALL: [&str; 22] = [
        APPLICATION_ID,
        APPLIED_ON,
        DOSE,
        SITE,
        ROUTE,
        BATCH,
        ESTABLISHMENT_ID,
        VACCINE_ID,
        PATIENT_ID,
        STRATEGY_ID,
        SEX,
        PATIENT_MUNICIPALITY,
        PATIENT_STATE,
        AGE,
        RACE_COLOR,
        VACCINE_NAME,
        ESTABLISHMENT_NAME,
        ESTABLISHMENT_MUNICIPALITY,
        ESTABLISHMENT_TYPE,
        LATITUDE,
        LONGITUDE,
        STRATEGY,
    ];
}

/// One vaccine dose event with its joined patient, vaccine, establishment
/// and strategy attributes. Every joined attribute may be missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ApplicationRecord {
    /// Application identifier.
    pub application_id: String,
    /// Day the dose was applied.
    pub applied_on: Option<NaiveDate>,
    /// Dose label, e.g. "1ª Dose" or "Reforço".
    pub dose: Option<String>,
    /// Body site of the application.
    pub site: Option<String>,
    /// Administration route.
    pub route: Option<String>,
    /// Vaccine batch.
    pub batch: Option<String>,
    /// Establishment (CNES) identifier.
    pub establishment_id: Option<String>,
    /// Vaccine identifier.
    pub vaccine_id: Option<String>,
    /// Patient identifier.
    pub patient_id: Option<String>,
    /// Vaccination strategy identifier.
    pub strategy_id: Option<String>,
    /// Patient sex.
    pub sex: Option<String>,
    /// Municipality the patient lives in.
    pub patient_municipality: Option<String>,
    /// State code the patient lives in.
    pub patient_state: Option<String>,
    /// Patient age in years.
    pub age: Option<i64>,
    /// Patient race/colour.
    pub race_color: Option<String>,
    /// Vaccine name.
    pub vaccine_name: Option<String>,
    /// Establishment trade name.
    pub establishment_name: Option<String>,
    /// Municipality where the dose was applied.
    pub establishment_municipality: Option<String>,
    /// Establishment type.
    pub establishment_type: Option<String>,
    /// Establishment latitude.
    pub latitude: Option<f64>,
    /// Establishment longitude.
    pub longitude: Option<f64>,
    /// Vaccination strategy description.
    pub strategy: Option<String>,
}

impl ApplicationRecord {
    /// Create a record with only its identifier set.
    pub fn new(application_id: impl Into<String>) -> Self {
        Self {
            application_id: application_id.into(),
            ..Default::default()
        }
    }

    /// Decode every row of an application result table.
    ///
    /// All columns in [`columns::ALL`] must be present; a missing column or a
    /// null application id means the result does not match the schema.
    pub fn from_table(table: &Table) -> Result<Vec<Self>, Error> {
        let index = ColumnIndex::resolve(table)?;
        table
            .rows
            .iter()
            .enumerate()
            .map(|(n, row)| index.decode(n, row))
            .collect()
    }
}

static NULL: Value = Value::Null;

/// Column positions resolved once per table.
struct ColumnIndex {
    positions: [usize; 22],
}

impl ColumnIndex {
    fn resolve(table: &Table) -> Result<Self, Error> {
        let mut positions = [0usize; 22];
        for (slot, name) in positions.iter_mut().zip(columns::ALL) {
            *slot = table.column_index(name).ok_or_else(|| {
                Error::query(format!("result is missing column `{}`", name), "", &[])
            })?;
        }
        Ok(Self { positions })
    }

    fn decode(&self, n: usize, row: &[Value]) -> Result<ApplicationRecord, Error> {
        let at = |i: usize| row.get(self.positions[i]).unwrap_or(&NULL);
        let text = |i: usize| at(i).to_text();

        let application_id = text(0).ok_or_else(|| {
            Error::query(format!("row {} has a null application id", n), "", &[])
        })?;

        Ok(ApplicationRecord {
            application_id,
            applied_on: at(1).as_date(),
            dose: text(2),
            site: text(3),
            route: text(4),
            batch: text(5),
            establishment_id: text(6),
            vaccine_id: text(7),
            patient_id: text(8),
            strategy_id: text(9),
            sex: text(10),
            patient_municipality: text(11),
            patient_state: text(12),
            age: at(13).as_i64(),
            race_color: text(14),
            vaccine_name: text(15),
            establishment_name: text(16),
            establishment_municipality: text(17),
            establishment_type: text(18),
            latitude: at(19).as_f64(),
            longitude: at(20).as_f64(),
            strategy: text(21),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_row(id: Value) -> Vec<Value> {
        let mut row = vec![Value::Null; columns::ALL.len()];
        row[0] = id;
        row[1] = "2024-01-05".into();
        row[2] = "1ª Dose".into();
        row[8] = Value::Int64(77);
        row[13] = Value::Int64(34);
        row[15] = "BCG".into();
        row[19] = Value::Float64(-22.9);
        row
    }

    #[test]
    fn test_from_table_decodes_rows() {
        let table = Table::new(columns::ALL).with_row(full_row(Value::Int64(1)));
        let records = ApplicationRecord::from_table(&table).unwrap();

        assert_eq!(records.len(), 1);
        let r = &records[0];
        assert_eq!(r.application_id, "1");
        assert_eq!(r.applied_on, NaiveDate::from_ymd_opt(2024, 1, 5));
        assert_eq!(r.dose.as_deref(), Some("1ª Dose"));
        assert_eq!(r.patient_id.as_deref(), Some("77"));
        assert_eq!(r.age, Some(34));
        assert_eq!(r.vaccine_name.as_deref(), Some("BCG"));
        assert_eq!(r.latitude, Some(-22.9));
        assert!(r.sex.is_none());
    }

    #[test]
    fn test_from_table_accepts_any_column_order() {
        let mut cols: Vec<&str> = columns::ALL.to_vec();
        cols.reverse();
        let mut row = full_row("abc".into());
        row.reverse();

        let table = Table::new(cols).with_row(row);
        let records = ApplicationRecord::from_table(&table).unwrap();
        assert_eq!(records[0].application_id, "abc");
        assert_eq!(records[0].age, Some(34));
    }

    #[test]
    fn test_from_table_missing_column() {
        let table = Table::new(["application_id"]);
        let err = ApplicationRecord::from_table(&table).unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::Query);
    }

    #[test]
    fn test_from_table_null_id() {
        let table = Table::new(columns::ALL).with_row(full_row(Value::Null));
        assert!(ApplicationRecord::from_table(&table).is_err());
    }

    #[test]
    fn test_from_empty_table() {
        let table = Table::new(columns::ALL);
        assert!(ApplicationRecord::from_table(&table).unwrap().is_empty());
    }
}
