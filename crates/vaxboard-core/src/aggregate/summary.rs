//! Multi-measure summaries over loaded records.

use std::collections::{HashMap, HashSet};

use serde::Serialize;

use crate::record::{columns, ApplicationRecord};
use crate::value::{AggregateTable, Value};

use super::dimension::Dimension;

/// Column holding distinct patients per group.
pub const PATIENTS_COLUMN: &str = "patients";

/// Column holding applied doses per group.
pub const DOSES_COLUMN: &str = "doses";

/// Dose labels containing this marker count as boosters.
pub const BOOSTER_MARKER: &str = "Reforço";

#[derive(Default)]
struct GroupMeasures<'a> {
    patients: HashSet<&'a str>,
    doses: u64,
}

/// Group by `dimension` and compute distinct patients and total doses per
/// group in one pass.
///
/// Records missing the grouping value are dropped. Rows are sorted by doses
/// descending, then label ascending.
pub fn group_summary(records: &[ApplicationRecord], dimension: Dimension) -> AggregateTable {
    let mut groups: HashMap<String, GroupMeasures<'_>> = HashMap::new();

    for record in records {
        let Some(label) = dimension.value(record) else {
            continue;
        };
        let group = groups.entry(label.into_owned()).or_default();
        group.doses += 1;
        if let Some(patient) = record.patient_id.as_deref() {
            group.patients.insert(patient);
        }
    }

    let mut rows: Vec<(String, u64, u64)> = groups
        .into_iter()
        .map(|(label, m)| (label, m.patients.len() as u64, m.doses))
        .collect();
    rows.sort_by(|a, b| b.2.cmp(&a.2).then_with(|| a.0.cmp(&b.0)));

    let mut table = AggregateTable::new(
        format!("{}_summary", dimension.name()),
        [dimension.name(), PATIENTS_COLUMN, DOSES_COLUMN],
    );
    for (label, patients, doses) in rows {
        table
            .table
            .push_row(vec![Value::Text(label), Value::from(patients), Value::from(doses)]);
    }
    table
}

/// Headline indicators for a set of loaded records.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Kpis {
    /// Number of records.
    pub total_doses: u64,
    /// Distinct patient ids.
    pub unique_patients: u64,
    /// Mean patient age; `None` when no record carries an age.
    pub average_age: Option<f64>,
    /// Records whose dose label marks a booster.
    pub booster_doses: u64,
}

/// Compute [`Kpis`] over `records`.
pub fn kpis(records: &[ApplicationRecord]) -> Kpis {
    let mut patients = HashSet::new();
    let mut age_sum = 0i64;
    let mut age_count = 0u64;
    let mut booster_doses = 0u64;

    for record in records {
        if let Some(patient) = record.patient_id.as_deref() {
            patients.insert(patient);
        }
        if let Some(age) = record.age {
            age_sum += age;
            age_count += 1;
        }
        if record
            .dose
            .as_deref()
            .is_some_and(|d| d.contains(BOOSTER_MARKER))
        {
            booster_doses += 1;
        }
    }

    Kpis {
        total_doses: records.len() as u64,
        unique_patients: patients.len() as u64,
        average_age: (age_count > 0).then(|| age_sum as f64 / age_count as f64),
        booster_doses,
    }
}

const LATEST_COLUMNS: [&str; 7] = [
    columns::APPLIED_ON,
    columns::VACCINE_NAME,
    columns::DOSE,
    columns::AGE,
    columns::SEX,
    columns::PATIENT_MUNICIPALITY,
    columns::ESTABLISHMENT_NAME,
];

/// The `n` most recent applications, newest first.
///
/// Undated records sort after every dated one; records with equal dates keep
/// their input order.
pub fn latest_applications(records: &[ApplicationRecord], n: usize) -> AggregateTable {
    let mut ordered: Vec<&ApplicationRecord> = records.iter().collect();
    ordered.sort_by(|a, b| match (a.applied_on, b.applied_on) {
        (Some(x), Some(y)) => y.cmp(&x),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => std::cmp::Ordering::Equal,
    });

    let mut table = AggregateTable::new("latest_applications", LATEST_COLUMNS);
    for record in ordered.into_iter().take(n) {
        table.table.push_row(vec![
            Value::from(record.applied_on),
            Value::from(record.vaccine_name.clone()),
            Value::from(record.dose.clone()),
            Value::from(record.age),
            Value::from(record.sex.clone()),
            Value::from(record.patient_municipality.clone()),
            Value::from(record.establishment_name.clone()),
        ]);
    }
    table
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn dose(id: usize, patient: &str, vaccine: &str, label: &str) -> ApplicationRecord {
        let mut r = ApplicationRecord::new(id.to_string());
        r.patient_id = Some(patient.into());
        r.vaccine_name = Some(vaccine.into());
        r.dose = Some(label.into());
        r
    }

    #[test]
    fn test_group_summary_measures() {
        let records = vec![
            dose(1, "p1", "BCG", "Dose"),
            dose(2, "p1", "Penta", "1ª Dose"),
            dose(3, "p1", "Penta", "2ª Dose"),
            dose(4, "p2", "Penta", "1ª Dose"),
            dose(5, "p3", "BCG", "Dose"),
        ];

        let summary = group_summary(&records, Dimension::VaccineName);
        assert_eq!(summary.columns(), ["vaccine_name", "patients", "doses"]);
        assert_eq!(
            summary.rows(),
            &[
                vec![Value::Text("Penta".into()), Value::Int64(2), Value::Int64(3)],
                vec![Value::Text("BCG".into()), Value::Int64(2), Value::Int64(2)],
            ]
        );
    }

    #[test]
    fn test_group_summary_tie_and_empty() {
        let records = vec![dose(1, "p1", "B", "Dose"), dose(2, "p2", "A", "Dose")];
        let summary = group_summary(&records, Dimension::VaccineName);
        assert_eq!(summary.rows()[0][0], Value::Text("A".into()));

        assert!(group_summary(&[], Dimension::Dose).is_empty());
    }

    #[test]
    fn test_kpis() {
        let mut records = vec![
            dose(1, "p1", "Covid", "1ª Dose"),
            dose(2, "p1", "Covid", "Reforço"),
            dose(3, "p2", "Covid", "2º Reforço"),
        ];
        records[0].age = Some(30);
        records[2].age = Some(60);

        let k = kpis(&records);
        assert_eq!(k.total_doses, 3);
        assert_eq!(k.unique_patients, 2);
        assert_eq!(k.booster_doses, 2);
        assert_eq!(k.average_age, Some(45.0));
    }

    #[test]
    fn test_kpis_empty() {
        assert_eq!(kpis(&[]), Kpis::default());
    }

    #[test]
    fn test_latest_applications_order() {
        let day = |d| NaiveDate::from_ymd_opt(2024, 3, d);
        let mut records = vec![
            dose(1, "p1", "A", "Dose"),
            dose(2, "p2", "B", "Dose"),
            dose(3, "p3", "C", "Dose"),
            dose(4, "p4", "D", "Dose"),
        ];
        records[0].applied_on = day(1);
        records[1].applied_on = None;
        records[2].applied_on = day(5);
        records[3].applied_on = day(1);

        let latest = latest_applications(&records, 10);
        let vaccines: Vec<_> = latest.rows().iter().map(|r| r[1].to_string()).collect();
        assert_eq!(vaccines, vec!["C", "A", "D", "B"]);
        assert_eq!(latest.rows()[3][0], Value::Null);

        assert_eq!(latest_applications(&records, 2).len(), 2);
        assert!(latest_applications(&[], 5).is_empty());
    }
}
