//! Categorical dimensions of an application record.

use std::borrow::Cow;

use crate::record::{columns, ApplicationRecord};

use super::bucket::AgeBucket;

/// A categorical attribute records can be grouped by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dimension {
    Dose,
    VaccineName,
    Sex,
    RaceColor,
    Strategy,
    Route,
    Site,
    EstablishmentName,
    EstablishmentType,
    EstablishmentMunicipality,
    PatientMunicipality,
    PatientState,
    /// Patient age, bucketed with [`AgeBucket`].
    AgeBucket,
}

impl Dimension {
    /// Output column name for this dimension.
    pub fn name(&self) -> &'static str {
        match self {
            Dimension::Dose => columns::DOSE,
            Dimension::VaccineName => columns::VACCINE_NAME,
            Dimension::Sex => columns::SEX,
            Dimension::RaceColor => columns::RACE_COLOR,
            Dimension::Strategy => columns::STRATEGY,
            Dimension::Route => columns::ROUTE,
            Dimension::Site => columns::SITE,
            Dimension::EstablishmentName => columns::ESTABLISHMENT_NAME,
            Dimension::EstablishmentType => columns::ESTABLISHMENT_TYPE,
            Dimension::EstablishmentMunicipality => columns::ESTABLISHMENT_MUNICIPALITY,
            Dimension::PatientMunicipality => columns::PATIENT_MUNICIPALITY,
            Dimension::PatientState => columns::PATIENT_STATE,
            Dimension::AgeBucket => "age_bucket",
        }
    }

    /// The record's value for this dimension, or `None` when missing.
    pub fn value<'a>(&self, record: &'a ApplicationRecord) -> Option<Cow<'a, str>> {
        let field = match self {
            Dimension::Dose => &record.dose,
            Dimension::VaccineName => &record.vaccine_name,
            Dimension::Sex => &record.sex,
            Dimension::RaceColor => &record.race_color,
            Dimension::Strategy => &record.strategy,
            Dimension::Route => &record.route,
            Dimension::Site => &record.site,
            Dimension::EstablishmentName => &record.establishment_name,
            Dimension::EstablishmentType => &record.establishment_type,
            Dimension::EstablishmentMunicipality => &record.establishment_municipality,
            Dimension::PatientMunicipality => &record.patient_municipality,
            Dimension::PatientState => &record.patient_state,
            Dimension::AgeBucket => {
                return record
                    .age
                    .and_then(AgeBucket::of)
                    .map(|b| Cow::Borrowed(b.label()));
            }
        };
        field.as_deref().map(Cow::Borrowed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_reads_field() {
        let mut record = ApplicationRecord::new("1");
        record.vaccine_name = Some("BCG".into());

        assert_eq!(Dimension::VaccineName.value(&record).as_deref(), Some("BCG"));
        assert_eq!(Dimension::Sex.value(&record), None);
    }

    #[test]
    fn test_age_bucket_dimension() {
        let mut record = ApplicationRecord::new("1");
        assert_eq!(Dimension::AgeBucket.value(&record), None);

        record.age = Some(42);
        assert_eq!(Dimension::AgeBucket.value(&record).as_deref(), Some("[40,50)"));
        assert_eq!(Dimension::AgeBucket.name(), "age_bucket");
    }
}
