//! User-selected constraints on the application records to load.

use std::collections::BTreeSet;

use chrono::NaiveDate;

use crate::error::Error;

/// Date format used when binding dates as statement parameters.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Constraints narrowing which application records are loaded.
///
/// The date range is inclusive on both ends and always applies. Each value set
/// is optional: an empty set places no restriction on that dimension, while a
/// non-empty set matches records whose value equals any member.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FilterSet {
    date_start: NaiveDate,
    date_end: NaiveDate,
    /// Establishment municipalities.
    pub municipalities: BTreeSet<String>,
    /// Dose labels (e.g. "1ª Dose", "Reforço").
    pub dose_types: BTreeSet<String>,
    /// Vaccine names.
    pub vaccine_names: BTreeSet<String>,
}

impl FilterSet {
    /// Create a filter set covering `date_start..=date_end` with no other restriction.
    pub fn new(date_start: NaiveDate, date_end: NaiveDate) -> Result<Self, Error> {
        if date_start > date_end {
            return Err(Error::InvalidFilter(format!(
                "date range starts after it ends ({} > {})",
                date_start, date_end
            )));
        }

        Ok(Self {
            date_start,
            date_end,
            municipalities: BTreeSet::new(),
            dose_types: BTreeSet::new(),
            vaccine_names: BTreeSet::new(),
        })
    }

    /// Restrict to the given municipalities.
    pub fn with_municipalities<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.municipalities.extend(values.into_iter().map(Into::into));
        self
    }

    /// Restrict to the given dose labels.
    pub fn with_dose_types<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dose_types.extend(values.into_iter().map(Into::into));
        self
    }

    /// Restrict to the given vaccine names.
    pub fn with_vaccine_names<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.vaccine_names.extend(values.into_iter().map(Into::into));
        self
    }

    /// First day of the range (inclusive).
    pub fn date_start(&self) -> NaiveDate {
        self.date_start
    }

    /// Last day of the range (inclusive).
    pub fn date_end(&self) -> NaiveDate {
        self.date_end
    }

    /// The date bounds formatted for parameter binding, start first.
    pub fn date_params(&self) -> [String; 2] {
        [
            self.date_start.format(DATE_FORMAT).to_string(),
            self.date_end.format(DATE_FORMAT).to_string(),
        ]
    }

    /// Check whether any optional dimension is restricted.
    pub fn is_restricted(&self) -> bool {
        !(self.municipalities.is_empty()
            && self.dose_types.is_empty()
            && self.vaccine_names.is_empty())
    }
}
