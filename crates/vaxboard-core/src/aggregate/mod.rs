//! Aggregation over loaded application records.
//!
//! Every function here is a pure function of its input slice. Empty input
//! yields an empty table, missing values are skipped per dimension, and
//! output order is fully determined by the input and the documented
//! tie-breaks, so aggregating the same records twice gives identical tables.

mod bucket;
mod crosstab;
mod dimension;
mod ranking;
mod series;
mod summary;

pub use bucket::{AgeBucket, AGE_BUCKET_WIDTH};
pub use crosstab::{age_pyramid, cross_tab};
pub use dimension::Dimension;
pub use ranking::{category_counts, rank, top_n, COUNT_COLUMN};
pub use series::time_series;
pub use summary::{
    group_summary, kpis, latest_applications, Kpis, BOOSTER_MARKER, DOSES_COLUMN, PATIENTS_COLUMN,
};
