//! Fixed-width age buckets.

use std::fmt;

/// Width of each bucket in years.
pub const AGE_BUCKET_WIDTH: i64 = 10;

const LABELS: [&str; 9] = [
    "[0,10)", "[10,20)", "[20,30)", "[30,40)", "[40,50)", "[50,60)", "[60,70)", "[70,80)",
    "[80,∞)",
];

/// Half-open age interval: `[0,10)`, `[10,20)`, ..., `[70,80)`, `[80,∞)`.
///
/// Ordering follows the lower bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AgeBucket(u8);

impl AgeBucket {
    /// Number of buckets.
    pub const COUNT: usize = LABELS.len();

    /// Bucket containing `age`. Negative ages have no bucket.
    pub fn of(age: i64) -> Option<Self> {
        if age < 0 {
            return None;
        }
        let index = (age / AGE_BUCKET_WIDTH).min(Self::COUNT as i64 - 1);
        Some(Self(index as u8))
    }

    /// Every bucket, youngest first.
    pub fn all() -> impl Iterator<Item = AgeBucket> {
        (0..Self::COUNT as u8).map(AgeBucket)
    }

    /// Display label, e.g. `[10,20)`.
    pub fn label(&self) -> &'static str {
        LABELS[self.0 as usize]
    }

    /// Inclusive lower bound.
    pub fn lower(&self) -> i64 {
        self.0 as i64 * AGE_BUCKET_WIDTH
    }

    /// Exclusive upper bound; `None` for the open-ended last bucket.
    pub fn upper(&self) -> Option<i64> {
        if (self.0 as usize) + 1 < Self::COUNT {
            Some(self.lower() + AGE_BUCKET_WIDTH)
        } else {
            None
        }
    }
}

impl fmt::Display for AgeBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
