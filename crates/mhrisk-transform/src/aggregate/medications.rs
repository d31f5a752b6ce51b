//! Medication duration counts.

use mhrisk_model::{MedicationConfig, RawValue};

/// Count returned when the durations cell is not a list at all.
pub const NO_MEDICATION_DATA: i64 = -1;

/// Counts list entries whose duration satisfies `predicate`.
///
/// Missing, NaN and non-numeric entries never match. A cell that is not a
/// list returns [`NO_MEDICATION_DATA`], which is distinct from a list with
/// zero matches.
pub fn count_durations<F>(durations: &RawValue, predicate: F) -> i64
where
    F: Fn(f64) -> bool,
{
    let Some(items) = durations.as_list() else {
        return NO_MEDICATION_DATA;
    };
    let count = items
        .iter()
        .filter_map(RawValue::as_number)
        .filter(|days| !days.is_nan() && predicate(*days))
        .count();
    i64::try_from(count).unwrap_or(i64::MAX)
}

/// Medication duration buckets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DurationBucket {
    /// Strictly longer than the long-term threshold.
    LongTerm,
    /// At or below the short-term threshold.
    ShortTerm,
}

impl DurationBucket {
    pub fn contains(self, days: f64, config: &MedicationConfig) -> bool {
        match self {
            Self::LongTerm => days > config.long_term_min_days,
            Self::ShortTerm => days <= config.short_term_max_days,
        }
    }

    /// Counts the durations in this bucket; see [`count_durations`].
    pub fn count(self, durations: &RawValue, config: &MedicationConfig) -> i64 {
        count_durations(durations, |days| self.contains(days, config))
    }
}
