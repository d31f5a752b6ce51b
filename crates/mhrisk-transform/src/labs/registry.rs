//! Lab classifier registry.

use std::collections::BTreeMap;

use mhrisk_model::{LabObservation, LabOutcome, UnevaluableReason};

use super::rules::{Bound, Interval, LabRule};

/// The standard rule set, one rule per recognized test.
pub const STANDARD_RULES: [LabRule; 11] = [
    LabRule::tiered(
        "FASTING GLUCOSE",
        Interval::at_most(6.1),
        Interval::new(Bound::Exclusive(6.1), Bound::Exclusive(7.0)),
    ),
    LabRule::tiered(
        "GFR",
        Interval::at_least(90.0),
        Interval::new(Bound::Inclusive(60.0), Bound::Exclusive(90.0)),
    ),
    LabRule::tiered(
        "GLUCOSE TOLERANCE",
        Interval::below(7.8),
        Interval::new(Bound::Inclusive(7.8), Bound::Exclusive(11.1)),
    ),
    LabRule::tiered(
        "HBA1C",
        Interval::below(6.0),
        Interval::new(Bound::Inclusive(6.0), Bound::Exclusive(6.5)),
    ),
    LabRule::sex_specific_floor("HDL", 1.0, 1.3),
    LabRule::tiered(
        "INR",
        Interval::at_most(1.1),
        Interval::new(Bound::Inclusive(2.0), Bound::Inclusive(3.0)),
    ),
    LabRule::tiered(
        "LDL",
        Interval::below(2.0),
        Interval::new(Bound::Inclusive(2.0), Bound::Exclusive(3.5)),
    ),
    LabRule::tiered(
        "MICROALBUMIN",
        Interval::below(30.0),
        Interval::new(Bound::Inclusive(30.0), Bound::Inclusive(300.0)),
    ),
    LabRule::tiered(
        "TOTAL CHOLESTEROL",
        Interval::below(5.2),
        Interval::new(Bound::Inclusive(5.2), Bound::Exclusive(6.2)),
    ),
    LabRule::tiered(
        "TRIGLYCERIDES",
        Interval::below(1.7),
        Interval::new(Bound::Inclusive(1.7), Bound::Exclusive(2.3)),
    ),
    LabRule::tiered(
        "URINE ALBUMIN CREATININE RATIO",
        Interval::below(3.0),
        Interval::new(Bound::Inclusive(3.0), Bound::Inclusive(30.0)),
    ),
];

/// Maps canonical test names to classification rules.
///
/// Lookups trim the name and compare upper-case, so `" hba1c"` finds the
/// `HBA1C` rule. The registry is read-only once built and can be shared
/// across threads.
#[derive(Debug, Clone)]
pub struct LabRegistry {
    rules: BTreeMap<&'static str, LabRule>,
}

impl Default for LabRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

impl LabRegistry {
    /// Registry with the eleven standard rules.
    pub fn standard() -> Self {
        STANDARD_RULES.into_iter().collect()
    }

    pub fn empty() -> Self {
        Self {
            rules: BTreeMap::new(),
        }
    }

    /// Adds or replaces a rule.
    pub fn with_rule(mut self, rule: LabRule) -> Self {
        self.rules.insert(rule.name(), rule);
        self
    }

    pub fn get(&self, test_name: &str) -> Option<&LabRule> {
        let key = test_name.trim().to_uppercase();
        self.rules.get(key.as_str())
    }

    pub fn contains(&self, test_name: &str) -> bool {
        self.get(test_name).is_some()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Rules in test-name order.
    pub fn rules(&self) -> impl Iterator<Item = &LabRule> {
        self.rules.values()
    }

    /// Classifies one observation for a patient of the given sex.
    pub fn classify(&self, observation: &LabObservation, sex: Option<&str>) -> LabOutcome {
        let outcome = match observation.test.as_deref() {
            None => Err(UnevaluableReason::MissingTest),
            Some(name) => match self.get(name) {
                None => Err(UnevaluableReason::UnknownTest),
                Some(rule) => rule.classify(observation.result, sex),
            },
        };
        outcome.into()
    }
}

impl FromIterator<LabRule> for LabRegistry {
    fn from_iter<I: IntoIterator<Item = LabRule>>(iter: I) -> Self {
        Self {
            rules: iter.into_iter().map(|rule| (rule.name(), rule)).collect(),
        }
    }
}
