//! Threshold rules for lab results.
//!
//! Most tests use a tiered rule: a result inside the normal interval is
//! `Normal`, inside the borderline interval `Borderline`, and anything
//! else `Abnormal`. Intervals are checked in that order. HDL has no
//! borderline tier and a sex-specific floor instead.

use std::fmt;

use mhrisk_model::{Severity, UnevaluableReason};

/// One end of an interval.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Bound {
    Unbounded,
    Inclusive(f64),
    Exclusive(f64),
}

/// A possibly half-open interval over the reals.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    pub lower: Bound,
    pub upper: Bound,
}

impl Interval {
    pub const fn new(lower: Bound, upper: Bound) -> Self {
        Self { lower, upper }
    }

    /// `v < max`
    pub const fn below(max: f64) -> Self {
        Self::new(Bound::Unbounded, Bound::Exclusive(max))
    }

    /// `v <= max`
    pub const fn at_most(max: f64) -> Self {
        Self::new(Bound::Unbounded, Bound::Inclusive(max))
    }

    /// `v >= min`
    pub const fn at_least(min: f64) -> Self {
        Self::new(Bound::Inclusive(min), Bound::Unbounded)
    }

    pub fn contains(&self, value: f64) -> bool {
        let above_lower = match self.lower {
            Bound::Unbounded => true,
            Bound::Inclusive(min) => value >= min,
            Bound::Exclusive(min) => value > min,
        };
        let below_upper = match self.upper {
            Bound::Unbounded => true,
            Bound::Inclusive(max) => value <= max,
            Bound::Exclusive(max) => value < max,
        };
        above_lower && below_upper
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.lower, self.upper) {
            (Bound::Unbounded, Bound::Unbounded) => f.write_str("any"),
            (Bound::Unbounded, Bound::Inclusive(max)) => write!(f, "<= {max}"),
            (Bound::Unbounded, Bound::Exclusive(max)) => write!(f, "< {max}"),
            (Bound::Inclusive(min), Bound::Unbounded) => write!(f, ">= {min}"),
            (Bound::Exclusive(min), Bound::Unbounded) => write!(f, "> {min}"),
            (lower, upper) => {
                let (open, min) = match lower {
                    Bound::Inclusive(min) => ('[', min),
                    Bound::Exclusive(min) => ('(', min),
                    Bound::Unbounded => ('(', f64::NEG_INFINITY),
                };
                let (close, max) = match upper {
                    Bound::Inclusive(max) => (']', max),
                    Bound::Exclusive(max) => (')', max),
                    Bound::Unbounded => (')', f64::INFINITY),
                };
                write!(f, "{open}{min}, {max}{close}")
            }
        }
    }
}

/// How a rule turns a result into a severity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RuleKind {
    /// Normal, then borderline, otherwise abnormal.
    Tiered { normal: Interval, borderline: Interval },
    /// Normal at or above a sex-specific floor, otherwise abnormal.
    SexSpecificFloor { male: f64, female: f64 },
}

/// Classification rule for one lab test.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabRule {
    name: &'static str,
    kind: RuleKind,
}

impl LabRule {
    pub const fn tiered(name: &'static str, normal: Interval, borderline: Interval) -> Self {
        Self {
            name,
            kind: RuleKind::Tiered { normal, borderline },
        }
    }

    pub const fn sex_specific_floor(name: &'static str, male: f64, female: f64) -> Self {
        Self {
            name,
            kind: RuleKind::SexSpecificFloor { male, female },
        }
    }

    /// Canonical upper-case test name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn kind(&self) -> RuleKind {
        self.kind
    }

    pub fn requires_sex(&self) -> bool {
        matches!(self.kind, RuleKind::SexSpecificFloor { .. })
    }

    /// Classifies a normalized result.
    ///
    /// A missing result is unevaluable. For sex-specific rules, `sex` must
    /// be `male` or `female` ignoring case; surrounding whitespace is not
    /// trimmed.
    pub fn classify(
        &self,
        result: Option<f64>,
        sex: Option<&str>,
    ) -> Result<Severity, UnevaluableReason> {
        let value = result
            .filter(|v| !v.is_nan())
            .ok_or(UnevaluableReason::UnparseableResult)?;
        match self.kind {
            RuleKind::Tiered { normal, borderline } => {
                if normal.contains(value) {
                    Ok(Severity::Normal)
                } else if borderline.contains(value) {
                    Ok(Severity::Borderline)
                } else {
                    Ok(Severity::Abnormal)
                }
            }
            RuleKind::SexSpecificFloor { male, female } => {
                let floor = match sex.map(str::to_lowercase).as_deref() {
                    Some("male") => male,
                    Some("female") => female,
                    _ => return Err(UnevaluableReason::UnknownSex),
                };
                if value >= floor {
                    Ok(Severity::Normal)
                } else {
                    Ok(Severity::Abnormal)
                }
            }
        }
    }

    /// One-line description of the thresholds, for listings.
    pub fn describe(&self) -> String {
        match self.kind {
            RuleKind::Tiered { normal, borderline } => {
                format!("normal {normal}; borderline {borderline}; otherwise abnormal")
            }
            RuleKind::SexSpecificFloor { male, female } => {
                format!("normal >= {male} (male) / >= {female} (female); otherwise abnormal")
            }
        }
    }
}
