//! Lab observation types and classification outcomes.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::value::RawValue;

/// Three-level lab severity code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Severity {
    Normal = 0,
    Borderline = 1,
    Abnormal = 2,
}

impl Severity {
    /// Numeric code used in the feature table (0, 1 or 2).
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Borderline or worse.
    pub fn is_flagged(self) -> bool {
        self >= Self::Borderline
    }

    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::Normal),
            1 => Some(Self::Borderline),
            2 => Some(Self::Abnormal),
            _ => None,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Normal => "normal",
            Self::Borderline => "borderline",
            Self::Abnormal => "abnormal",
        };
        f.write_str(label)
    }
}

/// Why a lab observation could not be given a severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum UnevaluableReason {
    /// The observation has no test name.
    MissingTest,
    /// The test name is not in the classifier registry.
    UnknownTest,
    /// The result is missing or does not parse as a number.
    UnparseableResult,
    /// The rule depends on sex and the patient's sex is not recognized.
    UnknownSex,
}

impl UnevaluableReason {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::MissingTest => "missing_test",
            Self::UnknownTest => "unknown_test",
            Self::UnparseableResult => "unparseable_result",
            Self::UnknownSex => "unknown_sex",
        }
    }
}

impl fmt::Display for UnevaluableReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-observation classification result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LabOutcome {
    Evaluated(Severity),
    Unevaluable(UnevaluableReason),
}

impl LabOutcome {
    pub fn severity(self) -> Option<Severity> {
        match self {
            Self::Evaluated(severity) => Some(severity),
            Self::Unevaluable(_) => None,
        }
    }

    /// Severity code, or `None` when unevaluable.
    pub fn code(self) -> Option<u8> {
        self.severity().map(Severity::code)
    }

    pub fn is_evaluable(self) -> bool {
        matches!(self, Self::Evaluated(_))
    }
}

impl From<Result<Severity, UnevaluableReason>> for LabOutcome {
    fn from(result: Result<Severity, UnevaluableReason>) -> Self {
        match result {
            Ok(severity) => Self::Evaluated(severity),
            Err(reason) => Self::Unevaluable(reason),
        }
    }
}

/// One lab test performed on a patient.
///
/// `raw_result` is kept as recorded; `result` is its normalized numeric
/// form. `status` stays `None` until the observation has been classified.
#[derive(Debug, Clone, PartialEq)]
pub struct LabObservation {
    pub test: Option<String>,
    pub date: Option<NaiveDate>,
    pub raw_result: RawValue,
    pub result: Option<f64>,
    pub units: Option<String>,
    pub status: Option<LabOutcome>,
}

impl LabObservation {
    /// Classification outcome, treating unclassified observations as
    /// unevaluable with an unparseable result.
    pub fn outcome(&self) -> LabOutcome {
        self.status
            .unwrap_or(LabOutcome::Unevaluable(UnevaluableReason::UnparseableResult))
    }
}

/// A patient's sex as recorded plus their lab observations.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PatientLabs {
    /// Raw sex string; `None` when the cell was missing or not text.
    pub sex: Option<String>,
    pub labs: Vec<LabObservation>,
}
