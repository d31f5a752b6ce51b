//! Lab classification.
//!
//! - **rules**: threshold rules mapping a numeric result to a severity
//! - **registry**: the fixed test-name to rule mapping

pub mod registry;
pub mod rules;

pub use registry::LabRegistry;
pub use rules::{Bound, Interval, LabRule, RuleKind};
