//! Code-set matching against reference sets.
//!
//! Matchers work on canonical codes (see [`crate::normalization`]).
//! [`is_in_any`] accepts a raw cell and canonicalizes it itself.

use std::collections::BTreeSet;

use mhrisk_model::{CategoryCodeSets, CodeSet, RawValue};

use crate::normalization::normalize_diagnosis_code;

/// Set intersection of `codes` with `reference`.
///
/// Matched codes are returned once each, in ascending order; the count is
/// always the length of that list.
pub fn overlap<I, S>(codes: I, reference: &CodeSet) -> (Vec<String>, usize)
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let matched: BTreeSet<String> = codes
        .into_iter()
        .filter(|code| reference.contains(code.as_ref()))
        .map(|code| code.as_ref().to_string())
        .collect();
    let count = matched.len();
    (matched.into_iter().collect(), count)
}

/// `1` if any code in the cell is in `reference`, else `0`.
///
/// Missing cells are `0`. A list matches if any entry does; a scalar is
/// tested on its own.
pub fn is_in_any(codes: &RawValue, reference: &CodeSet) -> i32 {
    if codes.is_missing() {
        return 0;
    }
    let matches = |raw: &RawValue| {
        normalize_diagnosis_code(raw).is_some_and(|code| reference.contains(&code))
    };
    let found = match codes.as_list() {
        Some(items) => items.iter().any(matches),
        None => matches(codes),
    };
    i32::from(found)
}

/// Names of every category whose code set intersects `codes`.
///
/// Names come back in category order; a patient may match none, one or
/// several categories.
pub fn categorize_multi<S: AsRef<str>>(codes: &[S], categories: &CategoryCodeSets) -> Vec<String> {
    categories
        .iter()
        .filter(|(_, set)| codes.iter().any(|code| set.contains(code.as_ref())))
        .map(|(name, _)| name.to_string())
        .collect()
}
