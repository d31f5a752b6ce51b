//! Reference diagnosis-code sets.
//!
//! Reference sets are loaded once per run and only read during feature
//! derivation. Codes are stored in canonical form (see the diagnosis-code
//! normalizer in `mhrisk-transform`); a `BTreeSet` keeps iteration order
//! stable so derived columns are reproducible.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// An immutable-by-convention set of canonical diagnosis codes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CodeSet(BTreeSet<String>);

impl CodeSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, code: impl Into<String>) -> bool {
        self.0.insert(code.into())
    }

    pub fn contains(&self, code: &str) -> bool {
        self.0.contains(code)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Codes in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for CodeSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl<S: Into<String>> Extend<S> for CodeSet {
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        self.0.extend(iter.into_iter().map(Into::into));
    }
}

/// Named code sets, one per clinical category, in declaration order.
///
/// Inserting a name that already exists replaces its set in place, so the
/// last definition of a category wins without changing column order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryCodeSets {
    categories: Vec<(String, CodeSet)>,
}

impl CategoryCodeSets {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, codes: CodeSet) {
        let name = name.into();
        match self.categories.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, slot)) => *slot = codes,
            None => self.categories.push((name, codes)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&CodeSet> {
        self.categories
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, codes)| codes)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.categories.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &CodeSet)> {
        self.categories
            .iter()
            .map(|(name, codes)| (name.as_str(), codes))
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, CodeSet)> for CategoryCodeSets {
    fn from_iter<I: IntoIterator<Item = (S, CodeSet)>>(iter: I) -> Self {
        let mut sets = Self::new();
        for (name, codes) in iter {
            sets.insert(name, codes);
        }
        sets
    }
}

/// All reference data the pipeline consumes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReferenceSets {
    /// Flattened mental-health diagnosis codes.
    pub mental_health: CodeSet,
    /// Chronic-condition codes.
    pub chronic: CodeSet,
    /// Physical-comorbidity category -> codes.
    pub physical_comorbidities: CategoryCodeSets,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn code_set_iterates_sorted() {
        let set: CodeSet = ["401", "250", "296.2"].into_iter().collect();
        assert_eq!(set.iter().collect::<Vec<_>>(), vec!["250", "296.2", "401"]);
        assert!(set.contains("250"));
        assert!(!set.contains("250.0"));
    }

    #[test]
    fn category_insert_replaces_in_place() {
        let mut sets = CategoryCodeSets::new();
        sets.insert("Diabetes", ["250"].into_iter().collect());
        sets.insert("Hypertension", ["401"].into_iter().collect());
        sets.insert("Diabetes", ["250", "250.1"].into_iter().collect());

        assert_eq!(sets.names().collect::<Vec<_>>(), vec!["Diabetes", "Hypertension"]);
        assert_eq!(sets.get("Diabetes").map(CodeSet::len), Some(2));
        assert_eq!(sets.len(), 2);
    }
}
