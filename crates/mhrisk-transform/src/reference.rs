//! Building canonical reference sets from raw code lists.

use mhrisk_model::{CodeSet, FeatureConfig, RawValue};

use crate::normalization::normalize_diagnosis_code;

/// Canonicalizes raw codes into a set; codes without a canonical form are
/// left out.
pub fn canonical_code_set<I, S>(codes: I) -> CodeSet
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    codes
        .into_iter()
        .filter_map(|code| normalize_diagnosis_code(&RawValue::from(code.as_ref())))
        .collect()
}

/// The configured mental-health groups flattened into one canonical set.
pub fn mental_health_code_set(config: &FeatureConfig) -> CodeSet {
    canonical_code_set(config.mental_health_codes())
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    #[test]
    fn codes_are_canonicalized() {
        let set = canonical_code_set(["250.00", "250", "V70.0", " 296.20 "]);
        assert_eq!(set.iter().collect::<Vec<_>>(), vec!["250", "296.2"]);
    }

    #[test]
    fn mental_health_groups_are_flattened() {
        let config = FeatureConfig {
            mental_health_groups: BTreeMap::from([
                ("depression".to_string(), vec!["296.20".to_string(), "311".to_string()]),
                ("anxiety".to_string(), vec!["300.02".to_string()]),
            ]),
            ..FeatureConfig::default()
        };
        let set = mental_health_code_set(&config);
        assert_eq!(set.len(), 3);
        assert!(set.contains("296.2"));
    }
}
