//! Sex normalization.

use mhrisk_model::RawValue;

pub const SEX_MALE: i32 = 0;
pub const SEX_FEMALE: i32 = 1;

/// Maps a sex cell to `0` (male) or `1` (female).
///
/// Accepts `male`/`m` and `female`/`f` in any case with surrounding
/// whitespace. Anything else, including missing cells, yields `None`.
pub fn normalize_sex(raw: &RawValue) -> Option<i32> {
    let text = raw.as_text()?.trim().to_lowercase();
    match text.as_str() {
        "male" | "m" => Some(SEX_MALE),
        "female" | "f" => Some(SEX_FEMALE),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognizes_common_spellings() {
        assert_eq!(normalize_sex(&RawValue::from("Male")), Some(SEX_MALE));
        assert_eq!(normalize_sex(&RawValue::from(" m ")), Some(SEX_MALE));
        assert_eq!(normalize_sex(&RawValue::from("FEMALE")), Some(SEX_FEMALE));
        assert_eq!(normalize_sex(&RawValue::from("f")), Some(SEX_FEMALE));
    }

    #[test]
    fn unknown_values_are_none() {
        assert_eq!(normalize_sex(&RawValue::from("unknown")), None);
        assert_eq!(normalize_sex(&RawValue::from("")), None);
        assert_eq!(normalize_sex(&RawValue::Null), None);
        assert_eq!(normalize_sex(&RawValue::Int(1)), None);
    }
}
