use std::collections::HashSet;

use super::codes::alpha3_from_alpha2;

/// Normalize a set of stored language codes against the codes that are
/// actually present in the catalog.
///
/// Codes already in `valid_codes` are kept as-is. Legacy 2-letter codes
/// are converted to their alpha-3 form, but only kept when the converted
/// code is itself valid. Everything else is dropped, so the result is
/// always a subset of `valid_codes`.
pub fn convert_codes(codes: &HashSet<String>, valid_codes: &HashSet<String>) -> HashSet<String> {
    codes
        .iter()
        .filter_map(|code| {
            if valid_codes.contains(code) {
                Some(code.clone())
            } else {
                alpha3_from_alpha2(code)
                    .filter(|converted| valid_codes.contains(*converted))
                    .map(str::to_string)
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(codes: &[&str]) -> HashSet<String> {
        codes.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn test_empty_input() {
        assert!(convert_codes(&set(&[]), &set(&["eng"])).is_empty());
    }

    #[test]
    fn test_empty_valid_set() {
        assert!(convert_codes(&set(&["eng", "en"]), &set(&[])).is_empty());
    }

    #[test]
    fn test_valid_alpha3_kept() {
        let result = convert_codes(&set(&["eng", "fra"]), &set(&["eng", "fra", "deu"]));
        assert_eq!(result, set(&["eng", "fra"]));
    }

    #[test]
    fn test_alpha2_converted_when_target_valid() {
        let result = convert_codes(&set(&["en", "fr"]), &set(&["eng", "deu"]));
        assert_eq!(result, set(&["eng"]));
    }

    #[test]
    fn test_unconvertible_codes_dropped() {
        let result = convert_codes(&set(&["zz", "bogus"]), &set(&["eng"]));
        assert!(result.is_empty());
    }

    #[test]
    fn test_result_is_subset_of_valid() {
        let valid = set(&["eng", "fra", "spa"]);
        let result = convert_codes(&set(&["en", "es", "deu", "it", "fra"]), &valid);
        assert_eq!(result, set(&["eng", "spa", "fra"]));
        assert!(result.is_subset(&valid));
    }
}
