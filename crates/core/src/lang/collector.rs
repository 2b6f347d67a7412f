use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use super::codes::display_name;

/// A content language together with how many catalog entries carry it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Language {
    /// ISO 639-3 code, e.g. "eng".
    pub code: String,
    /// English display name, e.g. "English".
    pub name: String,
    /// Number of catalog entries tagged with this language.
    pub count: i64,
}

impl PartialEq for Language {
    fn eq(&self, other: &Self) -> bool {
        self.code == other.code
    }
}

impl Eq for Language {}

/// Accumulates per-language entry counts from comma separated code lists.
///
/// Codes that do not resolve to a known display name are dropped, and a
/// code repeated within one list is only counted once for that list.
#[derive(Debug, Default)]
pub struct LanguageCollector {
    counts: HashMap<String, i64>,
}

impl LanguageCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `count` occurrences for every distinct valid code in `codes`.
    pub fn add_languages(&mut self, codes: &str, count: i64) {
        if count <= 0 {
            return;
        }
        let mut seen: HashSet<&str> = HashSet::new();
        for code in codes.split(',') {
            let code = code.trim();
            if code.is_empty() || display_name(code).is_none() {
                continue;
            }
            if seen.insert(code) {
                *self.counts.entry(code.to_string()).or_insert(0) += count;
            }
        }
    }

    /// All collected languages, sorted by display name.
    pub fn languages(&self) -> Vec<Language> {
        let mut languages: Vec<Language> = self
            .counts
            .iter()
            .filter_map(|(code, count)| {
                display_name(code).map(|name| Language {
                    code: code.clone(),
                    name: name.to_string(),
                    count: *count,
                })
            })
            .collect();
        languages.sort_by(|a, b| a.name.cmp(&b.name));
        languages
    }

    /// The set of collected codes, unordered.
    pub fn codes(&self) -> HashSet<String> {
        self.counts.keys().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_collector() {
        let collector = LanguageCollector::new();
        assert!(collector.languages().is_empty());
        assert!(collector.codes().is_empty());
    }

    #[test]
    fn test_invalid_entries_ignored() {
        let mut collector = LanguageCollector::new();
        collector.add_languages("", 1);
        collector.add_languages("invalid", 1);
        collector.add_languages("more,invalid,entries", 1);
        assert!(collector.languages().is_empty());

        collector.add_languages("i_am,invalid,fra", 1);
        let languages = collector.languages();
        assert_eq!(languages.len(), 1);
        assert_eq!(languages[0].name, "French");
        assert_eq!(languages[0].count, 1);
    }

    #[test]
    fn test_zero_and_negative_counts_ignored() {
        let mut collector = LanguageCollector::new();
        collector.add_languages("eng", 0);
        collector.add_languages("fra", -5);
        assert!(collector.languages().is_empty());
    }

    #[test]
    fn test_single_language() {
        let mut collector = LanguageCollector::new();
        collector.add_languages("eng", 1);
        let languages = collector.languages();
        assert_eq!(languages.len(), 1);
        assert_eq!(languages[0].code, "eng");
        assert_eq!(languages[0].name, "English");
        assert_eq!(languages[0].count, 1);
    }

    #[test]
    fn test_repeated_code_in_one_list_counted_once() {
        let mut collector = LanguageCollector::new();
        collector.add_languages("eng,eng", 1);
        let languages = collector.languages();
        assert_eq!(languages.len(), 1);
        assert_eq!(languages[0].count, 1);
    }

    #[test]
    fn test_counts_accumulate_across_calls() {
        let mut collector = LanguageCollector::new();
        collector.add_languages("eng", 2);
        collector.add_languages("eng,fra", 3);
        let languages = collector.languages();
        assert_eq!(languages.len(), 2);
        assert_eq!(languages[0].name, "English");
        assert_eq!(languages[0].count, 5);
        assert_eq!(languages[1].name, "French");
        assert_eq!(languages[1].count, 3);
    }

    #[test]
    fn test_sorted_by_display_name() {
        let mut collector = LanguageCollector::new();
        collector.add_languages("fra", 1);
        collector.add_languages("deu", 1);
        collector.add_languages("eng", 1);
        let names: Vec<String> = collector.languages().into_iter().map(|l| l.name).collect();
        assert_eq!(names, vec!["English", "French", "German"]);
    }

    #[test]
    fn test_whitespace_trimmed() {
        let mut collector = LanguageCollector::new();
        collector.add_languages(" eng , fra ", 1);
        assert_eq!(collector.languages().len(), 2);
    }
}
