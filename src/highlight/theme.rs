//! Keyword-overlap estimate of whether an essay addresses its theme

use crate::config::ThemeConfig;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Adherence of an essay to its assigned theme
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThemeAdherence {
    /// True when adherence is below the deviation threshold
    #[serde(rename = "fuga_ao_tema")]
    pub deviates: bool,
    /// Percentage of theme keywords present, in [0, 100]
    #[serde(rename = "aderencia")]
    pub adherence: f64,
    /// Theme keywords and expected references found in the essay
    #[serde(rename = "palavras_usadas")]
    pub keywords_used: BTreeSet<String>,
}

/// Theme-adherence heuristic
#[derive(Debug, Clone)]
pub struct ThemeEstimator {
    deviation_threshold: f64,
    min_keyword_chars: usize,
}

impl Default for ThemeEstimator {
    fn default() -> Self {
        Self::from_config(&ThemeConfig::default())
    }
}

impl ThemeEstimator {
    pub fn new(deviation_threshold: f64, min_keyword_chars: usize) -> Self {
        Self {
            deviation_threshold,
            min_keyword_chars,
        }
    }

    pub fn from_config(config: &ThemeConfig) -> Self {
        Self::new(config.deviation_threshold, config.min_keyword_chars)
    }

    /// Lowercased theme words long enough to count as keywords
    pub fn theme_keywords(&self, theme: &str) -> BTreeSet<String> {
        theme
            .to_lowercase()
            .split_whitespace()
            .filter(|word| word.chars().count() >= self.min_keyword_chars)
            .map(str::to_string)
            .collect()
    }

    /// Estimate adherence of `text` to `theme`
    ///
    /// Expected references found in the text are reported in
    /// `keywords_used` but never change the ratio.
    pub fn estimate(&self, text: &str, theme: &str, expected: &[String]) -> ThemeAdherence {
        let keywords = self.theme_keywords(theme);
        let lowered = text.to_lowercase();

        let mut keywords_used: BTreeSet<String> = keywords
            .iter()
            .filter(|keyword| lowered.contains(keyword.as_str()))
            .cloned()
            .collect();

        let adherence = if keywords.is_empty() {
            0.0
        } else {
            100.0 * keywords_used.len() as f64 / keywords.len() as f64
        };

        keywords_used.extend(
            expected
                .iter()
                .filter(|reference| {
                    let reference = reference.trim();
                    !reference.is_empty() && lowered.contains(&reference.to_lowercase())
                })
                .cloned(),
        );

        ThemeAdherence {
            deviates: adherence < self.deviation_threshold,
            adherence: (adherence * 100.0).round() / 100.0,
            keywords_used,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const THEME: &str = "Educação e Tecnologia no Século XXI";

    #[test]
    fn test_theme_keywords() {
        let keywords = ThemeEstimator::default().theme_keywords(THEME);
        let expected: BTreeSet<String> = ["educação", "tecnologia", "século"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(keywords, expected);
    }

    #[test]
    fn test_no_keywords_present() {
        let result = ThemeEstimator::default().estimate(
            "O futebol brasileiro é apaixonante.",
            THEME,
            &[],
        );
        assert_eq!(result.adherence, 0.0);
        assert!(result.deviates);
        assert!(result.keywords_used.is_empty());
    }

    #[test]
    fn test_all_keywords_present() {
        let result = ThemeEstimator::default().estimate(
            "A EDUCAÇÃO mediada pela tecnologia marca o século XXI.",
            THEME,
            &[],
        );
        assert_eq!(result.adherence, 100.0);
        assert!(!result.deviates);
        assert_eq!(result.keywords_used.len(), 3);
    }

    #[test]
    fn test_adherence_is_rounded() {
        let result = ThemeEstimator::default().estimate("Falamos de educação.", THEME, &[]);
        assert_eq!(result.adherence, 33.33);
        assert!(!result.deviates);
    }

    #[test]
    fn test_keywords_match_as_substrings() {
        let result = ThemeEstimator::default().estimate("tecnologias digitais", THEME, &[]);
        assert!(result.keywords_used.contains("tecnologia"));
    }

    #[test]
    fn test_empty_theme() {
        let result = ThemeEstimator::default().estimate("qualquer texto", "a e o", &[]);
        assert_eq!(result.adherence, 0.0);
        assert!(result.deviates);
    }

    #[test]
    fn test_expected_references_do_not_affect_ratio() {
        let expected = vec!["Paulo Freire".to_string(), "Bauman".to_string()];
        let result = ThemeEstimator::default().estimate(
            "Segundo paulo freire, a escola liberta.",
            THEME,
            &expected,
        );
        assert_eq!(result.adherence, 0.0);
        assert!(result.keywords_used.contains("Paulo Freire"));
        assert!(!result.keywords_used.contains("Bauman"));
    }

    #[test]
    fn test_custom_threshold() {
        let strict = ThemeEstimator::new(50.0, 4);
        let result = strict.estimate("Falamos de educação.", THEME, &[]);
        assert!(result.deviates);
    }
}
