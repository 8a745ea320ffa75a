//! Free-text to ICD-10 code mapping.
//!
//! A small keyword matcher: the lower-cased text is searched for each keyword of a
//! fixed rule table, every hit is scored by keyword length, and the best hit per code is kept.
//! There is no tokenisation or stemming; a keyword either occurs verbatim (ignoring case) or it
//! does not.
//!
//! ```
//! use medication_core::icd10::map_text_to_icd10;
//!
//! let candidates = map_text_to_icd10("Long-standing hypertension");
//! assert_eq!(candidates[0].code, "I10");
//! ```

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Base confidence awarded for any keyword hit.
const KEYWORD_WEIGHT: f64 = 0.7;
/// Share of the score that scales with keyword length.
const LENGTH_WEIGHT: f64 = 0.3;
/// Keyword length (in characters) at which the length factor saturates.
const LENGTH_SATURATION: f64 = 10.0;
/// Upper bound for any matched candidate.
const MAX_CONFIDENCE: f64 = 0.95;

/// Maximum number of characters of the input echoed back in the fallback description.
const FALLBACK_DESCRIPTION_CHARS: usize = 50;
pub const FALLBACK_CODE: &str = "R69";
pub const FALLBACK_CODE_DESCRIPTION: &str = "Illness, unspecified";
pub const FALLBACK_CONFIDENCE: f64 = 0.1;

/// Static association between a diagnosis code and the substrings that trigger it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeywordRule {
    pub code: &'static str,
    pub description: &'static str,
    pub keywords: &'static [&'static str],
}

/// Simplified mapping of common conditions to ICD-10 codes.
///
/// Codes are unique and every rule has at least one keyword.
pub static KEYWORD_RULES: &[KeywordRule] = &[
    KeywordRule {
        code: "E78.5",
        description: "Hyperlipidemia, unspecified",
        keywords: &["cholesterol", "hyperlipidemia", "high lipids"],
    },
    KeywordRule {
        code: "I10",
        description: "Essential (primary) hypertension",
        keywords: &["hypertension", "high blood pressure", "elevated bp"],
    },
    KeywordRule {
        code: "E11.65",
        description: "Type 2 diabetes mellitus with hyperglycemia",
        keywords: &["diabetes", "high blood sugar", "hyperglycemia"],
    },
    KeywordRule {
        code: "J18.9",
        description: "Pneumonia, unspecified",
        keywords: &["pneumonia", "lung infection"],
    },
    KeywordRule {
        code: "M54.5",
        description: "Low back pain",
        keywords: &["back pain", "lumbago"],
    },
];

/// One scored diagnosis-code match for an input text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    /// The keyword that produced the match, or a prefix of the input for the fallback.
    pub description: String,
    pub code: String,
    pub code_description: String,
    pub confidence: f64,
}

impl Candidate {
    fn fallback(text: &str) -> Self {
        let mut description: String = text.chars().take(FALLBACK_DESCRIPTION_CHARS).collect();
        if text.chars().count() > FALLBACK_DESCRIPTION_CHARS {
            description.push_str("...");
        }

        Self {
            description,
            code: FALLBACK_CODE.to_string(),
            code_description: FALLBACK_CODE_DESCRIPTION.to_string(),
            confidence: FALLBACK_CONFIDENCE,
        }
    }
}

/// Confidence for a keyword hit: `min(0.7 + min(len / 10, 1) * 0.3, 0.95)`.
pub fn keyword_confidence(keyword: &str) -> f64 {
    let length_factor = (keyword.chars().count() as f64 / LENGTH_SATURATION).min(1.0);
    (KEYWORD_WEIGHT + length_factor * LENGTH_WEIGHT).min(MAX_CONFIDENCE)
}

/// Map free text to ICD-10 candidates using [`KEYWORD_RULES`].
pub fn map_text_to_icd10(text: &str) -> Vec<Candidate> {
    map_text_with_rules(text, KEYWORD_RULES)
}

/// Map free text against an arbitrary rule table.
///
/// The result is never empty: with no hit, a single `R69` fallback is returned. Candidates are
/// ordered by descending confidence; equal confidences keep rule-table order.
pub fn map_text_with_rules(text: &str, rules: &[KeywordRule]) -> Vec<Candidate> {
    let lower_text = text.to_lowercase();
    let mut results: Vec<Candidate> = Vec::new();

    for rule in rules {
        for keyword in rule.keywords {
            if !lower_text.contains(&keyword.to_lowercase()) {
                continue;
            }

            let confidence = keyword_confidence(keyword);
            let existing = results.iter().position(|c| c.code == rule.code);

            match existing {
                Some(idx) if results[idx].confidence >= confidence => {}
                _ => {
                    let candidate = Candidate {
                        description: (*keyword).to_string(),
                        code: rule.code.to_string(),
                        code_description: rule.description.to_string(),
                        confidence,
                    };
                    match existing {
                        Some(idx) => results[idx] = candidate,
                        None => results.push(candidate),
                    }
                }
            }
        }
    }

    // stable: ties stay in rule-table order
    results.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));

    if results.is_empty() {
        tracing::debug!("no ICD-10 keyword matched; returning fallback");
        return vec![Candidate::fallback(text)];
    }

    tracing::debug!(matches = results.len(), "mapped text to ICD-10 candidates");
    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_rule_table_invariants() {
        let mut codes = HashSet::new();
        for rule in KEYWORD_RULES {
            assert!(!rule.keywords.is_empty(), "{} has no keywords", rule.code);
            assert!(codes.insert(rule.code), "duplicate code {}", rule.code);
        }
        assert_eq!(KEYWORD_RULES.len(), 5);
    }

    #[test]
    fn test_keyword_confidence_formula() {
        assert!(approx_eq(keyword_confidence("lumbago"), 0.91));
        assert!(approx_eq(keyword_confidence("diabetes"), 0.94));
        // saturates at the cap
        assert!(approx_eq(keyword_confidence("back pain"), 0.95));
        assert!(approx_eq(keyword_confidence("cholesterol"), 0.95));
        assert!(approx_eq(keyword_confidence("high blood pressure"), 0.95));
        assert!(approx_eq(keyword_confidence(""), 0.7));
    }

    #[test]
    fn test_every_keyword_maps_to_its_code() {
        for rule in KEYWORD_RULES {
            for keyword in rule.keywords {
                let text = format!("Notes: {} noted on exam", keyword.to_uppercase());
                let result = map_text_to_icd10(&text);
                let hit = result
                    .iter()
                    .find(|c| c.code == rule.code)
                    .unwrap_or_else(|| panic!("{} should map to {}", keyword, rule.code));
                assert!(hit.confidence >= 0.7);
                assert_eq!(hit.code_description, rule.description);
            }
        }
    }

    #[test]
    fn test_cholesterol_and_hypertension() {
        let result = map_text_to_icd10("Patient has high cholesterol and mild hypertension");

        let codes: Vec<&str> = result.iter().map(|c| c.code.as_str()).collect();
        assert_eq!(codes, vec!["E78.5", "I10"]);
        assert!(result.iter().all(|c| c.confidence >= 0.7));
        assert_eq!(result[0].description, "cholesterol");
        assert_eq!(result[1].description, "hypertension");
    }

    #[test]
    fn test_higher_scoring_keyword_wins_within_a_code() {
        // "lumbago" scores 0.91, "back pain" 0.95; one candidate survives
        let result = map_text_to_icd10("lumbago, i.e. back pain");

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].code, "M54.5");
        assert_eq!(result[0].description, "back pain");
        assert!(approx_eq(result[0].confidence, 0.95));
    }

    #[test]
    fn test_equal_confidence_keeps_first_keyword() {
        // both keywords cap at 0.95; the replacement needs a strictly higher score
        let result = map_text_to_icd10("hyperlipidemia with cholesterol");

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].description, "cholesterol");
    }

    #[test]
    fn test_results_sorted_descending() {
        let result = map_text_to_icd10("lumbago and diabetes and pneumonia");

        let codes: Vec<&str> = result.iter().map(|c| c.code.as_str()).collect();
        assert_eq!(codes, vec!["J18.9", "E11.65", "M54.5"]);
        for pair in result.windows(2) {
            assert!(pair[0].confidence >= pair[1].confidence);
        }
    }

    #[test]
    fn test_empty_text_returns_fallback() {
        let result = map_text_to_icd10("");

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].code, "R69");
        assert_eq!(result[0].code_description, "Illness, unspecified");
        assert_eq!(result[0].description, "");
        assert!(approx_eq(result[0].confidence, 0.1));
    }

    #[test]
    fn test_unrelated_text_returns_fallback() {
        let result = map_text_to_icd10("unrelated gibberish xyz");

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].code, "R69");
        assert_eq!(result[0].description, "unrelated gibberish xyz");
        assert!(approx_eq(result[0].confidence, 0.1));
    }

    #[test]
    fn test_long_fallback_description_is_truncated() {
        let text = "A very long text that should be truncated to 50 characters plus ellipsis";
        let result = map_text_to_icd10(text);

        assert_eq!(result[0].code, "R69");
        assert_eq!(result[0].description.chars().count(), 53);
        assert!(result[0].description.ends_with("..."));
        assert!(result[0].description.starts_with(&text[..50]));
    }

    #[test]
    fn test_exactly_fifty_chars_not_truncated() {
        let text = "x".repeat(50);
        let result = map_text_to_icd10(&text);

        assert_eq!(result[0].description, text);
    }

    #[test]
    fn test_fallback_keeps_original_case() {
        let result = map_text_to_icd10("Headache AND Fever");
        assert_eq!(result[0].description, "Headache AND Fever");
    }

    #[test]
    fn test_at_most_one_candidate_per_code() {
        let result = map_text_to_icd10(
            "diabetes, high blood sugar and hyperglycemia; high blood pressure, hypertension",
        );

        let mut seen = HashSet::new();
        for candidate in &result {
            assert!(seen.insert(candidate.code.clone()));
            assert!(candidate.confidence >= 0.7 && candidate.confidence <= 0.95);
        }
        assert_eq!(result.len(), 2);
    }

    #[test]
    fn test_custom_rule_table() {
        static RULES: &[KeywordRule] = &[KeywordRule {
            code: "Z00",
            description: "General exam",
            keywords: &["Checkup"],
        }];

        let result = map_text_with_rules("annual CHECKUP", RULES);
        assert_eq!(result[0].code, "Z00");
        assert_eq!(result[0].description, "Checkup");
    }

    #[test]
    fn test_candidate_serializes_camel_case() {
        let candidate = Candidate {
            description: "lumbago".into(),
            code: "M54.5".into(),
            code_description: "Low back pain".into(),
            confidence: 0.91,
        };
        let json = serde_json::to_value(&candidate).unwrap();

        assert_eq!(json["codeDescription"], "Low back pain");
        assert_eq!(json["code"], "M54.5");
    }
}
