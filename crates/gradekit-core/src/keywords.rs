//! Keyword ingestion and matching.

use std::collections::HashSet;

use serde_json::Value;

use crate::text::normalize;

/// The matched/missing partition of a keyword list against one answer.
///
/// Both sides hold normalized, de-duplicated keyword forms; together they
/// partition the usable keyword list exactly.
#[derive(Debug, Clone, Default)]
pub struct KeywordMatch {
    pub matched: Vec<String>,
    pub missing: Vec<String>,
}

impl KeywordMatch {
    /// Number of usable keywords after normalization and de-duplication.
    pub fn total(&self) -> usize {
        self.matched.len() + self.missing.len()
    }
}

/// Classify each keyword as matched or missing against a normalized answer.
///
/// A keyword matches when its normalized form appears as a single token of
/// the answer, so a multi-word keyword can never match. Keywords that
/// normalize to the empty string are dropped, and duplicates (after
/// normalization) count once.
pub fn match_keywords(keywords: &[String], normalized_answer: &str) -> KeywordMatch {
    let tokens: HashSet<&str> = normalized_answer.split_whitespace().collect();

    let mut result = KeywordMatch::default();
    let mut seen = HashSet::new();
    for keyword in keywords {
        let normalized = normalize(keyword);
        if normalized.is_empty() || !seen.insert(normalized.clone()) {
            continue;
        }
        if tokens.contains(normalized.as_str()) {
            result.matched.push(normalized);
        } else {
            result.missing.push(normalized);
        }
    }
    result
}

/// Extract keyword strings from a caller-supplied JSON payload.
///
/// Accepts an array whose entries are plain strings or objects carrying a
/// `text` field. A non-array payload or a malformed entry is tolerated and
/// yields no keywords rather than an error.
pub fn keywords_from_json(value: &Value) -> Vec<String> {
    let Some(entries) = value.as_array() else {
        if !value.is_null() {
            tracing::warn!("keyword payload is not a list, treating as empty");
        }
        return Vec::new();
    };

    let mut keywords = Vec::new();
    for entry in entries {
        match entry {
            Value::String(text) => keywords.push(text.clone()),
            Value::Object(fields) => match fields.get("text").and_then(Value::as_str) {
                Some(text) => keywords.push(text.to_string()),
                None => tracing::warn!("keyword object without a text field, skipping"),
            },
            other => tracing::warn!("unsupported keyword entry, skipping: {other}"),
        }
    }
    keywords
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn owned(keywords: &[&str]) -> Vec<String> {
        keywords.iter().map(|k| k.to_string()).collect()
    }

    #[test]
    fn matches_normalized_single_tokens() {
        let answer = normalize("<p>Normalization reduces data redundancy.</p>");
        let result = match_keywords(&owned(&["redundancy", "integrity"]), &answer);
        assert_eq!(result.matched, vec!["redundancy"]);
        assert_eq!(result.missing, vec!["integrity"]);
        assert_eq!(result.total(), 2);
    }

    #[test]
    fn keyword_matching_is_case_and_form_insensitive() {
        let answer = normalize("The database uses several TABLES.");
        let result = match_keywords(&owned(&["Tables"]), &answer);
        // "Tables" and "TABLES" both normalize to "table".
        assert_eq!(result.matched, vec!["table"]);
    }

    #[test]
    fn multi_word_keywords_never_match() {
        let answer = normalize("data redundancy is reduced");
        let result = match_keywords(&owned(&["data redundancy"]), &answer);
        assert!(result.matched.is_empty());
        assert_eq!(result.missing, vec!["data redundancy"]);
    }

    #[test]
    fn duplicates_and_empties_are_dropped() {
        let answer = normalize("normalization reduces redundancy");
        let result = match_keywords(
            &owned(&["redundancy", "Redundancy!", "", "   ", "123"]),
            &answer,
        );
        assert_eq!(result.matched, vec!["redundancy"]);
        assert!(result.missing.is_empty());
        assert_eq!(result.total(), 1);
    }

    #[test]
    fn partition_is_exact() {
        let answer = normalize("normalization reduces data redundancy");
        let keywords = owned(&["redundancy", "data", "integrity", "anomaly"]);
        let result = match_keywords(&keywords, &answer);
        assert_eq!(result.matched.len() + result.missing.len(), result.total());
        for matched in &result.matched {
            assert!(!result.missing.contains(matched));
        }
    }

    #[test]
    fn keywords_from_json_accepts_both_shapes() {
        let payload = json!(["normalization", { "text": "redundancy" }]);
        assert_eq!(
            keywords_from_json(&payload),
            vec!["normalization".to_string(), "redundancy".to_string()]
        );
    }

    #[test]
    fn keywords_from_json_tolerates_malformed_payloads() {
        assert!(keywords_from_json(&json!("not a list")).is_empty());
        assert!(keywords_from_json(&json!({ "text": "solo" })).is_empty());
        assert!(keywords_from_json(&Value::Null).is_empty());

        // Malformed entries are skipped, valid ones survive.
        let mixed = json!(["keep", 42, { "label": "no text field" }, { "text": "also keep" }]);
        assert_eq!(
            keywords_from_json(&mixed),
            vec!["keep".to_string(), "also keep".to_string()]
        );
    }
}
