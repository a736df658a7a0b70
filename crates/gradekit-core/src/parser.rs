//! TOML assessment bundle parser.
//!
//! Loads assessment bundles from TOML files and directories, and
//! validates them.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::model::{AssessmentBundle, AssessmentSettings, EssayReference, EssaySubmission};

/// Intermediate TOML structure for parsing bundle files.
#[derive(Debug, Deserialize)]
struct TomlBundleFile {
    assessment: TomlAssessmentHeader,
    #[serde(default)]
    reference: Option<TomlReference>,
    #[serde(default)]
    submissions: Vec<TomlSubmission>,
}

#[derive(Debug, Deserialize)]
struct TomlAssessmentHeader {
    id: String,
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    settings: AssessmentSettings,
}

#[derive(Debug, Deserialize)]
struct TomlReference {
    model_answer: String,
    #[serde(default)]
    keywords: Vec<TomlKeyword>,
    max_mark: f64,
    #[serde(default)]
    word_limit: Option<u32>,
}

/// Keywords may be written as plain strings or as `{ text = "..." }`
/// tables, matching both shapes the authoring tools emit.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TomlKeyword {
    Text(String),
    Entry { text: String },
}

impl TomlKeyword {
    fn into_text(self) -> String {
        match self {
            TomlKeyword::Text(text) => text,
            TomlKeyword::Entry { text } => text,
        }
    }
}

#[derive(Debug, Deserialize)]
struct TomlSubmission {
    id: String,
    author: String,
    #[serde(default)]
    question_id: Option<String>,
    text: String,
}

/// Parse a single TOML file into an `AssessmentBundle`.
pub fn parse_bundle(path: &Path) -> Result<AssessmentBundle> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read bundle file: {}", path.display()))?;

    parse_bundle_str(&content, path)
}

/// Parse a TOML string into an `AssessmentBundle` (useful for testing).
pub fn parse_bundle_str(content: &str, source_path: &Path) -> Result<AssessmentBundle> {
    let parsed: TomlBundleFile = toml::from_str(content)
        .with_context(|| format!("failed to parse TOML: {}", source_path.display()))?;

    let reference = parsed.reference.map(|r| EssayReference {
        model_answer: r.model_answer,
        keywords: r.keywords.into_iter().map(TomlKeyword::into_text).collect(),
        max_mark: r.max_mark,
        word_limit: r.word_limit,
    });

    let submissions = parsed
        .submissions
        .into_iter()
        .map(|s| EssaySubmission {
            id: s.id,
            author: s.author,
            question_id: s.question_id,
            text: s.text,
        })
        .collect();

    Ok(AssessmentBundle {
        id: parsed.assessment.id,
        title: parsed.assessment.title,
        description: parsed.assessment.description,
        settings: parsed.assessment.settings,
        reference,
        submissions,
    })
}

/// Recursively load all `.toml` bundle files from a directory.
pub fn load_bundle_directory(dir: &Path) -> Result<Vec<AssessmentBundle>> {
    let mut bundles = Vec::new();

    if !dir.is_dir() {
        anyhow::bail!("not a directory: {}", dir.display());
    }

    for entry in std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?
    {
        let entry = entry?;
        let path = entry.path();

        if path.is_dir() {
            bundles.extend(load_bundle_directory(&path)?);
        } else if path.extension().is_some_and(|ext| ext == "toml") {
            match parse_bundle(&path) {
                Ok(bundle) => bundles.push(bundle),
                Err(e) => {
                    tracing::warn!("skipping {}: {}", path.display(), e);
                }
            }
        }
    }

    Ok(bundles)
}

/// A warning from bundle validation.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// The submission ID (if applicable).
    pub submission_id: Option<String>,
    /// Warning message.
    pub message: String,
}

/// Validate a bundle for common issues.
pub fn validate_bundle(bundle: &AssessmentBundle) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    // Check for duplicate submission IDs
    let mut seen_ids = std::collections::HashSet::new();
    for submission in &bundle.submissions {
        if !seen_ids.insert(&submission.id) {
            warnings.push(ValidationWarning {
                submission_id: Some(submission.id.clone()),
                message: format!("duplicate submission ID: {}", submission.id),
            });
        }
    }

    // Check for empty submission text
    for submission in &bundle.submissions {
        if submission.text.trim().is_empty() {
            warnings.push(ValidationWarning {
                submission_id: Some(submission.id.clone()),
                message: "submission text is empty".into(),
            });
        }
    }

    // Screening needs at least two submissions to compare
    if bundle.settings.enable_plagiarism_check && bundle.submissions.len() < 2 {
        warnings.push(ValidationWarning {
            submission_id: None,
            message: "plagiarism check is enabled but fewer than two submissions are present"
                .into(),
        });
    }

    if let Some(reference) = &bundle.reference {
        if reference.keywords.is_empty() {
            warnings.push(ValidationWarning {
                submission_id: None,
                message: "reference has no keywords; the keyword share of the mark is unreachable"
                    .into(),
            });
        }
        if reference.max_mark <= 0.0 {
            warnings.push(ValidationWarning {
                submission_id: None,
                message: format!("max_mark must be positive, got {}", reference.max_mark),
            });
        }
        if reference.word_limit == Some(0) {
            warnings.push(ValidationWarning {
                submission_id: None,
                message: "word_limit of 0 is treated as no limit".into(),
            });
        }
    }

    if let Err(e) = bundle.settings.validate() {
        warnings.push(ValidationWarning {
            submission_id: None,
            message: e.to_string(),
        });
    }

    warnings
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    const VALID_TOML: &str = r#"
[assessment]
id = "db-essay"
title = "Database Normalization Essay"
description = "Week 4 essay on normal forms"

[assessment.settings]
similarity_threshold = 35.0
ignore_quotes = false

[reference]
model_answer = """
Normalization is a database design technique that reduces data
redundancy and improves data integrity.
"""
keywords = ["normalization", { text = "data redundancy" }, "integrity"]
max_mark = 10.0
word_limit = 500

[[submissions]]
id = "s-1"
author = "John Doe"
question_id = "q-1"
text = """
Normalization organises tables to remove redundant data.
"""

[[submissions]]
id = "s-2"
author = "Jane Smith"
text = "Databases benefit from normal forms."
"#;

    #[test]
    fn parse_valid_toml() {
        let bundle = parse_bundle_str(VALID_TOML, &PathBuf::from("test.toml")).unwrap();
        assert_eq!(bundle.id, "db-essay");
        assert_eq!(bundle.title, "Database Normalization Essay");
        assert_eq!(bundle.settings.similarity_threshold, 35.0);
        assert!(!bundle.settings.ignore_quotes);
        // Unset settings keep their defaults.
        assert!(bundle.settings.ignore_references);

        let reference = bundle.reference.unwrap();
        assert_eq!(
            reference.keywords,
            vec![
                "normalization".to_string(),
                "data redundancy".to_string(),
                "integrity".to_string()
            ]
        );
        assert_eq!(reference.max_mark, 10.0);
        assert_eq!(reference.word_limit, Some(500));

        assert_eq!(bundle.submissions.len(), 2);
        assert_eq!(bundle.submissions[0].question_id.as_deref(), Some("q-1"));
        assert!(bundle.submissions[1].question_id.is_none());
    }

    #[test]
    fn parse_missing_optional_fields() {
        let toml = r#"
[assessment]
id = "minimal"
title = "Minimal"

[[submissions]]
id = "s-1"
author = "John Doe"
text = "An answer."
"#;
        let bundle = parse_bundle_str(toml, &PathBuf::from("test.toml")).unwrap();
        assert_eq!(bundle.description, "");
        assert!(bundle.reference.is_none());
        assert!(bundle.settings.enable_plagiarism_check);
        assert_eq!(bundle.settings.similarity_threshold, 30.0);
        assert_eq!(bundle.submissions.len(), 1);
    }

    #[test]
    fn parse_screen_only_bundle() {
        let toml = r#"
[assessment]
id = "screen-only"
title = "Screen Only"

[[submissions]]
id = "s-1"
author = "John Doe"
text = "First answer."

[[submissions]]
id = "s-2"
author = "Jane Smith"
text = "Second answer."
"#;
        let bundle = parse_bundle_str(toml, &PathBuf::from("test.toml")).unwrap();
        assert!(bundle.reference.is_none());
        assert!(validate_bundle(&bundle).is_empty());
    }

    #[test]
    fn validate_duplicate_ids() {
        let toml = r#"
[assessment]
id = "dupes"
title = "Dupes"

[[submissions]]
id = "same"
author = "John Doe"
text = "First answer."

[[submissions]]
id = "same"
author = "Jane Smith"
text = "Second answer."
"#;
        let bundle = parse_bundle_str(toml, &PathBuf::from("test.toml")).unwrap();
        let warnings = validate_bundle(&bundle);
        assert!(warnings.iter().any(|w| w.message.contains("duplicate")));
    }

    #[test]
    fn validate_empty_submission_text() {
        let toml = r#"
[assessment]
id = "empty-text"
title = "Empty Text"

[[submissions]]
id = "s-1"
author = "John Doe"
text = "   "

[[submissions]]
id = "s-2"
author = "Jane Smith"
text = "A real answer."
"#;
        let bundle = parse_bundle_str(toml, &PathBuf::from("test.toml")).unwrap();
        let warnings = validate_bundle(&bundle);
        assert!(warnings
            .iter()
            .any(|w| w.submission_id.as_deref() == Some("s-1")
                && w.message.contains("empty")));
    }

    #[test]
    fn validate_screening_with_one_submission() {
        let toml = r#"
[assessment]
id = "lonely"
title = "Lonely"

[[submissions]]
id = "s-1"
author = "John Doe"
text = "The only answer."
"#;
        let bundle = parse_bundle_str(toml, &PathBuf::from("test.toml")).unwrap();
        let warnings = validate_bundle(&bundle);
        assert!(warnings
            .iter()
            .any(|w| w.message.contains("fewer than two")));
    }

    #[test]
    fn validate_reference_without_keywords() {
        let toml = r#"
[assessment]
id = "no-keywords"
title = "No Keywords"

[reference]
model_answer = "A model answer."
max_mark = 10.0

[[submissions]]
id = "s-1"
author = "John Doe"
text = "An answer."

[[submissions]]
id = "s-2"
author = "Jane Smith"
text = "Another answer."
"#;
        let bundle = parse_bundle_str(toml, &PathBuf::from("test.toml")).unwrap();
        let warnings = validate_bundle(&bundle);
        assert!(warnings.iter().any(|w| w.message.contains("no keywords")));
    }

    #[test]
    fn validate_out_of_range_settings() {
        let toml = r#"
[assessment]
id = "bad-settings"
title = "Bad Settings"

[assessment.settings]
similarity_threshold = 130.0

[[submissions]]
id = "s-1"
author = "John Doe"
text = "First answer."

[[submissions]]
id = "s-2"
author = "Jane Smith"
text = "Second answer."
"#;
        let bundle = parse_bundle_str(toml, &PathBuf::from("test.toml")).unwrap();
        let warnings = validate_bundle(&bundle);
        assert!(warnings.iter().any(|w| w.message.contains("130")));
    }

    #[test]
    fn parse_malformed_toml() {
        let bad = "this is not [valid toml }{";
        let result = parse_bundle_str(bad, &PathBuf::from("bad.toml"));
        assert!(result.is_err());
    }

    #[test]
    fn load_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("week4");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(nested.join("essay.toml"), VALID_TOML).unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let bundles = load_bundle_directory(dir.path()).unwrap();
        assert_eq!(bundles.len(), 1);
        assert_eq!(bundles[0].id, "db-essay");
    }

    #[test]
    fn load_directory_skips_malformed_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("good.toml"), VALID_TOML).unwrap();
        std::fs::write(dir.path().join("bad.toml"), "not = [toml }{").unwrap();

        let bundles = load_bundle_directory(dir.path()).unwrap();
        assert_eq!(bundles.len(), 1);
    }
}
