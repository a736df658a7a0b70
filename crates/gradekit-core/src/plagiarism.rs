//! Plagiarism detection engine.
//!
//! Compares one candidate essay against every other essay answer in the
//! cohort and reports the maximum similarity plus every source above the
//! match threshold. Degenerate input (empty candidate, empty corpus)
//! yields a zero-valued report, never an error.

use crate::error::SettingsError;
use crate::grader::round2;
use crate::model::CorpusEntry;
use crate::report::{MatchedSource, PlagiarismReport};
use crate::text::{normalize, strip_quoted, strip_references};
use crate::vectorize::cosine_similarity_many;

/// Configuration for the plagiarism detector.
#[derive(Debug, Clone)]
pub struct ScreeningConfig {
    /// Cosine similarity above which a source counts as a match, in [0, 1].
    pub match_threshold: f64,
    /// Drop double-quoted passages before comparing.
    pub strip_quoted: bool,
    /// Drop everything under a references/bibliography heading.
    pub strip_references: bool,
}

impl Default for ScreeningConfig {
    fn default() -> Self {
        Self {
            match_threshold: 0.3,
            strip_quoted: true,
            strip_references: true,
        }
    }
}

/// The plagiarism detection engine.
#[derive(Debug, Clone)]
pub struct PlagiarismDetector {
    config: ScreeningConfig,
}

impl Default for PlagiarismDetector {
    fn default() -> Self {
        Self {
            config: ScreeningConfig::default(),
        }
    }
}

impl PlagiarismDetector {
    /// Build a detector, rejecting an out-of-range threshold.
    pub fn new(config: ScreeningConfig) -> Result<Self, SettingsError> {
        if !(0.0..=1.0).contains(&config.match_threshold) {
            return Err(SettingsError::MatchThresholdOutOfRange(
                config.match_threshold,
            ));
        }
        Ok(Self { config })
    }

    /// Screen a candidate text against a corpus of other submissions.
    ///
    /// The corpus must not contain the candidate's own submission; the
    /// caller guarantees that by construction. Corpus entries that
    /// normalize to nothing are discarded. Every source whose similarity
    /// strictly exceeds the match threshold is reported, not only the
    /// best one; the headline `similarity_score` is the maximum found,
    /// with ties resolved to the first maximum in corpus order.
    pub fn detect(&self, candidate_text: &str, corpus: &[CorpusEntry]) -> PlagiarismReport {
        let candidate = self.prepare(candidate_text);
        if candidate.is_empty() {
            return PlagiarismReport::default();
        }

        let mut documents = Vec::with_capacity(corpus.len());
        let mut sources = Vec::with_capacity(corpus.len());
        for entry in corpus {
            let prepared = self.prepare(&entry.text);
            if prepared.is_empty() {
                tracing::debug!(
                    "discarding empty corpus entry from submission {}",
                    entry.submission_id
                );
                continue;
            }
            documents.push(prepared);
            sources.push(entry);
        }
        if documents.is_empty() {
            return PlagiarismReport::default();
        }

        let similarities = cosine_similarity_many(&candidate, &documents);

        let mut highest = 0.0f64;
        let mut matched_sources = Vec::new();
        for (entry, &similarity) in sources.iter().zip(&similarities) {
            if similarity > highest {
                highest = similarity;
            }
            if similarity > self.config.match_threshold {
                matched_sources.push(MatchedSource {
                    submission_id: entry.submission_id.clone(),
                    question_id: entry.question_id.clone(),
                    author: entry.author.clone(),
                    percentage: round2(similarity * 100.0),
                });
            }
        }

        PlagiarismReport {
            similarity_score: round2(highest * 100.0),
            cosine_similarity: round2(highest),
            matched_sources,
        }
    }

    fn prepare(&self, text: &str) -> String {
        let mut working = text.to_string();
        if self.config.strip_references {
            working = strip_references(&working);
        }
        if self.config.strip_quoted {
            working = strip_quoted(&working);
        }
        normalize(&working)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: &str, author: &str, text: &str) -> CorpusEntry {
        CorpusEntry {
            submission_id: id.into(),
            question_id: Some("q-1".into()),
            author: author.into(),
            text: text.into(),
        }
    }

    #[test]
    fn empty_corpus_yields_zero_report() {
        let report = PlagiarismDetector::default().detect("some essay text", &[]);
        assert_eq!(report.similarity_score, 0.0);
        assert_eq!(report.cosine_similarity, 0.0);
        assert!(report.matched_sources.is_empty());
    }

    #[test]
    fn empty_candidate_yields_zero_report() {
        let corpus = [entry("s-1", "Jane Smith", "normalization reduces redundancy")];
        let report = PlagiarismDetector::default().detect("", &corpus);
        assert_eq!(report.similarity_score, 0.0);
        assert!(report.matched_sources.is_empty());
    }

    #[test]
    fn corpus_of_empty_texts_yields_zero_report() {
        let corpus = [entry("s-1", "Jane Smith", "<p></p>"), entry("s-2", "Bob White", "  ")];
        let report = PlagiarismDetector::default().detect("real essay text here", &corpus);
        assert_eq!(report.similarity_score, 0.0);
        assert!(report.matched_sources.is_empty());
    }

    #[test]
    fn identical_entry_scores_one_hundred() {
        let text = "<p>Normalization is a database design technique that reduces redundancy.</p>";
        let corpus = [
            entry("s-1", "Jane Smith", text),
            entry("s-2", "Bob White", "The quick brown fox jumps over the lazy dog."),
        ];
        let report = PlagiarismDetector::default().detect(text, &corpus);

        assert_eq!(report.similarity_score, 100.0);
        assert_eq!(report.cosine_similarity, 1.0);
        assert_eq!(report.matched_sources.len(), 1);
        assert_eq!(report.matched_sources[0].submission_id, "s-1");
        assert_eq!(report.matched_sources[0].author, "Jane Smith");
        assert_eq!(report.matched_sources[0].percentage, 100.0);
    }

    #[test]
    fn unrelated_corpus_produces_no_matches() {
        let corpus = [
            entry("s-1", "Jane Smith", "photosynthesis converts sunlight into energy"),
            entry("s-2", "Bob White", "the french revolution began in seventeen eighty nine"),
        ];
        let report = PlagiarismDetector::default()
            .detect("database normalization reduces data redundancy", &corpus);
        assert_eq!(report.similarity_score, 0.0);
        assert!(report.matched_sources.is_empty());
    }

    #[test]
    fn every_source_above_threshold_is_reported() {
        let candidate = "normalization reduces data redundancy and improves data integrity";
        let corpus = [
            entry("s-1", "Jane Smith", "normalization reduces data redundancy and improves data integrity"),
            entry("s-2", "Bob White", "normalization reduces data redundancy in database tables"),
            entry("s-3", "Alice Brown", "volcanic eruptions reshape the surrounding landscape"),
        ];
        let report = PlagiarismDetector::default().detect(candidate, &corpus);

        assert_eq!(report.matched_sources.len(), 2);
        assert_eq!(report.matched_sources[0].submission_id, "s-1");
        assert_eq!(report.matched_sources[1].submission_id, "s-2");
        assert!(report.matched_sources[0].percentage > report.matched_sources[1].percentage);
        assert_eq!(report.similarity_score, 100.0);
    }

    #[test]
    fn threshold_is_strict() {
        // A candidate sharing nothing scores 0, which never exceeds even a
        // zero threshold adjusted upward; use a high threshold to verify
        // near matches are excluded.
        let detector = PlagiarismDetector::new(ScreeningConfig {
            match_threshold: 0.99,
            ..ScreeningConfig::default()
        })
        .unwrap();
        let corpus = [entry("s-1", "Jane Smith", "normalization reduces redundancy somewhat")];
        let report = detector.detect("normalization reduces redundancy entirely", &corpus);
        assert!(report.similarity_score > 0.0);
        assert!(report.matched_sources.is_empty());
    }

    #[test]
    fn quoted_passages_are_ignored_when_configured() {
        let candidate = r#"My own words. "Normalization is a database design technique that reduces redundancy and improves integrity everywhere.""#;
        let corpus = [entry(
            "s-1",
            "Jane Smith",
            "Normalization is a database design technique that reduces redundancy and improves integrity everywhere.",
        )];

        let stripping = PlagiarismDetector::default().detect(candidate, &corpus);
        let keeping = PlagiarismDetector::new(ScreeningConfig {
            strip_quoted: false,
            ..ScreeningConfig::default()
        })
        .unwrap()
        .detect(candidate, &corpus);

        assert!(stripping.similarity_score < keeping.similarity_score);
        assert_eq!(keeping.matched_sources.len(), 1);
    }

    #[test]
    fn reference_sections_are_ignored_when_configured() {
        let candidate = "Original analysis of schema design.\nReferences:\nCodd, E. F. A relational model of data for large shared data banks.";
        let corpus = [entry(
            "s-1",
            "Jane Smith",
            "Unrelated discussion.\nReferences:\nCodd, E. F. A relational model of data for large shared data banks.",
        )];

        let stripping = PlagiarismDetector::default().detect(candidate, &corpus);
        let keeping = PlagiarismDetector::new(ScreeningConfig {
            strip_references: false,
            ..ScreeningConfig::default()
        })
        .unwrap()
        .detect(candidate, &corpus);

        assert!(stripping.similarity_score < keeping.similarity_score);
    }

    #[test]
    fn invalid_threshold_is_rejected() {
        assert!(PlagiarismDetector::new(ScreeningConfig {
            match_threshold: 1.5,
            ..ScreeningConfig::default()
        })
        .is_err());
        assert!(PlagiarismDetector::new(ScreeningConfig {
            match_threshold: -0.1,
            ..ScreeningConfig::default()
        })
        .is_err());
    }

    #[test]
    fn result_is_deterministic() {
        let candidate = "normalization reduces data redundancy";
        let corpus = [
            entry("s-1", "Jane Smith", "normalization reduces data redundancy"),
            entry("s-2", "Bob White", "normalization improves data integrity"),
        ];
        let detector = PlagiarismDetector::default();
        let first = detector.detect(candidate, &corpus);
        let second = detector.detect(candidate, &corpus);
        assert_eq!(first.similarity_score, second.similarity_score);
        assert_eq!(first.matched_sources.len(), second.matched_sources.len());
    }
}
