//! Core data model types for gradekit.
//!
//! These are the fundamental types that the entire gradekit system uses to
//! represent grading inputs, submissions, and per-assessment settings.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::SettingsError;
use crate::grader::GradingConfig;
use crate::plagiarism::ScreeningConfig;

/// The grading input bundle for one essay question: model answer, expected
/// keywords, and the marking bounds. Read-only to the engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EssayReference {
    /// The model answer the student text is compared against.
    pub model_answer: String,
    /// Keywords the grader expects to see, as raw strings.
    #[serde(default)]
    pub keywords: Vec<String>,
    /// Maximum attainable mark.
    pub max_mark: f64,
    /// Optional word limit; a limit of 0 means no limit.
    #[serde(default)]
    pub word_limit: Option<u32>,
}

/// One student's essay answer as the cohort engine receives it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EssaySubmission {
    /// Unique submission identifier.
    pub id: String,
    /// Display label for the submitting student.
    pub author: String,
    /// The essay question this answer belongs to, when known.
    #[serde(default)]
    pub question_id: Option<String>,
    /// Raw answer text, markup allowed.
    pub text: String,
}

/// One essay answer belonging to another student, supplied by the caller
/// as plagiarism-comparison material. The corpus never contains the
/// candidate's own submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorpusEntry {
    /// Identifier of the source submission.
    pub submission_id: String,
    /// The essay question the source answer belongs to, when known.
    #[serde(default)]
    pub question_id: Option<String>,
    /// Display label for the source author.
    pub author: String,
    /// Raw source text, markup allowed.
    pub text: String,
}

impl From<&EssaySubmission> for CorpusEntry {
    fn from(submission: &EssaySubmission) -> Self {
        Self {
            submission_id: submission.id.clone(),
            question_id: submission.question_id.clone(),
            author: submission.author.clone(),
            text: submission.text.clone(),
        }
    }
}

/// Per-assessment settings, as the assessment-authoring collaborator
/// stores them. Converted into engine configuration via
/// [`AssessmentSettings::grading_config`] and
/// [`AssessmentSettings::screening_config`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssessmentSettings {
    /// Whether the plagiarism sweep runs for this assessment.
    #[serde(default = "default_true")]
    pub enable_plagiarism_check: bool,
    /// Match threshold as a percentage; also the risk-alert floor.
    #[serde(default = "default_similarity_threshold")]
    pub similarity_threshold: f64,
    /// Weight of the model-answer similarity in the essay score, in [0, 1].
    #[serde(default = "default_cosine_similarity_threshold")]
    pub cosine_similarity_threshold: f64,
    /// Drop double-quoted passages before comparing.
    #[serde(default = "default_true")]
    pub ignore_quotes: bool,
    /// Drop everything under a references/bibliography heading.
    #[serde(default = "default_true")]
    pub ignore_references: bool,
}

impl Default for AssessmentSettings {
    fn default() -> Self {
        Self {
            enable_plagiarism_check: true,
            similarity_threshold: default_similarity_threshold(),
            cosine_similarity_threshold: default_cosine_similarity_threshold(),
            ignore_quotes: true,
            ignore_references: true,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_similarity_threshold() -> f64 {
    30.0
}

fn default_cosine_similarity_threshold() -> f64 {
    0.7
}

impl AssessmentSettings {
    /// Check every threshold for range errors.
    pub fn validate(&self) -> Result<(), SettingsError> {
        if !(0.0..=100.0).contains(&self.similarity_threshold) {
            return Err(SettingsError::SimilarityThresholdOutOfRange(
                self.similarity_threshold,
            ));
        }
        if !(0.0..=1.0).contains(&self.cosine_similarity_threshold) {
            return Err(SettingsError::SimilarityWeightOutOfRange(
                self.cosine_similarity_threshold,
            ));
        }
        Ok(())
    }

    /// Grading configuration these settings imply.
    pub fn grading_config(&self) -> GradingConfig {
        GradingConfig {
            similarity_weight: self.cosine_similarity_threshold,
            ..GradingConfig::default()
        }
    }

    /// Screening configuration these settings imply.
    pub fn screening_config(&self) -> ScreeningConfig {
        ScreeningConfig {
            match_threshold: self.similarity_threshold / 100.0,
            strip_quoted: self.ignore_quotes,
            strip_references: self.ignore_references,
        }
    }
}

/// Qualitative label attached to an essay score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Neutral,
    Negative,
}

impl Sentiment {
    /// Label for a final (post-penalty) score against the maximum mark:
    /// positive above 80% of the mark, negative below 40%, else neutral.
    pub fn from_score(score: f64, max_mark: f64) -> Self {
        if score > max_mark * 0.8 {
            Sentiment::Positive
        } else if score < max_mark * 0.4 {
            Sentiment::Negative
        } else {
            Sentiment::Neutral
        }
    }

    /// Label for a cohort-level mean match percentage: positive above 70,
    /// negative below 50, else neutral.
    pub fn from_match_percentage(percentage: f64) -> Self {
        if percentage > 70.0 {
            Sentiment::Positive
        } else if percentage < 50.0 {
            Sentiment::Negative
        } else {
            Sentiment::Neutral
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sentiment::Positive => write!(f, "positive"),
            Sentiment::Neutral => write!(f, "neutral"),
            Sentiment::Negative => write!(f, "negative"),
        }
    }
}

impl FromStr for Sentiment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "positive" => Ok(Sentiment::Positive),
            "neutral" => Ok(Sentiment::Neutral),
            "negative" => Ok(Sentiment::Negative),
            other => Err(format!("unknown sentiment: {other}")),
        }
    }
}

/// Coarse plagiarism-risk classification of a similarity percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    High,
    Medium,
    Low,
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskLevel::High => write!(f, "high"),
            RiskLevel::Medium => write!(f, "medium"),
            RiskLevel::Low => write!(f, "low"),
        }
    }
}

impl FromStr for RiskLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "high" => Ok(RiskLevel::High),
            "medium" => Ok(RiskLevel::Medium),
            "low" => Ok(RiskLevel::Low),
            other => Err(format!("unknown risk level: {other}")),
        }
    }
}

/// One assessment's full grading input: settings, the essay reference,
/// and the cohort of submissions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssessmentBundle {
    /// Unique identifier for this assessment.
    pub id: String,
    /// Human-readable title.
    pub title: String,
    /// Description of this assessment.
    #[serde(default)]
    pub description: String,
    /// Per-assessment settings.
    #[serde(default)]
    pub settings: AssessmentSettings,
    /// Essay reference for grading; absent for screen-only bundles.
    #[serde(default)]
    pub reference: Option<EssayReference>,
    /// The cohort of submissions.
    #[serde(default)]
    pub submissions: Vec<EssaySubmission>,
}
