//! Result and report types with JSON persistence.
//!
//! The per-essay results ([`GradingResult`], [`PlagiarismReport`]) are what
//! the two engines return; the cohort reports wrap one result per
//! submission together with run identity and aggregate insights. Saving
//! and loading reports is a caller-side convenience — the engines
//! themselves never touch a durable store.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::grader::round2;
use crate::model::{RiskLevel, Sentiment};

/// The graded outcome of one essay answer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradingResult {
    /// Final score in [0, max_mark], rounded to two decimals.
    pub score: f64,
    /// Cosine similarity to the model answer, in [0, 1].
    pub cosine_similarity: f64,
    /// Keywords found in the answer, in normalized form.
    pub matched_keywords: Vec<String>,
    /// Keywords absent from the answer, in normalized form.
    pub missing_keywords: Vec<String>,
    /// Qualitative label for the final score.
    pub sentiment: Sentiment,
    /// Flesch reading ease of the raw answer, in [0, 100].
    pub readability_score: f64,
    /// Cosine similarity scaled to a percentage.
    pub overall_match_percentage: f64,
}

/// The screening outcome for one candidate against its cohort.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlagiarismReport {
    /// Maximum pairwise similarity as a percentage, in [0, 100].
    pub similarity_score: f64,
    /// Maximum pairwise cosine similarity, in [0, 1].
    pub cosine_similarity: f64,
    /// Every corpus source whose similarity exceeded the match threshold.
    pub matched_sources: Vec<MatchedSource>,
}

impl PlagiarismReport {
    /// Classify this report against risk breakpoints: high above 70%,
    /// medium from 40%, low below that but only at or above the
    /// assessment's alert threshold. Below the floor there is no alert.
    pub fn risk_level(&self, alert_threshold_pct: f64) -> Option<RiskLevel> {
        if self.similarity_score > 70.0 {
            Some(RiskLevel::High)
        } else if self.similarity_score >= 40.0 {
            Some(RiskLevel::Medium)
        } else if self.similarity_score >= alert_threshold_pct {
            Some(RiskLevel::Low)
        } else {
            None
        }
    }
}

/// One corpus source flagged by the plagiarism sweep.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchedSource {
    /// Identifier of the source submission.
    pub submission_id: String,
    /// The essay question the source answer belongs to, when known.
    #[serde(default)]
    pub question_id: Option<String>,
    /// Display label for the source author.
    pub author: String,
    /// Pairwise similarity as a percentage, rounded to two decimals.
    pub percentage: f64,
}

impl MatchedSource {
    /// Human-readable source label.
    pub fn label(&self) -> String {
        match &self.question_id {
            Some(question_id) => {
                format!("Submission by {} (Question ID: {})", self.author, question_id)
            }
            None => format!("Submission by {}", self.author),
        }
    }
}

/// A batch grading run over one assessment's cohort.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CohortGradingReport {
    /// Unique report identifier.
    pub id: Uuid,
    /// When the report was created.
    pub created_at: DateTime<Utc>,
    /// Assessment identifier this run graded.
    pub assessment_id: String,
    /// Maximum attainable mark per essay.
    pub max_mark: f64,
    /// One graded outcome per submission, in submission order.
    pub results: Vec<SubmissionGrading>,
    /// Aggregate insights over the cohort.
    pub insights: InsightSummary,
    /// Total wall-clock duration in milliseconds.
    pub duration_ms: u64,
}

/// One submission's graded outcome within a cohort run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmissionGrading {
    pub submission_id: String,
    pub author: String,
    pub result: GradingResult,
}

/// Aggregate insights across a cohort of graded essays.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsightSummary {
    /// Number of essays that were graded.
    pub essay_count: usize,
    /// Mean overall match percentage.
    pub mean_match_percentage: f64,
    /// Mean readability score.
    pub mean_readability: f64,
    /// Keywords matched by at least one submission.
    pub matched_keywords: Vec<String>,
    /// Keywords missed by at least one submission.
    pub missing_keywords: Vec<String>,
    /// Cohort score total as a percentage of the attainable total.
    pub total_score_percentage: f64,
    /// Cohort-level sentiment from the mean match percentage.
    pub sentiment: Sentiment,
}

impl InsightSummary {
    /// Aggregate per-submission results into cohort insights.
    pub fn from_results(results: &[SubmissionGrading], max_mark: f64) -> Self {
        if results.is_empty() {
            return Self {
                essay_count: 0,
                mean_match_percentage: 0.0,
                mean_readability: 0.0,
                matched_keywords: Vec::new(),
                missing_keywords: Vec::new(),
                total_score_percentage: 0.0,
                sentiment: Sentiment::Neutral,
            };
        }

        let count = results.len() as f64;
        let mean_match = results
            .iter()
            .map(|r| r.result.overall_match_percentage)
            .sum::<f64>()
            / count;
        let mean_readability = results
            .iter()
            .map(|r| r.result.readability_score)
            .sum::<f64>()
            / count;

        let mut matched_keywords = Vec::new();
        let mut missing_keywords = Vec::new();
        for grading in results {
            for keyword in &grading.result.matched_keywords {
                if !matched_keywords.contains(keyword) {
                    matched_keywords.push(keyword.clone());
                }
            }
            for keyword in &grading.result.missing_keywords {
                if !missing_keywords.contains(keyword) {
                    missing_keywords.push(keyword.clone());
                }
            }
        }

        let attainable = max_mark * count;
        let total_score_percentage = if attainable > 0.0 {
            results.iter().map(|r| r.result.score).sum::<f64>() / attainable * 100.0
        } else {
            0.0
        };

        Self {
            essay_count: results.len(),
            mean_match_percentage: round2(mean_match),
            mean_readability: round2(mean_readability),
            matched_keywords,
            missing_keywords,
            total_score_percentage: round2(total_score_percentage),
            sentiment: Sentiment::from_match_percentage(mean_match),
        }
    }
}

/// A batch screening run over one assessment's cohort.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CohortScreeningReport {
    /// Unique report identifier.
    pub id: Uuid,
    /// When the report was created.
    pub created_at: DateTime<Utc>,
    /// Assessment identifier this run screened.
    pub assessment_id: String,
    /// Risk-alert floor as a percentage.
    pub alert_threshold: f64,
    /// One screening outcome per submission, in submission order.
    pub results: Vec<SubmissionScreening>,
    /// Number of submissions per risk tier.
    pub flagged: FlaggedCounts,
    /// Total wall-clock duration in milliseconds.
    pub duration_ms: u64,
}

/// One submission's screening outcome within a cohort run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmissionScreening {
    pub submission_id: String,
    pub author: String,
    pub report: PlagiarismReport,
}

impl SubmissionScreening {
    /// Risk tier of this submission against the report's alert floor.
    pub fn risk_level(&self, alert_threshold_pct: f64) -> Option<RiskLevel> {
        self.report.risk_level(alert_threshold_pct)
    }
}

/// Submission counts per risk tier for one screening run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FlaggedCounts {
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

impl FlaggedCounts {
    /// Tally risk tiers over a set of screening results.
    pub fn tally(results: &[SubmissionScreening], alert_threshold_pct: f64) -> Self {
        let mut counts = FlaggedCounts::default();
        for screening in results {
            match screening.risk_level(alert_threshold_pct) {
                Some(RiskLevel::High) => counts.high += 1,
                Some(RiskLevel::Medium) => counts.medium += 1,
                Some(RiskLevel::Low) => counts.low += 1,
                None => {}
            }
        }
        counts
    }

    /// Total number of flagged submissions.
    pub fn total(&self) -> usize {
        self.high + self.medium + self.low
    }
}

impl CohortGradingReport {
    /// Save the report as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        write_json(path, self)
    }

    /// Load a report from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        read_json(path)
    }
}

impl CohortScreeningReport {
    /// Save the report as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        write_json(path, self)
    }

    /// Load a report from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        read_json(path)
    }

    /// Returns true if any submission reached the high-risk tier.
    pub fn has_high_risk(&self) -> bool {
        self.flagged.high > 0
    }
}

fn write_json(path: &Path, report: &impl Serialize) -> Result<()> {
    let json = serde_json::to_string_pretty(report).context("failed to serialize report")?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, json)
        .with_context(|| format!("failed to write report to {}", path.display()))?;
    Ok(())
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read report from {}", path.display()))?;
    let report = serde_json::from_str(&content).context("failed to parse report JSON")?;
    Ok(report)
}
