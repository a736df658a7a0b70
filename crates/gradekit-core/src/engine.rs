//! Cohort engine orchestrator.
//!
//! Fans one assessment's submissions out across a bounded pool of blocking
//! workers, then reassembles per-submission results into a cohort report
//! in the original submission order.

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use futures::stream::{FuturesUnordered, StreamExt};
use tokio::sync::Semaphore;
use uuid::Uuid;

use crate::error::SettingsError;
use crate::grader::EssayGrader;
use crate::model::{AssessmentSettings, CorpusEntry, EssayReference, EssaySubmission};
use crate::plagiarism::PlagiarismDetector;
use crate::report::{
    CohortGradingReport, CohortScreeningReport, FlaggedCounts, InsightSummary, SubmissionGrading,
    SubmissionScreening,
};

/// Configuration for the cohort engine.
#[derive(Debug, Clone)]
pub struct CohortEngineConfig {
    /// Maximum submissions processed concurrently.
    pub parallelism: usize,
    /// Per-assessment settings driving both engines.
    pub settings: AssessmentSettings,
}

impl Default for CohortEngineConfig {
    fn default() -> Self {
        Self {
            parallelism: 4,
            settings: AssessmentSettings::default(),
        }
    }
}

/// Progress reporting trait.
pub trait ProgressReporter: Send + Sync {
    fn on_item_start(&self, submission_id: &str, author: &str);
    fn on_item_complete(&self, submission_id: &str);
    fn on_item_error(&self, submission_id: &str, error: &str);
    fn on_batch_complete(&self, total: usize, completed: usize, failed: usize, elapsed: Duration);
}

/// No-op progress reporter.
pub struct NoopReporter;

impl ProgressReporter for NoopReporter {
    fn on_item_start(&self, _: &str, _: &str) {}
    fn on_item_complete(&self, _: &str) {}
    fn on_item_error(&self, _: &str, _: &str) {}
    fn on_batch_complete(&self, _: usize, _: usize, _: usize, _: Duration) {}
}

/// The cohort engine: batch grading and cohort-wide plagiarism screening.
pub struct CohortEngine {
    grader: EssayGrader,
    detector: PlagiarismDetector,
    config: CohortEngineConfig,
}

impl CohortEngine {
    /// Build an engine from validated configuration.
    pub fn new(config: CohortEngineConfig) -> Result<Self, SettingsError> {
        if config.parallelism == 0 {
            return Err(SettingsError::ZeroParallelism);
        }
        config.settings.validate()?;
        let grader = EssayGrader::new(config.settings.grading_config())?;
        let detector = PlagiarismDetector::new(config.settings.screening_config())?;
        Ok(Self {
            grader,
            detector,
            config,
        })
    }

    /// Grade every submission against one essay reference.
    pub async fn grade_batch(
        &self,
        assessment_id: &str,
        reference: &EssayReference,
        submissions: &[EssaySubmission],
        progress: &dyn ProgressReporter,
    ) -> Result<CohortGradingReport> {
        let start = Instant::now();
        let run_id = Uuid::new_v4();
        let semaphore = Arc::new(Semaphore::new(self.config.parallelism));
        let reference = Arc::new(reference.clone());

        let mut futures = FuturesUnordered::new();

        for (index, submission) in submissions.iter().enumerate() {
            let grader = self.grader.clone();
            let reference = Arc::clone(&reference);
            let semaphore = Arc::clone(&semaphore);
            let submission = submission.clone();

            futures.push(async move {
                let ctx_submission_id = submission.id.clone();
                let inner = async move {
                    let _permit = semaphore
                        .acquire_owned()
                        .await
                        .map_err(|_| anyhow::anyhow!("semaphore closed"))?;

                    progress.on_item_start(&submission.id, &submission.author);

                    let grading = tokio::task::spawn_blocking(move || {
                        let result = grader.grade(&submission.text, &reference);
                        SubmissionGrading {
                            submission_id: submission.id,
                            author: submission.author,
                            result,
                        }
                    })
                    .await?;

                    Ok::<_, anyhow::Error>(grading)
                };
                (index, ctx_submission_id, inner.await)
            });
        }

        let mut indexed = Vec::new();
        let mut completed = 0usize;
        let mut failed = 0usize;
        let total = futures.len();

        while let Some((index, submission_id, outcome)) = futures.next().await {
            match outcome {
                Ok(grading) => {
                    progress.on_item_complete(&grading.submission_id);
                    indexed.push((index, grading));
                    completed += 1;
                }
                Err(e) => {
                    tracing::error!("grading failed for {submission_id}: {e:#}");
                    progress.on_item_error(&submission_id, &e.to_string());
                    failed += 1;
                }
            }
        }

        indexed.sort_by_key(|(index, _)| *index);
        let results: Vec<SubmissionGrading> =
            indexed.into_iter().map(|(_, grading)| grading).collect();

        let elapsed = start.elapsed();
        progress.on_batch_complete(total, completed, failed, elapsed);

        let insights = InsightSummary::from_results(&results, reference.max_mark);

        Ok(CohortGradingReport {
            id: run_id,
            created_at: chrono::Utc::now(),
            assessment_id: assessment_id.to_string(),
            max_mark: reference.max_mark,
            results,
            insights,
            duration_ms: elapsed.as_millis() as u64,
        })
    }

    /// Screen every submission against the rest of its cohort.
    pub async fn screen_cohort(
        &self,
        assessment_id: &str,
        submissions: &[EssaySubmission],
        progress: &dyn ProgressReporter,
    ) -> Result<CohortScreeningReport> {
        let start = Instant::now();
        let run_id = Uuid::new_v4();
        let semaphore = Arc::new(Semaphore::new(self.config.parallelism));
        let entries: Arc<Vec<CorpusEntry>> =
            Arc::new(submissions.iter().map(CorpusEntry::from).collect());

        let mut futures = FuturesUnordered::new();

        for (index, submission) in submissions.iter().enumerate() {
            let detector = self.detector.clone();
            let entries = Arc::clone(&entries);
            let semaphore = Arc::clone(&semaphore);
            let submission = submission.clone();

            futures.push(async move {
                let ctx_submission_id = submission.id.clone();
                let inner = async move {
                    let _permit = semaphore
                        .acquire_owned()
                        .await
                        .map_err(|_| anyhow::anyhow!("semaphore closed"))?;

                    progress.on_item_start(&submission.id, &submission.author);

                    let screening = tokio::task::spawn_blocking(move || {
                        // Exclusion is positional so a duplicated id cannot
                        // silently drop a genuine comparison source.
                        let corpus: Vec<CorpusEntry> = entries
                            .iter()
                            .enumerate()
                            .filter(|(i, _)| *i != index)
                            .map(|(_, entry)| entry.clone())
                            .collect();
                        let report = detector.detect(&submission.text, &corpus);
                        SubmissionScreening {
                            submission_id: submission.id,
                            author: submission.author,
                            report,
                        }
                    })
                    .await?;

                    Ok::<_, anyhow::Error>(screening)
                };
                (index, ctx_submission_id, inner.await)
            });
        }

        let mut indexed = Vec::new();
        let mut completed = 0usize;
        let mut failed = 0usize;
        let total = futures.len();

        while let Some((index, submission_id, outcome)) = futures.next().await {
            match outcome {
                Ok(screening) => {
                    progress.on_item_complete(&screening.submission_id);
                    indexed.push((index, screening));
                    completed += 1;
                }
                Err(e) => {
                    tracing::error!("screening failed for {submission_id}: {e:#}");
                    progress.on_item_error(&submission_id, &e.to_string());
                    failed += 1;
                }
            }
        }

        indexed.sort_by_key(|(index, _)| *index);
        let results: Vec<SubmissionScreening> =
            indexed.into_iter().map(|(_, screening)| screening).collect();

        let elapsed = start.elapsed();
        progress.on_batch_complete(total, completed, failed, elapsed);

        let alert_threshold = self.config.settings.similarity_threshold;
        let flagged = FlaggedCounts::tally(&results, alert_threshold);

        Ok(CohortScreeningReport {
            id: run_id,
            created_at: chrono::Utc::now(),
            assessment_id: assessment_id.to_string(),
            alert_threshold,
            results,
            flagged,
            duration_ms: elapsed.as_millis() as u64,
        })
    }
}
