//! Markdown summaries for cohort reports.
//!
//! Compact enough to paste into an LMS announcement or a pull-request
//! style review thread.

use gradekit_core::report::{CohortGradingReport, CohortScreeningReport};

/// Format a grading report as markdown.
pub fn grading_markdown(report: &CohortGradingReport) -> String {
    let mut md = String::new();

    md.push_str(&format!(
        "**Summary:** {} essays graded out of {:.1}, cohort total {:.1}%, sentiment {}\n\n",
        report.insights.essay_count,
        report.max_mark,
        report.insights.total_score_percentage,
        report.insights.sentiment
    ));

    md.push_str("| Submission | Author | Score | Match % | Readability | Sentiment |\n");
    md.push_str("|------------|--------|-------|---------|-------------|-----------|\n");
    for grading in &report.results {
        md.push_str(&format!(
            "| {} | {} | {:.2} | {:.2}% | {:.1} | {} |\n",
            grading.submission_id,
            grading.author,
            grading.result.score,
            grading.result.overall_match_percentage,
            grading.result.readability_score,
            grading.result.sentiment
        ));
    }
    md.push('\n');

    if !report.insights.missing_keywords.is_empty() {
        md.push_str("### Missing keywords\n\n");
        for keyword in &report.insights.missing_keywords {
            md.push_str(&format!("- {keyword}\n"));
        }
    }

    md
}

/// Format a screening report as markdown.
pub fn screening_markdown(report: &CohortScreeningReport) -> String {
    let mut md = String::new();

    md.push_str(&format!(
        "**Summary:** {} submissions screened, {} flagged ({} high, {} medium, {} low)\n\n",
        report.results.len(),
        report.flagged.total(),
        report.flagged.high,
        report.flagged.medium,
        report.flagged.low
    ));

    md.push_str("| Submission | Author | Similarity | Risk | Matched sources |\n");
    md.push_str("|------------|--------|------------|------|-----------------|\n");
    for screening in &report.results {
        let risk = match screening.risk_level(report.alert_threshold) {
            Some(level) => level.to_string(),
            None => "-".to_string(),
        };
        let sources = if screening.report.matched_sources.is_empty() {
            "-".to_string()
        } else {
            screening
                .report
                .matched_sources
                .iter()
                .map(|s| format!("{} ({:.1}%)", s.submission_id, s.percentage))
                .collect::<Vec<_>>()
                .join(", ")
        };
        md.push_str(&format!(
            "| {} | {} | {:.2}% | {} | {} |\n",
            screening.submission_id,
            screening.author,
            screening.report.similarity_score,
            risk,
            sources
        ));
    }

    md
}

#[cfg(test)]
mod tests {
    use super::*;
    use gradekit_core::model::Sentiment;
    use gradekit_core::report::{
        CohortScreeningReport, FlaggedCounts, GradingResult, InsightSummary, MatchedSource,
        PlagiarismReport, SubmissionGrading, SubmissionScreening,
    };
    use uuid::Uuid;

    fn make_grading_report() -> CohortGradingReport {
        let results = vec![
            SubmissionGrading {
                submission_id: "s-1".into(),
                author: "John Doe".into(),
                result: GradingResult {
                    score: 8.5,
                    cosine_similarity: 0.85,
                    matched_keywords: vec!["normalization".into()],
                    missing_keywords: vec!["anomaly".into()],
                    sentiment: Sentiment::Positive,
                    readability_score: 62.3,
                    overall_match_percentage: 85.0,
                },
            },
            SubmissionGrading {
                submission_id: "s-2".into(),
                author: "Jane Smith".into(),
                result: GradingResult {
                    score: 3.2,
                    cosine_similarity: 0.32,
                    matched_keywords: vec![],
                    missing_keywords: vec!["normalization".into(), "anomaly".into()],
                    sentiment: Sentiment::Negative,
                    readability_score: 48.0,
                    overall_match_percentage: 32.0,
                },
            },
        ];
        CohortGradingReport {
            id: Uuid::nil(),
            created_at: chrono::Utc::now(),
            assessment_id: "db-essay".into(),
            max_mark: 10.0,
            insights: InsightSummary::from_results(&results, 10.0),
            results,
            duration_ms: 42,
        }
    }

    fn make_screening_report() -> CohortScreeningReport {
        let results = vec![
            SubmissionScreening {
                submission_id: "s-1".into(),
                author: "John Doe".into(),
                report: PlagiarismReport {
                    similarity_score: 86.4,
                    cosine_similarity: 0.86,
                    matched_sources: vec![MatchedSource {
                        submission_id: "s-2".into(),
                        question_id: Some("q-1".into()),
                        author: "Jane Smith".into(),
                        percentage: 86.4,
                    }],
                },
            },
            SubmissionScreening {
                submission_id: "s-2".into(),
                author: "Jane Smith".into(),
                report: PlagiarismReport::default(),
            },
        ];
        CohortScreeningReport {
            id: Uuid::nil(),
            created_at: chrono::Utc::now(),
            assessment_id: "db-essay".into(),
            alert_threshold: 30.0,
            flagged: FlaggedCounts::tally(&results, 30.0),
            results,
            duration_ms: 17,
        }
    }

    #[test]
    fn grading_markdown_lists_every_submission() {
        let md = grading_markdown(&make_grading_report());
        assert!(md.contains("**Summary:** 2 essays graded"));
        assert!(md.contains("| s-1 | John Doe | 8.50 |"));
        assert!(md.contains("| s-2 | Jane Smith | 3.20 |"));
        assert!(md.contains("### Missing keywords"));
        assert!(md.contains("- anomaly"));
    }

    #[test]
    fn screening_markdown_shows_risk_and_sources() {
        let md = screening_markdown(&make_screening_report());
        assert!(md.contains("**Summary:** 2 submissions screened, 1 flagged"));
        assert!(md.contains("| s-1 | John Doe | 86.40% | high | s-2 (86.4%) |"));
        // Unflagged rows carry a dash in the risk and source columns.
        assert!(md.contains("| s-2 | Jane Smith | 0.00% | - | - |"));
    }
}
