//! HTML report generator.
//!
//! Produces a self-contained HTML file with all CSS/JS inlined.

use anyhow::Result;
use std::path::Path;

use gradekit_core::model::{RiskLevel, Sentiment};
use gradekit_core::report::{CohortGradingReport, CohortScreeningReport};

/// Escape a string for safe HTML insertion.
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

/// Generate an HTML page from a grading report.
pub fn generate_grading_html(report: &CohortGradingReport) -> String {
    let mut html = String::new();

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    html.push_str(&format!(
        "<title>gradekit grading report — {}</title>\n",
        html_escape(&report.assessment_id)
    ));
    html.push_str("<style>\n");
    html.push_str(CSS);
    html.push_str("</style>\n");
    html.push_str("</head>\n<body>\n");

    // Header
    html.push_str("<header>\n");
    html.push_str("<h1>gradekit grading report</h1>\n");
    html.push_str(&format!(
        "<p class=\"meta\">Assessment: <strong>{}</strong> | {} essays | max mark {:.1} | {}</p>\n",
        html_escape(&report.assessment_id),
        report.results.len(),
        report.max_mark,
        report.created_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    html.push_str("</header>\n");

    // Insights dashboard
    html.push_str("<section class=\"dashboard\">\n");
    html.push_str("<h2>Insights</h2>\n");
    html.push_str("<table class=\"summary\">\n");
    html.push_str("<thead><tr><th>Essays</th><th>Cohort total</th><th>Mean match</th><th>Mean readability</th><th>Sentiment</th></tr></thead>\n");
    html.push_str("<tbody>\n");
    html.push_str(&format!(
        "<tr><td>{}</td><td>{:.1}%</td><td>{:.1}%</td><td>{:.1}</td><td>{}</td></tr>\n",
        report.insights.essay_count,
        report.insights.total_score_percentage,
        report.insights.mean_match_percentage,
        report.insights.mean_readability,
        report.insights.sentiment,
    ));
    html.push_str("</tbody></table>\n");

    if !report.insights.missing_keywords.is_empty() {
        html.push_str("<p>Missing keywords across the cohort: ");
        let keywords: Vec<String> = report
            .insights
            .missing_keywords
            .iter()
            .map(|k| format!("<code>{}</code>", html_escape(k)))
            .collect();
        html.push_str(&keywords.join(", "));
        html.push_str("</p>\n");
    }

    // SVG bar chart of score fractions
    if !report.results.is_empty() && report.max_mark > 0.0 {
        let rows: Vec<(String, f64)> = report
            .results
            .iter()
            .map(|r| (r.author.clone(), r.result.score / report.max_mark))
            .collect();
        html.push_str(&generate_bar_chart(&rows, true));
    }

    html.push_str("</section>\n");

    // Per-submission results
    html.push_str("<section class=\"results\">\n");
    html.push_str("<h2>Results</h2>\n");
    html.push_str("<table class=\"results-table\" id=\"results\">\n");
    html.push_str("<thead><tr><th onclick=\"sortTable(0)\">Submission</th><th onclick=\"sortTable(1)\">Author</th><th onclick=\"sortTable(2)\">Score</th><th onclick=\"sortTable(3)\">Match %</th><th onclick=\"sortTable(4)\">Readability</th><th onclick=\"sortTable(5)\">Missing keywords</th></tr></thead>\n");
    html.push_str("<tbody>\n");

    for grading in &report.results {
        let row_class = match grading.result.sentiment {
            Sentiment::Positive => "pass",
            Sentiment::Negative => "fail",
            Sentiment::Neutral => "",
        };
        let missing = if grading.result.missing_keywords.is_empty() {
            "-".to_string()
        } else {
            html_escape(&grading.result.missing_keywords.join(", "))
        };

        html.push_str(&format!(
            "<tr class=\"{}\"><td>{}</td><td>{}</td><td>{:.2}</td><td>{:.2}%</td><td>{:.1}</td><td>{}</td></tr>\n",
            row_class,
            html_escape(&grading.submission_id),
            html_escape(&grading.author),
            grading.result.score,
            grading.result.overall_match_percentage,
            grading.result.readability_score,
            missing
        ));
    }

    html.push_str("</tbody></table>\n");
    html.push_str("</section>\n");

    push_raw_json(&mut html, report);

    // JavaScript for sorting
    html.push_str("<script>\n");
    html.push_str(JS);
    html.push_str("</script>\n");

    html.push_str("</body>\n</html>");
    html
}

/// Generate an HTML page from a screening report.
pub fn generate_screening_html(report: &CohortScreeningReport) -> String {
    let mut html = String::new();

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    html.push_str(&format!(
        "<title>gradekit screening report — {}</title>\n",
        html_escape(&report.assessment_id)
    ));
    html.push_str("<style>\n");
    html.push_str(CSS);
    html.push_str("</style>\n");
    html.push_str("</head>\n<body>\n");

    // Header
    html.push_str("<header>\n");
    html.push_str("<h1>gradekit screening report</h1>\n");
    html.push_str(&format!(
        "<p class=\"meta\">Assessment: <strong>{}</strong> | {} submissions | alert threshold {:.1}% | {}</p>\n",
        html_escape(&report.assessment_id),
        report.results.len(),
        report.alert_threshold,
        report.created_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    html.push_str("</header>\n");

    // Flag summary
    html.push_str("<section class=\"dashboard\">\n");
    html.push_str("<h2>Summary</h2>\n");
    html.push_str("<table class=\"summary\">\n");
    html.push_str(
        "<thead><tr><th>Screened</th><th>Flagged</th><th>High</th><th>Medium</th><th>Low</th></tr></thead>\n",
    );
    html.push_str("<tbody>\n");
    html.push_str(&format!(
        "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
        report.results.len(),
        report.flagged.total(),
        report.flagged.high,
        report.flagged.medium,
        report.flagged.low,
    ));
    html.push_str("</tbody></table>\n");

    // SVG bar chart of similarity percentages
    if !report.results.is_empty() {
        let rows: Vec<(String, f64)> = report
            .results
            .iter()
            .map(|r| (r.author.clone(), r.report.similarity_score / 100.0))
            .collect();
        html.push_str(&generate_bar_chart(&rows, false));
    }

    html.push_str("</section>\n");

    // Per-submission results
    html.push_str("<section class=\"results\">\n");
    html.push_str("<h2>Results</h2>\n");
    html.push_str("<table class=\"results-table\" id=\"results\">\n");
    html.push_str("<thead><tr><th onclick=\"sortTable(0)\">Submission</th><th onclick=\"sortTable(1)\">Author</th><th onclick=\"sortTable(2)\">Similarity</th><th onclick=\"sortTable(3)\">Risk</th><th onclick=\"sortTable(4)\">Matched sources</th></tr></thead>\n");
    html.push_str("<tbody>\n");

    for screening in &report.results {
        let risk = screening.risk_level(report.alert_threshold);
        let row_class = match risk {
            Some(RiskLevel::High) => "fail",
            Some(RiskLevel::Medium) => "warn",
            Some(RiskLevel::Low) | None => "",
        };
        let risk_text = match risk {
            Some(level) => level.to_string(),
            None => "-".to_string(),
        };
        let sources = if screening.report.matched_sources.is_empty() {
            "-".to_string()
        } else {
            let labels: Vec<String> = screening
                .report
                .matched_sources
                .iter()
                .map(|s| format!("{} ({:.1}%)", html_escape(&s.label()), s.percentage))
                .collect();
            labels.join("<br>")
        };

        html.push_str(&format!(
            "<tr class=\"{}\"><td>{}</td><td>{}</td><td>{:.2}%</td><td>{}</td><td>{}</td></tr>\n",
            row_class,
            html_escape(&screening.submission_id),
            html_escape(&screening.author),
            screening.report.similarity_score,
            risk_text,
            sources
        ));
    }

    html.push_str("</tbody></table>\n");
    html.push_str("</section>\n");

    push_raw_json(&mut html, report);

    // JavaScript for sorting
    html.push_str("<script>\n");
    html.push_str(JS);
    html.push_str("</script>\n");

    html.push_str("</body>\n</html>");
    html
}

/// Write a grading report HTML page to a file.
pub fn write_grading_html(report: &CohortGradingReport, path: &Path) -> Result<()> {
    let html = generate_grading_html(report);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, html)?;
    Ok(())
}

/// Write a screening report HTML page to a file.
pub fn write_screening_html(report: &CohortScreeningReport, path: &Path) -> Result<()> {
    let html = generate_screening_html(report);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, html)?;
    Ok(())
}

fn push_raw_json(html: &mut String, report: &impl serde::Serialize) {
    html.push_str("<section class=\"raw-data\">\n");
    html.push_str("<details>\n<summary>Raw JSON Data</summary>\n");
    html.push_str("<pre><code>");
    html.push_str(
        &serde_json::to_string_pretty(report)
            .unwrap_or_default()
            .replace('<', "&lt;")
            .replace('>', "&gt;"),
    );
    html.push_str("</code></pre>\n");
    html.push_str("</details>\n</section>\n");
}

/// Horizontal bar chart of (label, fraction) rows. When `high_is_good`
/// the colour scale rewards high fractions; screening inverts it.
fn generate_bar_chart(rows: &[(String, f64)], high_is_good: bool) -> String {
    let bar_height = 30;
    let max_width = 400;
    let padding = 10;
    let label_width = 200;

    let total_height = rows.len() * (bar_height + padding) + padding;

    let mut svg = format!(
        "<svg width=\"{}\" height=\"{}\" xmlns=\"http://www.w3.org/2000/svg\">\n",
        label_width + max_width + 60,
        total_height
    );

    for (i, (label, fraction)) in rows.iter().enumerate() {
        let y = i * (bar_height + padding) + padding;
        let fraction = fraction.clamp(0.0, 1.0);
        let width = (fraction * max_width as f64) as usize;

        let color = if high_is_good {
            if fraction >= 0.8 {
                "#22c55e"
            } else if fraction >= 0.5 {
                "#eab308"
            } else {
                "#ef4444"
            }
        } else if fraction > 0.7 {
            "#ef4444"
        } else if fraction >= 0.4 {
            "#eab308"
        } else {
            "#22c55e"
        };

        svg.push_str(&format!(
            "  <text x=\"{}\" y=\"{}\" font-size=\"14\" fill=\"currentColor\" text-anchor=\"end\" dominant-baseline=\"middle\">{}</text>\n",
            label_width - 10,
            y + bar_height / 2,
            html_escape(label)
        ));
        svg.push_str(&format!(
            "  <rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" fill=\"{}\" rx=\"4\"/>\n",
            label_width, y, width, bar_height, color
        ));
        svg.push_str(&format!(
            "  <text x=\"{}\" y=\"{}\" font-size=\"12\" fill=\"currentColor\" dominant-baseline=\"middle\">{:.1}%</text>\n",
            label_width + width + 8,
            y + bar_height / 2,
            fraction * 100.0
        ));
    }

    svg.push_str("</svg>\n");
    svg
}

const CSS: &str = r#"
:root { --bg: #fff; --fg: #1a1a1a; --border: #e5e7eb; --pass: #dcfce7; --warn: #fef9c3; --fail: #fde2e2; }
@media (prefers-color-scheme: dark) {
  :root { --bg: #111827; --fg: #f9fafb; --border: #374151; --pass: #064e3b; --warn: #713f12; --fail: #7f1d1d; }
}
body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', sans-serif; margin: 0; padding: 2rem; background: var(--bg); color: var(--fg); }
h1, h2 { margin-top: 2rem; }
.meta { color: #6b7280; }
table { border-collapse: collapse; width: 100%; margin: 1rem 0; }
th, td { border: 1px solid var(--border); padding: 0.5rem 1rem; text-align: left; }
th { background: var(--border); cursor: pointer; }
.pass { background: var(--pass); }
.warn { background: var(--warn); }
.fail { background: var(--fail); }
pre { overflow-x: auto; padding: 1rem; background: var(--border); border-radius: 8px; }
code { font-family: 'JetBrains Mono', 'Fira Code', monospace; font-size: 0.85rem; }
details { margin: 1rem 0; }
summary { cursor: pointer; font-weight: bold; }
svg { margin: 1rem 0; }
"#;

const JS: &str = r#"
function sortTable(col) {
  const table = document.getElementById('results');
  const tbody = table.querySelector('tbody');
  const rows = Array.from(tbody.querySelectorAll('tr'));
  const asc = table.dataset.sortCol == col && table.dataset.sortDir == 'asc' ? false : true;
  rows.sort((a, b) => {
    const va = a.cells[col].textContent;
    const vb = b.cells[col].textContent;
    return asc ? va.localeCompare(vb) : vb.localeCompare(va);
  });
  table.dataset.sortCol = col;
  table.dataset.sortDir = asc ? 'asc' : 'desc';
  rows.forEach(r => tbody.appendChild(r));
}
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use gradekit_core::report::{
        FlaggedCounts, GradingResult, InsightSummary, MatchedSource, PlagiarismReport,
        SubmissionGrading, SubmissionScreening,
    };
    use uuid::Uuid;

    fn make_grading_report() -> CohortGradingReport {
        let results = vec![SubmissionGrading {
            submission_id: "s-1".into(),
            author: "Jane <Smith>".into(),
            result: GradingResult {
                score: 8.5,
                cosine_similarity: 0.85,
                matched_keywords: vec!["normalization".into()],
                missing_keywords: vec!["anomaly".into()],
                sentiment: Sentiment::Positive,
                readability_score: 62.3,
                overall_match_percentage: 85.0,
            },
        }];
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
        let results = vec![SubmissionScreening {
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
        }];
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
    fn grading_html_contains_required_elements() {
        let html = generate_grading_html(&make_grading_report());

        assert!(html.contains("<html"));
        assert!(html.contains("</html>"));
        assert!(html.contains("db-essay"));
        assert!(html.contains("s-1"));
        assert!(html.contains("anomaly"));
        // Author markup must be escaped, not interpreted.
        assert!(html.contains("Jane &lt;Smith&gt;"));
        assert!(!html.contains("Jane <Smith>"));
    }

    #[test]
    fn screening_html_flags_high_risk_rows() {
        let html = generate_screening_html(&make_screening_report());

        assert!(html.contains("<tr class=\"fail\">"));
        assert!(html.contains("high"));
        assert!(html.contains("Submission by Jane Smith (Question ID: q-1)"));
    }

    #[test]
    fn grading_html_write_to_file() {
        let report = make_grading_report();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reports").join("grading.html");

        write_grading_html(&report, &path).unwrap();
        assert!(path.exists());

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("<html"));
    }

    #[test]
    fn screening_html_write_to_file() {
        let report = make_screening_report();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("screening.html");

        write_screening_html(&report, &path).unwrap();
        assert!(path.exists());
    }
}
