//! The `gradekit grade` command.

use std::path::PathBuf;

use anyhow::Result;

use gradekit_core::engine::{CohortEngine, CohortEngineConfig};
use gradekit_core::parser;
use gradekit_core::report::CohortGradingReport;
use gradekit_report::html::write_grading_html;
use gradekit_report::markdown::grading_markdown;

use super::ConsoleReporter;

pub async fn execute(
    bundle_path: PathBuf,
    parallelism: usize,
    output: PathBuf,
    format: String,
) -> Result<()> {
    anyhow::ensure!(parallelism >= 1, "parallelism must be at least 1");

    let bundles = if bundle_path.is_dir() {
        parser::load_bundle_directory(&bundle_path)?
    } else {
        vec![parser::parse_bundle(&bundle_path)?]
    };
    anyhow::ensure!(!bundles.is_empty(), "no bundles found in {}", bundle_path.display());

    let reporter = ConsoleReporter;

    for bundle in &bundles {
        let reference = bundle.reference.as_ref().ok_or_else(|| {
            anyhow::anyhow!(
                "bundle '{}' has no [reference] block; nothing to grade against",
                bundle.id
            )
        })?;

        let engine = CohortEngine::new(CohortEngineConfig {
            parallelism,
            settings: bundle.settings.clone(),
        })?;

        eprintln!(
            "gradekit — grading {} submissions for '{}'",
            bundle.submissions.len(),
            bundle.title
        );
        eprintln!();

        let report = engine
            .grade_batch(&bundle.id, reference, &bundle.submissions, &reporter)
            .await?;
        tracing::debug!(run_id = %report.id, "grading run complete");

        print_summary(&report);

        // Save outputs
        std::fs::create_dir_all(&output)?;
        let timestamp = chrono::Utc::now().format("%Y-%m-%dT%H%M%S");

        let formats: Vec<&str> = if format == "all" {
            vec!["json", "html", "markdown"]
        } else {
            format.split(',').collect()
        };

        for fmt in &formats {
            match *fmt {
                "json" => {
                    let path = output.join(format!("grading-{}-{timestamp}.json", bundle.id));
                    report.save_json(&path)?;
                    eprintln!("Results saved to: {}", path.display());
                }
                "html" => {
                    let path = output.join(format!("grading-{}-{timestamp}.html", bundle.id));
                    write_grading_html(&report, &path)?;
                    eprintln!("HTML report: {}", path.display());
                }
                "markdown" | "md" => {
                    let path = output.join(format!("grading-{}-{timestamp}.md", bundle.id));
                    std::fs::write(&path, grading_markdown(&report))?;
                    eprintln!("Markdown report: {}", path.display());
                }
                _ => {
                    eprintln!("Unknown format: {fmt}");
                }
            }
        }
    }

    Ok(())
}

fn print_summary(report: &CohortGradingReport) {
    use comfy_table::{Cell, Table};

    let mut table = Table::new();
    table.set_header(vec![
        "Submission",
        "Author",
        "Score",
        "Match %",
        "Readability",
        "Sentiment",
    ]);

    for grading in &report.results {
        table.add_row(vec![
            Cell::new(&grading.submission_id),
            Cell::new(&grading.author),
            Cell::new(format!("{:.2}/{:.1}", grading.result.score, report.max_mark)),
            Cell::new(format!("{:.1}%", grading.result.overall_match_percentage)),
            Cell::new(format!("{:.1}", grading.result.readability_score)),
            Cell::new(grading.result.sentiment.to_string()),
        ]);
    }

    eprintln!("\n{table}");
    eprintln!(
        "Cohort: {:.1}% of attainable marks, mean match {:.1}%, sentiment {}",
        report.insights.total_score_percentage,
        report.insights.mean_match_percentage,
        report.insights.sentiment
    );
}
