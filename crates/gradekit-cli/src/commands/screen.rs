//! The `gradekit screen` command.

use std::path::PathBuf;

use anyhow::Result;

use gradekit_core::engine::{CohortEngine, CohortEngineConfig};
use gradekit_core::parser;
use gradekit_core::report::CohortScreeningReport;
use gradekit_report::html::write_screening_html;
use gradekit_report::markdown::screening_markdown;

use super::ConsoleReporter;

pub async fn execute(
    bundle_path: PathBuf,
    parallelism: usize,
    output: PathBuf,
    format: String,
    threshold: Option<f64>,
    fail_on_high: bool,
) -> Result<()> {
    anyhow::ensure!(parallelism >= 1, "parallelism must be at least 1");
    if let Some(t) = threshold {
        anyhow::ensure!(
            (0.0..=100.0).contains(&t),
            "threshold must be between 0 and 100"
        );
    }

    let bundles = if bundle_path.is_dir() {
        parser::load_bundle_directory(&bundle_path)?
    } else {
        vec![parser::parse_bundle(&bundle_path)?]
    };
    anyhow::ensure!(!bundles.is_empty(), "no bundles found in {}", bundle_path.display());

    let reporter = ConsoleReporter;
    let mut any_high_risk = false;

    for bundle in &bundles {
        let mut settings = bundle.settings.clone();
        if let Some(t) = threshold {
            settings.similarity_threshold = t;
        }
        if !settings.enable_plagiarism_check {
            eprintln!("Plagiarism check disabled for '{}', skipping.", bundle.id);
            continue;
        }

        let engine = CohortEngine::new(CohortEngineConfig {
            parallelism,
            settings,
        })?;

        eprintln!(
            "gradekit — screening {} submissions for '{}'",
            bundle.submissions.len(),
            bundle.title
        );
        eprintln!();

        let report = engine
            .screen_cohort(&bundle.id, &bundle.submissions, &reporter)
            .await?;
        tracing::debug!(run_id = %report.id, "screening run complete");

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
                    let path = output.join(format!("screening-{}-{timestamp}.json", bundle.id));
                    report.save_json(&path)?;
                    eprintln!("Results saved to: {}", path.display());
                }
                "html" => {
                    let path = output.join(format!("screening-{}-{timestamp}.html", bundle.id));
                    write_screening_html(&report, &path)?;
                    eprintln!("HTML report: {}", path.display());
                }
                "markdown" | "md" => {
                    let path = output.join(format!("screening-{}-{timestamp}.md", bundle.id));
                    std::fs::write(&path, screening_markdown(&report))?;
                    eprintln!("Markdown report: {}", path.display());
                }
                _ => {
                    eprintln!("Unknown format: {fmt}");
                }
            }
        }

        if report.has_high_risk() {
            any_high_risk = true;
        }
    }

    if fail_on_high && any_high_risk {
        std::process::exit(1);
    }

    Ok(())
}

fn print_summary(report: &CohortScreeningReport) {
    use comfy_table::{Cell, Table};

    let mut table = Table::new();
    table.set_header(vec!["Submission", "Author", "Similarity", "Risk", "Sources"]);

    for screening in &report.results {
        let risk = screening
            .risk_level(report.alert_threshold)
            .map(|level| level.to_string())
            .unwrap_or_else(|| "-".to_string());
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

        table.add_row(vec![
            Cell::new(&screening.submission_id),
            Cell::new(&screening.author),
            Cell::new(format!("{:.1}%", screening.report.similarity_score)),
            Cell::new(risk),
            Cell::new(sources),
        ]);
    }

    eprintln!("\n{table}");
    eprintln!(
        "Flagged: {} high, {} medium, {} low (alert threshold {:.1}%)",
        report.flagged.high, report.flagged.medium, report.flagged.low, report.alert_threshold
    );
}
