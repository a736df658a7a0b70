//! gradekit CLI — the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "gradekit",
    version,
    about = "Automated essay grading and plagiarism screening"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Grade a cohort of essay submissions against the model answer
    Grade {
        /// Path to .toml assessment bundle or directory
        #[arg(long)]
        bundle: PathBuf,

        /// Max concurrent submissions
        #[arg(long, default_value = "4")]
        parallelism: usize,

        /// Output directory
        #[arg(long, default_value = "./gradekit-results")]
        output: PathBuf,

        /// Output format: json, html, markdown, all
        #[arg(long, default_value = "json")]
        format: String,
    },

    /// Screen a cohort of submissions against each other for plagiarism
    Screen {
        /// Path to .toml assessment bundle or directory
        #[arg(long)]
        bundle: PathBuf,

        /// Max concurrent submissions
        #[arg(long, default_value = "4")]
        parallelism: usize,

        /// Output directory
        #[arg(long, default_value = "./gradekit-results")]
        output: PathBuf,

        /// Output format: json, html, markdown, all
        #[arg(long, default_value = "json")]
        format: String,

        /// Override the bundle's alert threshold (percent)
        #[arg(long)]
        threshold: Option<f64>,

        /// Exit code 1 if any submission reaches the high-risk tier
        #[arg(long)]
        fail_on_high: bool,
    },

    /// Validate assessment bundle TOML files
    Validate {
        /// Path to bundle file or directory
        #[arg(long)]
        bundle: PathBuf,
    },

    /// Create a starter assessment bundle
    Init,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("gradekit=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Grade {
            bundle,
            parallelism,
            output,
            format,
        } => commands::grade::execute(bundle, parallelism, output, format).await,
        Commands::Screen {
            bundle,
            parallelism,
            output,
            format,
            threshold,
            fail_on_high,
        } => {
            commands::screen::execute(bundle, parallelism, output, format, threshold, fail_on_high)
                .await
        }
        Commands::Validate { bundle } => commands::validate::execute(bundle),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
