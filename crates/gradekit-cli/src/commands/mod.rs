//! CLI subcommand implementations.

use std::time::Duration;

use gradekit_core::engine::ProgressReporter;

pub mod grade;
pub mod init;
pub mod screen;
pub mod validate;

/// Console progress reporter shared by the grade and screen commands.
pub(crate) struct ConsoleReporter;

impl ProgressReporter for ConsoleReporter {
    fn on_item_start(&self, submission_id: &str, author: &str) {
        eprintln!("  Starting: {submission_id} ({author})");
    }

    fn on_item_complete(&self, submission_id: &str) {
        eprintln!("  Done: {submission_id}");
    }

    fn on_item_error(&self, submission_id: &str, error: &str) {
        eprintln!("  ERROR: {submission_id}: {error}");
    }

    fn on_batch_complete(&self, total: usize, completed: usize, failed: usize, elapsed: Duration) {
        eprintln!(
            "\nComplete: {completed}/{total} succeeded, {failed} failed ({:.1}s)",
            elapsed.as_secs_f64()
        );
    }
}
