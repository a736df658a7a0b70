//! gradekit-report — Report rendering for grading and screening runs.
//!
//! Turns the cohort reports produced by `gradekit-core` into
//! self-contained HTML pages and markdown summaries.

pub mod html;
pub mod markdown;
