//! gradekit-core — Core essay grading and plagiarism screening engine.
//!
//! This crate defines the text-analysis pipeline, the data model, and the
//! scoring logic that the entire gradekit system builds on.

pub mod engine;
pub mod error;
pub mod grader;
pub mod keywords;
pub mod model;
pub mod parser;
pub mod plagiarism;
pub mod report;
pub mod text;
pub mod vectorize;
