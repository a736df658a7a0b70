//! Settings validation error types.
//!
//! The engines themselves never fail — malformed input degrades to a
//! zero/neutral result. The only typed failures in this crate are range
//! errors on configuration values, rejected at construction so a
//! misconfigured assessment cannot silently skew scores.

use thiserror::Error;

/// Errors raised when engine configuration is constructed from
/// out-of-range values.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// The similarity weight must stay within [0, 1].
    #[error("similarity weight must be within [0, 1], got {0}")]
    SimilarityWeightOutOfRange(f64),

    /// The over-limit penalty factor must stay within [0, 1].
    #[error("over-limit penalty must be within [0, 1], got {0}")]
    PenaltyOutOfRange(f64),

    /// The plagiarism match threshold must stay within [0, 1].
    #[error("match threshold must be within [0, 1], got {0}")]
    MatchThresholdOutOfRange(f64),

    /// The percentage similarity threshold must stay within [0, 100].
    #[error("similarity threshold must be a percentage within [0, 100], got {0}")]
    SimilarityThresholdOutOfRange(f64),

    /// Parallelism must be at least 1.
    #[error("parallelism must be at least 1")]
    ZeroParallelism,
}
