//! Essay grading engine.
//!
//! Blends model-answer similarity and keyword coverage into a bounded
//! score, applies the word-limit penalty, and assembles the insight fields
//! of a [`GradingResult`]. The engine never fails: empty or malformed
//! input degrades to a zero/neutral result.

use crate::error::SettingsError;
use crate::keywords::match_keywords;
use crate::model::{EssayReference, Sentiment};
use crate::report::GradingResult;
use crate::text::{normalize, readability_score, word_count};
use crate::vectorize::cosine_similarity;

/// Configuration for the essay grader.
#[derive(Debug, Clone)]
pub struct GradingConfig {
    /// Weight of the model-answer similarity in the final score, in [0, 1].
    /// The keyword bonus fills the remaining share.
    pub similarity_weight: f64,
    /// Factor applied to the score when the word limit is exceeded.
    pub over_limit_penalty: f64,
}

impl Default for GradingConfig {
    fn default() -> Self {
        Self {
            similarity_weight: 0.7,
            over_limit_penalty: 0.9,
        }
    }
}

/// The essay grading engine.
#[derive(Debug, Clone)]
pub struct EssayGrader {
    config: GradingConfig,
}

impl Default for EssayGrader {
    fn default() -> Self {
        Self {
            config: GradingConfig::default(),
        }
    }
}

impl EssayGrader {
    /// Build a grader, rejecting out-of-range configuration.
    pub fn new(config: GradingConfig) -> Result<Self, SettingsError> {
        if !(0.0..=1.0).contains(&config.similarity_weight) {
            return Err(SettingsError::SimilarityWeightOutOfRange(
                config.similarity_weight,
            ));
        }
        if !(0.0..=1.0).contains(&config.over_limit_penalty) {
            return Err(SettingsError::PenaltyOutOfRange(config.over_limit_penalty));
        }
        Ok(Self { config })
    }

    /// Grade a student answer against an essay reference.
    ///
    /// The score is `cosine * max_mark * similarity_weight` plus an even
    /// share of the remaining mark per matched keyword, clamped to
    /// `[0, max_mark]`. Exceeding the word limit (counted on the raw,
    /// markup-stripped text) multiplies the score by the penalty factor.
    /// The sentiment label reflects the final, post-penalty score.
    pub fn grade(&self, student_answer: &str, reference: &EssayReference) -> GradingResult {
        let student_normalized = normalize(student_answer);
        let model_normalized = normalize(&reference.model_answer);

        let cosine = if student_normalized.is_empty() || model_normalized.is_empty() {
            0.0
        } else {
            cosine_similarity(&student_normalized, &model_normalized)
        };

        let keyword_match = match_keywords(&reference.keywords, &student_normalized);
        let usable_keywords = keyword_match.total();

        let max_mark = reference.max_mark;
        let base_score = cosine * max_mark * self.config.similarity_weight;
        let keyword_bonus = if usable_keywords == 0 {
            0.0
        } else {
            let share = max_mark * (1.0 - self.config.similarity_weight);
            keyword_match.matched.len() as f64 * (share / usable_keywords as f64)
        };

        let mut score = (base_score + keyword_bonus).min(max_mark);

        if let Some(limit) = reference.word_limit {
            if limit > 0 && word_count(student_answer) > limit as usize {
                score = (score * self.config.over_limit_penalty).max(0.0);
            }
        }

        let sentiment = Sentiment::from_score(score, max_mark);

        GradingResult {
            score: round2(score),
            cosine_similarity: round2(cosine),
            matched_keywords: keyword_match.matched,
            missing_keywords: keyword_match.missing,
            sentiment,
            readability_score: round2(readability_score(student_answer)),
            overall_match_percentage: round2(cosine * 100.0),
        }
    }
}

/// Round to two decimal places, the precision every reported score and
/// percentage carries.
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
