//! Call-local TF-IDF vectorization and cosine similarity.
//!
//! Every call fits its own vector space over the documents it is given and
//! discards it on return. Nothing is shared across calls — IDF statistics
//! never leak from one comparison into another, which keeps every call
//! independent and safe to run in parallel.
//!
//! Inputs are expected in normalized form (see [`crate::text::normalize`]);
//! tokens are whitespace-separated words of at least two characters.

use std::collections::HashMap;

/// Minimum token length admitted to the vocabulary. Single letters carry
/// no usable signal.
const MIN_TOKEN_LEN: usize = 2;

/// Cosine similarity of two documents over a two-document corpus.
///
/// Returns a value in `[0, 1]`. An empty document or a degenerate
/// vocabulary yields `0.0` rather than an error.
pub fn cosine_similarity(a: &str, b: &str) -> f64 {
    cosine_similarity_many(a, std::slice::from_ref(&b))
        .first()
        .copied()
        .unwrap_or(0.0)
}

/// Cosine similarity of a candidate against each corpus document.
///
/// The candidate is document 0 and the corpus documents 1..N of a single
/// vector space; IDF is computed once over the full set for this call
/// only. The result preserves corpus order.
pub fn cosine_similarity_many<S: AsRef<str>>(candidate: &str, corpus: &[S]) -> Vec<f64> {
    if corpus.is_empty() {
        return Vec::new();
    }

    let mut docs: Vec<Vec<&str>> = Vec::with_capacity(corpus.len() + 1);
    docs.push(tokenize(candidate));
    for text in corpus {
        docs.push(tokenize(text.as_ref()));
    }

    let mut vocabulary: HashMap<&str, usize> = HashMap::new();
    for doc in &docs {
        for &token in doc {
            let next = vocabulary.len();
            vocabulary.entry(token).or_insert(next);
        }
    }
    if vocabulary.is_empty() {
        tracing::debug!("empty vocabulary, similarity falls back to 0");
        return vec![0.0; corpus.len()];
    }

    // Document frequency per term.
    let mut df = vec![0u32; vocabulary.len()];
    for doc in &docs {
        let mut seen = vec![false; vocabulary.len()];
        for &token in doc {
            let index = vocabulary[token];
            if !seen[index] {
                seen[index] = true;
                df[index] += 1;
            }
        }
    }

    // Smoothed IDF: ln((1 + n) / (1 + df)) + 1.
    let doc_total = docs.len() as f64;
    let idf: Vec<f64> = df
        .iter()
        .map(|&d| ((1.0 + doc_total) / (1.0 + f64::from(d))).ln() + 1.0)
        .collect();

    let rows: Vec<Vec<f64>> = docs
        .iter()
        .map(|doc| {
            let mut row = vec![0.0f64; vocabulary.len()];
            for &token in doc {
                row[vocabulary[token]] += 1.0;
            }
            for (weight, term_idf) in row.iter_mut().zip(&idf) {
                *weight *= term_idf;
            }
            let norm = row.iter().map(|w| w * w).sum::<f64>().sqrt();
            if norm > 0.0 {
                for weight in &mut row {
                    *weight /= norm;
                }
            }
            row
        })
        .collect();

    let candidate_row = &rows[0];
    rows[1..]
        .iter()
        .map(|row| {
            candidate_row
                .iter()
                .zip(row)
                .map(|(a, b)| a * b)
                .sum::<f64>()
                .clamp(0.0, 1.0)
        })
        .collect()
}

fn tokenize(text: &str) -> Vec<&str> {
    text.split_whitespace()
        .filter(|token| token.len() >= MIN_TOKEN_LEN)
        .collect()
}
