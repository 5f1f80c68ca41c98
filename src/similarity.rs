//! Bag-of-words cosine similarity.

use std::collections::BTreeSet;

use crate::tokenize::{token_frequencies, tokenize};

/// Cosine similarity between the word-frequency vectors of two texts,
/// as a percentage in [0, 100].
///
/// Returns exactly 0.0 when either text has no tokens.
pub fn cosine_similarity(text_a: &str, text_b: &str) -> f64 {
    let tokens_a = tokenize(text_a);
    let tokens_b = tokenize(text_b);
    cosine_similarity_tokens(&tokens_a, &tokens_b)
}

/// Cosine similarity over already tokenized sequences.
///
/// Counts are integers, so the dot product and squared norms are summed
/// exactly and the result does not depend on argument order.
pub fn cosine_similarity_tokens<S: AsRef<str>>(tokens_a: &[S], tokens_b: &[S]) -> f64 {
    let freq_a = token_frequencies(tokens_a);
    let freq_b = token_frequencies(tokens_b);

    let vocabulary: BTreeSet<&str> = freq_a.keys().chain(freq_b.keys()).copied().collect();

    let mut dot = 0u64;
    let mut norm_a_sq = 0u64;
    let mut norm_b_sq = 0u64;
    for token in vocabulary {
        let a = freq_a.get(token).copied().unwrap_or(0);
        let b = freq_b.get(token).copied().unwrap_or(0);
        dot += a * b;
        norm_a_sq += a * a;
        norm_b_sq += b * b;
    }

    if norm_a_sq == 0 || norm_b_sq == 0 {
        return 0.0;
    }

    // sqrt(|a|^2 * |b|^2) == |a| * |b|, and stays exact for identical inputs
    let magnitude = ((norm_a_sq as f64) * (norm_b_sq as f64)).sqrt();
    (dot as f64 / magnitude) * 100.0
}
