//! Word tokenization.
//!
//! Texts are compared as sequences of lowercase ASCII alphanumeric words.
//! The text is first cut into words (runs of letters, numbers and
//! underscores, in the Unicode sense); a word becomes a token only when it
//! is made entirely of `[a-z0-9]`.

use regex::Regex;
use std::collections::{HashMap, HashSet};
use std::sync::OnceLock;

/// Common English function words.
///
/// Only consulted when stop-word filtering is switched on; the default
/// scoring path compares every token.
pub const STOP_WORDS: &[&str] = &[
    "the", "a", "an", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with", "by",
    "from", "as", "is", "was", "are", "were", "be", "been", "being", "have", "has", "had", "do",
    "does", "did", "will", "would", "could", "should", "may", "might", "can", "this", "that",
    "these", "those", "i", "you", "he", "she", "it", "we", "they", "what", "which", "who",
    "when", "where", "why", "how", "all", "each", "every", "some", "any", "no", "not", "only",
    "own", "same", "so", "than", "too", "very", "s", "t", "just", "now",
];

/// Maximal runs of word characters. Combining marks and joiners are not
/// word characters, so they end a run.
fn word_pattern() -> &'static Regex {
    static WORD: OnceLock<Regex> = OnceLock::new();
    WORD.get_or_init(|| Regex::new(r"[\p{L}\p{N}_]+").expect("word pattern is valid"))
}

fn is_token(word: &str) -> bool {
    word.bytes().all(|b| b.is_ascii_lowercase() || b.is_ascii_digit())
}

fn stop_word_set() -> &'static HashSet<&'static str> {
    static SET: OnceLock<HashSet<&'static str>> = OnceLock::new();
    SET.get_or_init(|| STOP_WORDS.iter().copied().collect())
}

/// Split text into lowercase alphanumeric word tokens, in order.
///
/// A word containing an underscore, a non-ASCII letter or a non-ASCII
/// number (`snake_case`, `café`, `m²`) yields nothing. A combining accent
/// or a zero-width joiner splits words instead.
pub fn tokenize(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    word_pattern()
        .find_iter(&lowered)
        .map(|m| m.as_str())
        .filter(|word| is_token(word))
        .map(str::to_string)
        .collect()
}

/// Returns true if `token` is in [`STOP_WORDS`].
pub fn is_stop_word(token: &str) -> bool {
    stop_word_set().contains(token)
}

/// Drop stop words from a token sequence, keeping order.
pub fn remove_stop_words(tokens: Vec<String>) -> Vec<String> {
    tokens.into_iter().filter(|t| !is_stop_word(t)).collect()
}

/// Tokenize, optionally removing stop words.
pub fn tokenize_with(text: &str, filter_stop_words: bool) -> Vec<String> {
    let tokens = tokenize(text);
    if filter_stop_words {
        remove_stop_words(tokens)
    } else {
        tokens
    }
}

/// Count occurrences of each distinct token.
pub fn token_frequencies<S: AsRef<str>>(tokens: &[S]) -> HashMap<&str, u64> {
    let mut counts = HashMap::with_capacity(tokens.len());
    for token in tokens {
        *counts.entry(token.as_ref()).or_insert(0u64) += 1;
    }
    counts
}
