//! Plagiarism check orchestration.
//!
//! Scores a candidate text against every reference document, collects
//! matched passages for the sources that pass the inclusion threshold and
//! folds the per-source scores into one overall similarity.

use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use std::cmp::Ordering;
use tracing::{debug, info};

use crate::models::{
    CheckParams, ComparisonSummary, PlagiarismReport, ReferenceDocument, SourceMatch,
};
use crate::sequence::common_sequences_from_tokens;
use crate::similarity::cosine_similarity_tokens;
use crate::tokenize::tokenize_with;

/// Check a candidate text against a reference corpus with default parameters.
pub fn check_plagiarism(candidate: &str, references: &[ReferenceDocument]) -> PlagiarismReport {
    check_plagiarism_with_params(candidate, references, &CheckParams::default())
}

/// Check a candidate text against a reference corpus.
pub fn check_plagiarism_with_params(
    candidate: &str,
    references: &[ReferenceDocument],
    params: &CheckParams,
) -> PlagiarismReport {
    let candidate_tokens = tokenize_with(candidate, params.filter_stop_words);
    let total_words = candidate_tokens.len();

    let mut matches: Vec<SourceMatch> = references
        .iter()
        .filter_map(|reference| compare_reference(&candidate_tokens, reference, params))
        .collect();

    let overall_similarity = overall_similarity(&matches);

    // Stable: equal scores keep corpus order
    matches.sort_by(|a, b| {
        b.similarity
            .partial_cmp(&a.similarity)
            .unwrap_or(Ordering::Equal)
    });

    info!(
        total_words,
        sources = matches.len(),
        overall_similarity,
        "plagiarism check complete"
    );

    PlagiarismReport {
        overall_similarity,
        total_words,
        matches,
    }
}

/// Score one reference document, returning evidence if it passes the threshold.
fn compare_reference(
    candidate_tokens: &[String],
    reference: &ReferenceDocument,
    params: &CheckParams,
) -> Option<SourceMatch> {
    let reference_tokens = tokenize_with(&reference.text, params.filter_stop_words);
    let similarity = cosine_similarity_tokens(candidate_tokens, &reference_tokens);

    debug!(source = %reference.source, similarity, "scored reference");

    if similarity <= params.inclusion_threshold {
        return None;
    }

    let mut matched_sequences = common_sequences_from_tokens(
        candidate_tokens,
        &reference_tokens,
        params.min_match_length,
        params.autojunk,
    );
    matched_sequences.truncate(params.max_sequences_per_source);

    Some(SourceMatch {
        source: reference.source.clone(),
        url: reference.url.clone().unwrap_or_default(),
        similarity: round2(similarity),
        matched_sequences,
    })
}

/// Self-weighted mean of the per-source scores: sum(s^2) / sum(s).
///
/// Leans toward the strongest sources; 0 when there are none.
pub fn overall_similarity(matches: &[SourceMatch]) -> f64 {
    if matches.is_empty() {
        return 0.0;
    }

    let weight_sum: f64 = matches.iter().map(|m| m.similarity).sum();
    if weight_sum == 0.0 {
        return 0.0;
    }

    let weighted: f64 = matches.iter().map(|m| m.similarity * m.similarity).sum();
    round2(weighted / weight_sum)
}

/// Round a percentage to two decimals.
///
/// Rounds the exact binary value: `2.675` is stored just below the half and
/// goes down. Values sitting exactly on a half (`12.125`) round to even.
pub fn round2(value: f64) -> f64 {
    let scaled = value * 100.0;
    let eighths = value * 8.0;
    // Exact halves at the second decimal are the odd multiples of 1/8
    if eighths.fract() == 0.0 && eighths % 2.0 != 0.0 {
        let lower = scaled.floor();
        let even = if lower % 2.0 == 0.0 { lower } else { lower + 1.0 };
        return even / 100.0;
    }
    format!("{value:.2}")
        .parse()
        .unwrap_or_else(|_| scaled.round() / 100.0)
}

/// Compare two texts directly: similarity plus all common sequences.
pub fn compare_texts(text_a: &str, text_b: &str, params: &CheckParams) -> ComparisonSummary {
    let tokens_a = tokenize_with(text_a, params.filter_stop_words);
    let tokens_b = tokenize_with(text_b, params.filter_stop_words);

    ComparisonSummary {
        similarity: round2(cosine_similarity_tokens(&tokens_a, &tokens_b)),
        total_words_a: tokens_a.len(),
        total_words_b: tokens_b.len(),
        sequences: common_sequences_from_tokens(
            &tokens_a,
            &tokens_b,
            params.min_match_length,
            params.autojunk,
        ),
    }
}

/// Check several candidate texts against the same corpus in parallel.
///
/// Every check is independent and only reads the shared corpus. Reports are
/// returned in input order.
pub fn check_documents(
    candidates: &[String],
    references: &[ReferenceDocument],
    params: &CheckParams,
    show_progress: bool,
) -> Vec<PlagiarismReport> {
    let progress = if show_progress {
        let pb = ProgressBar::new(candidates.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template(concat!(
                    "{spinner:.green} [{elapsed_precise}] ",
                    "[{bar:40.cyan/blue}] {pos}/{len} ({per_sec})"
                ))
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );
        Some(pb)
    } else {
        None
    };

    let reports: Vec<PlagiarismReport> = candidates
        .par_iter()
        .map(|candidate| {
            let report = check_plagiarism_with_params(candidate, references, params);
            if let Some(ref pb) = progress {
                pb.inc(1);
            }
            report
        })
        .collect();

    if let Some(pb) = progress {
        pb.finish_with_message("Done");
    }

    reports
}
