//! Integration tests for plagiarism-checker.
//!
//! These tests verify the end-to-end behavior of the check pipeline against
//! the built-in and hand-made corpora.

use plagiarism_checker::check::{check_documents, check_plagiarism, check_plagiarism_with_params};
use plagiarism_checker::corpus::sample_corpus;
use plagiarism_checker::models::{CheckParams, ReferenceDocument};
use plagiarism_checker::output::{format_text_report, report_document, write_json};
use plagiarism_checker::sequence::find_common_sequences;
use plagiarism_checker::similarity::cosine_similarity;
use plagiarism_checker::tokenize::tokenize;

/// Reference documents whose vocabularies do not overlap at all.
fn disjoint_corpus() -> Vec<ReferenceDocument> {
    vec![
        ReferenceDocument::new(
            "Volcanoes",
            Some("https://example.org/volcanoes"),
            "Volcanoes erupt molten rock called lava when pressure builds beneath crust plates.",
        ),
        ReferenceDocument::new(
            "Bread",
            None,
            "Bakers knead flour yeast salt water into dough then bake loaves inside hot ovens.",
        ),
        ReferenceDocument::new(
            "Chess",
            Some("https://example.org/chess"),
            "Chess players move kings queens rooks bishops knights pawns across sixty four squares.",
        ),
    ]
}

#[test]
fn test_exact_copy_of_sample_document() {
    let corpus = sample_corpus();
    let candidate = corpus[2].text.clone();

    let report = check_plagiarism(&candidate, &corpus);

    assert_eq!(report.matches[0].source, corpus[2].source);
    assert_eq!(report.matches[0].similarity, 100.0);
    assert_eq!(report.total_words, tokenize(&candidate).len());
    // The copy is one unbroken block
    assert_eq!(report.matches[0].matched_sequences.len(), 1);
    assert_eq!(
        report.matches[0].matched_sequences[0].length,
        report.total_words
    );
    assert!(report.overall_similarity > 50.0);
}

#[test]
fn test_exact_copy_single_source_corpus_scores_100() {
    let corpus = disjoint_corpus();
    let report = check_plagiarism(&corpus[0].text, &corpus);

    assert_eq!(report.matches.len(), 1);
    assert_eq!(report.matches[0].source, "Volcanoes");
    assert_eq!(report.matches[0].url, "https://example.org/volcanoes");
    assert_eq!(report.overall_similarity, 100.0);
}

#[test]
fn test_unrelated_candidate() {
    let corpus = disjoint_corpus();
    let candidate = "Astronomers photograph distant galaxies using enormous orbiting telescopes.";

    let report = check_plagiarism(candidate, &corpus);

    assert!(report.matches.is_empty());
    assert_eq!(report.overall_similarity, 0.0);
    assert_eq!(report.total_words, 8);
}

#[test]
fn test_total_words_independent_of_corpus() {
    let candidate = "Bakers knead dough. Chess players move pawns. Lava flows.";
    let with_corpus = check_plagiarism(candidate, &disjoint_corpus());
    let without_corpus = check_plagiarism(candidate, &[]);

    assert_eq!(with_corpus.total_words, 9);
    assert_eq!(without_corpus.total_words, 9);
    assert!(without_corpus.matches.is_empty());
}

#[test]
fn test_matches_sorted_and_capped() {
    let corpus = disjoint_corpus();
    // Mostly chess with a little bread
    let candidate = format!(
        "{} {} Bakers knead flour.",
        corpus[2].text, corpus[2].text
    );

    let report = check_plagiarism(&candidate, &corpus);

    assert_eq!(report.matches.len(), 2);
    assert_eq!(report.matches[0].source, "Chess");
    assert_eq!(report.matches[1].source, "Bread");
    for pair in report.matches.windows(2) {
        assert!(pair[0].similarity >= pair[1].similarity);
    }
    for source in &report.matches {
        assert!(source.matched_sequences.len() <= 5);
        assert!(source.similarity > 5.0 && source.similarity <= 100.0);
    }
    assert!(report.overall_similarity > report.matches[1].similarity);
    assert!(report.overall_similarity <= report.matches[0].similarity);
}

#[test]
fn test_ties_keep_corpus_order() {
    let text = "identical reference text shared by both entries here";
    let corpus = vec![
        ReferenceDocument::new("First", None, text),
        ReferenceDocument::new("Second", None, text),
    ];

    let report = check_plagiarism(text, &corpus);

    assert_eq!(report.matches.len(), 2);
    assert_eq!(report.matches[0].source, "First");
    assert_eq!(report.matches[1].source, "Second");
    assert_eq!(report.overall_similarity, 100.0);
}

#[test]
fn test_partial_copy_reports_passage() {
    let corpus = sample_corpus();
    let candidate = "In my essay I argue several things. Since the industrial revolution, \
                     human activities have been the main driver of climate change, which is \
                     something my grandparents also noticed on their farm.";

    let report = check_plagiarism(candidate, &corpus);

    let climate = report
        .matches
        .iter()
        .find(|m| m.source == "Climate Change Overview")
        .expect("climate source should be matched");
    assert!(climate.matched_sequences.iter().any(|s| s
        .text
        .contains("since the industrial revolution human activities have been the main driver")));

    let tokens = tokenize(candidate);
    for seq in &climate.matched_sequences {
        assert!(seq.length >= 5);
        assert_eq!(
            seq.text,
            tokens[seq.position..seq.position + seq.length].join(" ")
        );
    }
}

#[test]
fn test_references_are_not_mutated() {
    let corpus = sample_corpus();
    let before = corpus.clone();
    let _ = check_plagiarism(&corpus[0].text, &corpus);
    assert_eq!(corpus, before);
}

#[test]
fn test_custom_threshold_and_min_length() {
    let corpus = disjoint_corpus();
    let candidate = "Chess players move kings queens quickly while bakers knead dough slowly.";

    let strict = CheckParams {
        inclusion_threshold: 90.0,
        ..Default::default()
    };
    assert!(check_plagiarism_with_params(candidate, &corpus, &strict)
        .matches
        .is_empty());

    let short_runs = CheckParams {
        min_match_length: 2,
        ..Default::default()
    };
    let report = check_plagiarism_with_params(candidate, &corpus, &short_runs);
    let chess = report.matches.iter().find(|m| m.source == "Chess").unwrap();
    assert_eq!(chess.matched_sequences[0].text, "chess players move kings queens");
    let bread = report.matches.iter().find(|m| m.source == "Bread").unwrap();
    assert_eq!(bread.matched_sequences[0].text, "bakers knead");
}

#[test]
fn test_engine_properties() {
    let a = "The printing press spread ideas across Europe.";
    let b = "Ideas spread across Europe thanks to the printing press.";

    assert_eq!(cosine_similarity(a, a), 100.0);
    assert_eq!(cosine_similarity(a, ""), 0.0);
    assert_eq!(cosine_similarity("", a), 0.0);
    assert_eq!(cosine_similarity(a, b), cosine_similarity(b, a));

    let seqs = find_common_sequences(a, b, 2);
    let positions: Vec<usize> = seqs.iter().map(|s| s.position).collect();
    let mut sorted = positions.clone();
    sorted.sort_unstable();
    assert_eq!(positions, sorted);
    assert!(seqs.iter().all(|s| s.length >= 2));
}

#[test]
fn test_batch_matches_single_checks() {
    let corpus = sample_corpus();
    let candidates: Vec<String> = corpus.iter().map(|d| d.text.clone()).collect();
    let params = CheckParams::default();

    let batch = check_documents(&candidates, &corpus, &params, false);

    assert_eq!(batch.len(), candidates.len());
    for (candidate, report) in candidates.iter().zip(&batch) {
        assert_eq!(
            report,
            &check_plagiarism_with_params(candidate, &corpus, &params)
        );
    }
}

#[test]
fn test_report_export_roundtrip_fields() {
    let corpus = sample_corpus();
    let report = check_plagiarism(&corpus[3].text, &corpus);
    let now = chrono::Local::now();

    let text = format_text_report(&report, "printing.txt", now);
    assert!(text.contains("Document: printing.txt"));
    assert!(text.contains(&format!("Total Words: {}", report.total_words)));
    assert!(text.contains("History of the Printing Press"));

    let document = report_document(&report, "printing.txt", &CheckParams::default(), now);
    let mut buf = Vec::new();
    write_json(&document, &mut buf).unwrap();
    let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();
    assert_eq!(
        value["report"]["matches"][0]["source"],
        "History of the Printing Press"
    );
    assert_eq!(value["version"], env!("CARGO_PKG_VERSION"));
}
