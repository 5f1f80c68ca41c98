//! Plagiarism Checker Library
//!
//! Detects textual overlap between a candidate document and a small corpus of
//! reference texts. Each reference is scored with bag-of-words cosine
//! similarity; sources above the inclusion threshold contribute matched word
//! sequences as evidence and a share of the overall score.
//!
//! # Example
//!
//! ```
//! use plagiarism_checker::prelude::*;
//!
//! let corpus = vec![ReferenceDocument::new(
//!     "Water",
//!     None,
//!     "Water boils at one hundred degrees Celsius at sea level.",
//! )];
//!
//! let report = check_plagiarism(
//!     "Water boils at one hundred degrees Celsius at sea level.",
//!     &corpus,
//! );
//!
//! assert_eq!(report.overall_similarity, 100.0);
//! assert_eq!(report.matches[0].source, "Water");
//! ```
//!
//! # Checking a file
//!
//! ```no_run
//! use plagiarism_checker::prelude::*;
//! use std::path::Path;
//!
//! let text = extract_text(Path::new("essay.docx")).unwrap();
//! let report = check_plagiarism(&text, &sample_corpus());
//!
//! for source in &report.matches {
//!     println!("{}: {:.2}%", source.source, source.similarity);
//! }
//! ```

pub mod check;
pub mod corpus;
pub mod extract;
pub mod models;
pub mod output;
pub mod sequence;
pub mod similarity;
pub mod tokenize;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::check::{
        check_documents, check_plagiarism, check_plagiarism_with_params, compare_texts,
        overall_similarity,
    };
    pub use crate::corpus::{
        load_corpus, load_corpus_db, load_corpus_excel, load_corpus_json, sample_corpus,
        CorpusError,
    };
    pub use crate::extract::{extract_text, ExtractError, ExtractorRegistry, TextExtractor};
    pub use crate::models::{
        CheckParams, ComparisonSummary, MatchedSequence, PlagiarismReport, ReferenceDocument,
        ReportDocument, SimilarityLevel, SourceMatch,
    };
    pub use crate::output::{
        format_text_report, print_matches, print_summary, report_document, write_csv,
        write_csv_file, write_json, write_json_file, write_text_file, OutputError,
    };
    pub use crate::sequence::{find_common_sequences, DEFAULT_MIN_MATCH_LENGTH};
    pub use crate::similarity::cosine_similarity;
    pub use crate::tokenize::{tokenize, STOP_WORDS};
}

// Re-export commonly used types at the crate root
pub use check::check_plagiarism;
pub use models::{CheckParams, PlagiarismReport, ReferenceDocument, SourceMatch};
