//! Data structures for the plagiarism detection pipeline.

use serde::{Deserialize, Serialize};

/// A document from the reference corpus.
///
/// Supplied by the corpus loaders; the engine only ever reads it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceDocument {
    pub source: String,
    #[serde(default)]
    pub url: Option<String>,
    pub text: String,
}

impl ReferenceDocument {
    pub fn new(source: impl Into<String>, url: Option<&str>, text: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            url: url.map(str::to_string),
            text: text.into(),
        }
    }
}

/// A contiguous run of words shared between the candidate and a reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchedSequence {
    pub text: String,    // Space-joined candidate tokens
    pub length: usize,   // Length in tokens
    pub position: usize, // Start index in the candidate's token sequence
}

/// Evidence for one reference document that passed the inclusion threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceMatch {
    pub source: String,
    pub url: String,
    pub similarity: f64, // Percentage in [0, 100], rounded to 2 decimals
    pub matched_sequences: Vec<MatchedSequence>,
}

impl SourceMatch {
    /// Length of the longest matched sequence, 0 if there is none.
    pub fn longest_sequence(&self) -> usize {
        self.matched_sequences
            .iter()
            .map(|s| s.length)
            .max()
            .unwrap_or(0)
    }
}

/// Result of checking one candidate text against a corpus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlagiarismReport {
    pub overall_similarity: f64,
    pub total_words: usize,
    pub matches: Vec<SourceMatch>,
}

impl PlagiarismReport {
    pub fn source_count(&self) -> usize {
        self.matches.len()
    }

    pub fn level(&self) -> SimilarityLevel {
        SimilarityLevel::from_score(self.overall_similarity)
    }
}

/// Qualitative interpretation of an overall similarity score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SimilarityLevel {
    Low,
    Moderate,
    High,
}

impl SimilarityLevel {
    pub fn from_score(score: f64) -> Self {
        if score < 15.0 {
            SimilarityLevel::Low
        } else if score < 30.0 {
            SimilarityLevel::Moderate
        } else {
            SimilarityLevel::High
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SimilarityLevel::Low => "LOW",
            SimilarityLevel::Moderate => "MODERATE",
            SimilarityLevel::High => "HIGH",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            SimilarityLevel::Low => "Low similarity - the document appears to be largely original.",
            SimilarityLevel::Moderate => {
                "Moderate similarity - some passages should be reviewed and cited."
            }
            SimilarityLevel::High => {
                "High similarity - substantial overlap with reference sources was detected."
            }
        }
    }
}

/// Check parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckParams {
    pub min_match_length: usize,         // Minimum matched sequence length in tokens
    pub inclusion_threshold: f64,        // Sources must score strictly above this percentage
    pub max_sequences_per_source: usize, // Evidence cap per source
    pub autojunk: bool,                  // Popular-token heuristic in the block matcher
    pub filter_stop_words: bool,         // Drop STOP_WORDS before scoring and matching
}

impl Default for CheckParams {
    fn default() -> Self {
        Self {
            min_match_length: 5,
            inclusion_threshold: 5.0,
            max_sequences_per_source: 5,
            autojunk: true,
            filter_stop_words: false,
        }
    }
}

/// Export envelope: a report plus the context it was produced in.
#[derive(Debug, Serialize, Deserialize)]
pub struct ReportDocument {
    pub version: String,
    pub generated_at: String,
    pub document_name: String,
    pub parameters: CheckParams,
    pub level: SimilarityLevel,
    pub report: PlagiarismReport,
}

/// Pairwise comparison of two texts outside of a corpus check.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonSummary {
    pub similarity: f64,
    pub total_words_a: usize,
    pub total_words_b: usize,
    pub sequences: Vec<MatchedSequence>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_bands() {
        assert_eq!(SimilarityLevel::from_score(0.0), SimilarityLevel::Low);
        assert_eq!(SimilarityLevel::from_score(14.99), SimilarityLevel::Low);
        assert_eq!(SimilarityLevel::from_score(15.0), SimilarityLevel::Moderate);
        assert_eq!(SimilarityLevel::from_score(29.99), SimilarityLevel::Moderate);
        assert_eq!(SimilarityLevel::from_score(30.0), SimilarityLevel::High);
        assert_eq!(SimilarityLevel::from_score(100.0), SimilarityLevel::High);
    }

    #[test]
    fn test_reference_document_url_is_optional() {
        let doc: ReferenceDocument =
            serde_json::from_str(r#"{"source": "Notes", "text": "some words"}"#).unwrap();
        assert_eq!(doc.source, "Notes");
        assert_eq!(doc.url, None);
    }

    #[test]
    fn test_longest_sequence() {
        let m = SourceMatch {
            source: "a".to_string(),
            url: String::new(),
            similarity: 42.0,
            matched_sequences: vec![
                MatchedSequence { text: "a b c d e".to_string(), length: 5, position: 0 },
                MatchedSequence { text: "f g h i j k l".to_string(), length: 7, position: 9 },
            ],
        };
        assert_eq!(m.longest_sequence(), 7);
    }
}
