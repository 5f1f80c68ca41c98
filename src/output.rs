//! Output formatting for plagiarism reports (text, JSON, CSV, console).

use chrono::{DateTime, Local};
use std::io::{self, Write};
use std::path::Path;
use thiserror::Error;

use crate::models::{CheckParams, PlagiarismReport, ReportDocument, SourceMatch};

#[derive(Error, Debug)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

const RULE: &str = "======================================================================";
const THIN_RULE: &str = "----------------------------------------------------------------------";

/// Wrap a report with the context needed to export it.
pub fn report_document(
    report: &PlagiarismReport,
    document_name: &str,
    params: &CheckParams,
    generated_at: DateTime<Local>,
) -> ReportDocument {
    ReportDocument {
        version: env!("CARGO_PKG_VERSION").to_string(),
        generated_at: generated_at.to_rfc3339(),
        document_name: document_name.to_string(),
        parameters: params.clone(),
        level: report.level(),
        report: report.clone(),
    }
}

/// Render a human-readable plagiarism report.
pub fn format_text_report(
    report: &PlagiarismReport,
    document_name: &str,
    generated_at: DateTime<Local>,
) -> String {
    let level = report.level();
    let mut out = String::new();

    out.push_str(&format!("{RULE}\nPLAGIARISM DETECTION REPORT\n{RULE}\n\n"));
    out.push_str(&format!(
        "Generated: {}\n",
        generated_at.format("%Y-%m-%d %H:%M:%S")
    ));
    out.push_str(&format!("Document: {document_name}\n\n"));
    out.push_str(&format!(
        "Overall Similarity: {:.2}%\n",
        report.overall_similarity
    ));
    out.push_str(&format!("Total Words: {}\n", report.total_words));
    out.push_str(&format!("Sources Found: {}\n\n", report.source_count()));
    out.push_str(&format!("Interpretation: {}\n", level.label()));
    out.push_str(&format!("  {}\n\n", level.description()));

    if report.matches.is_empty() {
        out.push_str("No matching sources were found.\n");
    } else {
        out.push_str(&format!("{THIN_RULE}\nMATCHED SOURCES\n{THIN_RULE}\n"));
        for (rank, source) in report.matches.iter().enumerate() {
            out.push('\n');
            out.push_str(&format_source_match(rank + 1, source));
        }
    }

    out.push_str(&format!("\n{RULE}\n"));
    out
}

/// Format one source entry with its excerpts.
pub fn format_source_match(rank: usize, source: &SourceMatch) -> String {
    let mut out = format!(
        "{}. {}\n   Similarity: {:.2}%\n",
        rank, source.source, source.similarity
    );
    if !source.url.is_empty() {
        out.push_str(&format!("   URL: {}\n", source.url));
    }
    if !source.matched_sequences.is_empty() {
        out.push_str("   Matched passages:\n");
        for seq in &source.matched_sequences {
            out.push_str(&format!(
                "     - \"{}\" ({} words, at word {})\n",
                seq.text, seq.length, seq.position
            ));
        }
    }
    out
}

/// Write the text report to a file.
pub fn write_text_file(
    report: &PlagiarismReport,
    document_name: &str,
    generated_at: DateTime<Local>,
    path: &Path,
) -> Result<(), OutputError> {
    std::fs::write(path, format_text_report(report, document_name, generated_at))?;
    Ok(())
}

/// Write a report document as JSON.
pub fn write_json<W: Write>(document: &ReportDocument, writer: &mut W) -> Result<(), OutputError> {
    let json = serde_json::to_string_pretty(document)?;
    writer.write_all(json.as_bytes())?;
    Ok(())
}

/// Write a report document as JSON to a file.
pub fn write_json_file(document: &ReportDocument, path: &Path) -> Result<(), OutputError> {
    let mut file = std::fs::File::create(path)?;
    write_json(document, &mut file)
}

/// Quote a CSV field when it contains a delimiter, quote or newline.
fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Write matched sources as CSV, one row per source.
pub fn write_csv<W: Write>(report: &PlagiarismReport, writer: &mut W) -> Result<(), OutputError> {
    writeln!(
        writer,
        "rank,source,url,similarity,matched_sequences,longest_sequence"
    )?;

    for (rank, source) in report.matches.iter().enumerate() {
        writeln!(
            writer,
            "{},{},{},{:.2},{},{}",
            rank + 1,
            csv_field(&source.source),
            csv_field(&source.url),
            source.similarity,
            source.matched_sequences.len(),
            source.longest_sequence()
        )?;
    }

    Ok(())
}

/// Write matched sources as CSV to a file.
pub fn write_csv_file(report: &PlagiarismReport, path: &Path) -> Result<(), OutputError> {
    let mut file = std::fs::File::create(path)?;
    write_csv(report, &mut file)
}

/// Write a summary to stdout.
pub fn print_summary(report: &PlagiarismReport, document_name: &str) {
    let level = report.level();
    println!("\n=== Plagiarism Check Summary ===");
    println!("Document: {}", document_name);
    println!("Total words: {}", report.total_words);
    println!("Sources found: {}", report.source_count());
    println!(
        "Overall similarity: {:.2}% ({})",
        report.overall_similarity,
        level.label()
    );
}

/// Print matched sources, optionally only the first `limit`.
pub fn print_matches(report: &PlagiarismReport, limit: Option<usize>) {
    let matches = &report.matches;
    let to_print = match limit {
        Some(n) => &matches[..n.min(matches.len())],
        None => matches.as_slice(),
    };

    for (rank, source) in to_print.iter().enumerate() {
        print!("{}", format_source_match(rank + 1, source));
    }

    if let Some(n) = limit {
        if matches.len() > n {
            println!("... and {} more sources", matches.len() - n);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MatchedSequence;
    use chrono::TimeZone;

    fn timestamp() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 3, 5, 14, 30, 0).unwrap()
    }

    fn sample_report() -> PlagiarismReport {
        PlagiarismReport {
            overall_similarity: 68.0,
            total_words: 120,
            matches: vec![
                SourceMatch {
                    source: "Climate, Overview".to_string(),
                    url: "https://example.org/climate".to_string(),
                    similarity: 80.0,
                    matched_sequences: vec![MatchedSequence {
                        text: "burning of fossil fuels like coal".to_string(),
                        length: 6,
                        position: 12,
                    }],
                },
                SourceMatch {
                    source: "Notes".to_string(),
                    url: String::new(),
                    similarity: 20.0,
                    matched_sequences: Vec::new(),
                },
            ],
        }
    }

    #[test]
    fn test_text_report_fields() {
        let text = format_text_report(&sample_report(), "essay.docx", timestamp());

        assert!(text.contains("Generated: 2024-03-05 14:30:00"));
        assert!(text.contains("Document: essay.docx"));
        assert!(text.contains("Overall Similarity: 68.00%"));
        assert!(text.contains("Total Words: 120"));
        assert!(text.contains("Sources Found: 2"));
        assert!(text.contains("Interpretation: HIGH"));
        assert!(text.contains("1. Climate, Overview"));
        assert!(text.contains("URL: https://example.org/climate"));
        assert!(text.contains("\"burning of fossil fuels like coal\" (6 words, at word 12)"));
        assert!(text.contains("2. Notes"));
    }

    #[test]
    fn test_text_report_layout() {
        let text = format_text_report(&sample_report(), "essay.docx", timestamp());
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], RULE);
        assert_eq!(lines[1], "PLAGIARISM DETECTION REPORT");
        assert_eq!(lines[2], RULE);
        assert_eq!(lines[3], "");
        assert_eq!(lines[4], "Generated: 2024-03-05 14:30:00");
        assert_eq!(lines[5], "Document: essay.docx");
        assert_eq!(lines[6], "");
        assert_eq!(lines[7], "Overall Similarity: 68.00%");
        assert_eq!(*lines.last().unwrap(), RULE);
        assert!(text.ends_with('\n'));
    }

    #[test]
    fn test_source_entry_lines() {
        let entry = format_source_match(1, &sample_report().matches[0]);
        assert_eq!(
            entry,
            "1. Climate, Overview\n   Similarity: 80.00%\n   URL: https://example.org/climate\n   \
             Matched passages:\n     - \"burning of fossil fuels like coal\" (6 words, at word 12)\n"
        );
    }

    #[test]
    fn test_text_report_without_matches() {
        let report = PlagiarismReport {
            overall_similarity: 0.0,
            total_words: 40,
            matches: Vec::new(),
        };
        let text = format_text_report(&report, "clean.txt", timestamp());
        assert!(text.contains("Interpretation: LOW"));
        assert!(text.contains("No matching sources were found."));
        assert!(!text.contains("MATCHED SOURCES"));
    }

    #[test]
    fn test_source_without_url_omits_line() {
        let report = sample_report();
        let entry = format_source_match(2, &report.matches[1]);
        assert!(!entry.contains("URL:"));
        assert!(!entry.contains("Matched passages"));
    }

    #[test]
    fn test_csv_output() {
        let mut buf = Vec::new();
        write_csv(&sample_report(), &mut buf).unwrap();
        let csv = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "rank,source,url,similarity,matched_sequences,longest_sequence");
        assert_eq!(
            lines[1],
            "1,\"Climate, Overview\",https://example.org/climate,80.00,1,6"
        );
        assert_eq!(lines[2], "2,Notes,,20.00,0,0");
    }

    #[test]
    fn test_csv_field_quoting() {
        assert_eq!(csv_field("plain"), "plain");
        assert_eq!(csv_field("a \"quoted\" word"), "\"a \"\"quoted\"\" word\"");
    }

    #[test]
    fn test_json_output() {
        let report = sample_report();
        let document = report_document(&report, "essay.docx", &CheckParams::default(), timestamp());

        let mut buf = Vec::new();
        write_json(&document, &mut buf).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();

        assert_eq!(value["document_name"], "essay.docx");
        assert_eq!(value["level"], "high");
        assert_eq!(value["parameters"]["min_match_length"], 5);
        assert_eq!(value["report"]["overall_similarity"], 68.0);
        assert_eq!(value["report"]["total_words"], 120);
        assert_eq!(value["report"]["matches"][0]["matched_sequences"][0]["position"], 12);
    }
}
