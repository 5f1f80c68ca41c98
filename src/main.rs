//! Plagiarism Checker
//!
//! Checks documents for textual overlap with a reference corpus.

use chrono::Local;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::collections::HashSet;
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::warn;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use plagiarism_checker::check::{check_documents, check_plagiarism_with_params, compare_texts};
use plagiarism_checker::corpus::{load_corpus, sample_corpus};
use plagiarism_checker::extract::extract_text;
use plagiarism_checker::models::{CheckParams, PlagiarismReport, ReferenceDocument};
use plagiarism_checker::output::{
    format_text_report, print_matches, print_summary, report_document, write_csv,
    write_csv_file, write_json, write_json_file, write_text_file, OutputError,
};
use plagiarism_checker::tokenize::tokenize;

#[derive(Parser)]
#[command(name = "plagiarism-checker")]
#[command(about = "Check documents for textual overlap with a reference corpus")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Report output format
#[derive(Clone, Copy, Debug, ValueEnum)]
enum OutputFormat {
    /// Human-readable text report
    Text,
    /// JSON report with parameters and metadata
    Json,
    /// CSV, one row per matched source
    Csv,
}

impl OutputFormat {
    fn extension(self) -> &'static str {
        match self {
            OutputFormat::Text => "txt",
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
        }
    }
}

/// Parameters that inherit from CheckParams::default().
/// All use Option<T> so unset flags keep the library defaults.
#[derive(Args, Debug, Clone)]
struct ParamArgs {
    /// Minimum matched sequence length in words [default: 5]
    #[arg(long)]
    min_match_length: Option<usize>,

    /// Sources must score strictly above this percentage [default: 5.0]
    #[arg(long)]
    threshold: Option<f64>,

    /// Maximum matched passages reported per source [default: 5]
    #[arg(long)]
    max_sequences: Option<usize>,

    /// Ignore common English function words when comparing
    #[arg(long)]
    filter_stop_words: bool,

    /// Disable the popular-word heuristic of the sequence matcher
    #[arg(long)]
    no_autojunk: bool,
}

impl ParamArgs {
    fn to_params(&self) -> CheckParams {
        let defaults = CheckParams::default();
        CheckParams {
            min_match_length: self.min_match_length.unwrap_or(defaults.min_match_length),
            inclusion_threshold: self.threshold.unwrap_or(defaults.inclusion_threshold),
            max_sequences_per_source: self
                .max_sequences
                .unwrap_or(defaults.max_sequences_per_source),
            autojunk: !self.no_autojunk && defaults.autojunk,
            filter_stop_words: self.filter_stop_words || defaults.filter_stop_words,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Check one document against the reference corpus
    Check {
        /// Document to check (.txt, .md, .docx, .pdf)
        #[arg(long)]
        input: PathBuf,

        /// Corpus file (.json, .db, .xlsx); the built-in sample corpus if omitted
        #[arg(long)]
        corpus: Option<PathBuf>,

        /// Document name shown in the report [default: input file name]
        #[arg(long)]
        name: Option<String>,

        /// Output file path; the report goes to stdout if omitted
        #[arg(long)]
        output: Option<PathBuf>,

        /// Output format
        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,

        /// Reject documents with fewer characters than this
        #[arg(long, default_value = "50")]
        min_chars: usize,

        #[command(flatten)]
        params: ParamArgs,

        /// Print first N matched sources to console
        #[arg(long)]
        show_matches: Option<usize>,

        /// Suppress progress and summary output
        #[arg(long)]
        quiet: bool,
    },

    /// Check several documents in parallel
    Batch {
        /// Documents to check
        #[arg(long, num_args = 1.., required = true)]
        inputs: Vec<PathBuf>,

        /// Corpus file (.json, .db, .xlsx); the built-in sample corpus if omitted
        #[arg(long)]
        corpus: Option<PathBuf>,

        /// Directory to write one report per document into
        #[arg(long)]
        output_dir: Option<PathBuf>,

        /// Output format for written reports
        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,

        /// Skip documents with fewer characters than this
        #[arg(long, default_value = "50")]
        min_chars: usize,

        #[command(flatten)]
        params: ParamArgs,

        /// Suppress progress output
        #[arg(long)]
        quiet: bool,
    },

    /// Compare two documents directly
    Compare {
        /// First document
        #[arg(long)]
        a: PathBuf,

        /// Second document
        #[arg(long)]
        b: PathBuf,

        #[command(flatten)]
        params: ParamArgs,

        /// Print the comparison as JSON
        #[arg(long)]
        json: bool,
    },

    /// List the documents in the reference corpus
    Corpus {
        /// Corpus file (.json, .db, .xlsx); the built-in sample corpus if omitted
        #[arg(long)]
        corpus: Option<PathBuf>,
    },
}

#[derive(Error, Debug)]
enum CliError {
    #[error("{name}: text is too short to check ({chars} characters, minimum {min})")]
    TextTooShort {
        name: String,
        chars: usize,
        min: usize,
    },
    #[error("No documents could be checked")]
    NothingToCheck,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let quiet = matches!(
        cli.command,
        Commands::Check { quiet: true, .. } | Commands::Batch { quiet: true, .. }
    );
    let default_filter = if quiet { "warn" } else { "plagiarism_checker=info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Commands::Check {
            input,
            corpus,
            name,
            output,
            format,
            min_chars,
            params,
            show_matches,
            quiet,
        } => {
            let params = params.to_params();
            let references = resolve_corpus(corpus.as_deref())?;
            let name = name.unwrap_or_else(|| display_name(&input));

            let text = extract_text(&input)?;
            validate_length(&name, &text, min_chars)?;

            let report = check_plagiarism_with_params(&text, &references, &params);

            match output {
                Some(path) => {
                    write_report(&report, &name, &params, format, &path)?;
                    if !quiet {
                        print_summary(&report, &name);
                        eprintln!("\nOutput: {}", path.display());
                    }
                }
                None => print_report(&report, &name, &params, format)?,
            }

            if let Some(limit) = show_matches {
                println!("\n=== Matched Sources ===");
                print_matches(&report, Some(limit));
            }
        }

        Commands::Batch {
            inputs,
            corpus,
            output_dir,
            format,
            min_chars,
            params,
            quiet,
        } => {
            let params = params.to_params();
            let references = resolve_corpus(corpus.as_deref())?;

            let mut names = Vec::with_capacity(inputs.len());
            let mut checked = Vec::with_capacity(inputs.len());
            let mut texts = Vec::with_capacity(inputs.len());
            for input in &inputs {
                // Full path, so inputs sharing a file name stay distinguishable
                let name = input.display().to_string();
                let text = match extract_text(input) {
                    Ok(text) => text,
                    Err(e) => {
                        warn!(document = %name, error = %e, "skipping document");
                        continue;
                    }
                };
                if let Err(e) = validate_length(&name, &text, min_chars) {
                    warn!(document = %name, error = %e, "skipping document");
                    continue;
                }
                names.push(name);
                checked.push(input.as_path());
                texts.push(text);
            }

            if texts.is_empty() {
                return Err(CliError::NothingToCheck.into());
            }

            if let Some(dir) = &output_dir {
                std::fs::create_dir_all(dir)?;
            }

            let reports = check_documents(&texts, &references, &params, !quiet);
            let report_paths = output_dir
                .as_deref()
                .map(|dir| report_paths(dir, &checked, format.extension()));

            for (index, (name, report)) in names.iter().zip(&reports).enumerate() {
                println!(
                    "{}: {:.2}% ({}, {} sources, {} words)",
                    name,
                    report.overall_similarity,
                    report.level().label(),
                    report.source_count(),
                    report.total_words
                );

                if let Some(paths) = &report_paths {
                    write_report(report, name, &params, format, &paths[index])?;
                }
            }
        }

        Commands::Compare { a, b, params, json } => {
            let params = params.to_params();
            let text_a = extract_text(&a)?;
            let text_b = extract_text(&b)?;

            let summary = compare_texts(&text_a, &text_b, &params);

            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                println!("=== Comparison ===");
                println!("A: {} ({} words)", a.display(), summary.total_words_a);
                println!("B: {} ({} words)", b.display(), summary.total_words_b);
                println!("Cosine similarity: {:.2}%", summary.similarity);
                println!("Common sequences: {}", summary.sequences.len());
                for seq in &summary.sequences {
                    println!(
                        "  [{}] \"{}\" ({} words)",
                        seq.position, seq.text, seq.length
                    );
                }
            }
        }

        Commands::Corpus { corpus } => {
            let references = resolve_corpus(corpus.as_deref())?;

            println!("=== Reference Corpus ===");
            println!("Documents: {}", references.len());
            for doc in &references {
                let url = doc.url.as_deref().unwrap_or("-");
                println!(
                    "  {} ({} words) {}",
                    doc.source,
                    tokenize(&doc.text).len(),
                    url
                );
            }
        }
    }

    Ok(())
}

/// Load the corpus file if one was given, else the built-in sample corpus.
fn resolve_corpus(
    path: Option<&Path>,
) -> Result<Vec<ReferenceDocument>, Box<dyn std::error::Error>> {
    match path {
        Some(path) => Ok(load_corpus(path)?),
        None => Ok(sample_corpus()),
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// One report path per input inside `dir`, named `{stem}.report.{ext}`.
///
/// Inputs sharing a stem (`a/essay.txt`, `b/essay.txt`, `essay.docx`) get a
/// numeric suffix in input order, so no report overwrites another.
fn report_paths(dir: &Path, inputs: &[&Path], extension: &str) -> Vec<PathBuf> {
    let mut used = HashSet::new();
    inputs
        .iter()
        .map(|input| {
            let stem = input
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| "document".to_string());
            let mut file_name = format!("{stem}.report.{extension}");
            let mut suffix = 2;
            while !used.insert(file_name.clone()) {
                file_name = format!("{stem}-{suffix}.report.{extension}");
                suffix += 1;
            }
            dir.join(file_name)
        })
        .collect()
}

/// Very short texts score as noise, so they are rejected before checking.
fn validate_length(name: &str, text: &str, min_chars: usize) -> Result<(), CliError> {
    let chars = text.trim().chars().count();
    if chars < min_chars {
        return Err(CliError::TextTooShort {
            name: name.to_string(),
            chars,
            min: min_chars,
        });
    }
    Ok(())
}

fn write_report(
    report: &PlagiarismReport,
    name: &str,
    params: &CheckParams,
    format: OutputFormat,
    path: &Path,
) -> Result<(), OutputError> {
    let now = Local::now();
    match format {
        OutputFormat::Text => write_text_file(report, name, now, path),
        OutputFormat::Json => write_json_file(&report_document(report, name, params, now), path),
        OutputFormat::Csv => write_csv_file(report, path),
    }
}

fn print_report(
    report: &PlagiarismReport,
    name: &str,
    params: &CheckParams,
    format: OutputFormat,
) -> Result<(), OutputError> {
    let now = Local::now();
    let mut stdout = std::io::stdout().lock();
    match format {
        OutputFormat::Text => {
            stdout.write_all(format_text_report(report, name, now).as_bytes())?;
        }
        OutputFormat::Json => {
            write_json(&report_document(report, name, params, now), &mut stdout)?;
            writeln!(stdout)?;
        }
        OutputFormat::Csv => write_csv(report, &mut stdout)?,
    }
    Ok(())
}
