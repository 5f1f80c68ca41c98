//! Reference corpus sources.
//!
//! The checker ships with a small built-in sample corpus. Larger corpora can
//! be loaded read-only from JSON, a SQLite database or an Excel sheet.

use calamine::{open_workbook, Reader, Xlsx};
use rusqlite::{Connection, OpenFlags};
use std::path::Path;
use thiserror::Error;
use tracing::warn;

use crate::models::ReferenceDocument;

#[derive(Error, Debug)]
pub enum CorpusError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Excel XLSX error: {0}")]
    ExcelXlsx(#[from] calamine::XlsxError),
    #[error("Excel sheet has no '{0}' column")]
    MissingColumn(&'static str),
    #[error("Unsupported corpus format: {0}")]
    UnsupportedFormat(String),
}

/// The built-in reference documents.
pub fn sample_corpus() -> Vec<ReferenceDocument> {
    vec![
        ReferenceDocument::new(
            "Introduction to Machine Learning",
            Some("https://example.edu/ml-intro"),
            "Machine learning is a branch of artificial intelligence that focuses on building \
             systems that learn from data. Instead of being explicitly programmed to perform a \
             task, a machine learning model improves its performance as it is exposed to more \
             examples. Supervised learning uses labeled examples to learn a mapping from inputs \
             to outputs, while unsupervised learning looks for structure in data without labels. \
             Common applications include spam filtering, image recognition, recommendation \
             engines and speech recognition.",
        ),
        ReferenceDocument::new(
            "Climate Change Overview",
            Some("https://example.org/climate-overview"),
            "Climate change refers to long-term shifts in temperatures and weather patterns. \
             Since the industrial revolution, human activities have been the main driver of \
             climate change, primarily due to the burning of fossil fuels like coal, oil and \
             gas. Burning fossil fuels generates greenhouse gas emissions that act like a \
             blanket wrapped around the earth, trapping the heat of the sun and raising \
             temperatures. The consequences include more intense droughts, rising sea levels, \
             melting polar ice and declining biodiversity.",
        ),
        ReferenceDocument::new(
            "The Water Cycle",
            Some("https://example.edu/earth-science/water-cycle"),
            "The water cycle describes how water evaporates from the surface of the earth, \
             rises into the atmosphere, cools and condenses into clouds, and falls again to the \
             surface as precipitation. Water falling on land collects in rivers and lakes, soil \
             and porous layers of rock, and much of it flows back into the oceans, where it will \
             once more evaporate. The cycling of water in and out of the atmosphere is a \
             significant aspect of the weather patterns on earth.",
        ),
        ReferenceDocument::new(
            "History of the Printing Press",
            Some("https://example.org/history/printing-press"),
            "The printing press was invented by Johannes Gutenberg around 1440 in the Holy \
             Roman Empire. Gutenberg combined movable metal type, oil based inks and a wooden \
             screw press to produce books far more quickly than scribes could copy them by \
             hand. The spread of printing made books cheaper and more widely available, which \
             helped increase literacy and allowed new ideas to travel across Europe during the \
             Renaissance and the Reformation.",
        ),
        ReferenceDocument::new(
            "Photosynthesis Basics",
            None,
            "Photosynthesis is the process by which green plants, algae and some bacteria \
             convert light energy into chemical energy. During photosynthesis, carbon dioxide \
             and water are transformed into glucose and oxygen using energy captured from \
             sunlight by chlorophyll. The process takes place mainly in the chloroplasts of \
             leaf cells and provides the oxygen that most living organisms need to survive.",
        ),
    ]
}

/// Load a corpus from a JSON array of `{source, url?, text}` objects.
pub fn load_corpus_json(path: &Path) -> Result<Vec<ReferenceDocument>, CorpusError> {
    let file = std::fs::File::open(path)?;
    let documents: Vec<ReferenceDocument> =
        serde_json::from_reader(std::io::BufReader::new(file))?;
    Ok(documents)
}

/// Load a corpus from the `reference_documents` table of a SQLite database.
///
/// The database is opened read-only; rows come back in insertion order.
pub fn load_corpus_db(db_path: &Path) -> Result<Vec<ReferenceDocument>, CorpusError> {
    let conn = Connection::open_with_flags(db_path, OpenFlags::SQLITE_OPEN_READ_ONLY)?;

    let mut stmt =
        conn.prepare("SELECT source, url, text FROM reference_documents ORDER BY rowid")?;
    let mut rows = stmt.query([])?;

    let mut documents = Vec::new();
    while let Some(row) = rows.next()? {
        let source: String = row.get(0)?;
        let url: Option<String> = row.get(1)?;
        let text: String = row.get(2)?;
        documents.push(ReferenceDocument { source, url, text });
    }

    Ok(documents)
}

/// Column indices for a corpus Excel sheet
struct ColumnIndices {
    source: Option<usize>,
    url: Option<usize>,
    text: Option<usize>,
}

fn find_column_indices(header: &[calamine::Data]) -> ColumnIndices {
    let mut indices = ColumnIndices {
        source: None,
        url: None,
        text: None,
    };

    for (i, cell) in header.iter().enumerate() {
        if let calamine::Data::String(name) = cell {
            match name.trim().to_lowercase().as_str() {
                "source" | "title" => indices.source = indices.source.or(Some(i)),
                "url" | "link" => indices.url = indices.url.or(Some(i)),
                "text" | "content" => indices.text = indices.text.or(Some(i)),
                _ => {}
            }
        }
    }

    indices
}

fn get_string_cell(row: &[calamine::Data], col: Option<usize>) -> Option<String> {
    col.and_then(|i| row.get(i)).and_then(|cell| match cell {
        calamine::Data::String(s) if !s.trim().is_empty() => Some(s.clone()),
        calamine::Data::Int(n) => Some(n.to_string()),
        calamine::Data::Float(n) => Some(n.to_string()),
        _ => None,
    })
}

/// Load a corpus from the first sheet of an Excel workbook.
///
/// The header row names the `source`, `url` and `text` columns. Rows
/// without a source or text are skipped.
pub fn load_corpus_excel(excel_path: &Path) -> Result<Vec<ReferenceDocument>, CorpusError> {
    let mut workbook: Xlsx<_> = open_workbook(excel_path)?;
    let mut documents = Vec::new();

    let Some(sheet_name) = workbook.sheet_names().first().cloned() else {
        return Ok(documents);
    };
    let range = workbook.worksheet_range(&sheet_name)?;
    let mut rows = range.rows();

    let Some(header) = rows.next() else {
        return Ok(documents);
    };
    let columns = find_column_indices(header);
    if columns.source.is_none() {
        return Err(CorpusError::MissingColumn("source"));
    }
    if columns.text.is_none() {
        return Err(CorpusError::MissingColumn("text"));
    }

    for (line, row) in rows.enumerate() {
        match (
            get_string_cell(row, columns.source),
            get_string_cell(row, columns.text),
        ) {
            (Some(source), Some(text)) => documents.push(ReferenceDocument {
                source,
                url: get_string_cell(row, columns.url),
                text,
            }),
            _ => warn!(
                row = line + 2,
                sheet = %sheet_name,
                "skipping corpus row without source or text"
            ),
        }
    }

    Ok(documents)
}

/// Load a corpus file, choosing the loader by extension.
pub fn load_corpus(path: &Path) -> Result<Vec<ReferenceDocument>, CorpusError> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    match extension.as_str() {
        "json" => load_corpus_json(path),
        "db" | "sqlite" | "sqlite3" => load_corpus_db(path),
        "xlsx" => load_corpus_excel(path),
        _ => Err(CorpusError::UnsupportedFormat(path.display().to_string())),
    }
}
