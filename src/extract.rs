//! Plain text extraction from candidate document files.
//!
//! One extractor per format, picked by file extension. The engine never sees
//! files, only the text these produce.

use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Unsupported file type: {0}")]
    UnsupportedExtension(String),
    #[error(
        "Support for .{extension} files is not available in this build \
         (enable the `{feature}` feature)"
    )]
    MissingCapability {
        extension: String,
        feature: &'static str,
    },
    #[error("Could not read {format} document: {reason}")]
    Corrupt { format: &'static str, reason: String },
}

/// A document format that can be turned into plain text.
pub trait TextExtractor: Send + Sync {
    /// Human-readable format name.
    fn name(&self) -> &'static str;

    /// Lowercase file extensions this extractor handles.
    fn extensions(&self) -> &'static [&'static str];

    fn extract_bytes(&self, bytes: &[u8]) -> Result<String, ExtractError>;
}

/// UTF-8 text files.
pub struct PlainTextExtractor;

impl TextExtractor for PlainTextExtractor {
    fn name(&self) -> &'static str {
        "text"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &["txt", "text", "md"]
    }

    fn extract_bytes(&self, bytes: &[u8]) -> Result<String, ExtractError> {
        // Tolerate a UTF-8 byte order mark
        let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
        String::from_utf8(bytes.to_vec()).map_err(|e| ExtractError::Corrupt {
            format: "text",
            reason: e.to_string(),
        })
    }
}

/// Word documents (.docx).
#[cfg(feature = "docx")]
pub struct DocxExtractor;

#[cfg(feature = "docx")]
impl DocxExtractor {
    fn paragraph_text(paragraph: &docx_rs::Paragraph) -> String {
        let mut content = String::new();
        for child in &paragraph.children {
            if let docx_rs::ParagraphChild::Run(run) = child {
                for run_child in &run.children {
                    if let docx_rs::RunChild::Text(text) = run_child {
                        content.push_str(&text.text);
                    }
                }
            }
        }
        content
    }

    fn table_text(table: &docx_rs::Table) -> Vec<String> {
        let mut lines = Vec::new();
        for table_child in &table.rows {
            let docx_rs::TableChild::TableRow(row) = table_child;
            let mut cells = Vec::new();
            for row_child in &row.cells {
                let docx_rs::TableRowChild::TableCell(cell) = row_child;
                for cell_child in &cell.children {
                    if let docx_rs::TableCellContent::Paragraph(para) = cell_child {
                        let text = Self::paragraph_text(para);
                        if !text.trim().is_empty() {
                            cells.push(text.trim().to_string());
                        }
                    }
                }
            }
            if !cells.is_empty() {
                lines.push(cells.join(" "));
            }
        }
        lines
    }
}

#[cfg(feature = "docx")]
impl TextExtractor for DocxExtractor {
    fn name(&self) -> &'static str {
        "docx"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &["docx"]
    }

    fn extract_bytes(&self, bytes: &[u8]) -> Result<String, ExtractError> {
        let docx = docx_rs::read_docx(bytes).map_err(|e| ExtractError::Corrupt {
            format: "docx",
            reason: e.to_string(),
        })?;

        let mut lines = Vec::new();
        for child in &docx.document.children {
            match child {
                docx_rs::DocumentChild::Paragraph(paragraph) => {
                    let text = Self::paragraph_text(paragraph);
                    if !text.trim().is_empty() {
                        lines.push(text);
                    }
                }
                docx_rs::DocumentChild::Table(table) => {
                    lines.extend(Self::table_text(table));
                }
                _ => {}
            }
        }

        Ok(lines.join("\n"))
    }
}

/// PDF documents.
#[cfg(feature = "pdf")]
pub struct PdfExtractor;

#[cfg(feature = "pdf")]
impl TextExtractor for PdfExtractor {
    fn name(&self) -> &'static str {
        "pdf"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &["pdf"]
    }

    fn extract_bytes(&self, bytes: &[u8]) -> Result<String, ExtractError> {
        pdf_extract::extract_text_from_mem(bytes).map_err(|e| ExtractError::Corrupt {
            format: "pdf",
            reason: e.to_string(),
        })
    }
}

/// Extensions that have an extractor behind a cargo feature.
const OPTIONAL_FORMATS: &[(&str, &str)] = &[("docx", "docx"), ("pdf", "pdf")];

/// Extension-dispatched set of extractors.
pub struct ExtractorRegistry {
    extractors: Vec<Box<dyn TextExtractor>>,
}

impl Default for ExtractorRegistry {
    /// Every extractor compiled into this build.
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.register(Box::new(PlainTextExtractor));
        #[cfg(feature = "docx")]
        registry.register(Box::new(DocxExtractor));
        #[cfg(feature = "pdf")]
        registry.register(Box::new(PdfExtractor));
        registry
    }
}

impl ExtractorRegistry {
    pub fn empty() -> Self {
        Self {
            extractors: Vec::new(),
        }
    }

    pub fn register(&mut self, extractor: Box<dyn TextExtractor>) {
        self.extractors.push(extractor);
    }

    /// Extractor responsible for `extension` (case-insensitive).
    pub fn for_extension(&self, extension: &str) -> Option<&dyn TextExtractor> {
        let extension = extension.to_ascii_lowercase();
        self.extractors
            .iter()
            .find(|e| e.extensions().contains(&extension.as_str()))
            .map(|e| e.as_ref())
    }

    pub fn supported_extensions(&self) -> Vec<&'static str> {
        self.extractors
            .iter()
            .flat_map(|e| e.extensions().iter().copied())
            .collect()
    }

    /// Extract text from the file at `path`, choosing by its extension.
    pub fn extract_file(&self, path: &Path) -> Result<String, ExtractError> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .ok_or_else(|| ExtractError::UnsupportedExtension(path.display().to_string()))?;

        let extractor = match self.for_extension(&extension) {
            Some(extractor) => extractor,
            None => {
                return Err(
                    match OPTIONAL_FORMATS.iter().find(|(ext, _)| *ext == extension) {
                        Some(&(_, feature)) => ExtractError::MissingCapability {
                            extension,
                            feature,
                        },
                        None => ExtractError::UnsupportedExtension(extension),
                    },
                );
            }
        };

        let bytes = std::fs::read(path)?;
        let text = extractor.extract_bytes(&bytes)?;
        tracing::debug!(
            path = %path.display(),
            format = extractor.name(),
            chars = text.len(),
            "extracted document text"
        );
        Ok(text)
    }
}

/// Extract text from a file with the default registry.
pub fn extract_text(path: &Path) -> Result<String, ExtractError> {
    ExtractorRegistry::default().extract_file(path)
}
