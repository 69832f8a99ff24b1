//! Text Extractor: turns an ingested document into normalized text.
//!
//! Pure function of the input bytes: no disk or network access happens here.
//! Callers read the file (or receive an upload) and hand over the bytes.

pub mod docx;

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::path::Path;

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::errors::ScreeningError;

/// Source formats the extractor can decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentFormat {
    Pdf,
    Docx,
    Txt,
}

impl DocumentFormat {
    pub const SUPPORTED_EXTENSIONS: &'static [&'static str] = &["pdf", "docx", "txt"];

    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "pdf" => Some(Self::Pdf),
            "docx" => Some(Self::Docx),
            "txt" => Some(Self::Txt),
            _ => None,
        }
    }

    /// Detects the format from a file name, failing with `Parse` for anything else.
    pub fn detect(file_name: &str) -> Result<Self, ScreeningError> {
        Path::new(file_name)
            .extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
            .ok_or_else(|| {
                ScreeningError::parse(format!(
                    "unsupported format for '{file_name}' (expected one of: {})",
                    Self::SUPPORTED_EXTENSIONS.join(", ")
                ))
            })
    }
}

/// A candidate document as ingested: raw bytes plus detected format.
/// Immutable after construction; discarded once scoring completes.
#[derive(Debug, Clone)]
pub struct CandidateDocument {
    pub file_name: String,
    pub format: DocumentFormat,
    pub bytes: Bytes,
}

impl CandidateDocument {
    pub fn new(file_name: impl Into<String>, bytes: impl Into<Bytes>) -> Result<Self, ScreeningError> {
        let file_name = file_name.into();
        let format = DocumentFormat::detect(&file_name)?;
        Ok(Self {
            file_name,
            format,
            bytes: bytes.into(),
        })
    }
}

/// Decodes the document and returns normalized (lowercased, whitespace-collapsed) text.
pub fn extract_normalized(document: &CandidateDocument) -> Result<String, ScreeningError> {
    extract_raw(document).map(|text| normalize_text(&text))
}

/// Decodes the document into its raw text, preserving case and layout.
pub fn extract_raw(document: &CandidateDocument) -> Result<String, ScreeningError> {
    match document.format {
        DocumentFormat::Txt => Ok(String::from_utf8_lossy(&document.bytes).into_owned()),
        DocumentFormat::Docx => docx::extract_docx_text(&document.bytes),
        DocumentFormat::Pdf => extract_pdf_text(&document.bytes),
    }
}

fn extract_pdf_text(bytes: &[u8]) -> Result<String, ScreeningError> {
    // pdf-extract panics on some malformed inputs instead of returning an error.
    match catch_unwind(AssertUnwindSafe(|| pdf_extract::extract_text_from_mem(bytes))) {
        Ok(Ok(text)) => Ok(text),
        Ok(Err(e)) => Err(ScreeningError::parse(format!("PDF extraction failed: {e}"))),
        Err(_) => Err(ScreeningError::parse("PDF extraction aborted on malformed input")),
    }
}

/// Lowercases and collapses every whitespace run into a single space.
/// Idempotent: normalizing normalized text is a no-op.
pub fn normalize_text(text: &str) -> String {
    text.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}
