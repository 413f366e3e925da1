//! Text Extraction — converts uploaded document bytes into plain text.
//!
//! Dispatch is on the declared `FileKind`, which comes from the upload's
//! filename extension. Every branch is a pure function of its input bytes.
//! A malformed document is an `ExtractError`, never an empty string.

use std::path::Path;

use serde::Serialize;
use thiserror::Error;

pub mod docx;
pub mod pdf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FileKind {
    Pdf,
    Docx,
    PlainText,
}

impl FileKind {
    /// `.pdf` and `.docx` (any case) get their own extractors; everything
    /// else is treated as UTF-8 text.
    pub fn from_filename(name: &str) -> Self {
        let ext = Path::new(name)
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        match ext.as_str() {
            "pdf" => FileKind::Pdf,
            "docx" => FileKind::Docx,
            _ => FileKind::PlainText,
        }
    }
}

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("PDF parse error: {0}")]
    Pdf(String),

    #[error("DOCX parse error: {0}")]
    Docx(String),

    #[error("file is not valid UTF-8 text (invalid byte at offset {valid_up_to})")]
    NotUtf8 { valid_up_to: usize },
}

/// Extracts plain text from `bytes` according to `kind`.
/// A zero-byte upload is an empty document for every kind.
pub fn extract_text(bytes: &[u8], kind: FileKind) -> Result<String, ExtractError> {
    if bytes.is_empty() {
        return Ok(String::new());
    }

    match kind {
        FileKind::Pdf => pdf::extract(bytes),
        FileKind::Docx => docx::extract(bytes),
        FileKind::PlainText => String::from_utf8(bytes.to_vec()).map_err(|e| {
            ExtractError::NotUtf8 {
                valid_up_to: e.utf8_error().valid_up_to(),
            }
        }),
    }
}
