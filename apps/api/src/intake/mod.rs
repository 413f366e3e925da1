//! Input collection. Turns a multipart submission into explicit values and
//! resolves each optional document to plain text exactly once.

use std::collections::HashMap;

use axum::extract::Multipart;
use axum::http::HeaderMap;
use bytes::Bytes;
use tracing::debug;

use crate::credential::Credential;
use crate::errors::AppError;
use crate::extraction::{extract_text, FileKind};

/// Suffix of the pasted-text field for a document, e.g. `resume_text`.
pub const TEXT_SUFFIX: &str = "_text";
/// Suffix of the file-upload field for a document, e.g. `resume_file`.
pub const FILE_SUFFIX: &str = "_file";

#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub filename: String,
    pub bytes: Bytes,
}

impl UploadedFile {
    pub fn kind(&self) -> FileKind {
        FileKind::from_filename(&self.filename)
    }
}

/// One optional document: not supplied, pasted, or uploaded.
#[derive(Debug, Clone)]
pub enum DocumentInput {
    Absent,
    Pasted(String),
    Uploaded(UploadedFile),
}

impl DocumentInput {
    pub fn pasted(text: impl Into<String>) -> Self {
        DocumentInput::Pasted(text.into())
    }

    pub fn uploaded(filename: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        DocumentInput::Uploaded(UploadedFile {
            filename: filename.into(),
            bytes: bytes.into(),
        })
    }

    /// Short label for logs; never includes the content.
    pub fn describe(&self) -> String {
        match self {
            DocumentInput::Absent => "absent".to_string(),
            DocumentInput::Pasted(text) => format!("pasted ({} chars)", text.chars().count()),
            DocumentInput::Uploaded(file) => {
                format!("uploaded {:?} ({} bytes)", file.kind(), file.bytes.len())
            }
        }
    }

    /// Resolves to text. Extraction runs on the blocking pool; a failure
    /// (including a panicking extractor) is reported against `field`.
    pub async fn resolve(self, field: &str) -> Result<Option<String>, AppError> {
        match self {
            DocumentInput::Absent => Ok(None),
            DocumentInput::Pasted(text) => Ok(Some(text)),
            DocumentInput::Uploaded(file) => {
                let kind = file.kind();
                let bytes = file.bytes;
                let text = tokio::task::spawn_blocking(move || extract_text(&bytes, kind))
                    .await
                    .map_err(|e| AppError::ExtractorCrashed {
                        field: field.to_string(),
                        filename: file.filename.clone(),
                        reason: e.to_string(),
                    })?
                    .map_err(|source| AppError::Extraction {
                        field: field.to_string(),
                        filename: file.filename.clone(),
                        source,
                    })?;
                debug!(
                    "Extracted {} chars from {} ({:?})",
                    text.chars().count(),
                    field,
                    kind
                );
                Ok(Some(text))
            }
        }
    }
}

/// A multipart submission split into text fields and file fields.
#[derive(Debug, Default)]
pub struct SubmittedForm {
    texts: HashMap<String, String>,
    files: HashMap<String, UploadedFile>,
}

impl SubmittedForm {
    /// Drains a multipart body into `self`. Parts with a filename are files;
    /// the rest must be UTF-8 text. Fields read before a failure are kept.
    pub async fn read_multipart(&mut self, mut multipart: Multipart) -> Result<(), AppError> {
        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError::Validation(format!("Malformed form submission: {e}")))?
        {
            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };

            match field.file_name().map(str::to_string) {
                Some(filename) => {
                    let bytes = field.bytes().await.map_err(|e| {
                        AppError::Validation(format!("Could not read upload '{name}': {e}"))
                    })?;
                    self.insert_file(&name, filename, bytes);
                }
                None => {
                    let text = field.text().await.map_err(|e| {
                        AppError::Validation(format!("Could not read field '{name}': {e}"))
                    })?;
                    self.insert_text(&name, text);
                }
            }
        }

        Ok(())
    }

    pub fn insert_text(&mut self, name: &str, value: impl Into<String>) {
        self.texts.insert(name.to_string(), value.into());
    }

    pub fn insert_file(&mut self, name: &str, filename: impl Into<String>, bytes: impl Into<Bytes>) {
        self.files.insert(
            name.to_string(),
            UploadedFile {
                filename: filename.into(),
                bytes: bytes.into(),
            },
        );
    }

    pub fn text(&self, name: &str) -> Option<&str> {
        self.texts.get(name).map(String::as_str)
    }

    /// Trimmed, non-blank text value.
    pub fn non_blank(&self, name: &str) -> Option<String> {
        self.text(name)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    }

    /// Resolves `{name}_text` / `{name}_file` into one `DocumentInput`.
    /// Browsers send an empty, nameless part for an untouched file input;
    /// that counts as no upload. Pasting and uploading the same document is
    /// rejected.
    pub fn document(&self, name: &str) -> Result<DocumentInput, AppError> {
        let pasted = self
            .text(&format!("{name}{TEXT_SUFFIX}"))
            .filter(|s| !s.trim().is_empty());
        let uploaded = self
            .files
            .get(&format!("{name}{FILE_SUFFIX}"))
            .filter(|f| !f.filename.is_empty() || !f.bytes.is_empty());

        match (pasted, uploaded) {
            (Some(_), Some(_)) => Err(AppError::Validation(format!(
                "Provide either pasted text or an uploaded file for {}, not both",
                display_name(name)
            ))),
            (Some(text), None) => Ok(DocumentInput::pasted(text)),
            (None, Some(file)) => Ok(DocumentInput::uploaded(
                file.filename.clone(),
                file.bytes.clone(),
            )),
            (None, None) => Ok(DocumentInput::Absent),
        }
    }
}

/// Reads the credential and the form of one submission. The credential gate
/// runs before any form error surfaces: a body that fails to parse is
/// reported as a missing credential unless a key was already supplied.
pub async fn collect_submission(
    headers: &HeaderMap,
    multipart: Multipart,
) -> Result<(Credential, SubmittedForm), AppError> {
    let mut form = SubmittedForm::default();
    let parsed = form.read_multipart(multipart).await;

    let credential = Credential::resolve(headers, &form)?;
    parsed?;
    Ok((credential, form))
}

/// `job_description` → `job description`.
pub fn display_name(field: &str) -> String {
    field.replace('_', " ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extraction::ExtractError;

    #[test]
    fn test_document_absent_when_nothing_supplied() {
        let form = SubmittedForm::default();
        assert!(matches!(form.document("resume").unwrap(), DocumentInput::Absent));
    }

    #[test]
    fn test_blank_paste_and_empty_file_part_are_absent() {
        let mut form = SubmittedForm::default();
        form.insert_text("resume_text", "   \n ");
        form.insert_file("resume_file", "", Bytes::new());
        assert!(matches!(form.document("resume").unwrap(), DocumentInput::Absent));
    }

    #[test]
    fn test_paste_and_upload_are_mutually_exclusive() {
        let mut form = SubmittedForm::default();
        form.insert_text("job_description_text", "Looking for a backend engineer");
        form.insert_file("job_description_file", "jd.txt", "Looking for a backend engineer");
        let err = form.document("job_description").unwrap_err();
        assert!(err.to_string().contains("job description"));
    }

    #[test]
    fn test_pasted_text_kept_verbatim() {
        let mut form = SubmittedForm::default();
        form.insert_text("resume_text", "  Summary\n  Rust engineer  ");
        match form.document("resume").unwrap() {
            DocumentInput::Pasted(text) => assert_eq!(text, "  Summary\n  Rust engineer  "),
            other => panic!("expected pasted, got {other:?}"),
        }
    }

    #[test]
    fn test_uploaded_file_becomes_document() {
        let mut form = SubmittedForm::default();
        form.insert_file("resume_file", "resume.pdf", &b"%PDF-1.4"[..]);
        match form.document("resume").unwrap() {
            DocumentInput::Uploaded(file) => {
                assert_eq!(file.filename, "resume.pdf");
                assert_eq!(&file.bytes[..], b"%PDF-1.4");
            }
            other => panic!("expected upload, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_resolve_uploaded_text_file() {
        let input = DocumentInput::uploaded("jd.txt", "Looking for a backend engineer");
        let text = input.resolve("job_description").await.unwrap();
        assert_eq!(text.as_deref(), Some("Looking for a backend engineer"));
    }

    #[tokio::test]
    async fn test_resolve_reports_failure_per_file() {
        let input = DocumentInput::uploaded("resume.pdf", &b"not a pdf"[..]);
        let err = input.resolve("resume").await.unwrap_err();
        match err {
            AppError::Extraction {
                field,
                filename,
                source,
            } => {
                assert_eq!(field, "resume");
                assert_eq!(filename, "resume.pdf");
                assert!(matches!(source, ExtractError::Pdf(_)));
            }
            other => panic!("expected extraction failure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_resolve_absent_is_none() {
        assert!(DocumentInput::Absent.resolve("resume").await.unwrap().is_none());
    }
}
