//! Result presentation. Completions are passed through untouched; the resume
//! flow also gets a base64 download artifact.

use base64::{engine::general_purpose::STANDARD, Engine};
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

pub const DOWNLOAD_FILENAME: &str = "Optimized_Resume.txt";
pub const DOWNLOAD_MIME_TYPE: &str = "text/plain";

/// A downloadable copy of a completion, encoded for embedding in the page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DownloadArtifact {
    pub filename: &'static str,
    pub mime_type: &'static str,
    pub base64: String,
    /// `data:` URI usable directly as an anchor `href`.
    pub href: String,
}

impl DownloadArtifact {
    pub fn from_text(text: &str) -> Self {
        let base64 = STANDARD.encode(text.as_bytes());
        let href = format!("data:file/txt;base64,{base64}");
        Self {
            filename: DOWNLOAD_FILENAME,
            mime_type: DOWNLOAD_MIME_TYPE,
            base64,
            href,
        }
    }
}

#[cfg(test)]
impl DownloadArtifact {
    /// Inverse of `from_text`.
    pub fn decode(&self) -> anyhow::Result<String> {
        let bytes = STANDARD.decode(&self.base64)?;
        Ok(String::from_utf8(bytes)?)
    }
}

/// JSON body returned by every flow endpoint.
#[derive(Debug, Serialize)]
pub struct CompletionResponse {
    pub request_id: Uuid,
    pub model: String,
    /// Model output, byte-for-byte.
    pub completion: String,
    pub generated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub download: Option<DownloadArtifact>,
}

impl CompletionResponse {
    pub fn new(request_id: Uuid, model: &str, completion: String) -> Self {
        Self {
            request_id,
            model: model.to_string(),
            completion,
            generated_at: Utc::now(),
            download: None,
        }
    }

    pub fn with_download(mut self, download: DownloadArtifact) -> Self {
        self.download = Some(download);
        self
    }
}
