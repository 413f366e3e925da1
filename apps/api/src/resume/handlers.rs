//! Axum route handlers for the resume optimizer.

use axum::{
    extract::{Multipart, State},
    http::{header, HeaderMap},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::intake::collect_submission;
use crate::presenter::{CompletionResponse, DOWNLOAD_FILENAME};
use crate::resume::optimizer::{optimize_resume, ResumeRequest};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct DownloadRequest {
    pub text: String,
}

/// POST /api/v1/resume/optimize
///
/// Multipart fields: `api_key`, `resume_text` | `resume_file`,
/// `job_description_text` | `job_description_file`.
pub async fn handle_optimize(
    State(state): State<AppState>,
    headers: HeaderMap,
    multipart: Multipart,
) -> Result<Json<CompletionResponse>, AppError> {
    let (credential, form) = collect_submission(&headers, multipart).await?;

    let request = ResumeRequest {
        resume: form.document("resume")?,
        job_description: form.document("job_description")?,
    };

    let request_id = Uuid::new_v4();
    let outcome = optimize_resume(state.llm.as_ref(), &credential, request, request_id).await?;

    Ok(Json(
        CompletionResponse::new(request_id, state.llm.model_id(), outcome.completion)
            .with_download(outcome.download),
    ))
}

/// POST /api/v1/resume/download
///
/// Returns `text` unchanged as a plain-text attachment.
pub async fn handle_download(Json(request): Json<DownloadRequest>) -> impl IntoResponse {
    (
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{DOWNLOAD_FILENAME}\""),
            ),
        ],
        request.text,
    )
}
