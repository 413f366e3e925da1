//! Axum route handlers for the STAR coach.

use axum::{
    extract::{Multipart, State},
    http::HeaderMap,
    Json,
};
use uuid::Uuid;

use crate::errors::AppError;
use crate::intake::collect_submission;
use crate::presenter::CompletionResponse;
use crate::star::coach::{run_star, StarAction, StarRequest};
use crate::state::AppState;

/// POST /api/v1/star/format
pub async fn handle_format(
    State(state): State<AppState>,
    headers: HeaderMap,
    multipart: Multipart,
) -> Result<Json<CompletionResponse>, AppError> {
    handle_star(state, headers, multipart, StarAction::Format).await
}

/// POST /api/v1/star/evaluate
pub async fn handle_evaluate(
    State(state): State<AppState>,
    headers: HeaderMap,
    multipart: Multipart,
) -> Result<Json<CompletionResponse>, AppError> {
    handle_star(state, headers, multipart, StarAction::Evaluate).await
}

/// Multipart fields: `api_key`, `question`, `answer`, and optionally
/// `resume_text` | `resume_file`, `job_description_text` | `job_description_file`.
async fn handle_star(
    state: AppState,
    headers: HeaderMap,
    multipart: Multipart,
    action: StarAction,
) -> Result<Json<CompletionResponse>, AppError> {
    let (credential, form) = collect_submission(&headers, multipart).await?;

    let request = StarRequest {
        question: form.non_blank("question"),
        answer: form.text("answer").map(str::to_string),
        resume: form.document("resume")?,
        job_description: form.document("job_description")?,
    };

    let request_id = Uuid::new_v4();
    let completion =
        run_star(state.llm.as_ref(), &credential, action, request, request_id).await?;

    Ok(Json(CompletionResponse::new(
        request_id,
        state.llm.model_id(),
        completion,
    )))
}
