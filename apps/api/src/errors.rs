use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::extraction::ExtractError;
use crate::intake::display_name;
use crate::llm_client::LlmError;
use crate::prompts::PromptError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
/// Every variant ends the current request only.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Please enter a valid Gemini API key to continue")]
    MissingCredential,

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Could not extract text from {} file '{filename}': {source}", display_name(field))]
    Extraction {
        field: String,
        filename: String,
        #[source]
        source: ExtractError,
    },

    #[error("Could not extract text from {} file '{filename}': extractor crashed ({reason})", display_name(field))]
    ExtractorCrashed {
        field: String,
        filename: String,
        reason: String,
    },

    #[error("Gemini API error: {0}")]
    Llm(#[from] LlmError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<PromptError> for AppError {
    fn from(err: PromptError) -> Self {
        AppError::Validation(err.to_string())
    }
}

impl AppError {
    pub fn code(&self) -> &'static str {
        match self {
            AppError::MissingCredential => "MISSING_CREDENTIAL",
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::Extraction { .. } | AppError::ExtractorCrashed { .. } => "EXTRACTION_FAILED",
            AppError::Llm(_) => "LLM_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::MissingCredential => StatusCode::UNAUTHORIZED,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Extraction { .. } | AppError::ExtractorCrashed { .. } => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            AppError::Llm(_) => StatusCode::BAD_GATEWAY,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Upstream failures are shown to the user with the underlying cause;
        // only internal errors are masked.
        let message = match &self {
            AppError::Llm(e) => {
                tracing::error!("LLM error: {e}");
                self.to_string()
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                "An internal server error occurred".to_string()
            }
            AppError::ExtractorCrashed { reason, .. } => {
                tracing::error!("Extractor crashed: {reason}");
                self.to_string()
            }
            AppError::Validation(msg) => msg.clone(),
            _ => self.to_string(),
        };

        let body = Json(json!({
            "error": {
                "code": self.code(),
                "message": message
            }
        }));

        (self.status(), body).into_response()
    }
}
