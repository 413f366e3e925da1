//! STAR answer formatting and evaluation.
//!
//! Resume and job description are optional context and render as `N/A`
//! when absent. The answer is always required; the question only for
//! formatting.

use tracing::info;
use uuid::Uuid;

use crate::credential::Credential;
use crate::errors::AppError;
use crate::intake::DocumentInput;
use crate::llm_client::CompletionModel;
use crate::prompts::{PromptError, PromptTemplate, PromptValues};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StarAction {
    Format,
    Evaluate,
}

impl StarAction {
    pub fn template(&self) -> PromptTemplate {
        match self {
            StarAction::Format => PromptTemplate::StarFormat,
            StarAction::Evaluate => PromptTemplate::StarEvaluation,
        }
    }
}

#[derive(Debug, Clone)]
pub struct StarRequest {
    pub question: Option<String>,
    pub answer: Option<String>,
    pub resume: DocumentInput,
    pub job_description: DocumentInput,
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, |v| v.trim().is_empty())
}

/// Checks the typed fields before any extraction, then renders the prompt.
pub async fn build_star_prompt(action: StarAction, request: StarRequest) -> Result<String, AppError> {
    if action == StarAction::Format && is_blank(&request.question) {
        return Err(PromptError::MissingField("question").into());
    }
    if is_blank(&request.answer) {
        return Err(PromptError::MissingField("answer").into());
    }

    let resume = request.resume.resolve("resume").await?;
    let job_description = request.job_description.resolve("job_description").await?;

    let mut values = PromptValues::new()
        .with_opt("job_description", job_description)
        .with_opt("resume", resume)
        .with_opt("answer", request.answer);
    if action == StarAction::Format {
        values = values.with_opt("question", request.question);
    }

    Ok(action.template().build(&values)?)
}

pub async fn run_star(
    model: &dyn CompletionModel,
    credential: &Credential,
    action: StarAction,
    request: StarRequest,
    request_id: Uuid,
) -> Result<String, AppError> {
    info!(
        "[{request_id}] STAR {:?}: resume={}, job_description={}",
        action,
        request.resume.describe(),
        request.job_description.describe()
    );

    let prompt = build_star_prompt(action, request).await?;
    info!(
        "[{request_id}] {} prompt built ({} chars), calling {}",
        action.template().name(),
        prompt.chars().count(),
        model.model_id()
    );

    let completion = model.complete(credential, &prompt).await?;
    info!(
        "[{request_id}] STAR {:?} completed ({} chars)",
        action,
        completion.chars().count()
    );

    Ok(completion)
}
