//! Resume optimization pipeline.
//!
//! Flow: check both documents supplied → extract → build ResumeRewrite
//!       prompt → one model call → completion + download artifact.

use tracing::info;
use uuid::Uuid;

use crate::credential::Credential;
use crate::errors::AppError;
use crate::intake::DocumentInput;
use crate::llm_client::CompletionModel;
use crate::presenter::DownloadArtifact;
use crate::prompts::{PromptTemplate, PromptValues};

#[derive(Debug, Clone)]
pub struct ResumeRequest {
    pub resume: DocumentInput,
    pub job_description: DocumentInput,
}

#[derive(Debug, Clone)]
pub struct ResumeOutcome {
    pub completion: String,
    pub download: DownloadArtifact,
}

/// Resolves both documents and renders the rewrite prompt.
/// Both documents are required; this is checked before any extraction runs.
pub async fn build_resume_prompt(request: ResumeRequest) -> Result<String, AppError> {
    if matches!(request.resume, DocumentInput::Absent)
        || matches!(request.job_description, DocumentInput::Absent)
    {
        return Err(AppError::Validation(
            "Please provide both your resume and the job description".to_string(),
        ));
    }

    let resume = request.resume.resolve("resume").await?;
    let job_description = request.job_description.resolve("job_description").await?;

    let values = PromptValues::new()
        .with_opt("job_description", job_description)
        .with_opt("resume", resume);

    Ok(PromptTemplate::ResumeRewrite.build(&values)?)
}

pub async fn optimize_resume(
    model: &dyn CompletionModel,
    credential: &Credential,
    request: ResumeRequest,
    request_id: Uuid,
) -> Result<ResumeOutcome, AppError> {
    info!(
        "[{request_id}] Optimizing resume: resume={}, job_description={}",
        request.resume.describe(),
        request.job_description.describe()
    );

    let prompt = build_resume_prompt(request).await?;
    info!(
        "[{request_id}] Prompt built ({} chars), calling {}",
        prompt.chars().count(),
        model.model_id()
    );

    let completion = model.complete(credential, &prompt).await?;
    info!(
        "[{request_id}] Optimized resume received ({} chars)",
        completion.chars().count()
    );

    let download = DownloadArtifact::from_text(&completion);
    Ok(ResumeOutcome {
        completion,
        download,
    })
}
