// Resume optimizer flow: resume + job description → rewritten resume.
// All model calls go through llm_client::CompletionModel.

pub mod handlers;
pub mod optimizer;
