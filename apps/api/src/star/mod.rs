// STAR coach flow: format a behavioral answer, or score it against the rubric.
// All model calls go through llm_client::CompletionModel.

pub mod coach;
pub mod handlers;
