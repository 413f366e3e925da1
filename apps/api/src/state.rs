use std::sync::Arc;

use crate::config::Config;
use crate::llm_client::CompletionModel;

/// Shared application state injected into all route handlers via Axum extractors.
/// Immutable; no request data is stored here.
#[derive(Clone)]
pub struct AppState {
    /// Completion backend. Production: `GeminiClient`.
    pub llm: Arc<dyn CompletionModel>,
    pub config: Config,
}
