pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    response::Html,
    routing::{get, post},
    Router,
};

use crate::resume::handlers as resume;
use crate::star::handlers as star;
use crate::state::AppState;

const INDEX_HTML: &str = include_str!("../../static/index.html");

/// GET /
async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/", get(index))
        .route("/health", get(health::health_handler))
        // Resume optimizer
        .route("/api/v1/resume/optimize", post(resume::handle_optimize))
        .route("/api/v1/resume/download", post(resume::handle_download))
        // STAR coach
        .route("/api/v1/star/format", post(star::handle_format))
        .route("/api/v1/star/evaluate", post(star::handle_evaluate))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}
