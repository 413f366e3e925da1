/// LLM Client — the single point of entry for all Gemini API calls.
///
/// ARCHITECTURAL RULE: No other module may call the Gemini API directly.
/// Flows depend on the `CompletionModel` trait; `GeminiClient` is the
/// production implementation.
///
/// Model: gemini-1.5-flash (hardcoded)
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::credential::Credential;

#[cfg(test)]
pub mod fake;

/// The model used for every completion.
pub const MODEL: &str = "gemini-1.5-flash";

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("request timed out after {0}s")]
    Timeout(u64),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("response blocked by the model: {0}")]
    Blocked(String),

    #[error("LLM returned empty content")]
    EmptyContent,
}

/// Text-in, text-out completion service.
#[async_trait]
pub trait CompletionModel: Send + Sync {
    fn model_id(&self) -> &str;

    /// One call, no retries. The credential is used for this call only.
    async fn complete(&self, credential: &Credential, prompt: &str) -> Result<String, LlmError>;
}

// ────────────────────────────────────────────────────────────────────────────
// Wire types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<RequestContent<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    role: &'a str,
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    pub prompt_feedback: Option<PromptFeedback>,
    pub usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub content: Option<CandidateContent>,
    pub finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
pub struct ResponsePart {
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    pub block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageMetadata {
    #[serde(default)]
    pub prompt_token_count: u32,
    #[serde(default)]
    pub candidates_token_count: u32,
}

impl GenerateContentResponse {
    /// Concatenated text of the first candidate, like the SDK's `response.text`.
    pub fn text(&self) -> Result<String, LlmError> {
        let Some(candidate) = self.candidates.first() else {
            let reason = self
                .prompt_feedback
                .as_ref()
                .and_then(|f| f.block_reason.clone());
            return Err(match reason {
                Some(reason) => LlmError::Blocked(reason),
                None => LlmError::EmptyContent,
            });
        };

        let text: String = candidate
            .content
            .iter()
            .flat_map(|c| c.parts.iter())
            .filter_map(|p| p.text.as_deref())
            .collect();

        if text.is_empty() {
            return Err(match candidate.finish_reason.as_deref() {
                Some(reason @ ("SAFETY" | "RECITATION" | "BLOCKLIST" | "PROHIBITED_CONTENT")) => {
                    LlmError::Blocked(reason.to_string())
                }
                _ => LlmError::EmptyContent,
            });
        }

        Ok(text)
    }
}

#[derive(Debug, Deserialize)]
struct GeminiError {
    error: GeminiErrorBody,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorBody {
    message: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Client
// ────────────────────────────────────────────────────────────────────────────

/// Gemini `generateContent` client with a bounded request timeout.
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    base_url: String,
    timeout_secs: u64,
}

impl GeminiClient {
    pub fn new(base_url: impl Into<String>, timeout_secs: u64) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout_secs,
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/v1beta/models/{MODEL}:generateContent", self.base_url)
    }

    /// Makes one raw call and returns the full response object.
    pub async fn call(
        &self,
        credential: &Credential,
        prompt: &str,
    ) -> Result<GenerateContentResponse, LlmError> {
        let request_body = GenerateContentRequest {
            contents: vec![RequestContent {
                role: "user",
                parts: vec![RequestPart { text: prompt }],
            }],
        };

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", credential.expose())
            .header("content-type", "application/json")
            .json(&request_body)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<GeminiError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            warn!("Gemini API returned {}: {}", status, message);
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.text().await.map_err(|e| self.classify(e))?;
        let parsed: GenerateContentResponse = serde_json::from_str(&body)?;

        if let Some(usage) = &parsed.usage_metadata {
            debug!(
                "Gemini call succeeded: prompt_tokens={}, output_tokens={}",
                usage.prompt_token_count, usage.candidates_token_count
            );
        }

        Ok(parsed)
    }

    fn classify(&self, err: reqwest::Error) -> LlmError {
        if err.is_timeout() {
            LlmError::Timeout(self.timeout_secs)
        } else {
            LlmError::Http(err)
        }
    }
}

#[async_trait]
impl CompletionModel for GeminiClient {
    fn model_id(&self) -> &str {
        MODEL
    }

    async fn complete(&self, credential: &Credential, prompt: &str) -> Result<String, LlmError> {
        self.call(credential, prompt).await?.text()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        http::{HeaderMap, StatusCode},
        response::IntoResponse,
        Json, Router,
    };
    use serde_json::{json, Value};

    /// Serves `handler` for every path on an ephemeral port; returns the base URL.
    async fn stub_server<H, T>(handler: H) -> String
    where
        H: axum::handler::Handler<T, ()>,
        T: 'static,
    {
        let app = Router::new().fallback(handler);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    fn key() -> Credential {
        Credential::new("test-key").unwrap()
    }

    #[tokio::test]
    async fn test_complete_returns_candidate_text() {
        let base = stub_server(|headers: HeaderMap, Json(body): Json<Value>| async move {
            assert_eq!(headers["x-goog-api-key"], "test-key");
            let prompt = body["contents"][0]["parts"][0]["text"].as_str().unwrap();
            Json(json!({
                "candidates": [{
                    "content": {"parts": [{"text": "Echo: "}, {"text": prompt}]},
                    "finishReason": "STOP"
                }],
                "usageMetadata": {"promptTokenCount": 3, "candidatesTokenCount": 4}
            }))
        })
        .await;

        let client = GeminiClient::new(base, 5).unwrap();
        let text = client.complete(&key(), "hello").await.unwrap();
        assert_eq!(text, "Echo: hello");
    }

    #[tokio::test]
    async fn test_invalid_key_surfaces_api_message() {
        let base = stub_server(|| async {
            (
                StatusCode::BAD_REQUEST,
                Json(json!({"error": {
                    "code": 400,
                    "message": "API key not valid. Please pass a valid API key.",
                    "status": "INVALID_ARGUMENT"
                }})),
            )
                .into_response()
        })
        .await;

        let client = GeminiClient::new(base, 5).unwrap();
        let err = client.complete(&key(), "hello").await.unwrap_err();
        assert!(matches!(err, LlmError::Api { status: 400, .. }));
        assert!(err.to_string().contains("API key not valid"));
    }

    #[tokio::test]
    async fn test_non_json_error_body_kept_raw() {
        let base = stub_server(|| async {
            (StatusCode::TOO_MANY_REQUESTS, "quota exceeded").into_response()
        })
        .await;

        let client = GeminiClient::new(base, 5).unwrap();
        let err = client.complete(&key(), "hello").await.unwrap_err();
        assert_eq!(err.to_string(), "API error (status 429): quota exceeded");
    }

    #[tokio::test]
    async fn test_slow_upstream_times_out() {
        let base = stub_server(|| async {
            tokio::time::sleep(Duration::from_secs(3)).await;
            Json(json!({"candidates": []}))
        })
        .await;

        let client = GeminiClient::new(base, 1).unwrap();
        let err = client.complete(&key(), "hello").await.unwrap_err();
        assert!(matches!(err, LlmError::Timeout(1)), "got {err:?}");
    }

    #[tokio::test]
    async fn test_unreachable_host_is_http_error() {
        let client = GeminiClient::new("http://127.0.0.1:1", 5).unwrap();
        let err = client.complete(&key(), "hello").await.unwrap_err();
        assert!(matches!(err, LlmError::Http(_)), "got {err:?}");
    }

    #[test]
    fn test_blocked_prompt_reports_reason() {
        let response: GenerateContentResponse =
            serde_json::from_value(json!({"promptFeedback": {"blockReason": "SAFETY"}})).unwrap();
        let err = response.text().unwrap_err();
        assert_eq!(err.to_string(), "response blocked by the model: SAFETY");
    }

    #[test]
    fn test_candidate_without_text_is_empty_content() {
        let response: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [{"content": {"parts": []}, "finishReason": "MAX_TOKENS"}]
        }))
        .unwrap();
        assert!(matches!(response.text(), Err(LlmError::EmptyContent)));
    }

    #[test]
    fn test_text_is_not_trimmed() {
        let response: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [{"content": {"parts": [{"text": "  Summary\n\n"}]}}]
        }))
        .unwrap();
        assert_eq!(response.text().unwrap(), "  Summary\n\n");
    }
}
