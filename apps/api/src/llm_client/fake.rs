//! Test double for `CompletionModel`.

use std::sync::Mutex;

use async_trait::async_trait;

use super::{CompletionModel, LlmError};
use crate::credential::Credential;

/// Records every prompt and answers with a fixed reply, or fails with an
/// API error carrying `failure` when one is set.
#[derive(Default)]
pub struct RecordingModel {
    reply: String,
    failure: Option<String>,
    prompts: Mutex<Vec<String>>,
}

impl RecordingModel {
    pub fn replying(reply: &str) -> Self {
        Self {
            reply: reply.to_string(),
            ..Default::default()
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            failure: Some(message.to_string()),
            ..Default::default()
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    pub fn last_prompt(&self) -> String {
        self.prompts().pop().expect("model was never called")
    }
}

#[async_trait]
impl CompletionModel for RecordingModel {
    fn model_id(&self) -> &str {
        "recording-model"
    }

    async fn complete(&self, _credential: &Credential, prompt: &str) -> Result<String, LlmError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        match &self.failure {
            Some(message) => Err(LlmError::Api {
                status: 400,
                message: message.clone(),
            }),
            None => Ok(self.reply.clone()),
        }
    }
}
