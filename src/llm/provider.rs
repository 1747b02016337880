use async_trait::async_trait;
use thiserror::Error;

use super::types::ChatRequest;

/// Failure classes of a hosted model call.
///
/// `Transient` covers load-shaped failures (timeouts, rate limits, 5xx)
/// that are worth retrying; `Permanent` covers malformed-request-style
/// rejections that will not improve on retry.
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("model request failed: {0}")]
    Transient(String),
    #[error("model rejected request: {0}")]
    Permanent(String),
}

impl LlmError {
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Transient(_))
    }
}

#[async_trait]
pub trait ChatModel: Send + Sync {
    /// return the provider name (e.g. "openai")
    fn name(&self) -> &str;

    /// chat completion (non-streaming)
    async fn chat(&self, request: ChatRequest, model_id: &str) -> Result<String, LlmError>;

    /// generate embeddings
    async fn embed(&self, inputs: &[String], model_id: &str) -> Result<Vec<Vec<f32>>, LlmError>;
}
