//! Answer engine: wraps the hosted chat-completion call with a bounded
//! retry loop, per-attempt timeout, a fallback model and rejection of
//! degenerate completions.
//!
//! The engine never fails past its own boundary: callers always get text,
//! in the worst case a canned apology.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::{sleep, timeout};

use super::provider::{ChatModel, LlmError};
use super::types::{ChatMessage, ChatRequest};

/// Returned when the provider rejects the request outright (malformed
/// request class); retrying would not help.
pub const CONFIDENCE_REFUSAL: &str =
    "Das kann ich gerade nicht sicher beantworten. Am besten direkt per E-Mail an info@sukhothai-sprockhoevel.de fragen.";

/// Returned after the retry budget and the fallback model are exhausted.
pub const FALLBACK_APOLOGY: &str =
    "Entschuldigung, das kann ich gerade nicht beantworten. Magst du die Frage anders formulieren?";

#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub primary_model: String,
    pub fallback_model: String,
    /// Attempts against the primary model before the fallback is tried.
    pub max_attempts: u32,
    /// Wall-clock budget per attempt; a timed-out attempt counts as failed.
    pub attempt_timeout: Duration,
    /// Backoff grows linearly: `backoff_step * attempt`.
    pub backoff_step: Duration,
    pub max_completion_tokens: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            primary_model: "gpt-5-mini".to_string(),
            fallback_model: "gpt-4o-mini".to_string(),
            max_attempts: 3,
            attempt_timeout: Duration::from_secs(20),
            backoff_step: Duration::from_millis(500),
            max_completion_tokens: 250,
        }
    }
}

enum AttemptError {
    Transient(String),
    Permanent(String),
}

pub struct AnswerEngine {
    provider: Arc<dyn ChatModel>,
    config: EngineConfig,
}

impl AnswerEngine {
    pub fn new(provider: Arc<dyn ChatModel>, config: EngineConfig) -> Self {
        Self { provider, config }
    }

    /// Runs the prompt through the primary model with retries, then the
    /// fallback model, and degrades to a canned message if both fail.
    pub async fn generate(&self, messages: Vec<ChatMessage>) -> String {
        for attempt in 1..=self.config.max_attempts {
            match self.attempt(&messages, &self.config.primary_model).await {
                Ok(text) => return text,
                Err(AttemptError::Permanent(detail)) => {
                    tracing::warn!(
                        "Primary model {} rejected the request: {}",
                        self.config.primary_model,
                        detail
                    );
                    return CONFIDENCE_REFUSAL.to_string();
                }
                Err(AttemptError::Transient(detail)) => {
                    tracing::warn!(
                        "Primary model {} attempt {}/{} failed: {}",
                        self.config.primary_model,
                        attempt,
                        self.config.max_attempts,
                        detail
                    );
                    if attempt < self.config.max_attempts {
                        sleep(self.config.backoff_step * attempt).await;
                    }
                }
            }
        }

        match self.attempt(&messages, &self.config.fallback_model).await {
            Ok(text) => text,
            Err(AttemptError::Transient(detail)) | Err(AttemptError::Permanent(detail)) => {
                tracing::warn!(
                    "Fallback model {} failed: {}",
                    self.config.fallback_model,
                    detail
                );
                FALLBACK_APOLOGY.to_string()
            }
        }
    }

    async fn attempt(
        &self,
        messages: &[ChatMessage],
        model: &str,
    ) -> Result<String, AttemptError> {
        let request = ChatRequest::new(messages.to_vec())
            .with_max_completion_tokens(self.config.max_completion_tokens);

        let outcome = timeout(
            self.config.attempt_timeout,
            self.provider.chat(request, model),
        )
        .await;

        match outcome {
            Err(_) => Err(AttemptError::Transient(format!(
                "no completion within {:?}",
                self.config.attempt_timeout
            ))),
            Ok(Err(LlmError::Transient(detail))) => Err(AttemptError::Transient(detail)),
            Ok(Err(LlmError::Permanent(detail))) => Err(AttemptError::Permanent(detail)),
            Ok(Ok(text)) => {
                if is_degenerate(&text) {
                    Err(AttemptError::Transient(format!(
                        "degenerate completion: {:?}",
                        text
                    )))
                } else {
                    Ok(text.trim().to_string())
                }
            }
        }
    }
}

/// A completion that is empty or a bare acknowledgement is a non-answer
/// and counts as a failed attempt.
fn is_degenerate(text: &str) -> bool {
    let normalized: String = text
        .chars()
        .filter(|c| !c.is_ascii_punctuation())
        .collect::<String>()
        .trim()
        .to_lowercase();

    normalized.is_empty()
        || matches!(
            normalized.as_str(),
            "ok" | "okay" | "verstanden" | "understood" | "alles klar"
        )
}

#[cfg(test)]
mod tests {
    use std::future::pending;
    use std::sync::atomic::{AtomicU32, Ordering};

    use async_trait::async_trait;

    use super::*;

    fn test_config() -> EngineConfig {
        EngineConfig {
            attempt_timeout: Duration::from_millis(200),
            backoff_step: Duration::from_millis(50),
            ..EngineConfig::default()
        }
    }

    /// Scripted provider: one canned reaction per model id, counting calls.
    struct ScriptedModel {
        primary_calls: AtomicU32,
        fallback_calls: AtomicU32,
        primary: Reaction,
        fallback: Reaction,
    }

    #[derive(Clone)]
    enum Reaction {
        Reply(&'static str),
        Transient,
        Permanent,
        Hang,
    }

    impl ScriptedModel {
        fn new(primary: Reaction, fallback: Reaction) -> Self {
            Self {
                primary_calls: AtomicU32::new(0),
                fallback_calls: AtomicU32::new(0),
                primary,
                fallback,
            }
        }
    }

    #[async_trait]
    impl ChatModel for ScriptedModel {
        fn name(&self) -> &str {
            "scripted"
        }

        async fn chat(&self, _request: ChatRequest, model_id: &str) -> Result<String, LlmError> {
            let reaction = if model_id == "gpt-5-mini" {
                self.primary_calls.fetch_add(1, Ordering::SeqCst);
                self.primary.clone()
            } else {
                self.fallback_calls.fetch_add(1, Ordering::SeqCst);
                self.fallback.clone()
            };

            match reaction {
                Reaction::Reply(text) => Ok(text.to_string()),
                Reaction::Transient => Err(LlmError::Transient("503: overloaded".to_string())),
                Reaction::Permanent => Err(LlmError::Permanent("400: bad request".to_string())),
                Reaction::Hang => pending().await,
            }
        }

        async fn embed(
            &self,
            _inputs: &[String],
            _model_id: &str,
        ) -> Result<Vec<Vec<f32>>, LlmError> {
            Ok(Vec::new())
        }
    }

    fn engine(model: &Arc<ScriptedModel>) -> AnswerEngine {
        AnswerEngine::new(Arc::clone(model) as Arc<dyn ChatModel>, test_config())
    }

    fn prompt() -> Vec<ChatMessage> {
        vec![ChatMessage::user("Habt ihr einen Mittagstisch?")]
    }

    #[tokio::test]
    async fn first_attempt_success_makes_one_call() {
        let model = Arc::new(ScriptedModel::new(
            Reaction::Reply("Ja, sonntags."),
            Reaction::Reply("unused"),
        ));
        let answer = engine(&model).generate(prompt()).await;

        assert_eq!(answer, "Ja, sonntags.");
        assert_eq!(model.primary_calls.load(Ordering::SeqCst), 1);
        assert_eq!(model.fallback_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn degenerate_completions_exhaust_retries_then_fallback_then_apology() {
        let model = Arc::new(ScriptedModel::new(
            Reaction::Reply("Okay."),
            Reaction::Reply("Okay."),
        ));
        let answer = engine(&model).generate(prompt()).await;

        assert_eq!(answer, FALLBACK_APOLOGY);
        assert_ne!(answer, "Okay.");
        assert_eq!(model.primary_calls.load(Ordering::SeqCst), 3);
        assert_eq!(model.fallback_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn hanging_primary_times_out_per_attempt_and_falls_back() {
        let model = Arc::new(ScriptedModel::new(
            Reaction::Hang,
            Reaction::Reply("Geht klar."),
        ));
        let answer = engine(&model).generate(prompt()).await;

        assert_eq!(answer, "Geht klar.");
        // retry budget, nothing beyond it
        assert_eq!(model.primary_calls.load(Ordering::SeqCst), 3);
        assert_eq!(model.fallback_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn permanent_error_short_circuits_without_retry_or_fallback() {
        let model = Arc::new(ScriptedModel::new(
            Reaction::Permanent,
            Reaction::Reply("unused"),
        ));
        let answer = engine(&model).generate(prompt()).await;

        assert_eq!(answer, CONFIDENCE_REFUSAL);
        assert_eq!(model.primary_calls.load(Ordering::SeqCst), 1);
        assert_eq!(model.fallback_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn transient_primary_degrades_to_fallback_answer() {
        let model = Arc::new(ScriptedModel::new(
            Reaction::Transient,
            Reaction::Reply("Vom Ersatzmodell."),
        ));
        let answer = engine(&model).generate(prompt()).await;

        assert_eq!(answer, "Vom Ersatzmodell.");
        assert_eq!(model.primary_calls.load(Ordering::SeqCst), 3);
        assert_eq!(model.fallback_calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn degenerate_detection_covers_bare_acknowledgements() {
        assert!(is_degenerate(""));
        assert!(is_degenerate("   "));
        assert!(is_degenerate("Okay."));
        assert!(is_degenerate("ok"));
        assert!(is_degenerate("Verstanden!"));
        assert!(is_degenerate("Alles klar."));
        assert!(!is_degenerate("Okay, wir haben sonntags geöffnet."));
        assert!(!is_degenerate("Ja."));
    }
}
