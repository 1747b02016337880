//! The answer pipeline: validation, history sanitization, FAQ
//! short-circuit, optional retrieval, engine call, and the detached
//! transcript mail.
//!
//! The FAQ short-circuit exists for latency and cost — the high-frequency
//! question set never reaches the paid model.

use std::sync::Arc;

use crate::core::errors::ApiError;
use crate::llm::engine::AnswerEngine;
use crate::mailer::{TranscriptMail, TranscriptMailer};
use crate::rag::retriever::Retriever;

use super::faq::FaqTable;
use super::history::{sanitize_history, ChatTurn, RawTurn};
use super::prompt::build_messages;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerSource {
    Faq,
    Engine,
}

#[derive(Debug)]
pub struct AnswerOutcome {
    pub text: String,
    pub thread_id: String,
    pub source: AnswerSource,
}

pub struct AnswerPipeline {
    faq: FaqTable,
    engine: AnswerEngine,
    mailer: Arc<dyn TranscriptMailer>,
    retriever: Option<Retriever>,
}

impl AnswerPipeline {
    pub fn new(
        faq: FaqTable,
        engine: AnswerEngine,
        mailer: Arc<dyn TranscriptMailer>,
        retriever: Option<Retriever>,
    ) -> Self {
        Self {
            faq,
            engine,
            mailer,
            retriever,
        }
    }

    pub async fn answer(
        &self,
        message: &str,
        raw_history: &[RawTurn],
    ) -> Result<AnswerOutcome, ApiError> {
        if message.trim().is_empty() {
            return Err(ApiError::BadRequest("message fehlt".to_string()));
        }

        let thread_id = new_thread_id();
        let history = sanitize_history(raw_history);

        if let Some(answer) = self.faq.match_text(message) {
            tracing::debug!("FAQ hit for thread {}", thread_id);
            self.mail_exchange("FAQ", &thread_id, &history, message, &answer);
            return Ok(AnswerOutcome {
                text: answer,
                thread_id,
                source: AnswerSource::Faq,
            });
        }

        let context = match &self.retriever {
            Some(retriever) => retriever.retrieve(message).await.unwrap_or_else(|err| {
                tracing::warn!("Context lookup failed, answering without it: {}", err);
                String::new()
            }),
            None => String::new(),
        };

        let messages = build_messages(&history, message, &context);
        let answer = self.engine.generate(messages).await;

        self.mail_exchange("Chat", &thread_id, &history, message, &answer);
        Ok(AnswerOutcome {
            text: answer,
            thread_id,
            source: AnswerSource::Engine,
        })
    }

    /// Fire-and-forget: the response must never wait on, or fail with,
    /// the transcript mail.
    fn mail_exchange(
        &self,
        kind: &str,
        thread_id: &str,
        history: &[ChatTurn],
        message: &str,
        answer: &str,
    ) {
        let mail = TranscriptMail::chat_exchange(kind, thread_id, history, message, answer);
        let mailer = Arc::clone(&self.mailer);
        tokio::spawn(async move {
            if let Err(err) = mailer.send(&mail).await {
                tracing::warn!("Transcript mail failed: {}", err);
            }
        });
    }
}

fn new_thread_id() -> String {
    format!("{:08x}", rand::random::<u32>())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thread_ids_are_short_hex() {
        let id = new_thread_id();
        assert_eq!(id.len(), 8);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
