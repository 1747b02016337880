use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::chat::faq::FaqTable;
use crate::chat::pipeline::AnswerPipeline;
use crate::core::config::AppConfig;
use crate::llm::engine::AnswerEngine;
use crate::llm::openai::OpenAiProvider;
use crate::llm::provider::ChatModel;
use crate::mailer::{NoopMailer, SmtpMailer, TranscriptMailer};
use crate::rag::retriever::Retriever;
use crate::rag::store::VectorStore;

/// Shared application state: the configuration, the answer pipeline and
/// the collaborators the handlers talk to directly.
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub provider: Arc<dyn ChatModel>,
    pub pipeline: AnswerPipeline,
    pub mailer: Arc<dyn TranscriptMailer>,
    pub started_at: DateTime<Utc>,
}

impl AppState {
    /// Builds the production state: OpenAI-compatible provider, SMTP
    /// mailer (or a logged no-op when unconfigured) and, when enabled,
    /// the retrieval store loaded once from disk.
    pub fn initialize(config: AppConfig) -> anyhow::Result<Arc<Self>> {
        let config = Arc::new(config);

        if config.openai_api_key.is_empty() {
            tracing::warn!("OPENAI_API_KEY is not set; model calls will fail");
        }

        let provider: Arc<dyn ChatModel> = Arc::new(OpenAiProvider::new(
            config.openai_base_url.clone(),
            config.openai_api_key.clone(),
        ));

        let mailer: Arc<dyn TranscriptMailer> = match SmtpMailer::from_config(&config)? {
            Some(mailer) => Arc::new(mailer),
            None => {
                tracing::warn!("SMTP not configured; transcript mail disabled");
                Arc::new(NoopMailer)
            }
        };

        let retriever = if config.enable_retrieval {
            let store = VectorStore::load(&config.vector_store_path)?;
            tracing::info!("Retrieval enabled with {} stored chunks", store.len());
            Some(Retriever::new(
                Arc::clone(&provider),
                store,
                config.embedding_model.clone(),
                config.retrieval_top_k,
            ))
        } else {
            None
        };

        Ok(Self::assemble(config, provider, mailer, retriever))
    }

    /// Wires the state from explicit parts; tests inject scripted
    /// providers and counting mailers through this.
    pub fn assemble(
        config: Arc<AppConfig>,
        provider: Arc<dyn ChatModel>,
        mailer: Arc<dyn TranscriptMailer>,
        retriever: Option<Retriever>,
    ) -> Arc<Self> {
        let engine = AnswerEngine::new(Arc::clone(&provider), config.engine.clone());
        let pipeline = AnswerPipeline::new(
            FaqTable::builtin(),
            engine,
            Arc::clone(&mailer),
            retriever,
        );

        Arc::new(AppState {
            config,
            provider,
            pipeline,
            mailer,
            started_at: Utc::now(),
        })
    }
}
