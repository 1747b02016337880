//! Retrieval-augmented context lookup. Fully implemented but dormant:
//! the serving path only builds a `Retriever` when the retrieval flag is
//! enabled, and a retrieval failure degrades to an empty context.

use std::sync::Arc;

use crate::llm::provider::{ChatModel, LlmError};

use super::store::VectorStore;

pub struct Retriever {
    provider: Arc<dyn ChatModel>,
    store: VectorStore,
    embedding_model: String,
    top_k: usize,
}

impl Retriever {
    pub fn new(
        provider: Arc<dyn ChatModel>,
        store: VectorStore,
        embedding_model: String,
        top_k: usize,
    ) -> Self {
        Self {
            provider,
            store,
            embedding_model,
            top_k,
        }
    }

    /// Embeds the query and renders the best-matching chunks as source
    /// blocks. An empty store yields an empty context without a model call.
    pub async fn retrieve(&self, query: &str) -> Result<String, LlmError> {
        if self.store.is_empty() {
            return Ok(String::new());
        }

        let vectors = self
            .provider
            .embed(&[query.to_string()], &self.embedding_model)
            .await?;
        let query_vec = vectors
            .into_iter()
            .next()
            .ok_or_else(|| LlmError::Transient("embedding response was empty".to_string()))?;

        let hits = self.store.top_k(&query_vec, self.top_k);
        let blocks: Vec<String> = hits
            .iter()
            .map(|hit| format!("# Quelle: {}\n{}", hit.chunk.meta.source, hit.chunk.text))
            .collect();

        Ok(blocks.join("\n\n"))
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::*;
    use crate::llm::types::ChatRequest;
    use crate::rag::store::{ChunkMeta, EmbeddedChunk};

    /// Embeds every input as a fixed vector; chat is never used here.
    struct FixedEmbedModel(Vec<f32>);

    #[async_trait]
    impl ChatModel for FixedEmbedModel {
        fn name(&self) -> &str {
            "fixed-embed"
        }

        async fn chat(&self, _request: ChatRequest, _model_id: &str) -> Result<String, LlmError> {
            Err(LlmError::Permanent("chat not supported".to_string()))
        }

        async fn embed(
            &self,
            inputs: &[String],
            _model_id: &str,
        ) -> Result<Vec<Vec<f32>>, LlmError> {
            Ok(inputs.iter().map(|_| self.0.clone()).collect())
        }
    }

    fn chunk(text: &str, source: &str, embedding: Vec<f32>) -> EmbeddedChunk {
        EmbeddedChunk {
            text: text.to_string(),
            embedding,
            meta: ChunkMeta {
                source: source.to_string(),
            },
        }
    }

    #[tokio::test]
    async fn renders_best_hits_as_source_blocks() {
        let mut store = VectorStore::default();
        store.extend(vec![
            chunk("Reis mit Gemüse", "karte.html", vec![1.0, 0.0]),
            chunk("Anfahrt mit dem Bus", "anfahrt.html", vec![0.0, 1.0]),
        ]);

        let retriever = Retriever::new(
            Arc::new(FixedEmbedModel(vec![1.0, 0.0])),
            store,
            "text-embedding-3-small".to_string(),
            1,
        );

        let context = retriever.retrieve("Was gibt es zu essen?").await.unwrap();
        assert_eq!(context, "# Quelle: karte.html\nReis mit Gemüse");
    }

    #[tokio::test]
    async fn empty_store_short_circuits_without_an_embedding_call() {
        let retriever = Retriever::new(
            Arc::new(FixedEmbedModel(vec![1.0])),
            VectorStore::default(),
            "text-embedding-3-small".to_string(),
            3,
        );

        let context = retriever.retrieve("irgendwas").await.unwrap();
        assert!(context.is_empty());
    }
}
