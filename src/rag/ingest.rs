//! Offline ingestion: fetch seed content, strip markup, window it, embed
//! every window and append the results to the vector store file.
//!
//! Runs as its own binary and is never invoked concurrently with itself;
//! the store write is a whole-file replace (temp file + rename).

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::core::config::AppConfig;
use crate::llm::provider::ChatModel;

use super::chunker::{chunk_text, strip_html, CHUNK_OVERLAP, CHUNK_SIZE};
use super::store::{ChunkMeta, EmbeddedChunk, VectorStore};

const SEED_FILE: &str = "data/seed_faqs.md";
const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

pub async fn run(config: &AppConfig, provider: &dyn ChatModel) -> Result<()> {
    let store_path = &config.vector_store_path;
    let mut store = VectorStore::load(store_path)
        .with_context(|| format!("failed to load store {}", store_path.display()))?;
    tracing::info!("{} chunks already stored", store.len());

    let seed_file = Path::new(SEED_FILE);
    if seed_file.exists() {
        let items = ingest_file(provider, &config.embedding_model, seed_file).await?;
        tracing::info!("Ingested {} chunks from {}", items.len(), SEED_FILE);
        store.extend(items);
    }

    for url in &config.seed_urls {
        tracing::info!("Crawling {}", url);
        match ingest_url(provider, &config.embedding_model, url).await {
            Ok(items) => {
                tracing::info!("Ingested {} chunks from {}", items.len(), url);
                store.extend(items);
            }
            Err(err) => tracing::warn!("Failed to ingest {}: {:#}", url, err),
        }
    }

    store
        .save(store_path)
        .with_context(|| format!("failed to save store {}", store_path.display()))?;
    tracing::info!("Stored {} chunks in {}", store.len(), store_path.display());
    Ok(())
}

async fn ingest_url(
    provider: &dyn ChatModel,
    embedding_model: &str,
    url: &str,
) -> Result<Vec<EmbeddedChunk>> {
    let client = reqwest::Client::builder()
        .timeout(FETCH_TIMEOUT)
        .build()
        .context("failed to build http client")?;

    let html = client
        .get(url)
        .send()
        .await
        .with_context(|| format!("fetch failed for {url}"))?
        .text()
        .await
        .with_context(|| format!("body read failed for {url}"))?;

    let text = strip_html(&html);
    embed_windows(provider, embedding_model, &text, url).await
}

async fn ingest_file(
    provider: &dyn ChatModel,
    embedding_model: &str,
    path: &Path,
) -> Result<Vec<EmbeddedChunk>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;

    let is_markdown = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("md"));
    let text = if is_markdown {
        strip_html(&markdown_to_html(&raw))
    } else {
        raw
    };

    embed_windows(provider, embedding_model, &text, &path.display().to_string()).await
}

/// Embeds each window independently and tags it with its source.
async fn embed_windows(
    provider: &dyn ChatModel,
    embedding_model: &str,
    text: &str,
    source: &str,
) -> Result<Vec<EmbeddedChunk>> {
    let windows = chunk_text(text, CHUNK_SIZE, CHUNK_OVERLAP);
    let mut items = Vec::with_capacity(windows.len());

    for window in windows {
        let mut vectors = provider
            .embed(&[window.clone()], embedding_model)
            .await
            .map_err(|err| anyhow::anyhow!("embedding failed for {source}: {err}"))?;
        let embedding = vectors
            .pop()
            .ok_or_else(|| anyhow::anyhow!("empty embedding response for {source}"))?;

        items.push(EmbeddedChunk {
            text: window,
            embedding,
            meta: ChunkMeta {
                source: source.to_string(),
            },
        });
    }

    Ok(items)
}

fn markdown_to_html(markdown: &str) -> String {
    let parser = pulldown_cmark::Parser::new(markdown);
    let mut html = String::new();
    pulldown_cmark::html::push_html(&mut html, parser);
    html
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::*;
    use crate::llm::provider::LlmError;
    use crate::llm::types::ChatRequest;

    struct CountingEmbedModel(std::sync::atomic::AtomicUsize);

    #[async_trait]
    impl ChatModel for CountingEmbedModel {
        fn name(&self) -> &str {
            "counting-embed"
        }

        async fn chat(&self, _request: ChatRequest, _model_id: &str) -> Result<String, LlmError> {
            Err(LlmError::Permanent("chat not supported".to_string()))
        }

        async fn embed(
            &self,
            inputs: &[String],
            _model_id: &str,
        ) -> Result<Vec<Vec<f32>>, LlmError> {
            self.0
                .fetch_add(inputs.len(), std::sync::atomic::Ordering::SeqCst);
            Ok(inputs.iter().map(|_| vec![0.5, 0.5]).collect())
        }
    }

    #[tokio::test]
    async fn every_window_is_embedded_and_tagged_with_its_source() {
        let model = CountingEmbedModel(std::sync::atomic::AtomicUsize::new(0));
        let text = "x".repeat(CHUNK_SIZE + 100);

        let items = embed_windows(&model, "text-embedding-3-small", &text, "seed.md")
            .await
            .unwrap();

        assert_eq!(items.len(), 2);
        assert_eq!(
            model.0.load(std::sync::atomic::Ordering::SeqCst),
            items.len()
        );
        assert!(items.iter().all(|item| item.meta.source == "seed.md"));
        assert!(items.iter().all(|item| item.embedding == vec![0.5, 0.5]));
    }

    #[test]
    fn markdown_is_reduced_to_plain_text() {
        let text = strip_html(&markdown_to_html("# Öffnungszeiten\n\n*Täglich* ab 17:30"));
        assert_eq!(text, "Öffnungszeiten Täglich ab 17:30");
    }
}
