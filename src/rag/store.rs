//! Flat vector store: an append-only list of embedded chunks persisted as
//! a single JSON document. Similarity lookup is an O(n) cosine scan — no
//! index structure, ranking is recomputed at query time.
//!
//! Whole-file load/replace semantics. The serving path only reads; writes
//! happen in the offline ingestion tool, which is never run concurrently
//! with itself.

use std::cmp::Ordering;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::vector_math::cosine_similarity;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChunkMeta {
    pub source: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbeddedChunk {
    pub text: String,
    pub embedding: Vec<f32>,
    pub meta: ChunkMeta,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VectorStore {
    pub items: Vec<EmbeddedChunk>,
}

#[derive(Debug, Clone)]
pub struct ScoredChunk {
    pub chunk: EmbeddedChunk,
    pub score: f32,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store i/o failed for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("store file {path} is malformed: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl VectorStore {
    /// Loads the store from disk. A missing file is an empty store; a
    /// malformed file fails fast.
    pub fn load(path: &Path) -> Result<Self, StoreError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = fs::read_to_string(path).map_err(|source| StoreError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        serde_json::from_str(&raw).map_err(|source| StoreError::Malformed {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Serializes the whole store, writing via a temp file and atomic
    /// rename so a crashed run never leaves a half-written store behind.
    pub fn save(&self, path: &Path) -> Result<(), StoreError> {
        let io_err = |source| StoreError::Io {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(io_err)?;
            }
        }

        let encoded = serde_json::to_vec_pretty(self).map_err(|source| StoreError::Malformed {
            path: path.to_path_buf(),
            source,
        })?;

        let tmp = path.with_extension("tmp");
        fs::write(&tmp, encoded).map_err(io_err)?;
        fs::rename(&tmp, path).map_err(io_err)?;
        Ok(())
    }

    pub fn extend(&mut self, chunks: Vec<EmbeddedChunk>) {
        self.items.extend(chunks);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Scores every stored chunk against the query vector and returns the
    /// top `k` by descending cosine similarity.
    pub fn top_k(&self, query: &[f32], k: usize) -> Vec<ScoredChunk> {
        let mut scored: Vec<ScoredChunk> = self
            .items
            .iter()
            .map(|chunk| ScoredChunk {
                chunk: chunk.clone(),
                score: cosine_similarity(query, &chunk.embedding),
            })
            .collect();

        scored.sort_by(|left, right| {
            right
                .score
                .partial_cmp(&left.score)
                .unwrap_or(Ordering::Equal)
        });
        scored.truncate(k);
        scored
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(text: &str, embedding: Vec<f32>) -> EmbeddedChunk {
        EmbeddedChunk {
            text: text.to_string(),
            embedding,
            meta: ChunkMeta {
                source: "test".to_string(),
            },
        }
    }

    #[test]
    fn missing_file_loads_as_empty_store() {
        let dir = tempfile::tempdir().unwrap();
        let store = VectorStore::load(&dir.path().join("nope.json")).unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data").join("embeddings.json");

        let mut store = VectorStore::default();
        store.extend(vec![chunk("Pad Thai", vec![0.1, 0.9])]);
        store.save(&path).unwrap();

        let loaded = VectorStore::load(&path).unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded.items[0], store.items[0]);
    }

    #[test]
    fn malformed_file_fails_fast() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("embeddings.json");
        std::fs::write(&path, "{not json").unwrap();

        let err = VectorStore::load(&path).unwrap_err();
        assert!(matches!(err, StoreError::Malformed { .. }));
    }

    #[test]
    fn top_k_ranks_by_descending_similarity() {
        let mut store = VectorStore::default();
        store.extend(vec![
            chunk("diagonal", vec![0.7, 0.7]),
            chunk("orthogonal", vec![0.0, 1.0]),
            chunk("aligned", vec![1.0, 0.0]),
        ]);

        let hits = store.top_k(&[1.0, 0.0], 2);

        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].chunk.text, "aligned");
        assert_eq!(hits[1].chunk.text, "diagonal");
        assert!(hits[0].score >= hits[1].score);
    }

    #[test]
    fn top_k_on_empty_store_is_empty() {
        let store = VectorStore::default();
        assert!(store.top_k(&[1.0, 0.0], 5).is_empty());
    }

    #[test]
    fn top_k_never_returns_more_than_k() {
        let mut store = VectorStore::default();
        store.extend((0..10).map(|i| chunk(&format!("c{i}"), vec![1.0, i as f32])).collect());
        assert_eq!(store.top_k(&[1.0, 1.0], 3).len(), 3);
    }
}
