pub mod chunker;
pub mod ingest;
pub mod retriever;
pub mod store;

pub use retriever::Retriever;
pub use store::{ChunkMeta, EmbeddedChunk, ScoredChunk, StoreError, VectorStore};
