//! # Vector Store
//!
//! Embedding storage and cosine-similarity search over code chunks.
//!
//! ## Architecture
//!
//! ```text
//! CodeChunk[]
//!     │
//!     ├──> EmbeddingBackend (mock | HTTP | local ONNX)
//!     │      └─> unit Vector[D]
//!     │
//!     ├──> VectorStore
//!     │      ├─ dimension fixed by the first upsert
//!     │      └─ full-scan cosine ranking, stable on ties
//!     │
//!     └──> DocumentStore (in-memory, JSON on disk)
//! ```
//!
//! ## Example
//!
//! ```
//! use semigraph_code_chunker::{ChunkContext, CodeChunk};
//! use semigraph_vector_store::VectorStore;
//!
//! let mut store = VectorStore::new();
//! let chunk = CodeChunk::new(&ChunkContext::for_file("a.txt"), 1, 1, "hello");
//! store.upsert(chunk.chunk_id.clone(), chunk, vec![1.0, 0.0]).unwrap();
//!
//! let results = store.search_similar(&[1.0, 0.0], 5).unwrap();
//! assert_eq!(results[0].chunk.file_path, "a.txt");
//! ```

mod document_store;
mod embeddings;
mod error;
mod similarity;
mod store;
mod types;

pub use document_store::{DocumentStore, MemoryDocumentStore};
pub use embeddings::{
    create_backend, infer_dimension, EmbeddingBackend, EmbeddingSettings, HttpEmbeddingBackend,
    LocalEmbeddingBackend, MockEmbeddingBackend, ModelAssets, DEFAULT_HTTP_DIMENSION,
    DEFAULT_LOCAL_DIMENSION, DEFAULT_MOCK_DIMENSION,
};
pub use error::{Result, VectorStoreError};
pub use similarity::cosine_similarity;
pub use store::VectorStore;
pub use types::{SearchResult, StoredEmbedding};
