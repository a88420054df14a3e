use semigraph_code_chunker::CodeChunk;
use serde::{Deserialize, Serialize};

/// One chunk and its embedding, keyed by `chunk_id`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredEmbedding {
    pub chunk_id: String,
    pub chunk: CodeChunk,
    pub vector: Vec<f32>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult {
    pub chunk_id: String,
    pub chunk: CodeChunk,
    pub score: f32,
}
