use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Statistics about one build pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexStats {
    /// Files indexed successfully
    pub files: usize,

    /// Files embedded whole because no methods were found
    pub fallback_files: usize,

    pub chunks: usize,

    /// Call edges written to the graph
    pub call_relationships: usize,

    /// Embeddings in the store after the pass
    pub embeddings: usize,

    pub graph_nodes: usize,

    pub graph_edges: usize,

    /// Indexed files per language
    pub languages: BTreeMap<String, usize>,

    /// One entry per file that failed
    pub errors: Vec<String>,

    /// Time taken in milliseconds
    pub time_ms: u64,
}

impl IndexStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_file(&mut self, language: &str) {
        self.files += 1;
        *self.languages.entry(language.to_string()).or_insert(0) += 1;
    }

    pub fn add_chunks(&mut self, count: usize) {
        self.chunks += count;
    }

    pub fn add_error(&mut self, error: String) {
        self.errors.push(error);
    }
}

impl fmt::Display for IndexStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} files ({} fallback), {} chunks, {} embeddings, {} graph nodes, {} graph edges, \
             {} call relationships, {} errors in {} ms",
            self.files,
            self.fallback_files,
            self.chunks,
            self.embeddings,
            self.graph_nodes,
            self.graph_edges,
            self.call_relationships,
            self.errors.len(),
            self.time_ms
        )
    }
}
