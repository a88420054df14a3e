use crate::error::{IndexerError, Result};
use semigraph_graph::CodeGraph;
use semigraph_vector_store::VectorStore;
use std::path::{Path, PathBuf};

pub const VECTORS_FILE: &str = "vectors.json";
pub const GRAPH_FILE: &str = "graph.json";

/// Files that make up one index directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexLayout {
    dir: PathBuf,
}

impl IndexLayout {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn vectors_path(&self) -> PathBuf {
        self.dir.join(VECTORS_FILE)
    }

    pub fn graph_path(&self) -> PathBuf {
        self.dir.join(GRAPH_FILE)
    }

    pub async fn load_vectors(&self) -> Result<VectorStore> {
        let path = self.vectors_path();
        if !path.exists() {
            return Err(self.missing(&path));
        }
        Ok(VectorStore::load(&path).await?)
    }

    pub async fn load_graph(&self) -> Result<CodeGraph> {
        let path = self.graph_path();
        if !path.exists() {
            return Err(self.missing(&path));
        }
        Ok(CodeGraph::load(&path).await?)
    }

    fn missing(&self, path: &Path) -> IndexerError {
        IndexerError::InvalidPath(format!(
            "No index at {} (missing {}); run `build` first",
            self.dir.display(),
            path.display()
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_live_under_the_index_dir() {
        let layout = IndexLayout::new("/tmp/idx");
        assert_eq!(layout.vectors_path(), Path::new("/tmp/idx/vectors.json"));
        assert_eq!(layout.graph_path(), Path::new("/tmp/idx/graph.json"));
    }

    #[tokio::test]
    async fn loading_an_unbuilt_index_is_invalid_path() {
        let dir = tempfile::TempDir::new().unwrap();
        let layout = IndexLayout::new(dir.path());
        assert!(matches!(
            layout.load_graph().await,
            Err(IndexerError::InvalidPath(_))
        ));
        assert!(matches!(
            layout.load_vectors().await,
            Err(IndexerError::InvalidPath(_))
        ));
    }
}
