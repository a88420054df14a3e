use crate::document_store::{DocumentStore, MemoryDocumentStore};
use crate::error::{Result, VectorStoreError};
use crate::similarity::{cosine_similarity, ensure_finite};
use crate::types::{SearchResult, StoredEmbedding};
use semigraph_code_chunker::CodeChunk;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Chunk embeddings with full-scan cosine ranking
pub struct VectorStore<S: DocumentStore = MemoryDocumentStore> {
    store: S,
    dimension: Option<usize>,
}

impl VectorStore<MemoryDocumentStore> {
    pub fn new() -> Self {
        Self::with_store(MemoryDocumentStore::new())
    }

    /// Load store from disk
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        log::info!("Loading VectorStore from {}", path.display());

        let data = tokio::fs::read_to_string(path).await?;
        let snapshot: StoreSnapshot = serde_json::from_str(&data)?;

        let mut store = Self::new();
        for doc in snapshot.embeddings {
            store.upsert(doc.chunk_id, doc.chunk, doc.vector)?;
        }
        if store.dimension.is_none() {
            store.dimension = snapshot.dimension;
        }

        log::info!("Loaded {} embeddings", store.count());
        Ok(store)
    }
}

impl Default for VectorStore<MemoryDocumentStore> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: DocumentStore> VectorStore<S> {
    /// Wrap an existing document store. Its documents fix the dimension.
    pub fn with_store(store: S) -> Self {
        let dimension = store.scan_all().next().map(|doc| doc.vector.len());
        Self { store, dimension }
    }

    /// Dimension shared by every stored vector, once the first one is in
    pub fn dimension(&self) -> Option<usize> {
        self.dimension
    }

    pub fn count(&self) -> usize {
        self.store.count()
    }

    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }

    pub fn get(&self, chunk_id: &str) -> Option<&StoredEmbedding> {
        self.store.get(chunk_id)
    }

    /// Insert or replace the embedding stored under `chunk_id`
    pub fn upsert(
        &mut self,
        chunk_id: impl Into<String>,
        chunk: CodeChunk,
        vector: Vec<f32>,
    ) -> Result<()> {
        let chunk_id = chunk_id.into();
        if chunk_id.trim().is_empty() {
            return Err(VectorStoreError::InvalidChunkId(chunk_id));
        }
        ensure_finite(&vector, &format!("embedding '{chunk_id}'"))?;

        match self.dimension {
            Some(expected) if expected != vector.len() => {
                return Err(VectorStoreError::DimensionMismatch {
                    expected,
                    actual: vector.len(),
                });
            }
            Some(_) => {}
            None => self.dimension = Some(vector.len()),
        }

        self.store.upsert(StoredEmbedding {
            chunk_id,
            chunk,
            vector,
        });
        Ok(())
    }

    /// Top `limit` stored chunks by cosine similarity to `query`, best first.
    ///
    /// Equal scores keep storage order. A query whose length differs from the
    /// stored vectors fails with [`VectorStoreError::DimensionMismatch`]; NaN
    /// or infinite values fail with [`VectorStoreError::NonFiniteVector`].
    pub fn search_similar(&self, query: &[f32], limit: usize) -> Result<Vec<SearchResult>> {
        if limit == 0 || self.is_empty() {
            return Ok(Vec::new());
        }
        ensure_finite(query, "query")?;

        let mut scored = Vec::with_capacity(self.count());
        for doc in self.store.scan_all() {
            let score = cosine_similarity(&doc.vector, query)?;
            scored.push((doc, score));
        }

        // sort_by is stable
        scored.sort_by(|a, b| b.1.total_cmp(&a.1));
        scored.truncate(limit);

        log::debug!("Ranked {} embeddings, returning {}", self.count(), scored.len());

        Ok(scored
            .into_iter()
            .map(|(doc, score)| SearchResult {
                chunk_id: doc.chunk_id.clone(),
                chunk: doc.chunk.clone(),
                score,
            })
            .collect())
    }

    /// Save store to disk as pretty JSON
    pub async fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        log::info!("Saving VectorStore to {}", path.display());

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let snapshot = StoreSnapshotRef {
            dimension: self.dimension,
            embeddings: self.store.scan_all().collect(),
        };
        let data = serde_json::to_string_pretty(&snapshot)?;
        tokio::fs::write(path, data).await?;

        log::info!("VectorStore saved ({} embeddings)", self.count());
        Ok(())
    }
}

#[derive(Serialize)]
struct StoreSnapshotRef<'a> {
    dimension: Option<usize>,
    embeddings: Vec<&'a StoredEmbedding>,
}

#[derive(Deserialize)]
struct StoreSnapshot {
    #[serde(default)]
    dimension: Option<usize>,
    embeddings: Vec<StoredEmbedding>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use semigraph_code_chunker::ChunkContext;

    fn chunk(name: &str) -> CodeChunk {
        CodeChunk::new(&ChunkContext::for_file(format!("{name}.txt")), 1, 1, name)
    }

    fn store_with(vectors: &[(&str, Vec<f32>)]) -> VectorStore {
        let mut store = VectorStore::new();
        for (name, vector) in vectors {
            store.upsert(*name, chunk(name), vector.clone()).unwrap();
        }
        store
    }

    #[test]
    fn upsert_replaces_in_place() {
        let mut store = store_with(&[("a", vec![1.0, 0.0]), ("b", vec![0.0, 1.0])]);
        store.upsert("a", chunk("a2"), vec![0.0, 1.0]).unwrap();

        assert_eq!(store.count(), 2);
        assert_eq!(store.get("a").unwrap().chunk.content, "a2");

        // "a" keeps its slot, so ties still list it first
        let ids: Vec<_> = store
            .search_similar(&[0.0, 1.0], 2)
            .unwrap()
            .into_iter()
            .map(|r| r.chunk_id)
            .collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn first_insert_fixes_dimension() {
        let mut store = store_with(&[("a", vec![1.0, 0.0, 0.0])]);
        assert_eq!(store.dimension(), Some(3));

        let err = store.upsert("b", chunk("b"), vec![1.0, 0.0]).unwrap_err();
        assert!(matches!(
            err,
            VectorStoreError::DimensionMismatch { expected: 3, actual: 2 }
        ));
        assert_eq!(store.count(), 1);
    }

    #[test]
    fn non_finite_vectors_are_rejected() {
        let mut store = store_with(&[("zero", vec![0.0, 1.0])]);

        for bad in [vec![f32::NAN, 0.0], vec![f32::INFINITY, 0.0]] {
            let err = store.upsert("bad", chunk("bad"), bad).unwrap_err();
            assert!(matches!(err, VectorStoreError::NonFiniteVector(_)));
        }
        assert_eq!(store.count(), 1);

        store.upsert("best", chunk("best"), vec![1.0, 0.0]).unwrap();
        let ranked: Vec<_> = store
            .search_similar(&[1.0, 0.0], 2)
            .unwrap()
            .into_iter()
            .map(|r| r.chunk_id)
            .collect();
        assert_eq!(ranked, vec!["best", "zero"]);

        assert!(matches!(
            store.search_similar(&[f32::NAN, 0.0], 2),
            Err(VectorStoreError::NonFiniteVector(_))
        ));
    }

    #[test]
    fn empty_chunk_id_is_rejected() {
        let mut store = VectorStore::new();
        let err = store.upsert("  ", chunk("x"), vec![1.0]).unwrap_err();
        assert!(matches!(err, VectorStoreError::InvalidChunkId(_)));
    }

    #[test]
    fn search_ranks_by_cosine() {
        let store = store_with(&[
            ("first", vec![1.0, 0.0, 0.0]),
            ("second", vec![0.0, 1.0, 0.0]),
            ("third", vec![0.9, 0.1, 0.0]),
        ]);

        let results = store.search_similar(&[1.0, 0.0, 0.0], 2).unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].chunk_id, "first");
        assert!((results[0].score - 1.0).abs() < 1e-6);
        assert_eq!(results[1].chunk_id, "third");
        assert!((results[1].score - 0.9939).abs() < 1e-3);
    }

    #[test]
    fn limit_is_bounded_by_count() {
        let store = store_with(&[("a", vec![1.0, 0.0]), ("b", vec![0.5, 0.5]), ("c", vec![0.0, 1.0])]);

        assert_eq!(store.search_similar(&[1.0, 0.0], 0).unwrap().len(), 0);
        let all = store.search_similar(&[1.0, 0.0], 10).unwrap();
        assert_eq!(all.len(), 3);
        assert!(all.windows(2).all(|w| w[0].score >= w[1].score));
    }

    #[test]
    fn empty_store_returns_nothing() {
        let store = VectorStore::new();
        assert!(store.search_similar(&[1.0, 2.0], 5).unwrap().is_empty());
    }

    #[test]
    fn query_dimension_mismatch_is_fatal() {
        let store = store_with(&[("a", vec![1.0, 0.0, 0.0])]);
        assert!(matches!(
            store.search_similar(&[1.0, 0.0], 1),
            Err(VectorStoreError::DimensionMismatch { .. })
        ));
    }
}
