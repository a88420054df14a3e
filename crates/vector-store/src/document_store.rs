use crate::types::StoredEmbedding;
use std::collections::HashMap;

/// Persistence seam for embeddings: upsert, point lookup and full scan
pub trait DocumentStore {
    /// Insert or replace the document stored under `doc.chunk_id`
    fn upsert(&mut self, doc: StoredEmbedding);

    fn get(&self, chunk_id: &str) -> Option<&StoredEmbedding>;

    /// Every document, in storage order
    fn scan_all(&self) -> Box<dyn Iterator<Item = &StoredEmbedding> + '_>;

    fn count(&self) -> usize;
}

/// In-memory store; a replaced document keeps its original position
#[derive(Debug, Default, Clone)]
pub struct MemoryDocumentStore {
    docs: Vec<StoredEmbedding>,
    positions: HashMap<String, usize>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DocumentStore for MemoryDocumentStore {
    fn upsert(&mut self, doc: StoredEmbedding) {
        match self.positions.get(&doc.chunk_id) {
            Some(&pos) => self.docs[pos] = doc,
            None => {
                self.positions.insert(doc.chunk_id.clone(), self.docs.len());
                self.docs.push(doc);
            }
        }
    }

    fn get(&self, chunk_id: &str) -> Option<&StoredEmbedding> {
        self.positions.get(chunk_id).map(|&pos| &self.docs[pos])
    }

    fn scan_all(&self) -> Box<dyn Iterator<Item = &StoredEmbedding> + '_> {
        Box::new(self.docs.iter())
    }

    fn count(&self) -> usize {
        self.docs.len()
    }
}
