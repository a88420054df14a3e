use crate::error::{IndexerError, Result};
use crate::layout::IndexLayout;
use crate::scanner::{FileScanner, ScanOptions};
use crate::stats::IndexStats;
use semigraph_analyzer::{Language, ParserCache};
use semigraph_code_chunker::{CodeChunk, TokenAwareChunker};
use semigraph_graph::{CodeGraph, GraphBuilder, GraphStore};
use semigraph_vector_store::{EmbeddingBackend, VectorStore};
use std::path::Path;
use std::time::Instant;

pub const DEFAULT_BATCH_SIZE: usize = 32;

/// Drives one build pass: scan, analyze, write the graph, chunk, embed, store
pub struct ProjectIndexer {
    layout: IndexLayout,
    backend: Box<dyn EmbeddingBackend>,
    chunker: TokenAwareChunker,
    batch_size: usize,
}

/// Mutable state of one pass
struct BuildState {
    parsers: ParserCache,
    graph: CodeGraph,
    store: VectorStore,
    stats: IndexStats,
}

impl ProjectIndexer {
    pub fn new(
        layout: IndexLayout,
        backend: Box<dyn EmbeddingBackend>,
        chunker: TokenAwareChunker,
    ) -> Self {
        Self {
            layout,
            backend,
            chunker,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }

    /// Number of chunks sent to the backend per request (at least 1)
    #[must_use]
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    pub fn layout(&self) -> &IndexLayout {
        &self.layout
    }

    pub fn backend(&self) -> &dyn EmbeddingBackend {
        self.backend.as_ref()
    }

    /// Index everything under `root` and write a fresh index to the layout
    pub async fn index(&self, root: &Path, options: &ScanOptions) -> Result<IndexStats> {
        if !root.exists() {
            return Err(IndexerError::InvalidPath(format!(
                "Path does not exist: {}",
                root.display()
            )));
        }

        let start = Instant::now();
        log::info!("Indexing project at {}", root.display());
        log::info!(
            "Embedding model: {} (dimension {})",
            self.backend.model_name(),
            self.backend.dimension()
        );

        let files = FileScanner::new(root, options.clone()).scan();
        tokio::fs::create_dir_all(self.layout.dir()).await?;

        let mut state = BuildState {
            parsers: ParserCache::new(),
            graph: CodeGraph::new(),
            store: VectorStore::new(),
            stats: IndexStats::new(),
        };

        for file in &files {
            let relative = normalize_path(root, file);
            if let Err(e) = self.index_file(file, &relative, &mut state).await {
                log::warn!("Failed to index {relative}: {e}");
                state.stats.add_error(format!("{relative}: {e}"));
            }
        }

        let released = state.parsers.release();
        log::debug!("Released {released} parsers");

        let BuildState {
            graph,
            store,
            mut stats,
            ..
        } = state;

        store.save(self.layout.vectors_path()).await?;
        graph.save(&self.layout.graph_path()).await?;

        stats.embeddings = store.count();
        stats.graph_nodes = graph.node_count();
        stats.graph_edges = graph.edge_count();
        #[allow(clippy::cast_possible_truncation)]
        {
            stats.time_ms = start.elapsed().as_millis() as u64;
        }

        log::info!("Index built at {}: {stats}", self.layout.dir().display());
        Ok(stats)
    }

    async fn index_file(&self, path: &Path, relative: &str, state: &mut BuildState) -> Result<()> {
        log::debug!("Processing file: {relative}");

        let source = tokio::fs::read_to_string(path).await?;
        let language = Language::from_path(path);

        let analysis = state
            .parsers
            .analyzer_for(language)
            .map(|analyzer| analyzer.analyze(relative, &source));

        let mut chunks = Vec::new();
        if let Some(analysis) = analysis.filter(|analysis| !analysis.is_empty()) {
            let calls = GraphBuilder::add_file(&mut state.graph, &analysis)?;
            state.stats.call_relationships += calls;
            chunks = self.chunker.chunk_analysis(&analysis);
            log::debug!(
                "Parsed {relative}: package={:?}, classes={}, methods={}",
                analysis.package_name,
                analysis.classes.len(),
                analysis.method_count()
            );
        }

        if chunks.is_empty() {
            log::debug!("No methods in {relative}, embedding whole file");
            chunks = self.chunker.chunk_file(relative, &source);
            state.stats.fallback_files += 1;
        }

        let count = chunks.len();
        self.embed_and_store(chunks, &mut state.store).await?;

        state.stats.add_file(language.as_str());
        state.stats.add_chunks(count);
        log::debug!("Indexed: {relative} ({count} chunks)");
        Ok(())
    }

    async fn embed_and_store(&self, chunks: Vec<CodeChunk>, store: &mut VectorStore) -> Result<()> {
        let mut chunks = chunks.into_iter().peekable();

        while chunks.peek().is_some() {
            let batch: Vec<CodeChunk> = chunks.by_ref().take(self.batch_size).collect();
            let texts: Vec<String> = batch.iter().map(CodeChunk::embedding_text).collect();

            let vectors = self.backend.embed_batch(&texts).await?;
            if vectors.len() != batch.len() {
                return Err(IndexerError::Other(format!(
                    "embedding backend returned {} vectors for {} chunks",
                    vectors.len(),
                    batch.len()
                )));
            }

            for (chunk, vector) in batch.into_iter().zip(vectors) {
                store.upsert(chunk.chunk_id.clone(), chunk, vector)?;
            }
        }

        Ok(())
    }
}

/// Root-relative path with forward slashes; a single-file root keeps its file name
fn normalize_path(root: &Path, path: &Path) -> String {
    let relative = match path.strip_prefix(root) {
        Ok(rel) if !rel.as_os_str().is_empty() => rel,
        _ => path.file_name().map(Path::new).unwrap_or(path),
    };
    let mut normalized = relative.to_string_lossy().to_string();
    if normalized.contains('\\') {
        normalized = normalized.replace('\\', "/");
    }
    normalized
}
