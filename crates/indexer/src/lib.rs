//! # Indexer
//!
//! One build pass over a source tree, producing a graph and a vector index.
//!
//! ## Pipeline
//!
//! ```text
//! Directory
//!     │
//!     ├──> File Scanner (.gitignore aware, extension/depth filters)
//!     │      └─> Source files (sorted)
//!     │
//!     ├──> Structural Analyzer (cached parser per language)
//!     │      ├─> Graph: class/method nodes, contains/calls edges
//!     │      └─> Chunker: method chunks, or whole-file fallback
//!     │
//!     └──> Embedding backend (batched) ──> Vector Store
//!            └─> vectors.json + graph.json
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use semigraph_code_chunker::{ChunkerConfig, TokenAwareChunker};
//! use semigraph_indexer::{IndexLayout, ProjectIndexer, ScanOptions};
//! use semigraph_vector_store::MockEmbeddingBackend;
//! use std::path::Path;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let indexer = ProjectIndexer::new(
//!         IndexLayout::new("/tmp/index"),
//!         Box::new(MockEmbeddingBackend::default()),
//!         TokenAwareChunker::cl100k(ChunkerConfig::default())?,
//!     );
//!     let stats = indexer.index(Path::new("/path/to/project"), &ScanOptions::default()).await?;
//!
//!     println!("Indexed {} files, {} chunks", stats.files, stats.chunks);
//!     Ok(())
//! }
//! ```

mod error;
mod indexer;
mod layout;
mod scanner;
mod stats;

pub use error::{IndexerError, Result};
pub use indexer::{ProjectIndexer, DEFAULT_BATCH_SIZE};
pub use layout::{IndexLayout, GRAPH_FILE, VECTORS_FILE};
pub use scanner::{FileScanner, ScanOptions, DEFAULT_EXTENSIONS};
pub use stats::IndexStats;
