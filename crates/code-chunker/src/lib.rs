//! # Semigraph Code Chunker
//!
//! Token-budgeted chunking of method bodies (or whole files) into units ready
//! for embedding.
//!
//! ## Philosophy
//!
//! Chunk boundaries follow line boundaries so that concatenating the chunks of
//! a method reproduces its source exactly. Only a single line that exceeds the
//! budget on its own is cut mid-line.
//!
//! ## Architecture
//!
//! ```text
//! MethodInfo.body_text / file text
//!     │
//!     ├──> Line split (terminators kept)
//!     │
//!     ├──> Greedy accumulation under max_tokens
//!     │    └─> Long-line fallback (char windows, halved until they fit)
//!     │
//!     └──> CodeChunk[] (chunk_id, structural metadata, content)
//! ```
//!
//! ## Example
//!
//! ```rust
//! use semigraph_code_chunker::{ChunkerConfig, EstimatingTokenizer, TokenAwareChunker};
//!
//! let chunker = TokenAwareChunker::new(ChunkerConfig::default(), EstimatingTokenizer).unwrap();
//! let chunks = chunker.chunk_file("notes/README.md", "hello\nworld\n");
//!
//! assert_eq!(chunks.len(), 1);
//! assert_eq!(chunks[0].chunk_id, "notes/readme.md::::::1/1");
//! ```

mod chunker;
mod config;
mod error;
mod splitter;
mod tokenizer;
mod types;

pub use chunker::TokenAwareChunker;
pub use config::{ChunkerConfig, MAX_TOKENS};
pub use error::{ChunkerError, Result};
pub use splitter::split_by_tokens;
pub use tokenizer::{Cl100kTokenizer, EstimatingTokenizer, Tokenizer};
pub use types::{ChunkContext, CodeChunk};

// Re-export analyzer types carried inside chunks
pub use semigraph_analyzer::MethodCall;
