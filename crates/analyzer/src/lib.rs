//! # Semigraph Analyzer
//!
//! Structural analysis of source files: packages, type declarations, fields,
//! methods and the call sites inside each method body.
//!
//! ## Architecture
//!
//! ```text
//! (file path, source text)
//!     │
//!     ├──> Language Detection (from extension)
//!     │
//!     ├──> ParserCache ──> SyntaxParser (tree-sitter adapter, one per language)
//!     │
//!     └──> StructuralAnalyzer
//!          ├─> Package declaration
//!          ├─> Type declarations (nested types included)
//!          │    ├─> Field names
//!          │    └─> Methods and constructors
//!          │         └─> Call sites (iterative descent)
//!          └─> FileAnalysis
//! ```
//!
//! ## Example
//!
//! ```rust
//! use semigraph_analyzer::{Language, ParserCache};
//!
//! let mut cache = ParserCache::new();
//! let analyzer = cache.analyzer_for(Language::Java).expect("java grammar");
//! let analysis = analyzer.analyze("Sample.java", "class Sample { void run() { go(); } }");
//!
//! assert_eq!(analysis.classes[0].methods[0].calls[0].callee_name, "go");
//! ```

mod analyzer;
mod error;
mod language;
mod parser;
mod types;

pub use analyzer::{slice_source, StructuralAnalyzer};
pub use error::{AnalyzerError, Result};
pub use language::{GrammarProfile, Language, JAVA_GRAMMAR};
pub use parser::{ParserCache, ParserFactory, SyntaxParser, TreeSitterParser};
pub use types::{ClassInfo, FileAnalysis, MethodCall, MethodInfo, MethodParameter};
