use crate::config::ChunkerConfig;
use crate::error::{ChunkerError, Result};
use crate::splitter::split_by_tokens;
use crate::tokenizer::{Cl100kTokenizer, Tokenizer};
use crate::types::{ChunkContext, CodeChunk};
use semigraph_analyzer::{ClassInfo, FileAnalysis, MethodInfo};

/// Splits methods (or whole files) into token-bounded chunks
pub struct TokenAwareChunker {
    config: ChunkerConfig,
    tokenizer: Box<dyn Tokenizer>,
}

impl TokenAwareChunker {
    /// Create a chunker with an explicit tokenizer
    pub fn new(config: ChunkerConfig, tokenizer: impl Tokenizer + 'static) -> Result<Self> {
        config.validate().map_err(ChunkerError::invalid_config)?;
        Ok(Self {
            config,
            tokenizer: Box::new(tokenizer),
        })
    }

    /// Chunker counting tokens with cl100k_base
    pub fn cl100k(config: ChunkerConfig) -> Result<Self> {
        Self::new(config, Cl100kTokenizer::new()?)
    }

    pub fn config(&self) -> &ChunkerConfig {
        &self.config
    }

    pub fn count_tokens(&self, text: &str) -> usize {
        self.tokenizer.count_tokens(text)
    }

    /// Split text into segments under the configured budget
    pub fn split(&self, text: &str) -> Vec<String> {
        split_by_tokens(text, self.config.max_tokens, self.tokenizer.as_ref())
    }

    /// Chunk one method body, carrying its class and file context
    pub fn chunk_method(
        &self,
        analysis: &FileAnalysis,
        class: &ClassInfo,
        method: &MethodInfo,
    ) -> Vec<CodeChunk> {
        let context = ChunkContext::for_method(analysis, class, method);
        self.wrap(&context, self.split(&method.body_text))
    }

    /// Chunk all methods of all classes in a file
    pub fn chunk_analysis(&self, analysis: &FileAnalysis) -> Vec<CodeChunk> {
        analysis
            .classes
            .iter()
            .flat_map(|class| {
                class
                    .methods
                    .iter()
                    .flat_map(move |method| self.chunk_method(analysis, class, method))
            })
            .collect()
    }

    /// Whole-file fallback: same splitting, no structural metadata
    pub fn chunk_file(&self, file_path: &str, text: &str) -> Vec<CodeChunk> {
        let context = ChunkContext::for_file(file_path);
        self.wrap(&context, self.split(text))
    }

    fn wrap(&self, context: &ChunkContext, segments: Vec<String>) -> Vec<CodeChunk> {
        let total = segments.len();
        segments
            .into_iter()
            .enumerate()
            .map(|(i, content)| CodeChunk::new(context, i + 1, total, content))
            .collect()
    }
}
