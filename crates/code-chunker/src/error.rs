use thiserror::Error;

/// Result type for chunker operations
pub type Result<T> = std::result::Result<T, ChunkerError>;

/// Errors that can occur during code chunking
#[derive(Error, Debug)]
pub enum ChunkerError {
    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Tokenizer could not be loaded
    #[error("Tokenizer error: {0}")]
    TokenizerError(String),

    /// Chunk identity does not match its structural position
    #[error("Invalid chunk id '{id}': {reason}")]
    InvalidChunkId { id: String, reason: String },

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl ChunkerError {
    /// Create an invalid config error
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Create a tokenizer error
    pub fn tokenizer(msg: impl Into<String>) -> Self {
        Self::TokenizerError(msg.into())
    }

    pub fn invalid_chunk_id(id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidChunkId {
            id: id.into(),
            reason: reason.into(),
        }
    }
}
