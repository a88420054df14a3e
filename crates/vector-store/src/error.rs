use thiserror::Error;

pub type Result<T> = std::result::Result<T, VectorStoreError>;

#[derive(Error, Debug)]
pub enum VectorStoreError {
    #[error("Embedding error: {0}")]
    EmbeddingError(String),

    #[error("Vector dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Non-finite vector value in {0}")]
    NonFiniteVector(String),

    #[error("Invalid chunk id: '{0}'")]
    InvalidChunkId(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

impl VectorStoreError {
    pub fn embedding(message: impl Into<String>) -> Self {
        Self::EmbeddingError(message.into())
    }
}
