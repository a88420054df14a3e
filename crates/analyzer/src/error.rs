use thiserror::Error;

/// Result type for analyzer operations
pub type Result<T> = std::result::Result<T, AnalyzerError>;

/// Errors raised while preparing a parser for structural analysis
#[derive(Error, Debug)]
pub enum AnalyzerError {
    /// No structural rules exist for this language
    #[error("Unsupported language: {0}")]
    UnsupportedLanguage(String),

    /// The grammar could not be loaded into a parser
    #[error("Parser initialization failed: {0}")]
    ParserInit(String),

    #[error("{0}")]
    Other(String),
}

impl AnalyzerError {
    /// Create an unsupported language error
    pub fn unsupported_language(lang: impl Into<String>) -> Self {
        Self::UnsupportedLanguage(lang.into())
    }

    /// Create a parser initialization error
    pub fn parser_init(msg: impl Into<String>) -> Self {
        Self::ParserInit(msg.into())
    }
}
