pub mod build;
pub mod graph;
pub mod search;

use crate::config::AppConfig;
use clap::Args;
use semigraph_vector_store::EmbeddingSettings;
use std::path::PathBuf;

/// Embedding backend options shared by `build` and `search`
#[derive(Args, Debug, Clone, Default)]
pub struct EmbeddingArgs {
    /// Embedding model: `mock` or an http(s) endpoint (overrides --model-path)
    #[arg(short = 'm', long)]
    pub model: Option<String>,

    /// Display name sent to the backend
    #[arg(long)]
    pub model_name: Option<String>,

    /// Vector dimension (backend default when omitted)
    #[arg(long = "embedding-dim")]
    pub embedding_dim: Option<usize>,

    /// API key for remote backends
    #[arg(long)]
    pub api_key: Option<String>,

    /// Local ONNX model directory (model.onnx + tokenizer.json)
    #[arg(long)]
    pub model_path: Option<PathBuf>,
}

impl EmbeddingArgs {
    /// Option, then config file, then built-in default
    pub fn settings(&self, config: &AppConfig) -> EmbeddingSettings {
        EmbeddingSettings {
            model: self
                .model
                .clone()
                .unwrap_or_else(|| config.embedding.model.clone()),
            model_name: self
                .model_name
                .clone()
                .or_else(|| config.embedding.model_name.clone()),
            dimension: self.embedding_dim.or(config.embedding.embedding_dimension),
            api_key: self.api_key.clone().or_else(|| config.api_key()),
            model_path: self
                .model_path
                .clone()
                .or_else(|| config.embedding.model_path.clone()),
        }
    }
}
