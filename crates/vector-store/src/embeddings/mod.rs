mod http;
mod local;
mod mock;

pub use http::{HttpEmbeddingBackend, DEFAULT_HTTP_DIMENSION};
pub use local::{infer_dimension, LocalEmbeddingBackend, ModelAssets, DEFAULT_LOCAL_DIMENSION};
pub use mock::{MockEmbeddingBackend, DEFAULT_MOCK_DIMENSION};

use crate::error::{Result, VectorStoreError};
use async_trait::async_trait;
use std::path::PathBuf;

/// Turns text into unit-length vectors of a fixed dimension
#[async_trait]
pub trait EmbeddingBackend: Send + Sync {
    fn model_name(&self) -> &str;

    /// Length of every vector this backend returns
    fn dimension(&self) -> usize;

    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let mut out = Vec::with_capacity(texts.len());
        for text in texts {
            out.push(self.embed(text).await?);
        }
        Ok(out)
    }
}

/// Backend selection as read from configuration and CLI options
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmbeddingSettings {
    /// `mock`, or an `http(s)://` endpoint
    pub model: String,
    pub model_name: Option<String>,
    pub dimension: Option<usize>,
    pub api_key: Option<String>,

    /// Local ONNX model directory, used unless `model` is an endpoint
    pub model_path: Option<PathBuf>,
}

impl EmbeddingSettings {
    /// Display name: explicit name, else the model identifier, else `mock`
    pub fn resolved_name(&self) -> String {
        self.model_name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .or_else(|| Some(self.model.trim()).filter(|model| !model.is_empty()))
            .unwrap_or("mock")
            .to_string()
    }
}

/// Pick a backend: an `http(s)://` model is remote, a model path is a
/// local ONNX model, anything else is the mock
pub fn create_backend(settings: &EmbeddingSettings) -> Result<Box<dyn EmbeddingBackend>> {
    let model = settings.model.trim();
    let name = settings.resolved_name();

    if settings.dimension == Some(0) {
        return Err(VectorStoreError::embedding("embedding dimension must be positive"));
    }

    if model.starts_with("http://") || model.starts_with("https://") {
        let dimension = settings.dimension.unwrap_or(DEFAULT_HTTP_DIMENSION);
        log::info!("Using HTTP embedding model '{name}' at {model} (dimension {dimension})");
        let backend = HttpEmbeddingBackend::new(model, name, dimension, settings.api_key.clone())?;
        return Ok(Box::new(backend));
    }

    if let Some(path) = settings
        .model_path
        .as_deref()
        .filter(|path| !path.as_os_str().is_empty())
    {
        log::info!("Using local embedding model '{name}' from {}", path.display());
        let backend = LocalEmbeddingBackend::new(name, path, settings.dimension)?;
        return Ok(Box::new(backend));
    }

    if model.is_empty() || model.eq_ignore_ascii_case("mock") {
        log::info!("Using mock embedding model '{name}'");
        let dimension = settings.dimension.unwrap_or(DEFAULT_MOCK_DIMENSION);
        return Ok(Box::new(MockEmbeddingBackend::new(name, dimension)));
    }

    log::warn!("Model type not recognized for '{model}', falling back to mock model");
    let dimension = settings.dimension.unwrap_or(DEFAULT_MOCK_DIMENSION);
    Ok(Box::new(MockEmbeddingBackend::new(name, dimension)))
}

pub(crate) fn normalize(vec: &mut [f32]) {
    // f64 so large components do not overflow the sum of squares
    let norm = vec
        .iter()
        .map(|v| f64::from(*v) * f64::from(*v))
        .sum::<f64>()
        .sqrt();
    if norm == 0.0 || !norm.is_finite() {
        return;
    }
    for value in vec {
        *value = (f64::from(*value) / norm) as f32;
    }
}
