use super::{normalize, EmbeddingBackend};
use crate::error::{Result, VectorStoreError};
use crate::similarity::ensure_finite;
use async_trait::async_trait;
use ndarray::{Array, Array1, ArrayD, ArrayView2, Ix2, Ix3};
use ort::session::{builder::GraphOptimizationLevel, Session, SessionInputs};
use ort::value::{DynTensor, Tensor};
use serde_json::Value;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tokenizers::{Encoding, PaddingParams, PaddingStrategy, Tokenizer, TruncationParams};
use tokio::task::spawn_blocking;

/// Used when neither the settings nor `config.json` name a dimension
pub const DEFAULT_LOCAL_DIMENSION: usize = 768;

const MAX_LENGTH: usize = 512;
const MAX_BATCH: usize = 32;

/// `config.json` keys that carry the embedding width, in lookup order
const DIMENSION_KEYS: &[&str] = &[
    "embedding_size",
    "embedding_dim",
    "hidden_size",
    "word_embed_proj_dim",
    "d_model",
    "model_dim",
    "projection_dim",
    "sentence_embedding_dimension",
    "pooling_output_dimension",
];

/// Files of an exported model directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelAssets {
    pub model_path: PathBuf,
    pub tokenizer_path: PathBuf,
    pub config_path: PathBuf,
}

impl ModelAssets {
    /// Resolve a model directory (or the `.onnx` file inside one).
    ///
    /// The ONNX graph is `model.onnx` or `onnx/model.onnx`; `tokenizer.json`
    /// and the optional `config.json` sit in the directory itself.
    pub fn locate(path: &Path) -> Result<Self> {
        let (dir, model_path) = if path.is_file() {
            let dir = path.parent().unwrap_or(Path::new("."));
            (dir.to_path_buf(), path.to_path_buf())
        } else {
            let model_path = [path.join("model.onnx"), path.join("onnx").join("model.onnx")]
                .into_iter()
                .find(|candidate| candidate.is_file())
                .ok_or_else(|| {
                    VectorStoreError::embedding(format!(
                        "No ONNX model under {} (expected model.onnx or onnx/model.onnx)",
                        path.display()
                    ))
                })?;
            (path.to_path_buf(), model_path)
        };

        let tokenizer_path = dir.join("tokenizer.json");
        if !tokenizer_path.is_file() {
            return Err(VectorStoreError::embedding(format!(
                "Tokenizer missing: expected {}",
                tokenizer_path.display()
            )));
        }

        Ok(Self {
            model_path,
            tokenizer_path,
            config_path: dir.join("config.json"),
        })
    }
}

/// Embedding width declared in a Hugging Face `config.json`, if any
pub fn infer_dimension(config_path: &Path) -> Option<usize> {
    let content = std::fs::read_to_string(config_path).ok()?;
    let config: Value = serde_json::from_str(&content).ok()?;
    DIMENSION_KEYS
        .iter()
        .filter_map(|key| config.get(key).and_then(Value::as_u64))
        .find(|dimension| *dimension > 0)
        .and_then(|dimension| usize::try_from(dimension).ok())
}

struct OnnxModel {
    session: Mutex<Session>,
    tokenizer: Tokenizer,
    dimension: usize,
}

/// Sentence embeddings from a local ONNX export, mean-pooled over the
/// attention mask and normalized to unit length
pub struct LocalEmbeddingBackend {
    name: String,
    model_path: PathBuf,
    model: Arc<OnnxModel>,
}

impl LocalEmbeddingBackend {
    pub fn new(
        name: impl Into<String>,
        path: impl AsRef<Path>,
        dimension: Option<usize>,
    ) -> Result<Self> {
        let assets = ModelAssets::locate(path.as_ref())?;
        let dimension = dimension
            .or_else(|| infer_dimension(&assets.config_path))
            .unwrap_or(DEFAULT_LOCAL_DIMENSION);

        let model = OnnxModel::load(&assets, dimension)?;
        Ok(Self {
            name: name.into(),
            model_path: assets.model_path,
            model: Arc::new(model),
        })
    }

    pub fn model_path(&self) -> &Path {
        &self.model_path
    }
}

#[async_trait]
impl EmbeddingBackend for LocalEmbeddingBackend {
    fn model_name(&self) -> &str {
        &self.name
    }

    fn dimension(&self) -> usize {
        self.model.dimension
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.embed_batch(&[text.to_string()])
            .await?
            .pop()
            .ok_or_else(|| VectorStoreError::embedding("ONNX model returned no embedding"))
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let model = Arc::clone(&self.model);
        let texts = texts.to_vec();
        spawn_blocking(move || model.embed_batch_blocking(&texts))
            .await
            .map_err(|e| VectorStoreError::embedding(format!("Embedding task failed: {e}")))?
    }
}

impl OnnxModel {
    fn load(assets: &ModelAssets, dimension: usize) -> Result<Self> {
        if !tokenizers::utils::parallelism::is_parallelism_configured() {
            tokenizers::utils::parallelism::set_parallelism(false);
        }

        let mut tokenizer = Tokenizer::from_file(&assets.tokenizer_path)
            .map_err(|e| VectorStoreError::embedding(format!("Tokenizer load failed: {e}")))?;
        tokenizer.with_padding(Some(PaddingParams {
            strategy: PaddingStrategy::BatchLongest,
            ..PaddingParams::default()
        }));
        tokenizer
            .with_truncation(Some(TruncationParams {
                max_length: MAX_LENGTH,
                ..TruncationParams::default()
            }))
            .map_err(|e| VectorStoreError::embedding(format!("Tokenizer truncation failed: {e}")))?;

        let threads = std::thread::available_parallelism()
            .map(|n| n.get().min(4))
            .unwrap_or(1);
        let session = Session::builder()
            .map_err(|e| VectorStoreError::embedding(format!("{e}")))?
            .with_intra_threads(threads)
            .map_err(|e| {
                VectorStoreError::embedding(format!("Failed to set ORT intra threads: {e}"))
            })?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|e| {
                VectorStoreError::embedding(format!("Failed to set optimization level: {e}"))
            })?
            .commit_from_file(&assets.model_path)
            .map_err(|e| VectorStoreError::embedding(format!("Failed to load ONNX model: {e}")))?;

        log::info!(
            "Loaded ONNX model {} (dim {dimension}, max_length {MAX_LENGTH})",
            assets.model_path.display()
        );

        Ok(Self {
            session: Mutex::new(session),
            tokenizer,
            dimension,
        })
    }

    fn embed_batch_blocking(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let mut results = Vec::with_capacity(texts.len());
        for batch in texts.chunks(MAX_BATCH) {
            let encodings = self
                .tokenizer
                .encode_batch(batch.to_vec(), true)
                .map_err(|e| VectorStoreError::embedding(format!("Tokenization failed: {e}")))?;
            let Some(seq_len) = encodings.first().map(Encoding::len) else {
                continue;
            };
            if encodings.iter().any(|e| e.len() != seq_len) {
                return Err(VectorStoreError::embedding(
                    "Inconsistent sequence lengths after padding",
                ));
            }

            let (ids, masks, type_ids, mask_rows) = build_flat_tensors(&encodings, seq_len);
            let shape = (batch.len(), seq_len);
            let mut available: HashMap<&str, DynTensor> = HashMap::new();
            available.insert("input_ids", to_tensor(shape, ids)?);
            available.insert("attention_mask", to_tensor(shape, masks)?);
            available.insert("token_type_ids", to_tensor(shape, type_ids)?);

            let output = {
                let mut session = self
                    .session
                    .lock()
                    .map_err(|_| VectorStoreError::embedding("Failed to lock ONNX session"))?;

                let mut feed: HashMap<String, DynTensor> = HashMap::new();
                for input in &session.inputs {
                    let tensor = available.remove(input.name.as_str()).ok_or_else(|| {
                        VectorStoreError::embedding(format!(
                            "Unsupported ONNX input '{}'",
                            input.name
                        ))
                    })?;
                    feed.insert(input.name.clone(), tensor);
                }

                let outputs = session.run(SessionInputs::from(feed)).map_err(|e| {
                    VectorStoreError::embedding(format!("ONNX forward failed: {e}"))
                })?;
                if outputs.len() == 0 {
                    return Err(VectorStoreError::embedding("ONNX returned no outputs"));
                }

                outputs[0]
                    .try_extract_array::<f32>()
                    .map_err(|e| {
                        VectorStoreError::embedding(format!("Failed to decode ONNX output: {e}"))
                    })?
                    .to_owned()
            };

            results.extend(embeddings_from_output(output, &mask_rows, self.dimension)?);
        }

        Ok(results)
    }
}

fn to_tensor(shape: (usize, usize), data: Vec<i64>) -> Result<DynTensor> {
    let array = Array::from_shape_vec(shape, data)
        .map_err(|e| VectorStoreError::embedding(format!("Input shape error: {e}")))?;
    Ok(Tensor::from_array(array.into_dyn())
        .map_err(|e| VectorStoreError::embedding(format!("Input tensor error: {e}")))?
        .upcast())
}

fn build_flat_tensors(
    encodings: &[Encoding],
    seq_len: usize,
) -> (Vec<i64>, Vec<i64>, Vec<i64>, Vec<Vec<i64>>) {
    let mut ids = Vec::with_capacity(encodings.len() * seq_len);
    let mut masks = Vec::with_capacity(encodings.len() * seq_len);
    let mut type_ids = Vec::with_capacity(encodings.len() * seq_len);
    let mut mask_rows = Vec::with_capacity(encodings.len());

    for encoding in encodings {
        let at = |values: &[u32], idx: usize| i64::from(values.get(idx).copied().unwrap_or(0));
        for idx in 0..seq_len {
            ids.push(at(encoding.get_ids(), idx));
            masks.push(at(encoding.get_attention_mask(), idx));
            type_ids.push(at(encoding.get_type_ids(), idx));
        }
        mask_rows.push((0..seq_len).map(|idx| at(encoding.get_attention_mask(), idx)).collect());
    }

    (ids, masks, type_ids, mask_rows)
}

/// Rows of a pooled `[batch, dim]` output, or mean-pooled rows of a
/// `[batch, tokens, dim]` hidden state, each checked and normalized
fn embeddings_from_output(
    output: ArrayD<f32>,
    mask_rows: &[Vec<i64>],
    dimension: usize,
) -> Result<Vec<Vec<f32>>> {
    let shape_error =
        |e: ndarray::ShapeError| VectorStoreError::embedding(format!("Bad output shape: {e}"));

    let rows: Vec<Vec<f32>> = match output.ndim() {
        2 => {
            let pooled = output.into_dimensionality::<Ix2>().map_err(shape_error)?;
            pooled.outer_iter().map(|row| row.to_vec()).collect()
        }
        3 => {
            let hidden = output.into_dimensionality::<Ix3>().map_err(shape_error)?;
            hidden
                .outer_iter()
                .enumerate()
                .map(|(idx, sample)| match mask_rows.get(idx) {
                    Some(mask) => mean_pool(sample, mask),
                    None => mean_pool(sample, &vec![1; sample.nrows()]),
                })
                .collect()
        }
        _ => {
            return Err(VectorStoreError::embedding(format!(
                "Unexpected ONNX output dims: {:?}",
                output.shape()
            )));
        }
    };

    rows.into_iter()
        .map(|mut row| {
            if row.len() != dimension {
                return Err(VectorStoreError::DimensionMismatch {
                    expected: dimension,
                    actual: row.len(),
                });
            }
            normalize(&mut row);
            ensure_finite(&row, "ONNX output")?;
            Ok(row)
        })
        .collect()
}

/// Average of the token rows whose mask is set; all zeros when none is
fn mean_pool(hidden: ArrayView2<'_, f32>, mask: &[i64]) -> Vec<f32> {
    let mut sum = Array1::<f32>::zeros(hidden.ncols());
    let mut count = 0usize;

    for (idx, token) in hidden.outer_iter().enumerate() {
        if mask.get(idx).copied().unwrap_or(0) == 0 {
            continue;
        }
        sum += &token;
        count += 1;
    }

    if count > 0 {
        sum /= count as f32;
    }
    sum.to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn mean_pool_skips_padding() {
        let hidden = array![[1.0, 2.0], [3.0, 4.0], [100.0, 100.0]];
        assert_eq!(mean_pool(hidden.view(), &[1, 1, 0]), vec![2.0, 3.0]);
        assert_eq!(mean_pool(hidden.view(), &[0, 0, 0]), vec![0.0, 0.0]);
    }

    #[test]
    fn hidden_states_are_pooled_and_normalized() {
        let hidden = array![[[3.0, 0.0], [0.0, 4.0]], [[0.0, 2.0], [9.0, 9.0]]].into_dyn();
        let rows = embeddings_from_output(hidden, &[vec![1, 1], vec![1, 0]], 2).unwrap();
        assert_eq!(rows, vec![vec![0.6, 0.8], vec![0.0, 1.0]]);
    }

    #[test]
    fn pooled_output_is_checked() {
        let pooled = array![[0.0, 5.0, 0.0]].into_dyn();
        assert_eq!(
            embeddings_from_output(pooled.clone(), &[], 3).unwrap(),
            vec![vec![0.0, 1.0, 0.0]]
        );
        assert!(matches!(
            embeddings_from_output(pooled, &[], 4),
            Err(VectorStoreError::DimensionMismatch { expected: 4, actual: 3 })
        ));

        let broken = array![[f32::NAN, 1.0]].into_dyn();
        assert!(matches!(
            embeddings_from_output(broken, &[], 2),
            Err(VectorStoreError::NonFiniteVector(_))
        ));
    }

    #[test]
    fn dimension_comes_from_config() {
        let dir = TempDir::new().unwrap();
        let config = dir.path().join("config.json");

        assert_eq!(infer_dimension(&config), None);
        fs::write(&config, r#"{ "model_type": "bert", "hidden_size": 384 }"#).unwrap();
        assert_eq!(infer_dimension(&config), Some(384));
        fs::write(&config, r#"{ "embedding_size": 0, "d_model": 1024 }"#).unwrap();
        assert_eq!(infer_dimension(&config), Some(1024));
    }

    #[test]
    fn locates_nested_onnx_export() {
        let dir = TempDir::new().unwrap();
        assert!(ModelAssets::locate(dir.path()).is_err());

        fs::create_dir_all(dir.path().join("onnx")).unwrap();
        fs::write(dir.path().join("onnx/model.onnx"), b"").unwrap();
        let missing_tokenizer = ModelAssets::locate(dir.path()).unwrap_err();
        assert!(missing_tokenizer.to_string().contains("tokenizer.json"));

        fs::write(dir.path().join("tokenizer.json"), b"{}").unwrap();
        let assets = ModelAssets::locate(dir.path()).unwrap();
        assert_eq!(assets.model_path, dir.path().join("onnx/model.onnx"));
        assert_eq!(assets.tokenizer_path, dir.path().join("tokenizer.json"));
    }

    #[test]
    fn missing_model_is_a_configuration_error() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            LocalEmbeddingBackend::new("local", dir.path(), None),
            Err(VectorStoreError::EmbeddingError(_))
        ));
    }
}
