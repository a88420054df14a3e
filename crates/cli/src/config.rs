use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE: &str = "config.toml";
pub const API_KEY_ENV: &str = "CODE_SEMI_GRAPH_API_KEY";

const HOME_DIR_NAME: &str = ".code-semi-graph";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    /// `mock`, or an `http(s)://` endpoint
    pub model: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub embedding_dimension: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Local ONNX model directory
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_path: Option<PathBuf>,
    pub batch_size: usize,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            model: "mock".to_string(),
            model_name: None,
            embedding_dimension: None,
            api_key: None,
            model_path: None,
            batch_size: 32,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexConfig {
    /// Defaults to `<home>/index`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub directory: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub top_k: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self { top_k: 5 }
    }
}

/// Contents of `<home>/config.toml`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub embedding: EmbeddingConfig,
    pub index: IndexConfig,
    pub search: SearchConfig,
}

impl AppConfig {
    /// Load `<home>/config.toml`, writing the defaults first if it is missing.
    ///
    /// A file that does not parse is reported and replaced by the defaults for
    /// this run; it is left untouched on disk.
    pub fn load(home: &Path) -> Result<Self> {
        let path = home.join(CONFIG_FILE);

        let config = if path.exists() {
            let content = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            match toml::from_str(&content) {
                Ok(config) => config,
                Err(e) => {
                    log::warn!("Ignoring malformed {}: {e}", path.display());
                    Self::default()
                }
            }
        } else {
            let config = Self::default();
            config.save(home)?;
            log::info!("Wrote default configuration to {}", path.display());
            config
        };

        Ok(config)
    }

    pub fn save(&self, home: &Path) -> Result<()> {
        fs::create_dir_all(home)
            .with_context(|| format!("Failed to create {}", home.display()))?;
        let content = toml::to_string_pretty(self)?;
        fs::write(home.join(CONFIG_FILE), content)?;
        Ok(())
    }

    pub fn index_dir(&self, home: &Path) -> PathBuf {
        self.index
            .directory
            .clone()
            .unwrap_or_else(|| home.join("index"))
    }

    /// Key from the file, else from the environment
    pub fn api_key(&self) -> Option<String> {
        self.embedding
            .api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .or_else(|| std::env::var(API_KEY_ENV).ok())
            .filter(|key| !key.trim().is_empty())
    }
}

/// `--home` if given, else `~/.code-semi-graph`
pub fn resolve_home(home: Option<&Path>) -> PathBuf {
    match home {
        Some(home) => home.to_path_buf(),
        None => dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(HOME_DIR_NAME),
    }
}
