use serde::{Deserialize, Serialize};

/// Token ceiling per chunk, below common embedding-model input limits
pub const MAX_TOKENS: usize = 32_000;

/// Configuration for code chunking behavior
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkerConfig {
    /// Maximum chunk size in tokens (hard limit)
    pub max_tokens: usize,
}

impl Default for ChunkerConfig {
    fn default() -> Self {
        Self {
            max_tokens: MAX_TOKENS,
        }
    }
}

impl ChunkerConfig {
    pub const fn with_max_tokens(max_tokens: usize) -> Self {
        Self { max_tokens }
    }

    /// Width of the first long-line window, in characters
    pub fn long_line_window(&self) -> usize {
        (self.max_tokens / 4).max(1)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.max_tokens == 0 {
            return Err("max_tokens must be > 0".to_string());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_uses_ceiling() {
        let config = ChunkerConfig::default();
        assert_eq!(config.max_tokens, 32_000);
        assert_eq!(config.long_line_window(), 8_000);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_zero_budget() {
        assert!(ChunkerConfig::with_max_tokens(0).validate().is_err());
        assert_eq!(ChunkerConfig::with_max_tokens(3).long_line_window(), 1);
    }
}
