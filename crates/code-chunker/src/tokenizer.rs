use crate::error::{ChunkerError, Result};
use once_cell::sync::OnceCell;
use tiktoken_rs::CoreBPE;

/// Counts tokens the way the embedding backend will consume them
pub trait Tokenizer: Send + Sync {
    fn count_tokens(&self, text: &str) -> usize;
}

impl<T: Tokenizer + ?Sized> Tokenizer for Box<T> {
    fn count_tokens(&self, text: &str) -> usize {
        (**self).count_tokens(text)
    }
}

static CL100K: OnceCell<CoreBPE> = OnceCell::new();

/// `cl100k_base` BPE, loaded once per process
#[derive(Clone, Copy)]
pub struct Cl100kTokenizer {
    bpe: &'static CoreBPE,
}

impl Cl100kTokenizer {
    pub fn new() -> Result<Self> {
        let bpe = CL100K.get_or_try_init(|| {
            tiktoken_rs::cl100k_base()
                .map_err(|e| ChunkerError::tokenizer(format!("Failed to load cl100k_base: {e}")))
        })?;
        Ok(Self { bpe })
    }
}

impl Tokenizer for Cl100kTokenizer {
    fn count_tokens(&self, text: &str) -> usize {
        self.bpe.encode_ordinary(text).len()
    }
}

/// Rough heuristic: 4 chars per token on average for code
#[derive(Debug, Clone, Copy, Default)]
pub struct EstimatingTokenizer;

impl Tokenizer for EstimatingTokenizer {
    fn count_tokens(&self, text: &str) -> usize {
        text.chars().count().div_ceil(4)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn estimate_rounds_up() {
        let tokenizer = EstimatingTokenizer;
        assert_eq!(tokenizer.count_tokens(""), 0);
        assert_eq!(tokenizer.count_tokens("a"), 1);
        assert_eq!(tokenizer.count_tokens("abcd"), 1);
        assert_eq!(tokenizer.count_tokens("abcde"), 2);
        // counts chars, not bytes
        assert_eq!(tokenizer.count_tokens("世界世界"), 1);
    }

    #[test]
    fn boxed_tokenizer_delegates() {
        let boxed: Box<dyn Tokenizer> = Box::new(EstimatingTokenizer);
        assert_eq!(boxed.count_tokens("abcdefgh"), 2);
    }
}
