use super::{normalize, EmbeddingBackend};
use crate::error::Result;
use async_trait::async_trait;

pub const DEFAULT_MOCK_DIMENSION: usize = 768;

/// Deterministic pseudo-embeddings: the same text always maps to the same
/// unit vector. Needs no model files or network.
#[derive(Debug, Clone)]
pub struct MockEmbeddingBackend {
    name: String,
    dimension: usize,
}

impl MockEmbeddingBackend {
    pub fn new(name: impl Into<String>, dimension: usize) -> Self {
        Self {
            name: name.into(),
            dimension,
        }
    }
}

impl Default for MockEmbeddingBackend {
    fn default() -> Self {
        Self::new("mock", DEFAULT_MOCK_DIMENSION)
    }
}

#[async_trait]
impl EmbeddingBackend for MockEmbeddingBackend {
    fn model_name(&self) -> &str {
        &self.name
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        Ok(hashed_embedding(text, self.dimension))
    }
}

fn hashed_embedding(text: &str, dimension: usize) -> Vec<f32> {
    let mut state =
        fnv1a_64(text.as_bytes()) ^ (dimension as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15);
    let mut vec = Vec::with_capacity(dimension);
    for _ in 0..dimension {
        let bits = splitmix64(&mut state);
        // 23 high bits as an f32 mantissa in [1, 2), shifted to [-1, 1)
        let mantissa = ((bits >> 32) as u32) >> 9;
        let unit = f32::from_bits(0x3f80_0000 | mantissa) - 1.0;
        vec.push(unit.mul_add(2.0, -1.0));
    }
    normalize(&mut vec);
    vec
}

fn fnv1a_64(bytes: &[u8]) -> u64 {
    bytes.iter().fold(0xcbf2_9ce4_8422_2325, |hash, byte| {
        (hash ^ u64::from(*byte)).wrapping_mul(0x0000_0100_0000_01b3)
    })
}

const fn splitmix64(state: &mut u64) -> u64 {
    *state = state.wrapping_add(0x9E37_79B9_7F4A_7C15);
    let mut z = *state;
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}
