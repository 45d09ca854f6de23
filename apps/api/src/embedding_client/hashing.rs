//! Offline embedder: feature-hashed bag of words, L2-normalized.
//!
//! Deterministic across runs and machines. Useful for local development and
//! for running the service without provider credentials. Captures lexical
//! overlap only, so scores run lower than a semantic model's.

use async_trait::async_trait;

use super::{EmbeddingError, EmbeddingProvider, EmbeddingVector};

pub const DEFAULT_DIMENSION: usize = 512;

#[derive(Debug, Clone)]
pub struct HashingEmbedder {
    dimension: usize,
}

impl HashingEmbedder {
    /// A zero dimension is bumped to 1 so every vector has at least one slot.
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension: dimension.max(1),
        }
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    fn vectorize(&self, text: &str) -> EmbeddingVector {
        let mut embedding = vec![0.0_f32; self.dimension];
        for word in text.split_whitespace() {
            embedding[bucket(word, self.dimension)] += 1.0;
        }

        let norm = embedding.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for val in &mut embedding {
                *val /= norm;
            }
        }
        embedding
    }
}

impl Default for HashingEmbedder {
    fn default() -> Self {
        Self::new(DEFAULT_DIMENSION)
    }
}

/// FNV-1a, reduced to a bucket index.
fn bucket(word: &str, dimension: usize) -> usize {
    let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
    for byte in word.bytes() {
        hash ^= u64::from(byte);
        hash = hash.wrapping_mul(0x0000_0100_0000_01b3);
    }
    (hash % dimension as u64) as usize
}

#[async_trait]
impl EmbeddingProvider for HashingEmbedder {
    async fn embed(&self, text: &str) -> Result<EmbeddingVector, EmbeddingError> {
        Ok(self.vectorize(text))
    }

    fn name(&self) -> &str {
        "hashing"
    }
}
