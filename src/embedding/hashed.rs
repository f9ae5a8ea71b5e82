//! Hashed bag-of-words embedder.
//!
//! Needs no model or network. Each lowercased alphanumeric token lands in a
//! signed bucket picked by its BLAKE3 hash, and the result is L2-normalized, so
//! texts sharing words have positive cosine similarity. The empty text maps to
//! a fixed non-zero vector, like a real model's embedding of `""` would.

use tracing::debug;

use super::error::EmbeddingError;
use super::provider::EmbeddingProvider;
use crate::hashing::hash_token;

const BUCKET_SEED: &str = "cofound-bow";
const EMPTY_TOKEN: &str = "";

/// Deterministic local embedding provider.
#[derive(Debug, Clone)]
pub struct HashEmbedder {
    dim: usize,
}

impl HashEmbedder {
    pub fn new(dim: usize) -> Result<Self, EmbeddingError> {
        if dim == 0 {
            return Err(EmbeddingError::InvalidConfig {
                reason: "embedding dimension must be greater than zero".to_string(),
            });
        }
        debug!(dim, "Hashed embedder ready");
        Ok(Self { dim })
    }

    /// Synchronous embedding (the trait method wraps this).
    pub fn embed_text(&self, text: &str) -> Vec<f32> {
        let mut embedding = vec![0.0f32; self.dim];

        let mut tokens = text
            .split(|c: char| !c.is_alphanumeric())
            .filter(|t| !t.is_empty())
            .map(str::to_lowercase)
            .peekable();

        if tokens.peek().is_none() {
            self.accumulate(&mut embedding, EMPTY_TOKEN);
        } else {
            for token in tokens {
                self.accumulate(&mut embedding, &token);
            }
        }

        normalize(&mut embedding);
        embedding
    }

    fn accumulate(&self, embedding: &mut [f32], token: &str) {
        let hash = hash_token(BUCKET_SEED, token);
        let bucket = (hash % self.dim as u64) as usize;
        let sign = if hash >> 63 == 0 { 1.0 } else { -1.0 };
        embedding[bucket] += sign;
    }
}

impl EmbeddingProvider for HashEmbedder {
    fn dimension(&self) -> usize {
        self.dim
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        Ok(self.embed_text(text))
    }
}

fn normalize(embedding: &mut [f32]) {
    let norm: f32 = embedding.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        for x in embedding.iter_mut() {
            *x /= norm;
        }
    }
}
