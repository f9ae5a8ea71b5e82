//! Embedding providers.
//!
//! - [`EmbeddingProvider`] is the text → vector capability the engine needs.
//! - [`HttpEmbedder`] talks to an OpenAI-compatible embeddings service.
//! - [`HashEmbedder`] is the deterministic local stub (no model, no network).
//! - [`CachedEmbedder`] memoizes any provider by text hash.

/// Embedding memo.
pub mod cache;
mod error;
/// Hashed bag-of-words stub.
pub mod hashed;
/// Remote provider.
pub mod http;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
mod provider;


pub use cache::CachedEmbedder;
pub use error::EmbeddingError;
pub use hashed::HashEmbedder;
pub use http::{HttpEmbedder, HttpEmbedderConfig};
#[cfg(any(test, feature = "mock"))]
pub use mock::MockEmbedder;
pub use provider::EmbeddingProvider;

use tracing::warn;

use crate::config::Config;

/// Provider selected from configuration at startup.
#[derive(Debug)]
pub enum Embedder {
    Http(HttpEmbedder),
    Hashed(HashEmbedder),
}

impl Embedder {
    /// Builds the remote provider when `embedding_url` is set, else the stub.
    pub fn from_config(config: &Config) -> Result<Self, EmbeddingError> {
        match config.embedding_url {
            Some(ref url) => {
                let http_config = HttpEmbedderConfig::new(
                    url.clone(),
                    config.embedding_model.clone(),
                    config.embedding_dim,
                )
                .with_timeout(config.embedding_timeout);
                HttpEmbedder::new(http_config).map(Self::Http)
            }
            None => {
                warn!(
                    dim = config.embedding_dim,
                    "No embedding URL configured, using hashed STUB embeddings"
                );
                HashEmbedder::new(config.embedding_dim).map(Self::Hashed)
            }
        }
    }

    pub fn is_stub(&self) -> bool {
        matches!(self, Self::Hashed(_))
    }
}

impl EmbeddingProvider for Embedder {
    fn dimension(&self) -> usize {
        match self {
            Self::Http(e) => e.dimension(),
            Self::Hashed(e) => e.dimension(),
        }
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        match self {
            Self::Http(e) => e.embed(text).await,
            Self::Hashed(e) => e.embed(text).await,
        }
    }
}
