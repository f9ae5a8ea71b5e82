use std::future::Future;

use super::error::EmbeddingError;

/// Text → fixed-length vector capability.
///
/// Implementations must be deterministic for identical input and always return
/// vectors of length [`EmbeddingProvider::dimension`].
pub trait EmbeddingProvider: Send + Sync {
    /// Embedding dimension D.
    fn dimension(&self) -> usize;

    fn embed(&self, text: &str) -> impl Future<Output = Result<Vec<f32>, EmbeddingError>> + Send;
}

impl<E: EmbeddingProvider> EmbeddingProvider for std::sync::Arc<E> {
    fn dimension(&self) -> usize {
        (**self).dimension()
    }

    fn embed(&self, text: &str) -> impl Future<Output = Result<Vec<f32>, EmbeddingError>> + Send {
        (**self).embed(text)
    }
}
