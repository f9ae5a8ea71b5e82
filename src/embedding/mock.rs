use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::RwLock;

use super::error::EmbeddingError;
use super::hashed::HashEmbedder;
use super::provider::EmbeddingProvider;

/// Test provider: hashed embeddings plus call counting and fault injection.
#[derive(Debug, Clone)]
pub struct MockEmbedder {
    inner: HashEmbedder,
    calls: Arc<AtomicUsize>,
    failing: Arc<RwLock<HashSet<String>>>,
    short: Arc<RwLock<HashSet<String>>>,
}

impl MockEmbedder {
    pub fn new(dim: usize) -> Self {
        Self {
            inner: HashEmbedder::new(dim).expect("mock dimension must be non-zero"),
            calls: Arc::new(AtomicUsize::new(0)),
            failing: Arc::default(),
            short: Arc::default(),
        }
    }

    /// Makes `embed` fail for this exact text.
    pub fn fail_on(&self, text: &str) {
        self.failing.write().insert(text.to_string());
    }

    /// Makes `embed` return a vector one element short for this exact text.
    pub fn wrong_dimension_on(&self, text: &str) {
        self.short.write().insert(text.to_string());
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl EmbeddingProvider for MockEmbedder {
    fn dimension(&self) -> usize {
        self.inner.dimension()
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if self.failing.read().contains(text) {
            return Err(EmbeddingError::RequestFailed {
                reason: format!("injected failure for {text:?}"),
            });
        }

        let mut embedding = self.inner.embed_text(text);
        if self.short.read().contains(text) {
            embedding.pop();
        }
        Ok(embedding)
    }
}
