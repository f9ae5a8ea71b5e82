//! Exact-match embedding memo (in-memory).
//!
//! Keys are the 32-byte BLAKE3 hash of the text. Valid only because providers
//! are deterministic: the same text always embeds to the same vector.

use std::sync::Arc;

use moka::sync::Cache;
use tracing::trace;

use super::error::EmbeddingError;
use super::provider::EmbeddingProvider;
use crate::hashing::hash_text;

/// Provider wrapper that memoizes embeddings by text hash.
pub struct CachedEmbedder<E> {
    inner: E,
    entries: Option<Cache<[u8; 32], Arc<Vec<f32>>>>,
}

impl<E> std::fmt::Debug for CachedEmbedder<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CachedEmbedder")
            .field("enabled", &self.entries.is_some())
            .field("entry_count", &self.len())
            .finish()
    }
}

impl<E: EmbeddingProvider> CachedEmbedder<E> {
    pub const DEFAULT_CAPACITY: u64 = 10_000;

    pub fn new(inner: E) -> Self {
        Self::with_capacity(inner, Self::DEFAULT_CAPACITY)
    }

    /// Creates a memo holding at most `capacity` vectors. Zero disables memoization.
    pub fn with_capacity(inner: E, capacity: u64) -> Self {
        let entries = (capacity > 0).then(|| Cache::builder().max_capacity(capacity).build());
        Self { inner, entries }
    }

    pub fn inner(&self) -> &E {
        &self.inner
    }
}

impl<E> CachedEmbedder<E> {
    /// Returns the number of memoized vectors.
    pub fn len(&self) -> u64 {
        self.entries.as_ref().map_or(0, Cache::entry_count)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, text: &str) -> bool {
        self.entries
            .as_ref()
            .is_some_and(|entries| entries.contains_key(&hash_text(text)))
    }

    pub fn clear(&self) {
        if let Some(entries) = &self.entries {
            entries.invalidate_all();
        }
    }

    /// Runs any pending maintenance tasks in the underlying cache.
    pub fn run_pending_tasks(&self) {
        if let Some(entries) = &self.entries {
            entries.run_pending_tasks();
        }
    }
}

impl<E: EmbeddingProvider> EmbeddingProvider for CachedEmbedder<E> {
    fn dimension(&self) -> usize {
        self.inner.dimension()
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let Some(entries) = &self.entries else {
            return self.inner.embed(text).await;
        };

        let key = hash_text(text);
        if let Some(hit) = entries.get(&key) {
            trace!("Embedding memo hit");
            return Ok(hit.as_ref().clone());
        }

        let embedding = self.inner.embed(text).await?;
        entries.insert(key, Arc::new(embedding.clone()));
        Ok(embedding)
    }
}
