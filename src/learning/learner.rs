use std::collections::HashSet;

use tracing::debug;

use super::exemplar::Exemplars;
use crate::embedding::EmbeddingProvider;
use crate::model::{Profile, SwipeEvent};
use crate::vectorize::{FieldEmbeddings, ProfileVectorizer};

/// Turns a swipe history into weighted exemplars per field.
#[derive(Debug, Clone, Copy)]
pub struct PreferenceLearner {
    context_size: usize,
    concurrency: usize,
}

impl PreferenceLearner {
    pub fn new(context_size: usize, concurrency: usize) -> Self {
        Self {
            context_size,
            concurrency: concurrency.max(1),
        }
    }

    pub fn context_size(&self) -> usize {
        self.context_size
    }

    /// Learns exemplars from the most recent `context_size` swipes.
    ///
    /// Events whose profile is missing or empty (`null`, `{}`) are skipped.
    ///
    /// `_my_embeddings` is accepted so callers can pass the caller's own vectors;
    /// the current model does not read them.
    pub async fn learn<E: EmbeddingProvider>(
        &self,
        vectorizer: &ProfileVectorizer<E>,
        _my_embeddings: &FieldEmbeddings,
        history: &[SwipeEvent],
    ) -> Exemplars {
        let window = recent_window(history, self.context_size);

        let (profiles, weights): (Vec<&Profile>, Vec<f32>) = window
            .iter()
            .filter_map(|event| {
                event
                    .profile
                    .as_ref()
                    .filter(|profile| !profile.is_empty())
                    .map(|profile| (profile, event.decision.signed_weight()))
            })
            .unzip();

        let vectors = vectorizer
            .vectorize_all(&profiles, self.concurrency)
            .await;

        let mut exemplars = Exemplars::new();
        for (embeddings, weight) in vectors.iter().zip(weights) {
            exemplars.extend_from(embeddings, weight);
        }

        debug!(
            history = history.len(),
            window = window.len(),
            profiles = profiles.len(),
            exemplars = exemplars.len(),
            "Preferences learned"
        );

        exemplars
    }
}

/// The last `context_size` events, keeping only the latest swipe per target.
///
/// Order is preserved (oldest to newest). Events without a target id are never
/// merged with each other.
pub fn recent_window(history: &[SwipeEvent], context_size: usize) -> Vec<&SwipeEvent> {
    let start = history.len().saturating_sub(context_size);
    let mut seen = HashSet::new();

    let mut window: Vec<&SwipeEvent> = history[start..]
        .iter()
        .rev()
        .filter(|event| match event.target_key() {
            Some(id) => seen.insert(id.clone()),
            None => true,
        })
        .collect();

    window.reverse();
    window
}
