//! Profile → per-field embeddings.
//!
//! A profile is split into eight texts (see [`field_texts`]) which are embedded
//! concurrently. A failure on one field leaves that slot empty and is logged;
//! it never fails the profile.

pub mod field;
pub mod text;


pub use field::{Field, FieldMap, UnknownField};
pub use text::{field_text, field_texts};

use futures_util::StreamExt;
use futures_util::future::join_all;
use futures_util::stream;
use tracing::{debug, warn};

use crate::embedding::EmbeddingProvider;
use crate::model::Profile;

/// Per-field embeddings of one profile. A slot is `None` when embedding failed.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FieldEmbeddings(FieldMap<Option<Vec<f32>>>);

impl FieldEmbeddings {
    pub fn new(slots: FieldMap<Option<Vec<f32>>>) -> Self {
        Self(slots)
    }

    #[inline]
    pub fn get(&self, field: Field) -> Option<&[f32]> {
        self.0[field].as_deref()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, Option<&[f32]>)> {
        self.0.iter().map(|(field, slot)| (field, slot.as_deref()))
    }

    /// Number of fields with an embedding.
    pub fn present(&self) -> usize {
        self.0.values().filter(|slot| slot.is_some()).count()
    }

    pub fn is_complete(&self) -> bool {
        self.present() == Field::ALL.len()
    }
}

/// Turns profiles into [`FieldEmbeddings`] using an [`EmbeddingProvider`].
#[derive(Debug)]
pub struct ProfileVectorizer<E> {
    provider: E,
}

impl<E: EmbeddingProvider> ProfileVectorizer<E> {
    pub fn new(provider: E) -> Self {
        Self { provider }
    }

    pub fn provider(&self) -> &E {
        &self.provider
    }

    pub fn dimension(&self) -> usize {
        self.provider.dimension()
    }

    /// Embeds all eight field texts of `profile` concurrently.
    pub async fn vectorize(&self, profile: &Profile) -> FieldEmbeddings {
        let texts = field_texts(profile);

        let slots = join_all(
            Field::ALL
                .into_iter()
                .map(|field| self.embed_field(field, texts.get(field))),
        )
        .await;

        let mut embeddings = FieldMap::default();
        for (field, slot) in Field::ALL.into_iter().zip(slots) {
            embeddings[field] = slot;
        }
        let embeddings = FieldEmbeddings(embeddings);

        if !embeddings.is_complete() {
            debug!(
                profile_id = ?profile.id().map(|id| id.as_str()),
                present = embeddings.present(),
                "Profile vectorized with missing fields"
            );
        }

        embeddings
    }

    /// Vectorizes profiles with at most `concurrency` in flight, preserving order.
    pub async fn vectorize_all(
        &self,
        profiles: &[&Profile],
        concurrency: usize,
    ) -> Vec<FieldEmbeddings> {
        stream::iter(0..profiles.len())
            .map(|i| self.vectorize(profiles[i]))
            .buffered(concurrency.max(1))
            .collect()
            .await
    }

    async fn embed_field(&self, field: Field, text: &str) -> Option<Vec<f32>> {
        let expected = self.provider.dimension();

        match self.provider.embed(text).await {
            Ok(embedding) if embedding.len() != expected => {
                warn!(
                    field = field.name(),
                    expected,
                    actual = embedding.len(),
                    "Embedding dimension mismatch, field left empty"
                );
                None
            }
            Ok(embedding) if embedding.iter().any(|x| !x.is_finite()) => {
                warn!(field = field.name(), "Non-finite embedding, field left empty");
                None
            }
            Ok(embedding) => Some(embedding),
            Err(e) => {
                warn!(field = field.name(), error = %e, "Embedding failed, field left empty");
                None
            }
        }
    }
}
