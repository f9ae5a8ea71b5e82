use crate::vectorize::{Field, FieldEmbeddings, FieldMap};

/// An embedding from a swiped profile, signed by the swipe decision.
#[derive(Debug, Clone, PartialEq)]
pub struct Exemplar {
    pub embedding: Vec<f32>,
    pub weight: f32,
}

/// Exemplars grouped per field.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Exemplars(FieldMap<Vec<Exemplar>>);

impl Exemplars {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn get(&self, field: Field) -> &[Exemplar] {
        &self.0[field]
    }

    pub fn push(&mut self, field: Field, exemplar: Exemplar) {
        self.0[field].push(exemplar);
    }

    /// Adds one exemplar per present field of `embeddings`, all with `weight`.
    pub fn extend_from(&mut self, embeddings: &FieldEmbeddings, weight: f32) {
        for (field, slot) in embeddings.iter() {
            if let Some(embedding) = slot {
                self.push(
                    field,
                    Exemplar {
                        embedding: embedding.to_vec(),
                        weight,
                    },
                );
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &[Exemplar])> {
        self.0.iter().map(|(field, list)| (field, list.as_slice()))
    }

    /// `true` when at least one field has an exemplar.
    pub fn has_signal(&self) -> bool {
        self.0.values().any(|list| !list.is_empty())
    }

    /// Total exemplars across all fields.
    pub fn len(&self) -> usize {
        self.0.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        !self.has_signal()
    }
}
