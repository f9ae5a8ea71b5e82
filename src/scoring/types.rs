use crate::vectorize::{Field, FieldMap};

/// Per-field detail behind a score.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ScoreBreakdown {
    /// Final likelihood in `[0, 1]`.
    pub score: f32,
    /// Weighted mean similarity in `[-1, 1]` before mapping.
    pub raw: f32,
    /// Field weights that entered the denominator.
    pub used_weight: f32,
    /// Weighted field similarity (before the field weight), for fields used.
    pub fields: FieldMap<Option<f32>>,
}

impl ScoreBreakdown {
    pub fn neutral() -> Self {
        Self {
            score: crate::constants::NEUTRAL_SCORE,
            ..Self::default()
        }
    }

    /// Number of fields that contributed.
    pub fn fields_used(&self) -> usize {
        self.fields.values().filter(|f| f.is_some()).count()
    }

    /// The field with the highest weighted similarity, if any.
    pub fn strongest_field(&self) -> Option<(Field, f32)> {
        self.fields
            .iter()
            .filter_map(|(field, value)| value.map(|v| (field, v)))
            .max_by(|a, b| a.1.total_cmp(&b.1))
    }
}
