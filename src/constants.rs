//! Fixed numbers of the preference model.
//!
//! Weight bounds, learning rate and swipe weights are shared by
//! [`crate::learning`], [`crate::scoring`] and [`crate::engine`]. Runtime knobs
//! (result cap, context window, embedding dimension) live in [`crate::config`]
//! and default to the values below.
//!
//! A provider's dimension is fixed for its lifetime; vectors of another length
//! are rejected at the provider boundary with [`validate_embedding_dim`].

/// Default embedding dimension (MiniLM-L6 sized sentence embeddings).
pub const DEFAULT_EMBEDDING_DIM: usize = 384;

/// Number of semantic profile fields that carry an embedding.
pub const FIELD_COUNT: usize = 8;

/// Default number of most recent swipes the learner considers.
pub const DEFAULT_CONTEXT_SIZE: usize = 50;

/// Default hard cap on the number of recommendations returned.
pub const DEFAULT_MAX_RESULTS: usize = 3;

/// Score used when there is no signal (cold start, failed candidate).
pub const NEUTRAL_SCORE: f32 = 0.5;

/// Lower bound for any single field weight.
pub const MIN_FIELD_WEIGHT: f32 = 0.05;

/// Upper bound for any single field weight.
pub const MAX_FIELD_WEIGHT: f32 = 0.4;

/// Per-update step applied to a field's predictiveness.
pub const WEIGHT_LEARNING_RATE: f32 = 0.05;

/// Predictiveness is clamped to `[-MAX_PREDICTIVENESS, MAX_PREDICTIVENESS]`.
pub const MAX_PREDICTIVENESS: f32 = 0.5;

/// Tolerance for the `sum(weights) == 1.0` invariant.
pub const WEIGHT_SUM_TOLERANCE: f32 = 1e-4;

/// Signed exemplar weight for a like.
pub const LIKE_WEIGHT: f32 = 1.0;

/// Signed exemplar weight for a superlike.
pub const SUPERLIKE_WEIGHT: f32 = 2.0;

/// Signed exemplar weight for a dislike (and any unknown decision).
pub const DISLIKE_WEIGHT: f32 = -0.5;

/// A provider vector whose length disagrees with the configured dimension.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DimValidationError {
    #[error("configured embedding dimension is zero")]
    ZeroDimension,
    #[error("embedding has {actual} values, configured dimension is {expected}")]
    DimensionMismatch { expected: usize, actual: usize },
}

/// Checks a vector length against the configured dimension D.
///
/// ```
/// use cofound::constants::{DEFAULT_EMBEDDING_DIM, validate_embedding_dim};
///
/// assert!(validate_embedding_dim(384, DEFAULT_EMBEDDING_DIM).is_ok());
/// assert!(validate_embedding_dim(383, DEFAULT_EMBEDDING_DIM).is_err());
/// ```
pub fn validate_embedding_dim(actual: usize, expected: usize) -> Result<(), DimValidationError> {
    match (expected, actual) {
        (0, _) => Err(DimValidationError::ZeroDimension),
        (expected, actual) if expected != actual => {
            Err(DimValidationError::DimensionMismatch { expected, actual })
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weight_bounds_admit_a_normalized_vector() {
        let min_total = MIN_FIELD_WEIGHT * FIELD_COUNT as f32;
        let max_total = MAX_FIELD_WEIGHT * FIELD_COUNT as f32;
        assert!(min_total <= 1.0);
        assert!(max_total >= 1.0);
    }

    #[test]
    fn test_provider_length_checked_against_dimension() {
        assert!(validate_embedding_dim(DEFAULT_EMBEDDING_DIM, DEFAULT_EMBEDDING_DIM).is_ok());
        assert_eq!(
            validate_embedding_dim(512, DEFAULT_EMBEDDING_DIM),
            Err(DimValidationError::DimensionMismatch {
                expected: DEFAULT_EMBEDDING_DIM,
                actual: 512
            })
        );
        assert_eq!(
            validate_embedding_dim(0, 0),
            Err(DimValidationError::ZeroDimension)
        );
    }

    #[test]
    fn test_mismatch_message_names_both_lengths() {
        let message = DimValidationError::DimensionMismatch {
            expected: 384,
            actual: 512,
        }
        .to_string();
        assert!(message.contains("512") && message.contains("384"));
    }
}
