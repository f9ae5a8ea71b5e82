use super::error::ScoringError;

/// Cosine similarity of two equal-length vectors.
///
/// A zero-norm input yields `0.0`. Empty or mismatched inputs are errors so the
/// caller can skip that comparison.
#[inline]
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<f32, ScoringError> {
    if a.is_empty() || b.is_empty() {
        return Err(ScoringError::EmptyVector);
    }
    if a.len() != b.len() {
        return Err(ScoringError::DimensionMismatch {
            left: a.len(),
            right: b.len(),
        });
    }

    let (dot, norm_a_sq, norm_b_sq) = a
        .iter()
        .zip(b.iter())
        .fold((0.0f32, 0.0f32, 0.0f32), |(dot, na, nb), (&av, &bv)| {
            (dot + av * bv, na + av * av, nb + bv * bv)
        });

    let norm_a = norm_a_sq.sqrt();
    let norm_b = norm_b_sq.sqrt();

    let similarity = if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot / (norm_a * norm_b)
    };

    if !similarity.is_finite() {
        return Err(ScoringError::NonFinite {
            stage: "similarity",
        });
    }
    Ok(similarity)
}
