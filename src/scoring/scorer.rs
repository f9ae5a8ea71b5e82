use tracing::debug;

use super::error::ScoringError;
use super::similarity::cosine_similarity;
use super::types::ScoreBreakdown;
use crate::learning::{Exemplars, FieldWeights};
use crate::vectorize::FieldEmbeddings;

/// Predicted swipe-right likelihood of a candidate, in `[0, 1]`.
pub fn score(
    candidate: &FieldEmbeddings,
    exemplars: &Exemplars,
    weights: &FieldWeights,
) -> Result<f32, ScoringError> {
    score_detailed(candidate, exemplars, weights).map(|breakdown| breakdown.score)
}

/// Like [`score`], keeping the per-field detail.
///
/// For each field with exemplars the candidate's similarity to every exemplar
/// is averaged with the exemplars' signed weights, then weighted by the field
/// weight. The sum is divided by the field weights actually used and mapped
/// from `[-1, 1]` to `[0, 1]`. No exemplars at all gives the neutral score.
pub fn score_detailed(
    candidate: &FieldEmbeddings,
    exemplars: &Exemplars,
    weights: &FieldWeights,
) -> Result<ScoreBreakdown, ScoringError> {
    if !exemplars.has_signal() {
        return Ok(ScoreBreakdown::neutral());
    }

    let mut breakdown = ScoreBreakdown::default();
    let mut total = 0.0f32;

    for (field, field_exemplars) in exemplars.iter() {
        if field_exemplars.is_empty() {
            continue;
        }

        let mut weighted_sum = 0.0f32;
        let mut normalizer = 0.0f32;

        match candidate.get(field) {
            // Absent candidate embedding compares as zero similarity.
            None => {
                normalizer = field_exemplars.iter().map(|e| e.weight.abs()).sum();
            }
            Some(embedding) => {
                for exemplar in field_exemplars {
                    match cosine_similarity(embedding, &exemplar.embedding) {
                        Ok(similarity) => {
                            weighted_sum += similarity * exemplar.weight;
                            normalizer += exemplar.weight.abs();
                        }
                        Err(e) => {
                            debug!(field = field.name(), error = %e, "Exemplar skipped");
                        }
                    }
                }
            }
        }

        if normalizer > 0.0 {
            let field_score = weighted_sum / normalizer;
            let field_weight = weights.get(field);
            total += field_score * field_weight;
            breakdown.used_weight += field_weight;
            breakdown.fields[field] = Some(field_score);
        }
    }

    if breakdown.used_weight <= 0.0 {
        return Ok(ScoreBreakdown::neutral());
    }

    let raw = total / breakdown.used_weight;
    if !raw.is_finite() {
        return Err(ScoringError::NonFinite { stage: "score" });
    }

    breakdown.raw = raw;
    breakdown.score = ((raw + 1.0) / 2.0).clamp(0.0, 1.0);
    Ok(breakdown)
}
