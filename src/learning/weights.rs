//! Per-user field importance and its adaptation.
//!
//! # Invariants
//!
//! Every [`FieldWeights`] value handed out satisfies:
//!
//! - each weight ∈ [`MIN_FIELD_WEIGHT`], [`MAX_FIELD_WEIGHT`]
//! - weights sum to 1.0 within [`WEIGHT_SUM_TOLERANCE`]
//!
//! [`FieldWeights::adapt`] nudges each weight by the field's predictiveness and
//! then projects back onto that set.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::error::WeightsError;
use super::exemplar::{Exemplar, Exemplars};
use crate::constants::{
    FIELD_COUNT, MAX_FIELD_WEIGHT, MAX_PREDICTIVENESS, MIN_FIELD_WEIGHT, WEIGHT_LEARNING_RATE,
    WEIGHT_SUM_TOLERANCE,
};
use crate::vectorize::{Field, FieldMap};

/// Starting importance of a field before any learning.
pub const fn base_weight(field: Field) -> f32 {
    match field {
        Field::Skills => 0.25,
        Field::Startup => 0.20,
        Field::RoleLocation => 0.10,
        Field::Experience => 0.15,
        Field::Education => 0.10,
        Field::Projects => 0.10,
        Field::Bio => 0.05,
        Field::LookingFor => 0.05,
    }
}

/// Projection stops once the sum is this close to 1.0.
const PROJECTION_EPSILON: f32 = 1e-6;

/// Field → weight mapping. Serializes as `{field_name: weight}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    try_from = "BTreeMap<String, f32>",
    into = "BTreeMap<String, f32>"
)]
pub struct FieldWeights(FieldMap<f32>);

impl Default for FieldWeights {
    fn default() -> Self {
        Self::base()
    }
}

impl FieldWeights {
    pub fn base() -> Self {
        Self(FieldMap::from_fn(base_weight))
    }

    #[inline]
    pub fn get(&self, field: Field) -> f32 {
        self.0[field]
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, f32)> + '_ {
        self.0.iter().map(|(field, weight)| (field, *weight))
    }

    pub fn sum(&self) -> f32 {
        self.0.values().sum()
    }

    /// Checks bounds and the sum invariant.
    pub fn validate(&self) -> Result<(), WeightsError> {
        for (field, value) in self.iter() {
            if !value.is_finite() {
                return Err(WeightsError::NonFinite { field });
            }
            if !(MIN_FIELD_WEIGHT - WEIGHT_SUM_TOLERANCE..=MAX_FIELD_WEIGHT + WEIGHT_SUM_TOLERANCE)
                .contains(&value)
            {
                return Err(WeightsError::OutOfBounds {
                    field,
                    value,
                    min: MIN_FIELD_WEIGHT,
                    max: MAX_FIELD_WEIGHT,
                });
            }
        }

        let sum = self.sum();
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(WeightsError::BadSum { sum });
        }
        Ok(())
    }

    /// Returns the weights after one learning step over `exemplars`.
    ///
    /// Each weight moves by `predictiveness × WEIGHT_LEARNING_RATE`, is clamped to
    /// the bounds, and the vector is renormalized to sum 1.0 by bounded
    /// projection. Deterministic for identical inputs.
    pub fn adapt(&self, exemplars: &Exemplars) -> Self {
        let mut weights: [f32; FIELD_COUNT] = std::array::from_fn(|i| {
            let field = Field::ALL[i];
            self.get(field) + predictiveness(exemplars.get(field)) * WEIGHT_LEARNING_RATE
        });

        project_onto_bounds(&mut weights);

        Self(FieldMap::from_fn(|field| weights[field.index()]))
    }
}

/// How strongly a field's exemplars lean positive, in `[-0.5, 0.5]`.
///
/// `(Σ positive − |Σ negative|) / count`; zero for an empty list.
pub fn predictiveness(exemplars: &[Exemplar]) -> f32 {
    if exemplars.is_empty() {
        return 0.0;
    }

    let positive: f32 = exemplars.iter().map(|e| e.weight).filter(|w| *w > 0.0).sum();
    let negative: f32 = exemplars.iter().map(|e| e.weight).filter(|w| *w < 0.0).sum();

    let raw = (positive - negative.abs()) / exemplars.len() as f32;
    raw.clamp(-MAX_PREDICTIVENESS, MAX_PREDICTIVENESS)
}

/// Clamps every weight to the bounds and rescales to sum 1.0.
///
/// Weights that can still move in the needed direction are scaled
/// proportionally; any that cross a bound are pinned there and the remainder is
/// spread over the rest on the next pass. At most one pass per weight plus one.
fn project_onto_bounds(weights: &mut [f32; FIELD_COUNT]) {
    for w in weights.iter_mut() {
        *w = w.clamp(MIN_FIELD_WEIGHT, MAX_FIELD_WEIGHT);
    }

    for _ in 0..=FIELD_COUNT {
        let total: f32 = weights.iter().sum();
        let excess = total - 1.0;
        if excess.abs() < PROJECTION_EPSILON {
            break;
        }

        let free: Vec<usize> = (0..FIELD_COUNT)
            .filter(|&i| {
                if excess > 0.0 {
                    weights[i] > MIN_FIELD_WEIGHT
                } else {
                    weights[i] < MAX_FIELD_WEIGHT
                }
            })
            .collect();

        let free_sum: f32 = free.iter().map(|&i| weights[i]).sum();
        if free_sum <= 0.0 {
            break;
        }

        let scale = (free_sum - excess) / free_sum;
        for i in free {
            weights[i] = (weights[i] * scale).clamp(MIN_FIELD_WEIGHT, MAX_FIELD_WEIGHT);
        }
    }
}

impl TryFrom<BTreeMap<String, f32>> for FieldWeights {
    type Error = WeightsError;

    fn try_from(map: BTreeMap<String, f32>) -> Result<Self, Self::Error> {
        let mut slots: FieldMap<Option<f32>> = FieldMap::default();
        for (name, value) in map {
            let field: Field = name
                .parse()
                .map_err(|_| WeightsError::UnknownField(name.clone()))?;
            slots[field] = Some(value);
        }

        let mut values = [0.0f32; FIELD_COUNT];
        for (field, slot) in slots.iter() {
            values[field.index()] = slot.ok_or(WeightsError::MissingField(field))?;
        }

        let weights = Self(FieldMap::from_fn(|field| values[field.index()]));
        weights.validate()?;
        Ok(weights)
    }
}

impl From<FieldWeights> for BTreeMap<String, f32> {
    fn from(weights: FieldWeights) -> Self {
        weights
            .iter()
            .map(|(field, weight)| (field.name().to_string(), weight))
            .collect()
    }
}
