use thiserror::Error;

use crate::vectorize::Field;

/// A field weight mapping that violates the weight invariants.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum WeightsError {
    #[error("unknown weight field: {0}")]
    UnknownField(String),

    #[error("missing weight for field {0}")]
    MissingField(Field),

    #[error("weight for {field} is not finite")]
    NonFinite { field: Field },

    #[error("weight {value} for {field} outside [{min}, {max}]")]
    OutOfBounds {
        field: Field,
        value: f32,
        min: f32,
        max: f32,
    },

    #[error("weights sum to {sum}, expected 1.0")]
    BadSum { sum: f32 },
}
