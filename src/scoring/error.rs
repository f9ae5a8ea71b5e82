use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScoringError {
    #[error("vector dimension mismatch: {left} vs {right}")]
    DimensionMismatch { left: usize, right: usize },

    #[error("cannot compare empty vectors")]
    EmptyVector,

    #[error("non-finite {stage} value")]
    NonFinite { stage: &'static str },
}
