//! Candidate scoring against learned exemplars.
//!
//! [`score`] compares a candidate's field embeddings with the signed exemplars
//! from the user's swipes, weighted by the user's [`FieldWeights`](crate::learning::FieldWeights).
//!
//! # Degraded inputs
//!
//! - A candidate field without an embedding scores zero similarity for that
//!   field; the field still counts in the denominator.
//! - An exemplar that cannot be compared (length mismatch, empty vector) is
//!   skipped for that exemplar only.
//! - A non-finite result is an error; callers fall back to the neutral score.

pub mod error;
pub mod scorer;
pub mod similarity;
pub mod types;


pub use error::ScoringError;
pub use scorer::{score, score_detailed};
pub use similarity::cosine_similarity;
pub use types::ScoreBreakdown;
