//! Preference learning.
//!
//! - [`PreferenceLearner`] turns recent swipes into signed [`Exemplars`].
//! - [`FieldWeights`] holds per-user field importance and adapts it from exemplars.

mod error;
pub mod exemplar;
pub mod learner;
pub mod weights;


pub use error::WeightsError;
pub use exemplar::{Exemplar, Exemplars};
pub use learner::{PreferenceLearner, recent_window};
pub use weights::{FieldWeights, base_weight, predictiveness};
