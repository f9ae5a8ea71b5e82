//! Recommendation orchestration: collect, filter, score, rank.
//!
//! [`RecommendationEngine::recommend`] is the core operation. The engine also
//! exposes the feedback hook ([`record_swipe`](RecommendationEngine::record_swipe)),
//! read accessors, and convenience operations that pull inputs from the
//! [`ProfileSource`] and [`SwipeLog`] collaborators.

pub mod collab;
pub mod error;
pub mod orchestrator;
pub mod types;


#[cfg(any(test, feature = "mock"))]
pub use collab::{InMemoryProfiles, InMemorySwipeLog};
pub use collab::{ProfileSource, SwipeLog};
pub use error::{CollaboratorError, EngineError, EngineResult};
pub use orchestrator::{DefaultEngine, RecommendationEngine};
pub use types::{EngineConfig, RecommendRequest, RecommendResponse, Recommendation};
