//! Cofound library crate (used by the `cofound` binary and integration tests).
//!
//! Ranks co-founder candidates for a user by learning from that user's swipe
//! history, and keeps per-user state (field weights, swiped ids) on disk.
//!
//! # Public API Surface
//!
//! ## Engine
//! - [`RecommendationEngine`], [`EngineConfig`], [`Recommendation`] - Collect, filter, score, rank
//! - [`ProfileSource`], [`SwipeLog`] - External collaborators
//!
//! ## Model
//! - [`UserId`], [`Profile`], [`SwipeEvent`], [`SwipeDecision`] - Boundary types
//!
//! ## Learning & Scoring
//! - [`ProfileVectorizer`], [`Field`], [`FieldEmbeddings`] - Per-field embeddings
//! - [`PreferenceLearner`], [`Exemplars`], [`FieldWeights`] - Preference model
//! - [`score`], [`cosine_similarity`] - Candidate scoring
//!
//! ## Infrastructure
//! - [`EmbeddingProvider`], [`HttpEmbedder`], [`HashEmbedder`], [`CachedEmbedder`] - Embeddings
//! - [`PreferenceStore`], [`FileStore`] - Durable per-user state
//! - [`Config`] - Environment configuration
//!
//! ## Test/Mock Support
//! Mock implementations are available behind `#[cfg(any(test, feature = "mock"))]`.

pub mod config;
pub mod constants;
pub mod embedding;
pub mod engine;
pub mod hashing;
pub mod learning;
pub mod model;
pub mod scoring;
pub mod state;
pub mod storage;
pub mod vectorize;

pub use config::{Config, ConfigError};
pub use constants::{
    DEFAULT_EMBEDDING_DIM, DimValidationError, FIELD_COUNT, MAX_FIELD_WEIGHT, MIN_FIELD_WEIGHT,
    NEUTRAL_SCORE, validate_embedding_dim,
};
#[cfg(any(test, feature = "mock"))]
pub use embedding::MockEmbedder;
pub use embedding::{
    CachedEmbedder, Embedder, EmbeddingError, EmbeddingProvider, HashEmbedder, HttpEmbedder,
    HttpEmbedderConfig,
};
#[cfg(any(test, feature = "mock"))]
pub use engine::{InMemoryProfiles, InMemorySwipeLog};
pub use engine::{
    CollaboratorError, DefaultEngine, EngineConfig, EngineError, EngineResult, ProfileSource,
    RecommendRequest, RecommendResponse, Recommendation, RecommendationEngine, SwipeLog,
};
pub use hashing::{hash_text, hash_to_u64, hash_user_id};
pub use learning::{Exemplar, Exemplars, FieldWeights, PreferenceLearner, WeightsError};
pub use model::{Profile, SwipeDecision, SwipeEvent, SwipeRecord, UserId};
pub use scoring::{ScoreBreakdown, ScoringError, cosine_similarity, score, score_detailed};
pub use state::{StateTable, UserSession};
#[cfg(any(test, feature = "mock"))]
pub use storage::MemoryStore;
pub use storage::{FileStore, PreferenceStore, StorageError, StorageResult};
pub use vectorize::{Field, FieldEmbeddings, FieldMap, ProfileVectorizer};
