use thiserror::Error;

use crate::embedding::EmbeddingError;
use crate::model::UserId;
use crate::storage::StorageError;

/// Failure reported by an external collaborator (profile source, swipe log).
#[derive(Debug, Error)]
#[error("{message}")]
pub struct CollaboratorError {
    message: String,
}

impl CollaboratorError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Errors from [`RecommendationEngine`](super::RecommendationEngine) operations.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("invalid user id: {0:?}")]
    InvalidUserId(String),

    #[error("user not found: {0}")]
    UserNotFound(UserId),

    #[error("profile source failed: {0}")]
    ProfileSource(#[source] CollaboratorError),

    #[error("swipe log failed: {0}")]
    SwipeLog(#[source] CollaboratorError),

    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("embedding provider error: {0}")]
    Embedding(#[from] EmbeddingError),
}

pub type EngineResult<T> = Result<T, EngineError>;
