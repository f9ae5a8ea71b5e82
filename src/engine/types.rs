use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::Config;
use crate::constants::{DEFAULT_CONTEXT_SIZE, DEFAULT_MAX_RESULTS};
use crate::model::{Profile, SwipeEvent, UserId};

/// Tunables for [`RecommendationEngine`](super::RecommendationEngine).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Swipes the learner looks back over.
    pub context_size: usize,
    /// Hard cap on results, combined with the per-call limit.
    pub max_results: usize,
    /// Profiles vectorized concurrently.
    pub embed_concurrency: usize,
    /// Drop id-less candidates instead of falling back to name comparison.
    pub strict_candidate_ids: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            context_size: DEFAULT_CONTEXT_SIZE,
            max_results: DEFAULT_MAX_RESULTS,
            embed_concurrency: 8,
            strict_candidate_ids: true,
        }
    }
}

impl From<&Config> for EngineConfig {
    fn from(config: &Config) -> Self {
        Self {
            context_size: config.context_size,
            max_results: config.max_results,
            embed_concurrency: config.embed_concurrency,
            strict_candidate_ids: config.strict_candidate_ids,
        }
    }
}

/// A ranked candidate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub profile: Profile,
    pub score: f32,
}

/// A recommendation request as read by the CLI.
#[derive(Debug, Clone, Deserialize)]
pub struct RecommendRequest {
    #[serde(default, deserialize_with = "crate::model::id::deserialize_lenient_id")]
    pub user_id: Option<UserId>,
    pub my_profile: Profile,
    #[serde(default)]
    pub candidates: Vec<Profile>,
    #[serde(default)]
    pub swipe_history: Vec<SwipeEvent>,
    #[serde(default)]
    pub limit: Option<usize>,
}

/// Parallel `recommendations` / `scores` arrays, the shape callers consume.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RecommendResponse {
    pub recommendations: Vec<Value>,
    pub scores: Vec<f32>,
}

impl From<Vec<Recommendation>> for RecommendResponse {
    fn from(ranked: Vec<Recommendation>) -> Self {
        let (recommendations, scores) = ranked
            .into_iter()
            .map(|r| (r.profile.into_value(), r.score))
            .unzip();
        Self {
            recommendations,
            scores,
        }
    }
}
