use std::collections::{BTreeSet, HashSet};

use rand::seq::SliceRandom;
use tracing::{debug, info, instrument, warn};

use super::collab::{ProfileSource, SwipeLog};
use super::error::{EngineError, EngineResult};
use super::types::{EngineConfig, Recommendation};
use crate::config::Config;
use crate::constants::NEUTRAL_SCORE;
use crate::embedding::{CachedEmbedder, Embedder, EmbeddingProvider};
use crate::learning::{FieldWeights, PreferenceLearner};
use crate::model::{Profile, SwipeDecision, SwipeEvent, SwipeRecord, UserId};
use crate::scoring;
use crate::state::{StateTable, UserSession};
use crate::storage::{FileStore, PreferenceStore};
use crate::vectorize::ProfileVectorizer;

/// Engine wired the way the binary runs it.
pub type DefaultEngine = RecommendationEngine<CachedEmbedder<Embedder>, FileStore>;

/// Ranks candidates for a user from their swipe history.
///
/// One instance per process, shared by `Arc`. Requests for the same user are
/// serialized by that user's lock; different users proceed in parallel.
pub struct RecommendationEngine<E, S> {
    vectorizer: ProfileVectorizer<E>,
    learner: PreferenceLearner,
    state: StateTable<S>,
    config: EngineConfig,
}

impl<E, S> std::fmt::Debug for RecommendationEngine<E, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecommendationEngine")
            .field("config", &self.config)
            .field("state", &self.state)
            .finish()
    }
}

impl DefaultEngine {
    /// Opens the file store and embedding provider described by `config`.
    pub fn from_config(config: &Config) -> EngineResult<Self> {
        let store = FileStore::open(&config.storage_path)?;
        let embedder = Embedder::from_config(config)?;
        let provider = CachedEmbedder::with_capacity(embedder, config.embedding_cache_capacity);
        Ok(Self::open(provider, store, EngineConfig::from(config)))
    }
}

impl<E: EmbeddingProvider, S: PreferenceStore + 'static> RecommendationEngine<E, S> {
    /// Builds the engine and loads all persisted user state from `store`.
    pub fn open(provider: E, store: S, config: EngineConfig) -> Self {
        info!(
            dim = provider.dimension(),
            context_size = config.context_size,
            max_results = config.max_results,
            strict_candidate_ids = config.strict_candidate_ids,
            "Recommendation engine starting"
        );

        Self {
            vectorizer: ProfileVectorizer::new(provider),
            learner: PreferenceLearner::new(config.context_size, config.embed_concurrency),
            state: StateTable::open(store),
            config,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn vectorizer(&self) -> &ProfileVectorizer<E> {
        &self.vectorizer
    }

    pub fn store(&self) -> &S {
        self.state.store()
    }

    /// Ranks `candidates` for `user_id` and returns at most
    /// `min(max_results, limit)` of them, best first.
    ///
    /// Ids from `history` join the user's swipe cache before filtering. With
    /// no history the result is a random pick at the neutral score.
    #[instrument(
        skip(self, user_id, my_profile, candidates, history),
        fields(user_id = %user_id, candidates = candidates.len(), history = history.len())
    )]
    pub async fn recommend(
        &self,
        user_id: &str,
        my_profile: &Profile,
        candidates: Vec<Profile>,
        history: &[SwipeEvent],
        limit: usize,
    ) -> EngineResult<Vec<Recommendation>> {
        let user_id = parse_user_id(user_id)?;
        let mut session = self.state.lock(&user_id).await;

        session
            .observe(history.iter().filter_map(SwipeEvent::target_key))
            .await;

        let mut pool = self.filter_candidates(&session, my_profile, candidates);
        let cap = self.config.max_results.min(limit);

        if pool.is_empty() || cap == 0 {
            debug!(pool = pool.len(), cap, "Nothing to recommend");
            return Ok(Vec::new());
        }

        if history.is_empty() {
            pool.shuffle(&mut rand::thread_rng());
            pool.truncate(cap);
            info!(returned = pool.len(), "Cold start, returning random candidates");
            return Ok(pool
                .into_iter()
                .map(|profile| Recommendation {
                    profile,
                    score: NEUTRAL_SCORE,
                })
                .collect());
        }

        let my_embeddings = self.vectorizer.vectorize(my_profile).await;
        let exemplars = self
            .learner
            .learn(&self.vectorizer, &my_embeddings, history)
            .await;
        let weights = session.update_weights(&exemplars).await;

        let refs: Vec<&Profile> = pool.iter().collect();
        let vectors = self
            .vectorizer
            .vectorize_all(&refs, self.config.embed_concurrency)
            .await;
        drop(refs);

        let mut ranked: Vec<Recommendation> = pool
            .into_iter()
            .zip(&vectors)
            .map(|(profile, embeddings)| {
                let score = match scoring::score(embeddings, &exemplars, &weights) {
                    Ok(score) => score,
                    Err(e) => {
                        warn!(
                            candidate_id = ?profile.id(),
                            error = %e,
                            "Scoring failed, using neutral score"
                        );
                        NEUTRAL_SCORE
                    }
                };
                Recommendation { profile, score }
            })
            .collect();

        ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
        ranked.truncate(cap);

        info!(
            returned = ranked.len(),
            exemplars = exemplars.len(),
            top_score = ranked.first().map(|r| r.score),
            "Recommendations ranked"
        );

        Ok(ranked)
    }

    /// Drops swiped, self and duplicate candidates. First occurrence wins.
    fn filter_candidates(
        &self,
        session: &UserSession<S>,
        my_profile: &Profile,
        candidates: Vec<Profile>,
    ) -> Vec<Profile> {
        let user_id = session.user_id();
        let my_id = my_profile.id();
        let my_name = my_profile.name();
        let total = candidates.len();
        let mut seen = HashSet::new();

        let pool: Vec<Profile> = candidates
            .into_iter()
            .filter(|candidate| match candidate.id() {
                Some(id) if id == user_id || Some(id) == my_id => false,
                Some(id) if session.has_swiped(id) => false,
                Some(id) => {
                    let first = seen.insert(id.clone());
                    if !first {
                        warn!(candidate_id = %id, "Duplicate candidate id, keeping first");
                    }
                    first
                }
                None if self.config.strict_candidate_ids => {
                    warn!(name = ?candidate.name(), "Candidate without id dropped");
                    false
                }
                None => !matches!(
                    (candidate.name(), my_name),
                    (Some(theirs), Some(mine)) if theirs == mine
                ),
            })
            .collect();

        debug!(total, kept = pool.len(), "Candidates filtered");
        pool
    }

    /// Records that `user_id` has decided on `target_id`.
    ///
    /// Returns `true` if the target was not already in the swipe cache.
    #[instrument(skip(self))]
    pub async fn record_swipe(&self, user_id: &str, target_id: &str) -> EngineResult<bool> {
        let user_id = parse_user_id(user_id)?;
        let target_id = parse_user_id(target_id)?;

        let mut session = self.state.lock(&user_id).await;
        Ok(session.observe([&target_id]).await > 0)
    }

    pub async fn swiped_ids(&self, user_id: &str) -> EngineResult<BTreeSet<UserId>> {
        let user_id = parse_user_id(user_id)?;
        Ok(self.state.lock(&user_id).await.swiped_ids().clone())
    }

    /// Current weights, or the base weights if nothing was learned yet.
    pub async fn field_weights(&self, user_id: &str) -> EngineResult<FieldWeights> {
        let user_id = parse_user_id(user_id)?;
        Ok(self.state.lock(&user_id).await.field_weights())
    }

    /// Loads the caller's profile and recent swipes from collaborators, then
    /// runs [`recommend`](Self::recommend).
    ///
    /// Swipes whose target profile no longer exists are skipped.
    #[instrument(skip(self, profiles, swipes, candidates), fields(candidates = candidates.len()))]
    pub async fn recommend_for_user<P, L>(
        &self,
        user_id: &str,
        profiles: &P,
        swipes: &L,
        candidates: Vec<Profile>,
        limit: usize,
    ) -> EngineResult<Vec<Recommendation>>
    where
        P: ProfileSource,
        L: SwipeLog,
    {
        let user_id = parse_user_id(user_id)?;

        let my_profile = profiles
            .get_profile(&user_id)
            .await
            .map_err(EngineError::ProfileSource)?
            .ok_or_else(|| EngineError::UserNotFound(user_id.clone()))?;

        let records = swipes
            .list_swipes(&user_id, self.config.context_size)
            .await
            .map_err(EngineError::SwipeLog)?;

        let mut history = Vec::with_capacity(records.len());
        for record in records.into_iter().rev() {
            let target = profiles
                .get_profile(&record.target_user_id)
                .await
                .map_err(EngineError::ProfileSource)?;

            match target {
                Some(profile) => history.push(SwipeEvent {
                    target_id: Some(record.target_user_id),
                    profile: Some(profile),
                    decision: record.decision,
                    timestamp: Some(record.timestamp),
                }),
                None => debug!(target_id = %record.target_user_id, "Swiped profile missing, skipped"),
            }
        }

        self.recommend(user_id.as_str(), &my_profile, candidates, &history, limit)
            .await
    }

    /// Appends the decision to the swipe log, then records it in the swipe cache.
    #[instrument(skip(self, swipes))]
    pub async fn submit_swipe<L: SwipeLog>(
        &self,
        user_id: &str,
        target_id: &str,
        decision: SwipeDecision,
        swipes: &L,
    ) -> EngineResult<bool> {
        let actor = parse_user_id(user_id)?;
        let target = parse_user_id(target_id)?;

        swipes
            .append_swipe(SwipeRecord::now(actor.clone(), target.clone(), decision))
            .await
            .map_err(EngineError::SwipeLog)?;

        self.record_swipe(actor.as_str(), target.as_str()).await
    }

    /// Flushes persisted state. Call once at process exit.
    pub fn shutdown(&self) -> EngineResult<()> {
        self.state.flush()?;
        info!(users = self.state.len(), "Recommendation engine shut down");
        Ok(())
    }
}

fn parse_user_id(raw: &str) -> EngineResult<UserId> {
    UserId::parse(raw).ok_or_else(|| EngineError::InvalidUserId(raw.to_string()))
}
