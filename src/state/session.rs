use std::collections::BTreeSet;
use std::sync::Arc;

use tokio::sync::OwnedMutexGuard;
use tracing::{debug, error, warn};

use super::{UserState, run_blocking};
use crate::learning::{Exemplars, FieldWeights};
use crate::model::UserId;
use crate::storage::PreferenceStore;

/// Exclusive access to one user's state for the duration of a request.
///
/// Mutations are written through to the store before the method returns. A
/// failed write is logged and the in-memory state is kept. While the user's
/// records could not be read, writes are deferred until a later read succeeds.
pub struct UserSession<S> {
    user_id: UserId,
    state: OwnedMutexGuard<UserState>,
    store: Arc<S>,
}

impl<S> std::fmt::Debug for UserSession<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserSession")
            .field("user_id", &self.user_id)
            .field("swiped", &self.state.swiped.len())
            .field("learned", &self.state.weights.is_some())
            .field("loaded", &self.state.loaded)
            .finish()
    }
}

impl<S: PreferenceStore + 'static> UserSession<S> {
    pub(super) fn new(user_id: UserId, state: OwnedMutexGuard<UserState>, store: Arc<S>) -> Self {
        Self {
            user_id,
            state,
            store,
        }
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    pub fn swiped_ids(&self) -> &BTreeSet<UserId> {
        &self.state.swiped
    }

    pub fn has_swiped(&self, target_id: &UserId) -> bool {
        self.state.swiped.contains(target_id)
    }

    /// Whether the user's stored records have been read.
    pub fn is_loaded(&self) -> bool {
        self.state.loaded
    }

    /// Reads the user's stored records if not done yet and merges them with
    /// anything recorded in memory meanwhile.
    ///
    /// Ids or weights that only exist in memory are written back. A transient
    /// failure leaves the state unloaded so the next lock retries; an
    /// unreadable record is treated as absent.
    pub(super) async fn hydrate(&mut self) {
        if self.state.loaded {
            return;
        }

        let user_id = self.user_id.clone();
        let record = match run_blocking(&self.store, move |store| store.load_user(&user_id)).await {
            Ok(record) => record,
            Err(e) if e.is_transient() => {
                warn!(
                    user_id = %self.user_id,
                    error = %e,
                    pending = self.state.swiped.len(),
                    "Failed to load user state, writes deferred until it loads"
                );
                return;
            }
            Err(e) => {
                warn!(user_id = %self.user_id, error = %e, "Unreadable user state, starting empty");
                Default::default()
            }
        };

        let swipes_pending = !self.state.swiped.is_subset(&record.swiped);
        self.state.swiped.extend(record.swiped);

        let weights_pending = match record.weights {
            Some(stored) => {
                self.state.weights = Some(stored);
                false
            }
            None => self.state.weights.is_some(),
        };

        self.state.loaded = true;
        debug!(
            user_id = %self.user_id,
            swiped = self.state.swiped.len(),
            learned = self.state.weights.is_some(),
            "User state loaded"
        );

        if swipes_pending {
            self.persist_swipe_cache().await;
        }
        if weights_pending && let Some(weights) = self.state.weights.clone() {
            self.persist_weights(weights).await;
        }
    }

    /// Adds target ids to the swipe cache and persists if any were new.
    ///
    /// Returns how many ids were new.
    pub async fn observe<'i, I>(&mut self, target_ids: I) -> usize
    where
        I: IntoIterator<Item = &'i UserId>,
    {
        let mut added = 0;
        for id in target_ids {
            if self.state.swiped.insert(id.clone()) {
                added += 1;
            }
        }

        if added > 0 {
            if self.state.loaded {
                self.persist_swipe_cache().await;
            } else {
                debug!(user_id = %self.user_id, added, "Swipe cache write deferred");
            }
        }

        added
    }

    /// Current weights (base weights until the first learning event).
    pub fn field_weights(&self) -> FieldWeights {
        self.state.weights.clone().unwrap_or_default()
    }

    pub fn has_learned_weights(&self) -> bool {
        self.state.weights.is_some()
    }

    /// Adapts the weights from `exemplars` and persists them.
    ///
    /// Without any exemplar the weights are returned unchanged and nothing is
    /// created or written.
    pub async fn update_weights(&mut self, exemplars: &Exemplars) -> FieldWeights {
        let current = self.field_weights();
        if !exemplars.has_signal() {
            return current;
        }

        let updated = current.adapt(exemplars);
        self.state.weights = Some(updated.clone());

        if self.state.loaded {
            self.persist_weights(updated.clone()).await;
        } else {
            debug!(user_id = %self.user_id, "Field weights write deferred");
        }

        updated
    }

    async fn persist_swipe_cache(&self) {
        let user_id = self.user_id.clone();
        let swiped = self.state.swiped.clone();
        let total = swiped.len();

        match run_blocking(&self.store, move |store| {
            store.upsert_swipe_cache(&user_id, &swiped)
        })
        .await
        {
            Ok(()) => debug!(user_id = %self.user_id, total, "Swipe cache updated"),
            Err(e) => error!(
                user_id = %self.user_id,
                error = %e,
                "Failed to persist swipe cache, keeping in-memory state"
            ),
        }
    }

    async fn persist_weights(&self, weights: FieldWeights) {
        let user_id = self.user_id.clone();

        match run_blocking(&self.store, move |store| store.upsert_weights(&user_id, &weights)).await
        {
            Ok(()) => debug!(user_id = %self.user_id, "Field weights updated"),
            Err(e) => error!(
                user_id = %self.user_id,
                error = %e,
                "Failed to persist field weights, keeping in-memory state"
            ),
        }
    }
}
