//! Per-user mutable state (swipe cache and field weights) with per-user locking.
//!
//! [`StateTable`] maps each user to its own `tokio::sync::Mutex`. The table
//! itself sits behind a short `parking_lot::RwLock` used only to find or create
//! a user's slot, so requests for different users never wait on each other.
//! A user's records are read from the store on first access if the startup
//! load did not provide them. Until such a read succeeds the user's state is
//! kept in memory only, so a transient read failure can never shrink the
//! durable swipe cache. Store calls run on the blocking thread pool.

mod session;

#[cfg(test)]
mod tests;

pub use session::UserSession;

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use parking_lot::RwLock;
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::learning::FieldWeights;
use crate::model::UserId;
use crate::storage::{PreferenceStore, StorageError, StorageResult};

/// One user's in-memory state.
#[derive(Debug, Default)]
pub struct UserState {
    weights: Option<FieldWeights>,
    swiped: BTreeSet<UserId>,
    loaded: bool,
}

type Slot = Arc<Mutex<UserState>>;

/// All users' state, each behind its own lock.
pub struct StateTable<S> {
    store: Arc<S>,
    users: RwLock<HashMap<UserId, Slot>>,
}

impl<S> std::fmt::Debug for StateTable<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StateTable")
            .field("users", &self.users.read().len())
            .finish()
    }
}

impl<S: PreferenceStore + 'static> StateTable<S> {
    /// Loads all persisted state. A failed load is logged and the table starts
    /// empty; users are then loaded lazily.
    pub fn open(store: S) -> Self {
        let users = match store.load_all() {
            Ok(snapshot) => {
                info!(
                    users = snapshot.len(),
                    skipped = snapshot.skipped,
                    "Preference state loaded"
                );
                snapshot
                    .users
                    .into_iter()
                    .map(|(user_id, record)| {
                        let state = UserState {
                            weights: record.weights,
                            swiped: record.swiped,
                            loaded: true,
                        };
                        (user_id, Arc::new(Mutex::new(state)))
                    })
                    .collect()
            }
            Err(e) => {
                warn!(error = %e, "Failed to load preference state, starting empty");
                HashMap::new()
            }
        };

        Self {
            store: Arc::new(store),
            users: RwLock::new(users),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Number of users with a slot (loaded or touched this process).
    pub fn len(&self) -> usize {
        self.users.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn slot(&self, user_id: &UserId) -> Slot {
        if let Some(slot) = self.users.read().get(user_id) {
            return Arc::clone(slot);
        }

        let mut users = self.users.write();
        Arc::clone(users.entry(user_id.clone()).or_default())
    }

    /// Locks `user_id`'s state until the returned session is dropped.
    ///
    /// Reads the user's records first if they are not loaded yet.
    pub async fn lock(&self, user_id: &UserId) -> UserSession<S> {
        let state = self.slot(user_id).lock_owned().await;
        let mut session = UserSession::new(user_id.clone(), state, Arc::clone(&self.store));
        session.hydrate().await;
        session
    }

    /// Makes all completed writes durable.
    pub fn flush(&self) -> StorageResult<()> {
        self.store.flush()
    }
}

/// Runs a synchronous store call on the blocking thread pool.
async fn run_blocking<S, T, F>(store: &Arc<S>, op: F) -> StorageResult<T>
where
    S: PreferenceStore + 'static,
    T: Send + 'static,
    F: FnOnce(&S) -> StorageResult<T> + Send + 'static,
{
    let store = Arc::clone(store);
    tokio::task::spawn_blocking(move || op(store.as_ref()))
        .await
        .map_err(|e| StorageError::TaskFailed(e.to_string()))?
}
