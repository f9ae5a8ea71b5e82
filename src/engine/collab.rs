//! Interfaces to the external profile store and swipe log.

use std::future::Future;

use super::error::CollaboratorError;
use crate::model::{Profile, SwipeRecord, UserId};

/// Read access to stored profiles.
pub trait ProfileSource: Send + Sync {
    /// Returns `Ok(None)` when no profile exists for `user_id`.
    fn get_profile(
        &self,
        user_id: &UserId,
    ) -> impl Future<Output = Result<Option<Profile>, CollaboratorError>> + Send;
}

/// Append-only log of swipe decisions.
pub trait SwipeLog: Send + Sync {
    fn append_swipe(
        &self,
        record: SwipeRecord,
    ) -> impl Future<Output = Result<(), CollaboratorError>> + Send;

    /// Up to `limit` of `actor`'s swipes, newest first.
    fn list_swipes(
        &self,
        actor: &UserId,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<SwipeRecord>, CollaboratorError>> + Send;
}

#[cfg(any(test, feature = "mock"))]
pub use mock::{InMemoryProfiles, InMemorySwipeLog};

#[cfg(any(test, feature = "mock"))]
mod mock {
    use std::collections::HashMap;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};

    use parking_lot::{Mutex, RwLock};

    use super::{CollaboratorError, Profile, ProfileSource, SwipeLog, SwipeRecord, UserId};

    /// Profiles keyed by their own id. Clones share state.
    #[derive(Debug, Default, Clone)]
    pub struct InMemoryProfiles {
        profiles: Arc<RwLock<HashMap<UserId, Profile>>>,
    }

    impl InMemoryProfiles {
        pub fn new() -> Self {
            Self::default()
        }

        /// Stores `profile` under its id. Profiles without an id are ignored.
        pub fn insert(&self, profile: Profile) -> bool {
            match profile.id().cloned() {
                Some(id) => {
                    self.profiles.write().insert(id, profile);
                    true
                }
                None => false,
            }
        }

        pub fn remove(&self, user_id: &UserId) -> Option<Profile> {
            self.profiles.write().remove(user_id)
        }

        pub fn len(&self) -> usize {
            self.profiles.read().len()
        }

        pub fn is_empty(&self) -> bool {
            self.profiles.read().is_empty()
        }
    }

    impl ProfileSource for InMemoryProfiles {
        async fn get_profile(&self, user_id: &UserId) -> Result<Option<Profile>, CollaboratorError> {
            Ok(self.profiles.read().get(user_id).cloned())
        }
    }

    /// Swipe log in append order, with failure injection. Clones share state.
    #[derive(Debug, Default, Clone)]
    pub struct InMemorySwipeLog {
        records: Arc<Mutex<Vec<SwipeRecord>>>,
        fail: Arc<AtomicBool>,
    }

    impl InMemorySwipeLog {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn set_fail(&self, fail: bool) {
            self.fail.store(fail, Ordering::SeqCst);
        }

        pub fn records(&self) -> Vec<SwipeRecord> {
            self.records.lock().clone()
        }

        fn check(&self) -> Result<(), CollaboratorError> {
            if self.fail.load(Ordering::SeqCst) {
                return Err(CollaboratorError::new("injected swipe log failure"));
            }
            Ok(())
        }
    }

    impl SwipeLog for InMemorySwipeLog {
        async fn append_swipe(&self, record: SwipeRecord) -> Result<(), CollaboratorError> {
            self.check()?;
            self.records.lock().push(record);
            Ok(())
        }

        async fn list_swipes(
            &self,
            actor: &UserId,
            limit: usize,
        ) -> Result<Vec<SwipeRecord>, CollaboratorError> {
            self.check()?;
            Ok(self
                .records
                .lock()
                .iter()
                .rev()
                .filter(|r| &r.user_id == actor)
                .take(limit)
                .cloned()
                .collect())
        }
    }
}
