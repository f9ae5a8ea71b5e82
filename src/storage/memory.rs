use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use parking_lot::Mutex;

use super::error::{StorageError, StorageResult};
use super::model::{StoreSnapshot, UserRecord};
use super::store::PreferenceStore;
use crate::learning::FieldWeights;
use crate::model::UserId;

/// In-memory [`PreferenceStore`] for tests, with write-failure injection.
///
/// Clones share state, so a test can keep a handle after moving one into an engine.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    users: Arc<Mutex<HashMap<UserId, UserRecord>>>,
    fail_writes: Arc<AtomicBool>,
    fail_loads: Arc<AtomicBool>,
    weight_writes: Arc<AtomicUsize>,
    swipe_writes: Arc<AtomicUsize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a user's record directly.
    pub fn insert(&self, user_id: UserId, record: UserRecord) {
        self.users.lock().insert(user_id, record);
    }

    pub fn record(&self, user_id: &UserId) -> Option<UserRecord> {
        self.users.lock().get(user_id).cloned()
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_loads(&self, fail: bool) {
        self.fail_loads.store(fail, Ordering::SeqCst);
    }

    /// Successful weight upserts so far.
    pub fn weight_writes(&self) -> usize {
        self.weight_writes.load(Ordering::SeqCst)
    }

    /// Successful swipe-cache upserts so far.
    pub fn swipe_writes(&self) -> usize {
        self.swipe_writes.load(Ordering::SeqCst)
    }

    fn check_writable(&self) -> StorageResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StorageError::WriteFailed("injected write failure".to_string()));
        }
        Ok(())
    }

    fn check_readable(&self) -> StorageResult<()> {
        if self.fail_loads.load(Ordering::SeqCst) {
            return Err(StorageError::Io(std::io::Error::other("injected load failure")));
        }
        Ok(())
    }
}

impl PreferenceStore for MemoryStore {
    fn load_all(&self) -> StorageResult<StoreSnapshot> {
        self.check_readable()?;
        Ok(StoreSnapshot {
            users: self.users.lock().clone(),
            skipped: 0,
        })
    }

    fn load_user(&self, user_id: &UserId) -> StorageResult<UserRecord> {
        self.check_readable()?;
        Ok(self.users.lock().get(user_id).cloned().unwrap_or_default())
    }

    fn upsert_weights(&self, user_id: &UserId, weights: &FieldWeights) -> StorageResult<()> {
        self.check_writable()?;
        self.users.lock().entry(user_id.clone()).or_default().weights = Some(weights.clone());
        self.weight_writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn upsert_swipe_cache(
        &self,
        user_id: &UserId,
        swiped: &BTreeSet<UserId>,
    ) -> StorageResult<()> {
        self.check_writable()?;
        self.users.lock().entry(user_id.clone()).or_default().swiped = swiped.clone();
        self.swipe_writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn flush(&self) -> StorageResult<()> {
        self.check_writable()
    }
}
