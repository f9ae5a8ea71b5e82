use std::collections::BTreeSet;
use std::sync::Arc;

use super::error::StorageResult;
use super::model::{StoreSnapshot, UserRecord};
use crate::learning::FieldWeights;
use crate::model::UserId;

/// Durable per-user state: the `field_weights` and `swipe_cache` tables.
///
/// Every upsert replaces exactly one user's row and is durable when it returns.
pub trait PreferenceStore: Send + Sync {
    /// Loads every readable record. Unreadable records are skipped and counted.
    fn load_all(&self) -> StorageResult<StoreSnapshot>;

    /// Loads one user's records (empty when none exist).
    fn load_user(&self, user_id: &UserId) -> StorageResult<UserRecord>;

    fn upsert_weights(&self, user_id: &UserId, weights: &FieldWeights) -> StorageResult<()>;

    fn upsert_swipe_cache(&self, user_id: &UserId, swiped: &BTreeSet<UserId>)
    -> StorageResult<()>;

    /// Makes all completed writes durable.
    fn flush(&self) -> StorageResult<()>;
}

impl<S: PreferenceStore> PreferenceStore for Arc<S> {
    fn load_all(&self) -> StorageResult<StoreSnapshot> {
        (**self).load_all()
    }

    fn load_user(&self, user_id: &UserId) -> StorageResult<UserRecord> {
        (**self).load_user(user_id)
    }

    fn upsert_weights(&self, user_id: &UserId, weights: &FieldWeights) -> StorageResult<()> {
        (**self).upsert_weights(user_id, weights)
    }

    fn upsert_swipe_cache(
        &self,
        user_id: &UserId,
        swiped: &BTreeSet<UserId>,
    ) -> StorageResult<()> {
        (**self).upsert_swipe_cache(user_id, swiped)
    }

    fn flush(&self) -> StorageResult<()> {
        (**self).flush()
    }
}
