use std::collections::{BTreeSet, HashMap};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::learning::FieldWeights;
use crate::model::UserId;

/// Current on-disk record version.
pub const RECORD_VERSION: u32 = 1;

/// Persisted `field_weights[user_id]` row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightsRecord {
    pub version: u32,
    pub user_id: UserId,
    pub weights: FieldWeights,
    pub updated_at: DateTime<Utc>,
}

impl WeightsRecord {
    pub fn new(user_id: UserId, weights: FieldWeights) -> Self {
        Self {
            version: RECORD_VERSION,
            user_id,
            weights,
            updated_at: Utc::now(),
        }
    }
}

/// Persisted `swipe_cache[user_id]` row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwipeCacheRecord {
    pub version: u32,
    pub user_id: UserId,
    pub target_ids: BTreeSet<UserId>,
    pub updated_at: DateTime<Utc>,
}

impl SwipeCacheRecord {
    pub fn new(user_id: UserId, target_ids: BTreeSet<UserId>) -> Self {
        Self {
            version: RECORD_VERSION,
            user_id,
            target_ids,
            updated_at: Utc::now(),
        }
    }
}

/// Everything stored for one user.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct UserRecord {
    /// Learned weights; `None` until the first learning event.
    pub weights: Option<FieldWeights>,
    /// Ids already swiped on.
    pub swiped: BTreeSet<UserId>,
}

impl UserRecord {
    pub fn is_empty(&self) -> bool {
        self.weights.is_none() && self.swiped.is_empty()
    }
}

/// Result of loading a whole store at startup.
#[derive(Debug, Clone, Default)]
pub struct StoreSnapshot {
    pub users: HashMap<UserId, UserRecord>,
    /// Records that could not be read and were ignored.
    pub skipped: usize,
}

impl StoreSnapshot {
    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}
