//! Swipe decisions, log records and history events.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::id::{UserId, deserialize_lenient_id};
use super::profile::Profile;
use crate::constants::{DISLIKE_WEIGHT, LIKE_WEIGHT, SUPERLIKE_WEIGHT};

/// A swipe decision as sent by clients: `0` dislike, `1` like, `2` superlike.
///
/// Integral numbers map by value (`1.0` is a like). Any other value, including
/// strings and `null`, is read as a dislike.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(into = "i64")]
pub enum SwipeDecision {
    #[default]
    Dislike,
    Like,
    Superlike,
}

impl SwipeDecision {
    /// Signed exemplar weight for this decision.
    pub fn signed_weight(self) -> f32 {
        match self {
            Self::Like => LIKE_WEIGHT,
            Self::Superlike => SUPERLIKE_WEIGHT,
            Self::Dislike => DISLIKE_WEIGHT,
        }
    }

    pub fn is_positive(self) -> bool {
        !matches!(self, Self::Dislike)
    }

    pub fn from_value(raw: &Value) -> Self {
        if let Some(code) = raw.as_i64() {
            return Self::from(code);
        }
        match raw.as_f64() {
            Some(code) if code.fract() == 0.0 => Self::from(code as i64),
            _ => Self::Dislike,
        }
    }
}

impl<'de> Deserialize<'de> for SwipeDecision {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(|raw| Self::from_value(&raw))
    }
}

impl From<i64> for SwipeDecision {
    fn from(raw: i64) -> Self {
        match raw {
            1 => Self::Like,
            2 => Self::Superlike,
            _ => Self::Dislike,
        }
    }
}

impl From<SwipeDecision> for i64 {
    fn from(decision: SwipeDecision) -> Self {
        match decision {
            SwipeDecision::Dislike => 0,
            SwipeDecision::Like => 1,
            SwipeDecision::Superlike => 2,
        }
    }
}

/// One entry of the swipe log: `user_id` swiped `decision` on `target_user_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwipeRecord {
    pub user_id: UserId,
    pub target_user_id: UserId,
    pub decision: SwipeDecision,
    pub timestamp: DateTime<Utc>,
}

impl SwipeRecord {
    /// Creates a record stamped with the current time.
    pub fn now(user_id: UserId, target_user_id: UserId, decision: SwipeDecision) -> Self {
        Self {
            user_id,
            target_user_id,
            decision,
            timestamp: Utc::now(),
        }
    }
}

/// A history item fed to the engine. Histories are ordered oldest to newest.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SwipeEvent {
    #[serde(
        default,
        alias = "target_user_id",
        deserialize_with = "deserialize_lenient_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub target_id: Option<UserId>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<Profile>,

    #[serde(default)]
    pub decision: SwipeDecision,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

impl SwipeEvent {
    pub fn new(profile: Profile, decision: SwipeDecision) -> Self {
        Self {
            target_id: profile.id().cloned(),
            profile: Some(profile),
            decision,
            timestamp: None,
        }
    }

    /// The swiped target: the explicit id, else the target profile's id.
    pub fn target_key(&self) -> Option<&UserId> {
        self.target_id
            .as_ref()
            .or_else(|| self.profile.as_ref().and_then(Profile::id))
    }
}
