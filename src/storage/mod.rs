//! Durable per-user state.
//!
//! Two logical tables, both keyed by user id:
//!
//! - `field_weights[user_id] -> {field_name: weight}`
//! - `swipe_cache[user_id] -> set<target_id>`
//!
//! [`PreferenceStore`] is the seam; [`FileStore`] is the durable implementation.

pub mod error;
pub mod file;
#[cfg(any(test, feature = "mock"))]
pub mod memory;
pub mod model;
mod store;


pub use error::{StorageError, StorageResult};
pub use file::FileStore;
#[cfg(any(test, feature = "mock"))]
pub use memory::MemoryStore;
pub use model::{RECORD_VERSION, StoreSnapshot, SwipeCacheRecord, UserRecord, WeightsRecord};
pub use store::PreferenceStore;
