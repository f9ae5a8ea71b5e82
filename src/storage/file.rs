//! File-backed preference store (one JSON document per user per table).
//!
//! Layout under the root directory:
//!
//! ```text
//! field_weights/{hash}.json
//! swipe_cache/{hash}.json
//! ```
//!
//! `{hash}` is [`user_record_stem`] of the user id. Writes go to a temp file in
//! the same directory, are fsynced, then atomically renamed over the old
//! record, so a crash mid-write never damages an existing record.

use std::collections::BTreeSet;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use tracing::{debug, warn};

use super::error::{StorageError, StorageResult};
use super::model::{RECORD_VERSION, StoreSnapshot, SwipeCacheRecord, UserRecord, WeightsRecord};
use super::store::PreferenceStore;
use crate::hashing::user_record_stem;
use crate::learning::FieldWeights;
use crate::model::UserId;

const RECORD_EXTENSION: &str = "json";

/// Table directory for learned field weights.
pub const WEIGHTS_TABLE: &str = "field_weights";

/// Table directory for swiped-id sets.
pub const SWIPE_CACHE_TABLE: &str = "swipe_cache";

/// Durable [`PreferenceStore`] on the local filesystem.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

/// The owner field shared by every record, read without the rest.
#[derive(Deserialize)]
struct RecordOwner {
    user_id: UserId,
}

/// Implemented by both record types so loading can be shared.
trait VersionedRecord: DeserializeOwned {
    fn version(&self) -> u32;
    fn user_id(&self) -> &UserId;
}

impl VersionedRecord for WeightsRecord {
    fn version(&self) -> u32 {
        self.version
    }

    fn user_id(&self) -> &UserId {
        &self.user_id
    }
}

impl VersionedRecord for SwipeCacheRecord {
    fn version(&self) -> u32 {
        self.version
    }

    fn user_id(&self) -> &UserId {
        &self.user_id
    }
}

impl FileStore {
    /// Opens (creating if needed) a store rooted at `root`.
    pub fn open(root: impl Into<PathBuf>) -> StorageResult<Self> {
        let store = Self { root: root.into() };
        for table in [WEIGHTS_TABLE, SWIPE_CACHE_TABLE] {
            let dir = store.table_path(table);
            fs::create_dir_all(&dir).map_err(|_| StorageError::StorageUnavailable { path: dir })?;
        }
        debug!(root = %store.root.display(), "File store opened");
        Ok(store)
    }

    /// Returns the root storage directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn table_path(&self, table: &str) -> PathBuf {
        self.root.join(table)
    }

    /// Path of `user_id`'s record in `table`.
    pub fn record_path(&self, table: &str, user_id: &UserId) -> PathBuf {
        self.table_path(table).join(format!(
            "{}.{}",
            user_record_stem(user_id.as_str()),
            RECORD_EXTENSION
        ))
    }

    /// Writes `record` over `user_id`'s file in `table`.
    ///
    /// Fails with [`StorageError::ForeignRecord`] when the file already holds
    /// another user's record (a stem collision); that file is left untouched.
    fn write_record<T: Serialize>(&self, table: &str, user_id: &UserId, record: &T) -> StorageResult<()> {
        let dir = self.table_path(table);
        let final_path = self.record_path(table, user_id);

        if let Some(owner) = Self::existing_owner(&final_path)
            && &owner != user_id
        {
            warn!(table, user_id = %user_id, owner = %owner, "Record path taken by another user");
            return Err(StorageError::ForeignRecord {
                path: final_path,
                found: owner.to_string(),
            });
        }

        let mut temp = NamedTempFile::new_in(&dir)?;
        {
            let mut writer = BufWriter::new(temp.as_file_mut());
            serde_json::to_writer(&mut writer, record)?;
            writer.flush()?;
        }
        temp.as_file().sync_all()?;
        temp.persist(&final_path).map_err(|e| e.error)?;

        debug!(table, user_id = %user_id, path = %final_path.display(), "Record written");
        Ok(())
    }

    /// Owner of the record at `path`, `None` if absent or unreadable.
    fn existing_owner(path: &Path) -> Option<UserId> {
        let reader = BufReader::new(File::open(path).ok()?);
        serde_json::from_reader::<_, RecordOwner>(reader)
            .ok()
            .map(|record| record.user_id)
    }

    fn read_record<T: VersionedRecord>(path: &Path) -> StorageResult<T> {
        let reader = BufReader::new(File::open(path)?);
        let record: T = serde_json::from_reader(reader)?;

        if record.version() != RECORD_VERSION {
            return Err(StorageError::UnsupportedVersion {
                path: path.to_path_buf(),
                found: record.version(),
            });
        }

        let expected_stem = user_record_stem(record.user_id().as_str());
        if path.file_stem().and_then(|s| s.to_str()) != Some(expected_stem.as_str()) {
            return Err(StorageError::ForeignRecord {
                path: path.to_path_buf(),
                found: record.user_id().to_string(),
            });
        }

        Ok(record)
    }

    /// Reads `user_id`'s record from `table`, `None` when absent.
    fn read_user_record<T: VersionedRecord>(
        &self,
        table: &str,
        user_id: &UserId,
    ) -> StorageResult<Option<T>> {
        let path = self.record_path(table, user_id);
        if !path.exists() {
            return Ok(None);
        }

        let record: T = Self::read_record(&path)?;
        if record.user_id() != user_id {
            return Err(StorageError::ForeignRecord {
                path,
                found: record.user_id().to_string(),
            });
        }
        Ok(Some(record))
    }

    /// Lists record files in `table`.
    fn list_records(&self, table: &str) -> StorageResult<Vec<PathBuf>> {
        let dir = self.table_path(table);
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let mut paths = Vec::new();
        for entry in fs::read_dir(&dir)? {
            let path = entry?.path();
            if path.is_file()
                && let Some(ext) = path.extension()
                && ext == RECORD_EXTENSION
            {
                paths.push(path);
            }
        }
        paths.sort();
        Ok(paths)
    }

    /// Loads every record of `table`, skipping unreadable ones.
    fn load_table<T: VersionedRecord>(&self, table: &str, skipped: &mut usize) -> StorageResult<Vec<T>> {
        let mut records = Vec::new();
        for path in self.list_records(table)? {
            match Self::read_record::<T>(&path) {
                Ok(record) => records.push(record),
                Err(e) => {
                    warn!(table, path = %path.display(), error = %e, "Skipping unreadable record");
                    *skipped += 1;
                }
            }
        }
        Ok(records)
    }

    fn sync_dir(&self, table: &str) -> StorageResult<()> {
        #[cfg(unix)]
        File::open(self.table_path(table))?.sync_all()?;
        #[cfg(not(unix))]
        let _ = table;
        Ok(())
    }
}

impl PreferenceStore for FileStore {
    fn load_all(&self) -> StorageResult<StoreSnapshot> {
        let mut snapshot = StoreSnapshot::default();

        for record in self.load_table::<WeightsRecord>(WEIGHTS_TABLE, &mut snapshot.skipped)? {
            snapshot.users.entry(record.user_id).or_default().weights = Some(record.weights);
        }
        for record in
            self.load_table::<SwipeCacheRecord>(SWIPE_CACHE_TABLE, &mut snapshot.skipped)?
        {
            snapshot.users.entry(record.user_id).or_default().swiped = record.target_ids;
        }

        debug!(
            users = snapshot.len(),
            skipped = snapshot.skipped,
            "File store loaded"
        );
        Ok(snapshot)
    }

    /// Loads both tables independently: an unreadable weights record is
    /// logged and treated as absent so it never hides the swipe cache.
    fn load_user(&self, user_id: &UserId) -> StorageResult<UserRecord> {
        let weights = match self.read_user_record::<WeightsRecord>(WEIGHTS_TABLE, user_id) {
            Ok(record) => record.map(|record| record.weights),
            Err(e) if e.is_transient() => return Err(e),
            Err(e) => {
                warn!(user_id = %user_id, error = %e, "Ignoring unreadable weights record");
                None
            }
        };
        let swiped = self
            .read_user_record::<SwipeCacheRecord>(SWIPE_CACHE_TABLE, user_id)?
            .map(|record| record.target_ids)
            .unwrap_or_default();

        Ok(UserRecord { weights, swiped })
    }

    fn upsert_weights(&self, user_id: &UserId, weights: &FieldWeights) -> StorageResult<()> {
        let record = WeightsRecord::new(user_id.clone(), weights.clone());
        self.write_record(WEIGHTS_TABLE, user_id, &record)
    }

    fn upsert_swipe_cache(
        &self,
        user_id: &UserId,
        swiped: &BTreeSet<UserId>,
    ) -> StorageResult<()> {
        let record = SwipeCacheRecord::new(user_id.clone(), swiped.clone());
        self.write_record(SWIPE_CACHE_TABLE, user_id, &record)
    }

    fn flush(&self) -> StorageResult<()> {
        self.sync_dir(WEIGHTS_TABLE)?;
        self.sync_dir(SWIPE_CACHE_TABLE)?;
        Ok(())
    }
}
