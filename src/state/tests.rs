use super::*;
use crate::learning::{Exemplar, Exemplars, FieldWeights};
use crate::storage::{MemoryStore, StoreSnapshot, UserRecord};
use crate::vectorize::Field;
use std::collections::BTreeSet;
use std::sync::mpsc;
use std::time::Duration;

fn uid(raw: &str) -> UserId {
    UserId::parse(raw).unwrap()
}

fn positive_exemplars() -> Exemplars {
    let mut exemplars = Exemplars::new();
    exemplars.push(
        Field::Skills,
        Exemplar {
            embedding: vec![1.0, 0.0],
            weight: 1.0,
        },
    );
    exemplars
}

/// Store whose swipe-cache writes block until the gate is opened.
struct GatedStore {
    inner: MemoryStore,
    gate: parking_lot::Mutex<mpsc::Receiver<()>>,
}

impl PreferenceStore for GatedStore {
    fn load_all(&self) -> StorageResult<StoreSnapshot> {
        self.inner.load_all()
    }

    fn load_user(&self, user_id: &UserId) -> StorageResult<UserRecord> {
        self.inner.load_user(user_id)
    }

    fn upsert_weights(&self, user_id: &UserId, weights: &FieldWeights) -> StorageResult<()> {
        self.inner.upsert_weights(user_id, weights)
    }

    fn upsert_swipe_cache(
        &self,
        user_id: &UserId,
        swiped: &BTreeSet<UserId>,
    ) -> StorageResult<()> {
        self.gate
            .lock()
            .recv_timeout(Duration::from_secs(5))
            .map_err(|_| StorageError::WriteFailed("gate never opened".to_string()))?;
        self.inner.upsert_swipe_cache(user_id, swiped)
    }

    fn flush(&self) -> StorageResult<()> {
        self.inner.flush()
    }
}

#[tokio::test]
async fn test_open_seeds_from_store() {
    let store = MemoryStore::new();
    store.insert(
        uid("u1"),
        UserRecord {
            weights: None,
            swiped: [uid("a"), uid("b")].into_iter().collect(),
        },
    );

    let table = StateTable::open(store);
    assert_eq!(table.len(), 1);

    let session = table.lock(&uid("u1")).await;
    assert_eq!(session.swiped_ids().len(), 2);
    assert!(session.has_swiped(&uid("a")));
    assert!(!session.has_learned_weights());
    assert_eq!(session.field_weights(), FieldWeights::base());
}

#[tokio::test]
async fn test_failed_startup_load_falls_back_to_lazy_load() {
    let store = MemoryStore::new();
    store.insert(
        uid("u1"),
        UserRecord {
            weights: None,
            swiped: [uid("a")].into_iter().collect(),
        },
    );
    store.set_fail_loads(true);

    let table = StateTable::open(store.clone());
    assert!(table.is_empty());

    store.set_fail_loads(false);
    let session = table.lock(&uid("u1")).await;
    assert!(session.has_swiped(&uid("a")));
}

#[tokio::test]
async fn test_failed_user_load_never_shrinks_durable_swipes() {
    let store = MemoryStore::new();
    let user = uid("u1");
    store.insert(
        user.clone(),
        UserRecord {
            weights: None,
            swiped: [uid("a"), uid("b")].into_iter().collect(),
        },
    );
    store.set_fail_loads(true);
    let table = StateTable::open(store.clone());

    {
        let mut session = table.lock(&user).await;
        assert!(!session.is_loaded());
        assert_eq!(session.observe([&uid("c")]).await, 1);
        session.update_weights(&positive_exemplars()).await;
    }
    assert_eq!(store.swipe_writes(), 0, "no write-through before the user loads");
    assert_eq!(store.weight_writes(), 0);
    assert_eq!(store.record(&user).unwrap().swiped.len(), 2);

    store.set_fail_loads(false);
    let session = table.lock(&user).await;
    assert!(session.is_loaded());
    for id in ["a", "b", "c"] {
        assert!(session.has_swiped(&uid(id)), "missing {id}");
    }

    let durable = store.record(&user).unwrap();
    let expected: BTreeSet<UserId> = [uid("a"), uid("b"), uid("c")].into_iter().collect();
    assert_eq!(durable.swiped, expected);
    assert!(durable.weights.is_some(), "deferred weights written once loaded");
}

#[tokio::test]
async fn test_stored_weights_win_over_deferred_ones() {
    let store = MemoryStore::new();
    let user = uid("u1");
    let stored = FieldWeights::base().adapt(&positive_exemplars());
    store.insert(
        user.clone(),
        UserRecord {
            weights: Some(stored.clone()),
            swiped: BTreeSet::new(),
        },
    );
    store.set_fail_loads(true);
    let table = StateTable::open(store.clone());

    {
        let mut session = table.lock(&user).await;
        session.update_weights(&positive_exemplars()).await;
    }

    store.set_fail_loads(false);
    let session = table.lock(&user).await;
    assert_eq!(session.field_weights(), stored);
    assert_eq!(store.weight_writes(), 0);
}

#[tokio::test]
async fn test_observe_counts_new_ids_and_writes_through() {
    let store = MemoryStore::new();
    let table = StateTable::open(store.clone());
    let user = uid("u1");

    {
        let mut session = table.lock(&user).await;
        assert_eq!(session.observe([&uid("a"), &uid("b")]).await, 2);
        assert_eq!(session.observe([&uid("a")]).await, 0);
        assert_eq!(session.observe([&uid("b"), &uid("c")]).await, 1);
    }

    assert_eq!(store.swipe_writes(), 2, "repeat-only observe does not write");
    assert_eq!(store.record(&user).unwrap().swiped.len(), 3);
}

#[tokio::test]
async fn test_observe_keeps_memory_state_when_persist_fails() {
    let store = MemoryStore::new();
    let table = StateTable::open(store.clone());
    store.set_fail_writes(true);

    {
        let mut session = table.lock(&uid("u1")).await;
        assert_eq!(session.observe([&uid("a")]).await, 1);
    }

    let session = table.lock(&uid("u1")).await;
    assert!(session.has_swiped(&uid("a")));
    assert!(store.record(&uid("u1")).is_none());
}

#[tokio::test]
async fn test_update_weights_without_signal_is_noop() {
    let store = MemoryStore::new();
    let table = StateTable::open(store.clone());

    let mut session = table.lock(&uid("u1")).await;
    let weights = session.update_weights(&Exemplars::new()).await;

    assert_eq!(weights, FieldWeights::base());
    assert!(!session.has_learned_weights());
    assert_eq!(store.weight_writes(), 0);
}

#[tokio::test]
async fn test_update_weights_adapts_and_persists() {
    let store = MemoryStore::new();
    let table = StateTable::open(store.clone());
    let user = uid("u1");

    let updated = {
        let mut session = table.lock(&user).await;
        session.update_weights(&positive_exemplars()).await
    };

    assert!(updated.get(Field::Skills) > FieldWeights::base().get(Field::Skills));
    assert!(updated.validate().is_ok());
    assert_eq!(store.weight_writes(), 1);
    assert_eq!(store.record(&user).unwrap().weights, Some(updated.clone()));

    let session = table.lock(&user).await;
    assert_eq!(session.field_weights(), updated);
}

#[tokio::test]
async fn test_same_user_is_serialized() {
    let table = Arc::new(StateTable::open(MemoryStore::new()));
    let user = uid("u1");

    let first = table.lock(&user).await;

    let contender = {
        let table = Arc::clone(&table);
        let user = user.clone();
        tokio::spawn(async move {
            let mut session = table.lock(&user).await;
            session.observe([&uid("late")]).await
        })
    };

    tokio::time::sleep(Duration::from_millis(20)).await;
    assert!(!contender.is_finished(), "second lock waits for the first");
    assert!(!first.has_swiped(&uid("late")));

    drop(first);
    assert_eq!(contender.await.unwrap(), 1);
}

#[tokio::test]
async fn test_different_users_do_not_block() {
    let table = StateTable::open(MemoryStore::new());

    let _held = table.lock(&uid("u1")).await;
    let other = tokio::time::timeout(Duration::from_secs(1), table.lock(&uid("u2"))).await;

    assert!(other.is_ok());
    assert_eq!(table.len(), 2);
}

#[tokio::test]
async fn test_store_writes_run_off_the_runtime_thread() {
    let (open_gate, gate) = mpsc::channel();
    let table = StateTable::open(GatedStore {
        inner: MemoryStore::new(),
        gate: parking_lot::Mutex::new(gate),
    });

    let writer = async {
        let mut session = table.lock(&uid("u1")).await;
        session.observe([&uid("a")]).await
    };
    let opener = async {
        tokio::task::yield_now().await;
        open_gate.send(()).unwrap();
    };

    let (added, ()) = tokio::join!(writer, opener);

    assert_eq!(added, 1);
    assert_eq!(table.store().inner.swipe_writes(), 1);
}
