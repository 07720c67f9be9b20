//! Durable read/dismissed flags keyed by event ID.
//!
//! The store keeps two sets behind a string-keyed storage collaborator:
//! the read set and the dismissed set, each encoded as a JSON array of event IDs.
//! Storage failures never surface to callers: reads degrade to an empty set and
//! writes become no-ops, both with a logged warning.

use std::collections::{BTreeSet, HashMap, HashSet};

use serde::Serialize;
use thiserror::Error;

use crate::types::EventId;

/// Storage key holding the read set.
pub const READ_IDS_KEY: &str = "notifications.read_ids";

/// Storage key holding the dismissed set.
pub const DISMISSED_IDS_KEY: &str = "notifications.dismissed_ids";

/// Errors reported by a storage collaborator.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The backend could not be read or written.
    #[error("storage backend error: {0}")]
    Backend(String),
    /// The backend refused the write because it is full.
    #[error("storage quota exceeded")]
    QuotaExceeded,
}

/// String-keyed durable storage.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}

/// In-process storage, used in tests and when no database is configured.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.entries.remove(key);
        Ok(())
    }
}

/// Notification lifecycle of a single event.
///
/// `FreshUnread → Read → Dismissed`, or `FreshUnread → Dismissed` directly via
/// bulk dismissal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationState {
    FreshUnread,
    Read,
    Dismissed,
}

/// Both sets loaded once, for annotating many events.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReadSnapshot {
    read: HashSet<String>,
    dismissed: HashSet<String>,
}

impl ReadSnapshot {
    /// Read or dismissed.
    pub fn is_read(&self, id: &EventId) -> bool {
        self.read.contains(id.as_str()) || self.dismissed.contains(id.as_str())
    }

    pub fn state_of(&self, id: &EventId) -> NotificationState {
        if self.dismissed.contains(id.as_str()) {
            NotificationState::Dismissed
        } else if self.read.contains(id.as_str()) {
            NotificationState::Read
        } else {
            NotificationState::FreshUnread
        }
    }

    pub fn read_count(&self) -> usize {
        self.read.len()
    }

    pub fn dismissed_count(&self) -> usize {
        self.dismissed.len()
    }
}

/// Read/dismissed state over a [`KeyValueStore`].
///
/// Every mutation is a read-modify-write of one key; callers that share the
/// store across threads must serialize access to it.
#[derive(Debug)]
pub struct ReadStateStore<S> {
    storage: S,
}

impl<S: KeyValueStore> ReadStateStore<S> {
    pub const fn new(storage: S) -> Self {
        Self { storage }
    }

    pub const fn storage(&self) -> &S {
        &self.storage
    }

    /// Adds `id` to the read set. Idempotent.
    pub fn mark_read(&mut self, id: &EventId) {
        let mut read = self.load(READ_IDS_KEY);
        if read.insert(id.as_str().to_string()) {
            self.save(READ_IDS_KEY, &read);
        }
    }

    /// True when `id` is in the read set or the dismissed set.
    pub fn is_read(&self, id: &EventId) -> bool {
        self.load(DISMISSED_IDS_KEY).contains(id.as_str())
            || self.load(READ_IDS_KEY).contains(id.as_str())
    }

    /// Adds every ID to the dismissed set and clears the read set.
    ///
    /// Returns how many IDs were not already dismissed. The read set is only
    /// cleared once the dismissed set is stored, so a failed write never
    /// turns a read event back to unread.
    pub fn dismiss_all<'a, I>(&mut self, ids: I) -> usize
    where
        I: IntoIterator<Item = &'a EventId>,
    {
        let mut dismissed = self.load(DISMISSED_IDS_KEY);
        let before = dismissed.len();
        dismissed.extend(ids.into_iter().map(|id| id.as_str().to_string()));
        let newly_dismissed = dismissed.len() - before;
        if newly_dismissed > 0 && !self.save(DISMISSED_IDS_KEY, &dismissed) {
            return 0;
        }
        self.clear(READ_IDS_KEY);
        tracing::debug!(newly_dismissed, "dismissed notifications");
        newly_dismissed
    }

    /// Clears both sets.
    pub fn reset(&mut self) {
        self.clear(READ_IDS_KEY);
        self.clear(DISMISSED_IDS_KEY);
        tracing::info!("notification state reset");
    }

    /// Loads both sets for bulk lookups.
    pub fn snapshot(&self) -> ReadSnapshot {
        ReadSnapshot {
            read: self.load(READ_IDS_KEY).into_iter().collect(),
            dismissed: self.load(DISMISSED_IDS_KEY).into_iter().collect(),
        }
    }

    fn load(&self, key: &str) -> BTreeSet<String> {
        let raw = match self.storage.get(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return BTreeSet::new(),
            Err(e) => {
                tracing::warn!(key, error = %e, "failed to read notification state, treating as empty");
                return BTreeSet::new();
            }
        };
        serde_json::from_str::<Vec<String>>(&raw).map_or_else(
            |e| {
                tracing::warn!(key, error = %e, "corrupted notification state, treating as empty");
                BTreeSet::new()
            },
            |ids| ids.into_iter().collect(),
        )
    }

    /// Writes `ids` under `key`, returning whether it was stored.
    fn save(&mut self, key: &str, ids: &BTreeSet<String>) -> bool {
        let encoded = match serde_json::to_string(ids) {
            Ok(encoded) => encoded,
            Err(e) => {
                tracing::warn!(key, error = %e, "failed to encode notification state");
                return false;
            }
        };
        match self.storage.set(key, &encoded) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(key, error = %e, "failed to persist notification state");
                false
            }
        }
    }

    fn clear(&mut self, key: &str) {
        if let Err(e) = self.storage.remove(key) {
            tracing::warn!(key, error = %e, "failed to clear notification state");
        }
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn id(s: &str) -> EventId {
        EventId::new(s).unwrap()
    }

    /// Storage that fails every call.
    struct BrokenStore;

    impl KeyValueStore for BrokenStore {
        fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Err(StorageError::Backend("disk on fire".into()))
        }

        fn set(&mut self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::QuotaExceeded)
        }

        fn remove(&mut self, _key: &str) -> Result<(), StorageError> {
            Err(StorageError::Backend("disk on fire".into()))
        }
    }

    /// Storage that keeps what it has but refuses new writes.
    #[derive(Default)]
    struct FullStore {
        inner: MemoryStore,
        full: bool,
    }

    impl KeyValueStore for FullStore {
        fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
            self.inner.get(key)
        }

        fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
            if self.full {
                return Err(StorageError::QuotaExceeded);
            }
            self.inner.set(key, value)
        }

        fn remove(&mut self, key: &str) -> Result<(), StorageError> {
            self.inner.remove(key)
        }
    }

    #[test]
    fn mark_read_is_idempotent() {
        let mut store = ReadStateStore::new(MemoryStore::default());
        store.mark_read(&id("location:1"));
        let once = store.storage().get(READ_IDS_KEY).unwrap();
        store.mark_read(&id("location:1"));
        let twice = store.storage().get(READ_IDS_KEY).unwrap();
        assert_eq!(once, twice);
        assert_eq!(twice.as_deref(), Some(r#"["location:1"]"#));
        assert!(store.is_read(&id("location:1")));
        assert!(!store.is_read(&id("location:2")));
    }

    #[test]
    fn dismiss_all_marks_read_and_clears_read_set() {
        let mut store = ReadStateStore::new(MemoryStore::default());
        store.mark_read(&id("status:1"));
        let ids = [id("status:1"), id("status:2")];
        assert_eq!(store.dismiss_all(&ids), 2);
        assert_eq!(store.dismiss_all(&ids), 0);

        assert!(ids.iter().all(|i| store.is_read(i)));
        let snapshot = store.snapshot();
        assert_eq!(snapshot.read_count(), 0);
        assert_eq!(snapshot.dismissed_count(), 2);
        assert_eq!(
            snapshot.state_of(&id("status:1")),
            NotificationState::Dismissed
        );
    }

    #[test]
    fn failed_dismiss_keeps_read_flags() {
        let mut store = ReadStateStore::new(FullStore::default());
        let event = id("location:1");
        store.mark_read(&event);
        store.storage.full = true;

        assert_eq!(store.dismiss_all([&event, &id("location:2")]), 0);
        assert!(store.is_read(&event));
        assert_eq!(store.snapshot().state_of(&event), NotificationState::Read);
    }

    #[test]
    fn state_machine_transitions() {
        let mut store = ReadStateStore::new(MemoryStore::default());
        let event = id("shipment:7");
        assert_eq!(
            store.snapshot().state_of(&event),
            NotificationState::FreshUnread
        );
        store.mark_read(&event);
        assert_eq!(store.snapshot().state_of(&event), NotificationState::Read);
        store.dismiss_all([&event]);
        assert_eq!(
            store.snapshot().state_of(&event),
            NotificationState::Dismissed
        );
    }

    #[test]
    fn reset_clears_everything() {
        let mut store = ReadStateStore::new(MemoryStore::default());
        store.mark_read(&id("a:1"));
        store.dismiss_all([&id("a:2")]);
        store.reset();
        assert_eq!(store.snapshot(), ReadSnapshot::default());
    }

    #[test]
    fn corrupted_state_reads_as_empty() {
        let mut storage = MemoryStore::default();
        storage.set(READ_IDS_KEY, "{not json").unwrap();
        let mut store = ReadStateStore::new(storage);
        assert!(!store.is_read(&id("a:1")));
        store.mark_read(&id("a:1"));
        assert!(store.is_read(&id("a:1")));
    }

    #[test]
    fn storage_failures_degrade_without_panicking() {
        let mut store = ReadStateStore::new(BrokenStore);
        store.mark_read(&id("a:1"));
        store.dismiss_all([&id("a:1")]);
        store.reset();
        assert!(!store.is_read(&id("a:1")));
        assert_eq!(store.snapshot(), ReadSnapshot::default());
    }

    proptest! {
        #[test]
        fn dismissed_set_only_grows(batches in proptest::collection::vec(
            proptest::collection::vec("[a-z]{1,4}:[0-9]{1,3}", 0..5), 0..6)
        ) {
            let mut store = ReadStateStore::new(MemoryStore::default());
            let mut previous = 0;
            for batch in batches {
                let ids: Vec<EventId> = batch.iter().map(|s| id(s)).collect();
                if let Some(first) = ids.first() {
                    store.mark_read(first);
                }
                store.dismiss_all(&ids);
                let snapshot = store.snapshot();
                prop_assert!(snapshot.dismissed_count() >= previous);
                prop_assert_eq!(snapshot.read_count(), 0);
                previous = snapshot.dismissed_count();
            }
        }
    }
}
