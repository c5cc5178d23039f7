//! Best-effort mirroring of the transcript and lifecycle snapshot.

use std::cell::RefCell;
use std::collections::HashMap;

use log::{debug, warn};
use todsim_types::{messages_key, state_key, SessionSnapshot, Turn};

use crate::error::StoreError;
use crate::ports::KeyValueStore;

/// In-process store, used by tests and when no persistent backend exists
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RefCell<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    pub fn insert(&self, key: &str, value: &str) {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn save(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.insert(key, value);
        Ok(())
    }

    fn load(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.get(key))
    }
}

/// Typed, failure-swallowing layer over a [`KeyValueStore`]
pub struct Persistence<S> {
    store: S,
}

impl<S: KeyValueStore> Persistence<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn save_transcript(&self, session_id: &str, turns: &[Turn]) {
        self.save_json(&messages_key(session_id), &turns);
    }

    pub fn save_snapshot(&self, snapshot: &SessionSnapshot) {
        self.save_json(&state_key(&snapshot.session_id), snapshot);
    }

    /// Stored transcript; empty when absent or unreadable
    pub fn load_transcript(&self, session_id: &str) -> Vec<Turn> {
        self.load_json(&messages_key(session_id)).unwrap_or_default()
    }

    pub fn load_snapshot(&self, session_id: &str) -> Option<SessionSnapshot> {
        self.load_json(&state_key(session_id))
    }

    fn save_json<T: serde::Serialize + ?Sized>(&self, key: &str, value: &T) {
        let json = match serde_json::to_string(value) {
            Ok(json) => json,
            Err(e) => {
                warn!("Failed to serialize '{}': {}", key, e);
                return;
            }
        };
        match self.store.save(key, &json) {
            Ok(()) => debug!("Persisted '{}' ({} bytes)", key, json.len()),
            Err(e) => warn!("Persistence skipped: {}", e),
        }
    }

    fn load_json<T: serde::de::DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = match self.store.load(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                warn!("Failed to read '{}': {}", key, e);
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                let err = StoreError::Corrupt {
                    key: key.to_string(),
                    reason: e.to_string(),
                };
                warn!("Ignoring stored data: {}", err);
                None
            }
        }
    }
}
