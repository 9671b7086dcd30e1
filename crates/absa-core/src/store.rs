//! The single current state and its persistence.

use std::{collections::HashMap, fmt, sync::Mutex};

use absa_domain::{seed, state::AppState};
use tracing::{debug, error, info, warn};

use crate::{
    migration::{decode_state, MigrationReport},
    CoreError,
};

/// Byte store the state document is written to under a single key.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CoreError>;
    fn put(&self, key: &str, value: &[u8]) -> Result<(), CoreError>;
}

/// Process-local [`KeyValueStore`], used for tests and embedding.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(key: impl Into<String>, value: impl Into<Vec<u8>>) -> Self {
        let store = Self::new();
        if let Ok(mut entries) = store.entries.lock() {
            entries.insert(key.into(), value.into());
        }
        store
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CoreError> {
        let entries = self
            .entries
            .lock()
            .map_err(|_| CoreError::Storage("memory store lock poisoned".into()))?;
        Ok(entries.get(key).cloned())
    }

    fn put(&self, key: &str, value: &[u8]) -> Result<(), CoreError> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| CoreError::Storage("memory store lock poisoned".into()))?;
        entries.insert(key.to_string(), value.to_vec());
        Ok(())
    }
}

/// Key under which the state for `year` is persisted.
pub fn storage_key(year: i32) -> String {
    format!("finance_data_{year}")
}

/// Where the loaded state came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadSource {
    Persisted,
    /// Nothing usable was stored; the built-in dataset was used.
    Seed,
}

#[derive(Debug, Clone)]
pub struct LoadOutcome {
    pub source: LoadSource,
    pub migrations: MigrationReport,
    /// Problems encountered while reading, already recovered from.
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(&AppState) + Send>;

/// Holds the current [`AppState`] and writes it through on every commit.
pub struct Store {
    backend: Box<dyn KeyValueStore>,
    key: String,
    current: AppState,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: u64,
}

impl Store {
    /// Loads the state stored under `key`, falling back to the built-in dataset.
    ///
    /// A document that needed migration is written back immediately so the
    /// upgrade happens once.
    pub fn open(backend: Box<dyn KeyValueStore>, key: impl Into<String>) -> (Self, LoadOutcome) {
        let key = key.into();
        let (current, mut outcome) = load(backend.as_ref(), &key);
        let mut store = Self {
            backend,
            key,
            current,
            listeners: Vec::new(),
            next_subscription: 0,
        };
        if outcome.source == LoadSource::Persisted && !outcome.migrations.is_empty() {
            if let Err(err) = store.persist() {
                outcome
                    .warnings
                    .push(format!("failed to save migrated data: {err}"));
            }
        }
        (store, outcome)
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn current(&self) -> &AppState {
        &self.current
    }

    /// A cheap structurally shared copy of the current state.
    pub fn snapshot(&self) -> AppState {
        self.current.clone()
    }

    /// Replaces the current state, persists it, and notifies subscribers.
    ///
    /// The in-memory state advances even when the write fails; the failure is
    /// returned so the caller can surface it.
    pub fn commit(&mut self, next: AppState) -> Result<(), CoreError> {
        self.current = next;
        let result = self.persist();
        for (_, listener) in self.listeners.iter_mut() {
            listener(&self.current);
        }
        result
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&AppState) + Send + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(existing, _)| *existing != id);
        self.listeners.len() != before
    }

    fn persist(&self) -> Result<(), CoreError> {
        let bytes = serde_json::to_vec(&self.current)?;
        match self.backend.put(&self.key, &bytes) {
            Ok(()) => {
                debug!(key = %self.key, bytes = bytes.len(), "state persisted");
                Ok(())
            }
            Err(err) => {
                error!(key = %self.key, error = %err, "failed to persist state");
                Err(err)
            }
        }
    }
}

impl fmt::Debug for Store {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("key", &self.key)
            .field("listeners", &self.listeners.len())
            .finish_non_exhaustive()
    }
}

/// Reads and normalises the document under `key`. Never fails.
pub fn load(backend: &dyn KeyValueStore, key: &str) -> (AppState, LoadOutcome) {
    let seed_outcome = |warning: Option<String>| LoadOutcome {
        source: LoadSource::Seed,
        migrations: MigrationReport::default(),
        warnings: warning.into_iter().collect(),
    };

    let bytes = match backend.get(key) {
        Ok(Some(bytes)) => bytes,
        Ok(None) => {
            info!(key, "no saved data; starting from the built-in dataset");
            return (seed::initial_state(), seed_outcome(None));
        }
        Err(err) => {
            warn!(key, error = %err, "could not read saved data; using the built-in dataset");
            return (
                seed::initial_state(),
                seed_outcome(Some(format!("could not read saved data: {err}"))),
            );
        }
    };

    match decode_state(&bytes) {
        Ok((state, migrations)) => {
            for applied in &migrations.applied {
                info!(key, migration = %applied, "migrated saved data");
            }
            info!(key, year = state.year, students = state.student_db.len(), "loaded saved data");
            (
                state,
                LoadOutcome {
                    source: LoadSource::Persisted,
                    migrations,
                    warnings: Vec::new(),
                },
            )
        }
        Err(err) => {
            warn!(key, error = %err, "saved data is unreadable; using the built-in dataset");
            (
                seed::initial_state(),
                seed_outcome(Some(format!("saved data is unreadable: {err}"))),
            )
        }
    }
}
