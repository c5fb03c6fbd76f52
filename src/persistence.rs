//! Persistence port and snapshot documents.
//!
//! DESIGN
//! ======
//! Core logic talks to a [`Storage`] key/value port and never to a concrete
//! backend. The browser build plugs in `localStorage`; the CLI uses
//! [`DirStorage`]; tests use [`MemoryStorage`]. Every snapshot is one JSON
//! document under its own key and each write replaces the previous document
//! in full.
//!
//! ERROR HANDLING
//! ==============
//! Reads never fail outward. A missing key yields `None`; an unreadable or
//! unparsable document is logged and also yields `None`, so the caller falls
//! back to defaults for that whole snapshot. Writes return `Result` and the
//! caller decides whether to log or surface the failure.

#[cfg(test)]
#[path = "persistence_test.rs"]
mod persistence_test;

use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::boxes::ChaseBox;
use crate::config::{SnapshotKey, StorageKeys};
use crate::error::StoreError;
use crate::gallery::{GalleryImages, GalleryMarks};
use crate::ledger::Ledger;
use crate::viewport::Transform;

// =============================================================================
// PORT
// =============================================================================

/// String key/value store backing all snapshots.
pub trait Storage {
    /// Read the document under `key`, or `None` when absent.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Replace the document under `key`.
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Delete the document under `key`. Deleting an absent key succeeds.
    fn remove(&mut self, key: &str) -> Result<(), StoreError>;
}

/// In-process store.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: BTreeMap<String, String>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Keys currently stored, sorted.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        self.entries.remove(key);
        Ok(())
    }
}

/// One file per key under a root directory.
#[derive(Debug, Clone)]
pub struct DirStorage {
    root: PathBuf,
}

impl DirStorage {
    /// Store under `root`. The directory is created on first write.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// File backing `key`. Path separators in the key are replaced.
    #[must_use]
    pub fn path_for(&self, key: &str) -> PathBuf {
        let file: String = key
            .chars()
            .map(|c| if matches!(c, '/' | '\\' | ':') { '_' } else { c })
            .collect();
        self.root.join(format!("{file}.json"))
    }
}

impl Storage for DirStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        match std::fs::read_to_string(self.path_for(key)) {
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        std::fs::create_dir_all(&self.root)?;
        std::fs::write(self.path_for(key), value)?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        match std::fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

// =============================================================================
// DOCUMENTS
// =============================================================================

/// Bag ledger and box list, stored together under [`SnapshotKey::Bags`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BagSnapshot {
    pub bag_count: u32,
    pub selected_numbers: Vec<u32>,
    pub chase_numbers: Vec<u32>,
    pub remaining_chases: u32,
    #[serde(default)]
    pub bag_cost: f64,
    #[serde(default)]
    pub boxes: Vec<ChaseBox>,
}

impl BagSnapshot {
    #[must_use]
    pub fn capture(ledger: &Ledger, boxes: &[ChaseBox]) -> Self {
        Self {
            bag_count: ledger.bag_count(),
            selected_numbers: ledger.selected().iter().copied().collect(),
            chase_numbers: ledger.chase_numbers().iter().copied().collect(),
            remaining_chases: ledger.remaining_chases(),
            bag_cost: ledger.bag_cost(),
            boxes: boxes.to_vec(),
        }
    }

    /// Split into a clamped ledger and the stored boxes.
    #[must_use]
    pub fn into_parts(self) -> (Ledger, Vec<ChaseBox>) {
        let ledger = Ledger::restored(
            self.bag_count,
            self.selected_numbers,
            self.chase_numbers,
            self.remaining_chases,
            self.bag_cost,
        );
        (ledger, self.boxes)
    }
}

/// Everything read from storage at startup. Each field is `None` when its
/// key was missing or unreadable.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadedState {
    pub bags: Option<BagSnapshot>,
    pub prize_image: Option<String>,
    pub prize_viewport: Option<Transform>,
    pub insurance_images: Option<GalleryImages>,
    pub insurance_marks: Option<GalleryMarks>,
}

impl LoadedState {
    /// Read every snapshot. Keys are independent: one corrupt document does
    /// not affect the others.
    pub fn load(store: &impl Storage, keys: &StorageKeys) -> Self {
        Self {
            bags: load_json(store, keys, SnapshotKey::Bags),
            prize_image: load_raw(store, keys, SnapshotKey::PrizeImage),
            prize_viewport: load_json(store, keys, SnapshotKey::PrizeViewport),
            insurance_images: load_json(store, keys, SnapshotKey::InsuranceImages),
            insurance_marks: load_json(store, keys, SnapshotKey::InsuranceMarks),
        }
    }
}

// =============================================================================
// HELPERS
// =============================================================================

/// Read the raw string under `key`. Read errors are logged and treated as absent.
pub fn load_raw(store: &impl Storage, keys: &StorageKeys, key: SnapshotKey) -> Option<String> {
    let name = keys.name(key);
    match store.get(name) {
        Ok(raw) => raw,
        Err(e) => {
            warn!(key = name, code = e.error_code(), error = %e, "snapshot read failed; using defaults");
            None
        }
    }
}

/// Read and decode the JSON document under `key`.
///
/// Missing keys yield `None` quietly; corrupt documents are logged and also
/// yield `None`.
pub fn load_json<T: DeserializeOwned>(store: &impl Storage, keys: &StorageKeys, key: SnapshotKey) -> Option<T> {
    let raw = load_raw(store, keys, key)?;
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(key = keys.name(key), error = %e, "corrupt snapshot; using defaults");
            None
        }
    }
}

/// Store a raw string under `key`.
pub fn save_raw(store: &mut impl Storage, keys: &StorageKeys, key: SnapshotKey, raw: &str) -> Result<(), StoreError> {
    store.set(keys.name(key), raw)?;
    debug!(key = keys.name(key), bytes = raw.len(), "snapshot written");
    Ok(())
}

/// Encode `value` as JSON and store it under `key`.
pub fn save_json<T: Serialize>(
    store: &mut impl Storage,
    keys: &StorageKeys,
    key: SnapshotKey,
    value: &T,
) -> Result<(), StoreError> {
    let raw = serde_json::to_string(value).map_err(|source| StoreError::Encode { key, source })?;
    save_raw(store, keys, key, &raw)
}

/// Remove every snapshot key. Stops at the first failure.
pub fn clear_all(store: &mut impl Storage, keys: &StorageKeys) -> Result<(), StoreError> {
    for key in SnapshotKey::ALL {
        store.remove(keys.name(key))?;
    }
    Ok(())
}
