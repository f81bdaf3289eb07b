//! JSON file persistence for the stock ledger.
//!
//! The file holds a single JSON object mapping item names to quantities:
//!
//! ```json
//! {
//!     "apple": 7,
//!     "banana": 2
//! }
//! ```
//!
//! Reading distinguishes a missing file from a corrupt or unreadable one so
//! callers can react differently. `load_into` tolerates all three by starting
//! from an empty ledger; `save` propagates write failures.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::Value as JsonValue;
use serde_json::ser::PrettyFormatter;
use thiserror::Error;

use stockledger_inventory::{ItemName, Quantity, StockLedger};

/// File used when no path is configured.
pub const DEFAULT_INVENTORY_FILE: &str = "inventory.json";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("inventory file not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("inventory file {} is corrupted: {reason}", path.display())]
    Corrupt { path: PathBuf, reason: String },

    #[error("failed to read inventory file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to encode inventory for {}: {source}", path.display())]
    Encode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to write inventory file {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// What `load_into` found on disk.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    Loaded { items: usize },
    Missing,
    Corrupt,
    Unreadable,
}

/// Ledger persistence backed by one JSON file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl Default for JsonFileStore {
    fn default() -> Self {
        Self::new(DEFAULT_INVENTORY_FILE)
    }
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the persisted ledger.
    ///
    /// Entries whose name or quantity fails validation are skipped with a
    /// warning; a document that is not a JSON object is `Corrupt`.
    pub fn read(&self) -> Result<StockLedger, StoreError> {
        let raw = match fs::read(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(StoreError::NotFound {
                    path: self.path.clone(),
                });
            }
            Err(source) => {
                return Err(StoreError::Read {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        // Invalid UTF-8 fails here too and reports as `Corrupt`.
        let doc: JsonValue = serde_json::from_slice(&raw).map_err(|e| self.corrupt(e.to_string()))?;
        let JsonValue::Object(entries) = doc else {
            return Err(self.corrupt("expected a JSON object of item quantities"));
        };

        let mut valid = Vec::with_capacity(entries.len());
        for (key, value) in entries {
            match (ItemName::new(key.as_str()), Quantity::from_value(&value)) {
                (Ok(name), Ok(qty)) => valid.push((name, qty)),
                (Err(e), _) | (_, Err(e)) => tracing::warn!(
                    path = %self.path.display(),
                    item = %key,
                    error = %e,
                    "skipping invalid inventory entry"
                ),
            }
        }

        Ok(valid.into_iter().collect())
    }

    /// Write the ledger as indented JSON, replacing any existing file.
    pub fn write(&self, ledger: &StockLedger) -> Result<(), StoreError> {
        let mut buf = Vec::new();
        let mut ser =
            serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
        ledger.serialize(&mut ser).map_err(|source| StoreError::Encode {
            path: self.path.clone(),
            source,
        })?;
        buf.push(b'\n');

        fs::write(&self.path, buf).map_err(|source| StoreError::Write {
            path: self.path.clone(),
            source,
        })
    }

    /// Replace `ledger` with the persisted contents.
    ///
    /// Never fails: a missing, corrupt or unreadable file leaves `ledger` empty.
    pub fn load_into(&self, ledger: &mut StockLedger) -> LoadOutcome {
        let path = self.path.display();
        match self.read() {
            Ok(loaded) => {
                *ledger = loaded;
                tracing::info!(path = %path, items = ledger.len(), "Loaded inventory from {path}");
                LoadOutcome::Loaded {
                    items: ledger.len(),
                }
            }
            Err(StoreError::NotFound { .. }) => {
                ledger.clear();
                tracing::warn!(path = %path, "No inventory file found ({path}). Starting fresh.");
                LoadOutcome::Missing
            }
            Err(err @ StoreError::Corrupt { .. }) => {
                ledger.clear();
                tracing::error!(path = %path, error = %err, "Inventory file is corrupted. Starting fresh.");
                LoadOutcome::Corrupt
            }
            Err(err) => {
                ledger.clear();
                tracing::error!(path = %path, error = %err, "Inventory file is unreadable. Starting fresh.");
                LoadOutcome::Unreadable
            }
        }
    }

    /// Persist `ledger`, propagating any write failure.
    pub fn save(&self, ledger: &StockLedger) -> Result<(), StoreError> {
        self.write(ledger)?;
        tracing::info!(path = %self.path.display(), items = ledger.len(), "Saved inventory to {}", self.path.display());
        Ok(())
    }

    fn corrupt(&self, reason: impl Into<String>) -> StoreError {
        StoreError::Corrupt {
            path: self.path.clone(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_ledger() -> StockLedger {
        let mut ledger = StockLedger::new();
        ledger.add("banana", 2.0);
        ledger.add("apple", 7.0);
        ledger
    }

    #[test]
    fn save_then_load_reproduces_ledger() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("inventory.json"));
        let ledger = sample_ledger();

        store.save(&ledger).unwrap();

        let mut loaded = StockLedger::new();
        assert_eq!(store.load_into(&mut loaded), LoadOutcome::Loaded { items: 2 });
        assert_eq!(loaded, ledger);
    }

    #[test]
    fn file_is_indented_json_object() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("inventory.json"));

        store.save(&sample_ledger()).unwrap();

        let written = fs::read_to_string(store.path()).unwrap();
        assert_eq!(written, "{\n    \"apple\": 7,\n    \"banana\": 2\n}\n");
    }

    #[test]
    fn save_overwrites_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("inventory.json"));
        fs::write(store.path(), "{\"old\": 99}").unwrap();

        store.save(&StockLedger::new()).unwrap();

        assert!(store.read().unwrap().is_empty());
    }

    #[test]
    fn missing_file_yields_empty_ledger() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("absent.json"));
        let mut ledger = sample_ledger();

        assert_eq!(store.load_into(&mut ledger), LoadOutcome::Missing);
        assert!(ledger.is_empty());
        assert!(matches!(store.read(), Err(StoreError::NotFound { .. })));
    }

    #[test]
    fn unparsable_file_yields_empty_ledger() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("inventory.json"));
        fs::write(store.path(), "{ \"apple\": 7,").unwrap();
        let mut ledger = sample_ledger();

        assert_eq!(store.load_into(&mut ledger), LoadOutcome::Corrupt);
        assert!(ledger.is_empty());
    }

    #[test]
    fn invalid_utf8_is_corrupt_not_unreadable() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("inventory.json"));
        fs::write(store.path(), [0xff, 0xfe, b'{', b'}']).unwrap();
        let mut ledger = sample_ledger();

        assert!(matches!(store.read(), Err(StoreError::Corrupt { .. })));
        assert_eq!(store.load_into(&mut ledger), LoadOutcome::Corrupt);
        assert!(ledger.is_empty());
    }

    #[test]
    fn non_object_document_is_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("inventory.json"));
        fs::write(store.path(), "[1, 2, 3]").unwrap();

        assert!(matches!(store.read(), Err(StoreError::Corrupt { .. })));
    }

    #[test]
    fn invalid_entries_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("inventory.json"));
        fs::write(
            store.path(),
            r#"{"apple": 7, "ghost": 0, "pear": "ten", "kiwi": -2, "plum": 1.5}"#,
        )
        .unwrap();

        let ledger = store.read().unwrap();
        assert_eq!(ledger.len(), 2);
        assert_eq!(ledger.quantity("apple"), 7.0);
        assert_eq!(ledger.quantity("plum"), 1.5);
    }

    #[test]
    fn unreadable_path_is_reported_separately() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path());
        let mut ledger = sample_ledger();

        assert!(matches!(store.read(), Err(StoreError::Read { .. })));
        assert_eq!(store.load_into(&mut ledger), LoadOutcome::Unreadable);
        assert!(ledger.is_empty());
    }

    #[test]
    fn write_failure_propagates() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("no-such-dir").join("inventory.json"));

        let err = store.save(&sample_ledger()).unwrap_err();
        assert!(matches!(err, StoreError::Write { .. }));
    }

    #[test]
    fn default_store_uses_default_file() {
        assert_eq!(JsonFileStore::default().path(), Path::new(DEFAULT_INVENTORY_FILE));
    }
}
