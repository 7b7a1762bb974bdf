//! Named-slot key-value documents.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use keyvault_core::error::{CoreError, CoreResult};
use serde_json::{Map, Value};

const MAX_STORE_FILE_SIZE: u64 = 10 * 1024 * 1024; // 10MB

/// A synchronous store of JSON values addressed by slot name.
pub trait KeyValueSlot: Send + Sync {
    /// Read a slot; `None` if it was never written.
    fn get(&self, key: &str) -> CoreResult<Option<Value>>;

    /// Replace a slot's value.
    fn set(&self, key: &str, value: Value) -> CoreResult<()>;
}

impl<T: KeyValueSlot + ?Sized> KeyValueSlot for Arc<T> {
    fn get(&self, key: &str) -> CoreResult<Option<Value>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: Value) -> CoreResult<()> {
        (**self).set(key, value)
    }
}

/// JSON document on disk, one top-level property per slot.
///
/// Same layout as a desktop app "store" file:
/// ```json
/// { "api_keys_storage": [ ... ] }
/// ```
/// Writes replace the whole document through a temporary file, leaving other
/// slots untouched. Documents larger than 10MB are refused on both read and
/// write, so nothing is written that could not be loaded again.
pub struct JsonFileSlot {
    path: PathBuf,
}

impl JsonFileSlot {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_document(&self) -> CoreResult<Option<Map<String, Value>>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let metadata = std::fs::metadata(&self.path).map_err(|e| {
            CoreError::StorageError(format!("Failed to read store file metadata: {e}"))
        })?;
        if metadata.len() > MAX_STORE_FILE_SIZE {
            return Err(CoreError::StorageError(format!(
                "Store file too large: {} bytes (max: {} bytes)",
                metadata.len(),
                MAX_STORE_FILE_SIZE
            )));
        }

        let content = std::fs::read_to_string(&self.path)
            .map_err(|e| CoreError::StorageError(format!("Failed to read store file: {e}")))?;
        if content.trim().is_empty() {
            return Ok(None);
        }

        serde_json::from_str(&content)
            .map(Some)
            .map_err(|e| CoreError::SerializationError(format!("Invalid store format: {e}")))
    }

    fn backup_path(&self) -> PathBuf {
        self.path.with_extension("json.bak")
    }

    fn back_up(&self) -> CoreResult<()> {
        std::fs::copy(&self.path, self.backup_path())
            .map(|_| ())
            .map_err(|e| CoreError::StorageError(format!("Failed to back up store file: {e}")))
    }

    fn write_document(&self, document: &Map<String, Value>) -> CoreResult<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| CoreError::StorageError(format!("Failed to create directory: {e}")))?;
        }

        let content = serde_json::to_string_pretty(document)
            .map_err(|e| CoreError::SerializationError(e.to_string()))?;
        if content.len() as u64 > MAX_STORE_FILE_SIZE {
            return Err(CoreError::StorageError(format!(
                "Store file would be too large: {} bytes (max: {} bytes)",
                content.len(),
                MAX_STORE_FILE_SIZE
            )));
        }

        let tmp_path = self.path.with_extension("json.tmp");
        std::fs::write(&tmp_path, content)
            .map_err(|e| CoreError::StorageError(format!("Failed to write store file: {e}")))?;
        std::fs::rename(&tmp_path, &self.path)
            .map_err(|e| CoreError::StorageError(format!("Failed to replace store file: {e}")))
    }
}

impl KeyValueSlot for JsonFileSlot {
    fn get(&self, key: &str) -> CoreResult<Option<Value>> {
        Ok(self
            .read_document()?
            .and_then(|mut document| document.remove(key))
            .filter(|value| !value.is_null()))
    }

    fn set(&self, key: &str, value: Value) -> CoreResult<()> {
        // Only invalid JSON is replaced, after a `.bak` copy. Other read errors abort.
        let mut document = match self.read_document() {
            Ok(document) => document.unwrap_or_default(),
            Err(CoreError::SerializationError(e)) => {
                self.back_up()?;
                log::warn!("Replacing corrupt store file {}: {e}", self.path.display());
                Map::new()
            }
            Err(e) => return Err(e),
        };
        document.insert(key.to_string(), value);
        self.write_document(&document)
    }
}

/// Process-local slots; nothing survives the process.
#[derive(Default)]
pub struct MemorySlot {
    slots: Mutex<HashMap<String, Value>>,
}

impl MemorySlot {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> CoreResult<std::sync::MutexGuard<'_, HashMap<String, Value>>> {
        self.slots
            .lock()
            .map_err(|e| CoreError::StorageError(format!("Slot lock poisoned: {e}")))
    }
}

impl KeyValueSlot for MemorySlot {
    fn get(&self, key: &str) -> CoreResult<Option<Value>> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: Value) -> CoreResult<()> {
        self.lock()?.insert(key.to_string(), value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use serde_json::json;

    #[test]
    fn missing_file_reads_as_empty() {
        let tmp = tempfile::tempdir().unwrap();
        let slot = JsonFileSlot::new(tmp.path().join("store.json"));
        assert!(slot.get("anything").unwrap().is_none());
    }

    #[test]
    fn set_preserves_other_slots() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("nested").join("store.json");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, r#"{"theme": "dark"}"#).unwrap();

        let slot = JsonFileSlot::new(&path);
        slot.set("api_keys_storage", json!([])).unwrap();

        assert_eq!(slot.get("theme").unwrap(), Some(json!("dark")));
        assert_eq!(slot.get("api_keys_storage").unwrap(), Some(json!([])));
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn corrupt_file_errors_on_read_and_is_replaced_on_write() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("store.json");
        std::fs::write(&path, "{not json").unwrap();

        let slot = JsonFileSlot::new(&path);
        assert!(matches!(
            slot.get("api_keys_storage"),
            Err(CoreError::SerializationError(_))
        ));

        slot.set("api_keys_storage", json!([1])).unwrap();
        assert_eq!(slot.get("api_keys_storage").unwrap(), Some(json!([1])));
        assert_eq!(
            std::fs::read_to_string(path.with_extension("json.bak")).unwrap(),
            "{not json"
        );
    }

    #[test]
    fn oversized_write_is_refused_and_file_kept() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("store.json");
        let slot = JsonFileSlot::new(&path);
        slot.set("theme", json!("dark")).unwrap();

        let huge = "x".repeat(usize::try_from(MAX_STORE_FILE_SIZE).unwrap() + 1);
        let err = slot.set("api_keys_storage", json!(huge)).unwrap_err();
        assert!(matches!(err, CoreError::StorageError(_)));

        assert_eq!(slot.get("theme").unwrap(), Some(json!("dark")));
        assert!(slot.get("api_keys_storage").unwrap().is_none());
    }

    #[test]
    fn oversized_file_blocks_writes_instead_of_replacing_it() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("store.json");
        let huge = "x".repeat(usize::try_from(MAX_STORE_FILE_SIZE).unwrap() + 1);
        std::fs::write(&path, format!(r#"{{"blob": "{huge}"}}"#)).unwrap();
        let before = std::fs::metadata(&path).unwrap().len();

        let slot = JsonFileSlot::new(&path);
        assert!(matches!(slot.get("blob"), Err(CoreError::StorageError(_))));
        assert!(matches!(
            slot.set("api_keys_storage", json!([])),
            Err(CoreError::StorageError(_))
        ));
        assert_eq!(std::fs::metadata(&path).unwrap().len(), before);
        assert!(!path.with_extension("json.bak").exists());
    }

    #[test]
    fn memory_slot_round_trips() {
        let slot = MemorySlot::new();
        assert!(slot.get("k").unwrap().is_none());
        slot.set("k", json!({"a": 1})).unwrap();
        assert_eq!(slot.get("k").unwrap(), Some(json!({"a": 1})));
    }
}
