//! Platform storage adapters.

#[cfg(feature = "kv-store")]
mod key_value;

#[cfg(feature = "kv-store")]
pub use key_value::{JsonFileSlot, KeyValueSlot, KeyValueStore, MemorySlot, STORAGE_KEY};

#[cfg(feature = "sqlite-store")]
mod sqlite;

#[cfg(feature = "sqlite-store")]
pub use sqlite::SqliteStore;
