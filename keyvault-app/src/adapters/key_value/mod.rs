//! Key-value API key store.
//!
//! The whole collection is one JSON array in a single slot. It is loaded once
//! at construction; afterwards memory is the source of truth and every insert
//! rewrites the slot before returning.

mod slot;

pub use slot::{JsonFileSlot, KeyValueSlot, MemorySlot};

use std::path::Path;

use async_trait::async_trait;
use tokio::sync::RwLock;

use keyvault_core::error::{CoreError, CoreResult};
use keyvault_core::traits::ApiKeyRepository;
use keyvault_core::types::{ApiKey, NewApiKey};
use keyvault_core::utils::{datetime, matches_query, sort_newest_first};

/// Slot holding the serialized collection.
pub const STORAGE_KEY: &str = "api_keys_storage";

struct State {
    keys: Vec<ApiKey>,
    /// Highest id handed out so far; seeded from the loaded records.
    last_id: i64,
}

/// API key store over a `KeyValueSlot`.
pub struct KeyValueStore<S: KeyValueSlot> {
    slot: S,
    state: RwLock<State>,
}

impl KeyValueStore<JsonFileSlot> {
    /// Open a store backed by the JSON document at `path`.
    pub fn open(path: &Path) -> Self {
        let store = Self::new(JsonFileSlot::new(path));
        log::info!("Opened key-value API key store at {}", store.slot.path().display());
        store
    }
}

impl<S: KeyValueSlot> KeyValueStore<S> {
    /// Load whatever the slot holds. Never fails: unreadable data starts an empty store.
    pub fn new(slot: S) -> Self {
        let keys = Self::load(&slot);
        let last_id = keys.iter().map(|k| k.id).max().unwrap_or(0);

        Self {
            slot,
            state: RwLock::new(State { keys, last_id }),
        }
    }

    fn load(slot: &S) -> Vec<ApiKey> {
        let value = match slot.get(STORAGE_KEY) {
            Ok(Some(value)) => value,
            Ok(None) => return Vec::new(),
            Err(e) => {
                log::error!("Error loading API keys from store: {e}");
                return Vec::new();
            }
        };

        match serde_json::from_value::<Vec<ApiKey>>(value) {
            Ok(keys) => {
                log::info!("Loaded {} API keys from store", keys.len());
                keys
            }
            Err(e) => {
                log::error!("Discarding unreadable API key data: {e}");
                Vec::new()
            }
        }
    }

    fn persist(&self, keys: &[ApiKey]) -> CoreResult<()> {
        let value =
            serde_json::to_value(keys).map_err(|e| CoreError::SerializationError(e.to_string()))?;
        self.slot.set(STORAGE_KEY, value)
    }
}

#[async_trait]
impl<S: KeyValueSlot + 'static> ApiKeyRepository for KeyValueStore<S> {
    async fn initialize(&self) -> CoreResult<()> {
        Ok(())
    }

    async fn insert(&self, new_key: &NewApiKey) -> CoreResult<i64> {
        new_key.validate()?;

        let mut state = self.state.write().await;
        let id = state.last_id + 1;
        state
            .keys
            .push(ApiKey::from_new(id, new_key, datetime::now()));

        if let Err(e) = self.persist(&state.keys) {
            state.keys.pop();
            return Err(e);
        }
        state.last_id = id;
        Ok(id)
    }

    async fn search(&self, query: &str) -> CoreResult<Vec<ApiKey>> {
        let mut found: Vec<ApiKey> = self
            .state
            .read()
            .await
            .keys
            .iter()
            .filter(|k| matches_query(k, query))
            .cloned()
            .collect();
        sort_newest_first(&mut found);
        Ok(found)
    }

    async fn find_all(&self) -> CoreResult<Vec<ApiKey>> {
        let mut all = self.state.read().await.keys.clone();
        sort_newest_first(&mut all);
        Ok(all)
    }

    fn backend_name(&self) -> &'static str {
        "key-value"
    }
}
