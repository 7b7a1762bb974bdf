//! API key persistence abstract Trait

use async_trait::async_trait;

use crate::error::CoreResult;
use crate::types::{ApiKey, NewApiKey};

/// API key storage backend Trait
///
/// Platform implementation:
/// - Native: `SqliteStore` (`SeaORM`, degrades to `InMemoryApiKeyRepository`)
/// - Wasm / embedded: `KeyValueStore` (single JSON slot)
///
/// Every implementation returns results ordered by `updated_at` descending,
/// newest `id` first on ties.
#[async_trait]
pub trait ApiKeyRepository: Send + Sync {
    /// Prepare the store for use.
    ///
    /// Idempotent. On error the store must not be left half-initialized.
    async fn initialize(&self) -> CoreResult<()>;

    /// Persist a new record and return its assigned ID
    ///
    /// # Arguments
    /// * `new_key` - Record fields; `name` and `key` must be non-empty
    async fn insert(&self, new_key: &NewApiKey) -> CoreResult<i64>;

    /// Case-insensitive substring search over name, organization and description
    ///
    /// SQLite `LIKE` folds ASCII letters only, so on the relational backend
    /// `"ÉCOLE"` does not match `"école"`; the in-memory and key-value backends
    /// compare Unicode-lowercased text.
    ///
    /// # Arguments
    /// * `query` - Search text; an empty string matches every record
    async fn search(&self, query: &str) -> CoreResult<Vec<ApiKey>>;

    /// Get all records
    async fn find_all(&self) -> CoreResult<Vec<ApiKey>>;

    /// Short label used in logs
    fn backend_name(&self) -> &'static str;
}
