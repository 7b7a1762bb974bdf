//! API key storage facade

use std::sync::Arc;

use crate::error::{CoreError, CoreResult};
use crate::traits::ApiKeyRepository;
use crate::types::{ApiKey, NewApiKey};

/// API key service
///
/// The single entry point frontends call. Holds exactly one backend, chosen
/// at startup, and forwards every operation to it.
pub struct ApiKeyService {
    repository: Arc<dyn ApiKeyRepository>,
}

impl ApiKeyService {
    /// Create a service over the given backend
    #[must_use]
    pub fn new(repository: Arc<dyn ApiKeyRepository>) -> Self {
        Self { repository }
    }

    /// Name of the active backend
    pub fn backend_name(&self) -> &'static str {
        self.repository.backend_name()
    }

    /// Prepare the backing store. Safe to call more than once.
    pub async fn initialize(&self) -> CoreResult<()> {
        self.repository
            .initialize()
            .await
            .inspect_err(|e| log_failure("initialize", e))?;
        log::info!("API key store ready ({})", self.backend_name());
        Ok(())
    }

    /// Store a new API key and return its ID.
    ///
    /// Blank optional fields are stored as absent.
    pub async fn insert(&self, new_key: NewApiKey) -> CoreResult<i64> {
        let new_key = new_key.normalized();
        new_key
            .validate()
            .inspect_err(|e| log_failure("insert", e))?;

        let id = self
            .repository
            .insert(&new_key)
            .await
            .inspect_err(|e| log_failure("insert", e))?;
        log::info!("Stored API key {id} ({})", new_key.name);
        Ok(id)
    }

    /// Search by name, organization or description.
    ///
    /// An empty query returns no results without touching the backend.
    pub async fn search(&self, query: &str) -> CoreResult<Vec<ApiKey>> {
        if query.is_empty() {
            return Ok(Vec::new());
        }

        let results = self
            .repository
            .search(query)
            .await
            .inspect_err(|e| log_failure("search", e))?;
        log::debug!("Search matched {} API keys", results.len());
        Ok(results)
    }

    /// All stored API keys, newest first
    pub async fn list_all(&self) -> CoreResult<Vec<ApiKey>> {
        self.repository
            .find_all()
            .await
            .inspect_err(|e| log_failure("list", e))
    }
}

fn log_failure(operation: &str, error: &CoreError) {
    if error.is_expected() {
        log::warn!("API key {operation} rejected: {error}");
    } else {
        log::error!("API key {operation} failed: {error}");
    }
}
