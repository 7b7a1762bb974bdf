//! Platform-agnostic application bootstrap for KeyVault.
//!
//! Provides `AppState` (service container), `AppStateBuilder` (backend selection
//! or injection), and the concrete storage adapters.

pub mod adapters;
pub mod config;

use std::sync::Arc;

use keyvault_core::error::{CoreError, CoreResult};
use keyvault_core::services::ApiKeyService;
use keyvault_core::traits::ApiKeyRepository;

pub use config::{BackendKind, StorageConfig};

/// Platform-agnostic application state.
///
/// Holds the API key service over exactly one backend. Every frontend
/// constructs this once at startup via `AppStateBuilder`.
pub struct AppState {
    /// API key service (the storage facade)
    pub api_key_service: Arc<ApiKeyService>,
}

impl AppState {
    /// Run the startup sequence: prepare the backing store.
    pub async fn run_startup(&self) -> CoreResult<()> {
        self.api_key_service.initialize().await
    }

    /// Name of the active backend
    pub fn backend_name(&self) -> &'static str {
        self.api_key_service.backend_name()
    }
}

/// Builder for constructing `AppState`.
///
/// Either a `StorageConfig` (the backend is opened from it) or an explicit
/// `repository` is required. An injected repository takes precedence.
pub struct AppStateBuilder {
    config: Option<StorageConfig>,
    repository: Option<Arc<dyn ApiKeyRepository>>,
}

impl AppStateBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: None,
            repository: None,
        }
    }

    #[must_use]
    pub fn config(mut self, config: StorageConfig) -> Self {
        self.config = Some(config);
        self
    }

    #[must_use]
    pub fn repository(mut self, repository: Arc<dyn ApiKeyRepository>) -> Self {
        self.repository = Some(repository);
        self
    }

    /// Build the `AppState`.
    ///
    /// # Errors
    /// Returns `CoreError::ValidationError` if neither a config nor a repository
    /// was given, or if the configured backend was not compiled in.
    pub async fn build(self) -> CoreResult<AppState> {
        let repository = match (self.repository, self.config) {
            (Some(repository), _) => repository,
            (None, Some(config)) => open_backend(&config).await?,
            (None, None) => {
                return Err(CoreError::ValidationError(
                    "storage config or repository is required".to_string(),
                ))
            }
        };

        log::info!("Using {} API key backend", repository.backend_name());

        Ok(AppState {
            api_key_service: Arc::new(ApiKeyService::new(repository)),
        })
    }
}

impl Default for AppStateBuilder {
    fn default() -> Self {
        Self::new()
    }
}

async fn open_backend(config: &StorageConfig) -> CoreResult<Arc<dyn ApiKeyRepository>> {
    match config.resolved_backend() {
        BackendKind::Relational => open_relational(config).await,
        BackendKind::KeyValue => open_key_value(config),
    }
}

#[cfg(feature = "sqlite-store")]
async fn open_relational(config: &StorageConfig) -> CoreResult<Arc<dyn ApiKeyRepository>> {
    let store = adapters::SqliteStore::open(&config.database_path()).await;
    Ok(Arc::new(store))
}

#[cfg(not(feature = "sqlite-store"))]
async fn open_relational(_config: &StorageConfig) -> CoreResult<Arc<dyn ApiKeyRepository>> {
    Err(CoreError::ValidationError(
        "relational backend is not available (enable the `sqlite-store` feature)".to_string(),
    ))
}

#[cfg(feature = "kv-store")]
fn open_key_value(config: &StorageConfig) -> CoreResult<Arc<dyn ApiKeyRepository>> {
    Ok(Arc::new(adapters::KeyValueStore::open(&config.store_path())))
}

#[cfg(not(feature = "kv-store"))]
fn open_key_value(_config: &StorageConfig) -> CoreResult<Arc<dyn ApiKeyRepository>> {
    Err(CoreError::ValidationError(
        "key-value backend is not available (enable the `kv-store` feature)".to_string(),
    ))
}
