//! SQLite-based API key store using `SeaORM`.
//!
//! `SqliteStore` decides once, at construction, whether the database is usable.
//! If it is not, the store runs against a process-local collection for the rest
//! of its life; callers see the same four operations either way.

mod api_key_repo;
pub(crate) mod entity;
mod migration;

use std::path::Path;

use keyvault_core::error::{CoreError, CoreResult};
use keyvault_core::traits::{ApiKeyRepository, InMemoryApiKeyRepository};
use sea_orm::{Database, DatabaseConnection, TransactionTrait};

/// Live SQLite connection.
pub(crate) struct SqliteBackend {
    /// Shared `SeaORM` database connection.
    pub(crate) db: DatabaseConnection,
}

/// Storage state, fixed at construction.
enum StoreState {
    /// The database opened and accepted a transaction.
    Connected(SqliteBackend),
    /// The database could not be acquired; records live only in this process.
    Degraded(InMemoryApiKeyRepository),
}

/// SQLite-based API key store.
///
/// Construction never fails: if the database file cannot be created, opened, or
/// does not accept transactions, the store degrades to an in-memory collection.
/// There is no retry.
pub struct SqliteStore {
    state: StoreState,
}

impl SqliteStore {
    /// Open the store at `db_path` (created if not exists).
    ///
    /// The schema is created by `initialize`, not here.
    pub async fn open(db_path: &Path) -> Self {
        match Self::connect(db_path).await {
            Ok(db) => {
                log::info!("Opened SQLite API key store at {}", db_path.display());
                Self {
                    state: StoreState::Connected(SqliteBackend { db }),
                }
            }
            Err(e) => {
                log::warn!("SQLite unavailable, falling back to in-memory storage: {e}");
                Self::degraded()
            }
        }
    }

    /// A store that is degraded from the start.
    #[must_use]
    pub fn degraded() -> Self {
        Self {
            state: StoreState::Degraded(InMemoryApiKeyRepository::new()),
        }
    }

    /// Whether records are being kept in memory only.
    pub fn is_degraded(&self) -> bool {
        matches!(self.state, StoreState::Degraded(_))
    }

    async fn connect(db_path: &Path) -> CoreResult<DatabaseConnection> {
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| CoreError::StorageError(format!("Failed to create directory: {e}")))?;
        }

        let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
        let db = Database::connect(&db_url)
            .await
            .map_err(|e| CoreError::StorageError(format!("Failed to connect to SQLite: {e}")))?;

        // Every write goes through a transaction; refuse a handle that cannot open one.
        let txn = db
            .begin()
            .await
            .map_err(|e| CoreError::StorageError(format!("Transactions unavailable: {e}")))?;
        txn.commit()
            .await
            .map_err(|e| CoreError::StorageError(format!("Transactions unavailable: {e}")))?;

        Ok(db)
    }

    /// The repository serving the decided state.
    fn active(&self) -> &dyn ApiKeyRepository {
        match &self.state {
            StoreState::Connected(backend) => backend,
            StoreState::Degraded(memory) => memory,
        }
    }
}
