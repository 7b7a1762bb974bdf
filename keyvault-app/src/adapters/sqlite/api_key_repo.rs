//! `ApiKeyRepository` implementations for the SQLite store.

use async_trait::async_trait;
use sea_orm::sea_query::LikeExpr;
use sea_orm::{
    ActiveValue::{NotSet, Set},
    ColumnTrait, Condition, EntityTrait, QueryFilter, QueryOrder, TransactionTrait,
};
use sea_orm_migration::MigratorTrait;

use keyvault_core::error::{CoreError, CoreResult};
use keyvault_core::traits::ApiKeyRepository;
use keyvault_core::types::{ApiKey, NewApiKey};
use keyvault_core::utils::datetime;

use super::entity::api_key;
use super::migration::Migrator;
use super::{SqliteBackend, SqliteStore, StoreState};

/// Escape character for `LIKE` patterns.
const LIKE_ESCAPE: char = '\\';

impl api_key::Model {
    /// Convert a `SeaORM` row model into a domain `ApiKey`.
    fn into_api_key(self) -> CoreResult<ApiKey> {
        let created_at = datetime::parse(&self.created_at)
            .map_err(|e| CoreError::SerializationError(format!("Invalid createdAt: {e}")))?;
        let updated_at = datetime::parse(&self.updated_at)
            .map_err(|e| CoreError::SerializationError(format!("Invalid updatedAt: {e}")))?;

        Ok(ApiKey {
            id: self.id,
            name: self.name,
            key: self.key,
            organization: self.organization,
            project_id: self.project_id,
            description: self.description,
            created_at,
            updated_at,
        })
    }
}

/// Build the active model for a fresh row; `id` is left to `AUTOINCREMENT`.
fn new_key_to_active_model(new_key: &NewApiKey, stamp: &str) -> api_key::ActiveModel {
    api_key::ActiveModel {
        id: NotSet,
        name: Set(new_key.name.clone()),
        key: Set(new_key.key.clone()),
        organization: Set(new_key.organization.clone()),
        project_id: Set(new_key.project_id.clone()),
        description: Set(new_key.description.clone()),
        created_at: Set(stamp.to_string()),
        updated_at: Set(stamp.to_string()),
    }
}

/// Escape `%`, `_` and the escape character so they match literally.
fn escape_like(query: &str) -> String {
    let mut escaped = String::with_capacity(query.len());
    for c in query.chars() {
        if matches!(c, '%' | '_' | LIKE_ESCAPE) {
            escaped.push(LIKE_ESCAPE);
        }
        escaped.push(c);
    }
    escaped
}

/// `LIKE '%query%'` with the query matched as a literal substring.
fn contains_pattern(query: &str) -> LikeExpr {
    LikeExpr::new(format!("%{}%", escape_like(query))).escape(LIKE_ESCAPE)
}

fn rows_into_api_keys(rows: Vec<api_key::Model>) -> CoreResult<Vec<ApiKey>> {
    rows.into_iter().map(api_key::Model::into_api_key).collect()
}

#[async_trait]
impl ApiKeyRepository for SqliteBackend {
    async fn initialize(&self) -> CoreResult<()> {
        // Each migration runs in its own transaction; `api_keys` is created IF NOT EXISTS.
        Migrator::up(&self.db, None)
            .await
            .map_err(|e| CoreError::StorageError(format!("Failed to create schema: {e}")))
    }

    async fn insert(&self, new_key: &NewApiKey) -> CoreResult<i64> {
        new_key.validate()?;

        let stamp = datetime::format(&datetime::now());
        let active_model = new_key_to_active_model(new_key, &stamp);

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| CoreError::StorageError(format!("Failed to begin transaction: {e}")))?;
        let result = api_key::Entity::insert(active_model)
            .exec(&txn)
            .await
            .map_err(|e| CoreError::StorageError(format!("Failed to insert API key: {e}")))?;
        txn.commit()
            .await
            .map_err(|e| CoreError::StorageError(format!("Failed to commit API key: {e}")))?;

        Ok(result.last_insert_id)
    }

    async fn search(&self, query: &str) -> CoreResult<Vec<ApiKey>> {
        let pattern = contains_pattern(query);
        let matches_any = Condition::any()
            .add(api_key::Column::Name.like(pattern.clone()))
            .add(api_key::Column::Organization.like(pattern.clone()))
            .add(api_key::Column::Description.like(pattern));

        let rows = api_key::Entity::find()
            .filter(matches_any)
            .order_by_desc(api_key::Column::UpdatedAt)
            .order_by_desc(api_key::Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| CoreError::StorageError(format!("Failed to search API keys: {e}")))?;

        rows_into_api_keys(rows)
    }

    async fn find_all(&self) -> CoreResult<Vec<ApiKey>> {
        let rows = api_key::Entity::find()
            .order_by_desc(api_key::Column::UpdatedAt)
            .order_by_desc(api_key::Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| CoreError::StorageError(format!("Failed to query API keys: {e}")))?;

        rows_into_api_keys(rows)
    }

    fn backend_name(&self) -> &'static str {
        "sqlite"
    }
}

#[async_trait]
impl ApiKeyRepository for SqliteStore {
    async fn initialize(&self) -> CoreResult<()> {
        self.active().initialize().await
    }

    async fn insert(&self, new_key: &NewApiKey) -> CoreResult<i64> {
        self.active().insert(new_key).await
    }

    async fn search(&self, query: &str) -> CoreResult<Vec<ApiKey>> {
        self.active().search(query).await
    }

    async fn find_all(&self) -> CoreResult<Vec<ApiKey>> {
        self.active().find_all().await
    }

    fn backend_name(&self) -> &'static str {
        match self.state {
            StoreState::Connected(_) => "sqlite",
            StoreState::Degraded(_) => "sqlite-fallback",
        }
    }
}
