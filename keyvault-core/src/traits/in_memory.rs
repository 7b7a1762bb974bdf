//! Process-local API key repository

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use super::ApiKeyRepository;
use crate::error::CoreResult;
use crate::types::{ApiKey, NewApiKey};
use crate::utils::{datetime, matches_query, sort_newest_first};

#[derive(Default)]
struct Inner {
    keys: Vec<ApiKey>,
    last_id: i64,
}

/// In-memory API key repository
///
/// Non-persistent: contents are lost when the process exits. Used as the
/// degraded mode of the SQLite backend and as a lightweight store in tests.
#[derive(Clone, Default)]
pub struct InMemoryApiKeyRepository {
    inner: Arc<RwLock<Inner>>,
}

impl InMemoryApiKeyRepository {
    /// Create an empty repository
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ApiKeyRepository for InMemoryApiKeyRepository {
    async fn initialize(&self) -> CoreResult<()> {
        Ok(())
    }

    async fn insert(&self, new_key: &NewApiKey) -> CoreResult<i64> {
        new_key.validate()?;

        let mut inner = self.inner.write().await;
        let id = inner.last_id + 1;
        inner
            .keys
            .push(ApiKey::from_new(id, new_key, datetime::now()));
        inner.last_id = id;
        Ok(id)
    }

    async fn search(&self, query: &str) -> CoreResult<Vec<ApiKey>> {
        let mut found: Vec<ApiKey> = self
            .inner
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
        let mut all = self.inner.read().await.keys.clone();
        sort_newest_first(&mut all);
        Ok(all)
    }

    fn backend_name(&self) -> &'static str {
        "in-memory"
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use crate::error::CoreError;

    #[tokio::test]
    async fn ids_start_at_one_and_increase() {
        let repo = InMemoryApiKeyRepository::new();
        let a = repo
            .insert(&NewApiKey::new("OpenAI", "sk-abc"))
            .await
            .unwrap();
        let b = repo
            .insert(&NewApiKey::new("Stripe", "sk_live"))
            .await
            .unwrap();
        assert_eq!((a, b), (1, 2));
    }

    #[tokio::test]
    async fn insert_stamps_equal_timestamps() {
        let repo = InMemoryApiKeyRepository::new();
        let before = datetime::now();
        repo
            .insert(&NewApiKey::new("OpenAI", "sk-abc"))
            .await
            .unwrap();

        let all = repo.find_all().await.unwrap();
        assert_eq!(all[0].created_at, all[0].updated_at);
        assert!(all[0].created_at >= before);
    }

    #[tokio::test]
    async fn insert_rejects_missing_key() {
        let repo = InMemoryApiKeyRepository::new();
        let err = repo
            .insert(&NewApiKey::new("OpenAI", ""))
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::ValidationError(_)));
        assert!(repo.find_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn search_and_list_are_newest_first() {
        let repo = InMemoryApiKeyRepository::new();
        repo.insert(&NewApiKey::new("Alpha", "k1").with_organization("Acme"))
            .await
            .unwrap();
        repo.insert(&NewApiKey::new("Beta", "k2")).await.unwrap();
        repo.insert(&NewApiKey::new("Gamma", "k3").with_description("acme staging"))
            .await
            .unwrap();

        let all: Vec<i64> = repo
            .find_all()
            .await
            .unwrap()
            .iter()
            .map(|k| k.id)
            .collect();
        assert_eq!(all, vec![3, 2, 1]);

        let hits: Vec<i64> = repo
            .search("ACME")
            .await
            .unwrap()
            .iter()
            .map(|k| k.id)
            .collect();
        assert_eq!(hits, vec![3, 1]);
    }

    #[tokio::test]
    async fn clones_share_contents() {
        let repo = InMemoryApiKeyRepository::new();
        let other = repo.clone();
        repo
            .insert(&NewApiKey::new("OpenAI", "sk-abc"))
            .await
            .unwrap();
        assert_eq!(other.find_all().await.unwrap().len(), 1);
    }
}
