//! Test helpers
//!
//! Mock backend and convenience factories.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::{CoreError, CoreResult};
use crate::services::ApiKeyService;
use crate::traits::{ApiKeyRepository, InMemoryApiKeyRepository};
use crate::types::{ApiKey, NewApiKey};

// ===== MockApiKeyRepository =====

/// Snapshot of how often each operation reached the backend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CallCounts {
    pub initialize: usize,
    pub insert: usize,
    pub search: usize,
    pub find_all: usize,
}

/// Counts calls and either delegates to an in-memory store or fails every operation.
pub struct MockApiKeyRepository {
    inner: InMemoryApiKeyRepository,
    /// If Some, every operation returns `StorageError` with this message
    error: Option<String>,
    initialize: AtomicUsize,
    insert: AtomicUsize,
    search: AtomicUsize,
    find_all: AtomicUsize,
}

impl MockApiKeyRepository {
    pub fn new() -> Self {
        Self {
            inner: InMemoryApiKeyRepository::new(),
            error: None,
            initialize: AtomicUsize::new(0),
            insert: AtomicUsize::new(0),
            search: AtomicUsize::new(0),
            find_all: AtomicUsize::new(0),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            error: Some(message.to_string()),
            ..Self::new()
        }
    }

    pub fn calls(&self) -> CallCounts {
        CallCounts {
            initialize: self.initialize.load(Ordering::SeqCst),
            insert: self.insert.load(Ordering::SeqCst),
            search: self.search.load(Ordering::SeqCst),
            find_all: self.find_all.load(Ordering::SeqCst),
        }
    }

    fn check(&self, counter: &AtomicUsize) -> CoreResult<()> {
        counter.fetch_add(1, Ordering::SeqCst);
        match self.error {
            Some(ref msg) => Err(CoreError::StorageError(msg.clone())),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl ApiKeyRepository for MockApiKeyRepository {
    async fn initialize(&self) -> CoreResult<()> {
        self.check(&self.initialize)?;
        self.inner.initialize().await
    }

    async fn insert(&self, new_key: &NewApiKey) -> CoreResult<i64> {
        self.check(&self.insert)?;
        self.inner.insert(new_key).await
    }

    async fn search(&self, query: &str) -> CoreResult<Vec<ApiKey>> {
        self.check(&self.search)?;
        self.inner.search(query).await
    }

    async fn find_all(&self) -> CoreResult<Vec<ApiKey>> {
        self.check(&self.find_all)?;
        self.inner.find_all().await
    }

    fn backend_name(&self) -> &'static str {
        "mock"
    }
}

// ===== Factory helpers =====

/// Creates an `ApiKeyService` backed by a fresh mock.
pub fn create_test_service() -> (ApiKeyService, Arc<MockApiKeyRepository>) {
    let repo = Arc::new(MockApiKeyRepository::new());
    let svc = ApiKeyService::new(repo.clone());
    (svc, repo)
}
