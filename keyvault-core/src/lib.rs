//! KeyVault Core Library
//!
//! Provides the platform-independent half of KeyVault:
//! - Record types (`ApiKey`, `NewApiKey`)
//! - The storage contract every backend implements (`ApiKeyRepository`)
//! - The storage facade consumed by frontends (`ApiKeyService`)
//!
//! Physical storage lives behind the `ApiKeyRepository` trait, so the same facade
//! runs over SQLite, a key-value document, or a process-local collection.

pub mod error;
pub mod services;
pub mod traits;
pub mod types;
pub mod utils;

#[cfg(test)]
mod test_utils;

// Re-export common types
pub use error::{CoreError, CoreResult};
pub use services::ApiKeyService;
pub use traits::{ApiKeyRepository, InMemoryApiKeyRepository};
pub use types::{ApiKey, NewApiKey};
