//! Storage layer abstraction trait definition

mod api_key_repository;
mod in_memory;

pub use api_key_repository::ApiKeyRepository;
pub use in_memory::InMemoryApiKeyRepository;
