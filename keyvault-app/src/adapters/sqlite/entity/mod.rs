//! `SeaORM` entities for `SqliteStore`.

pub mod api_key;
