//! Storage configuration.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// SQLite database file name inside the data directory.
pub const DATABASE_FILE_NAME: &str = "apikeys.db";
/// Key-value document file name inside the data directory.
pub const STORE_FILE_NAME: &str = "api_keys.json";

/// Which storage backend a process uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BackendKind {
    /// Embedded SQLite database (falls back to memory if it cannot be opened)
    Relational,
    /// Single JSON slot in a key-value document
    KeyValue,
}

impl BackendKind {
    /// Backend for the target this binary was built for.
    #[must_use]
    pub const fn platform_default() -> Self {
        if cfg!(target_family = "wasm") {
            Self::KeyValue
        } else {
            Self::Relational
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Relational => "relational",
            Self::KeyValue => "key-value",
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BackendKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "relational" | "sqlite" => Ok(Self::Relational),
            "key-value" | "kv" => Ok(Self::KeyValue),
            other => Err(format!(
                "unknown backend '{other}' (expected 'relational' or 'key-value')"
            )),
        }
    }
}

/// Where and how API keys are stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageConfig {
    /// Explicit backend; `None` picks the platform default.
    #[serde(default)]
    pub backend: Option<BackendKind>,
    /// Directory holding the database or store file.
    pub data_dir: PathBuf,
}

impl StorageConfig {
    #[must_use]
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            backend: None,
            data_dir: data_dir.into(),
        }
    }

    #[must_use]
    pub fn with_backend(mut self, backend: BackendKind) -> Self {
        self.backend = Some(backend);
        self
    }

    pub fn resolved_backend(&self) -> BackendKind {
        self.backend.unwrap_or_else(BackendKind::platform_default)
    }

    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join(DATABASE_FILE_NAME)
    }

    pub fn store_path(&self) -> PathBuf {
        self.data_dir.join(STORE_FILE_NAME)
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    #[cfg(not(target_family = "wasm"))]
    fn native_default_is_relational() {
        assert_eq!(BackendKind::platform_default(), BackendKind::Relational);
        assert_eq!(
            StorageConfig::new("/tmp/kv").resolved_backend(),
            BackendKind::Relational
        );
    }

    #[test]
    fn explicit_backend_wins() {
        let cfg = StorageConfig::new("/tmp/kv").with_backend(BackendKind::KeyValue);
        assert_eq!(cfg.resolved_backend(), BackendKind::KeyValue);
        assert_eq!(cfg.store_path(), PathBuf::from("/tmp/kv/api_keys.json"));
        assert_eq!(cfg.database_path(), PathBuf::from("/tmp/kv/apikeys.db"));
    }

    #[test]
    fn deserializes_from_json() {
        let cfg: StorageConfig =
            serde_json::from_str(r#"{"backend": "key-value", "dataDir": "/var/lib/keyvault"}"#)
                .unwrap();
        assert_eq!(cfg.backend, Some(BackendKind::KeyValue));

        let cfg: StorageConfig = serde_json::from_str(r#"{"dataDir": "/x"}"#).unwrap();
        assert_eq!(cfg.backend, None);
    }

    #[test]
    fn parses_backend_names() {
        assert_eq!("sqlite".parse::<BackendKind>().unwrap(), BackendKind::Relational);
        assert_eq!("key-value".parse::<BackendKind>().unwrap(), BackendKind::KeyValue);
        assert!("redis".parse::<BackendKind>().is_err());
    }
}
