//! API key record types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

/// A stored API key.
///
/// `id` and both timestamps are assigned by the backend on insert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiKey {
    /// Backend-assigned identifier, unique per store
    pub id: i64,
    /// Display name
    pub name: String,
    /// The secret value
    pub key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Creation time
    #[serde(with = "crate::utils::datetime")]
    pub created_at: DateTime<Utc>,
    /// Last modification time
    #[serde(with = "crate::utils::datetime")]
    pub updated_at: DateTime<Utc>,
}

impl ApiKey {
    /// Builds a stored record from an insert candidate.
    #[must_use]
    pub fn from_new(id: i64, new_key: &NewApiKey, now: DateTime<Utc>) -> Self {
        Self {
            id,
            name: new_key.name.clone(),
            key: new_key.key.clone(),
            organization: new_key.organization.clone(),
            project_id: new_key.project_id.clone(),
            description: new_key.description.clone(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Insert candidate: a record without id or timestamps.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewApiKey {
    pub name: String,
    pub key: String,
    #[serde(default)]
    pub organization: Option<String>,
    #[serde(default)]
    pub project_id: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl NewApiKey {
    /// Creates a candidate with only the required fields set.
    #[must_use]
    pub fn new(name: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            key: key.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_organization(mut self, organization: impl Into<String>) -> Self {
        self.organization = Some(organization.into());
        self
    }

    #[must_use]
    pub fn with_project_id(mut self, project_id: impl Into<String>) -> Self {
        self.project_id = Some(project_id.into());
        self
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Rejects a candidate whose `name` or `key` is blank.
    pub fn validate(&self) -> CoreResult<()> {
        if self.name.trim().is_empty() {
            return Err(CoreError::ValidationError("name is required".to_string()));
        }
        if self.key.trim().is_empty() {
            return Err(CoreError::ValidationError("key is required".to_string()));
        }
        Ok(())
    }

    /// Turns blank optional fields (empty form inputs) into `None`.
    #[must_use]
    pub fn normalized(self) -> Self {
        fn non_blank(value: Option<String>) -> Option<String> {
            value.filter(|v| !v.trim().is_empty())
        }

        Self {
            organization: non_blank(self.organization),
            project_id: non_blank(self.project_id),
            description: non_blank(self.description),
            ..self
        }
    }
}
