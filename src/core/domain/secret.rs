//! Secret read results.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::core::codec::MetadataRecord;
use crate::core::types::{Principal, SecretKey, SecretValue};

/// Per-key metadata attached to a read result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SecretMetadata {
    pub key: SecretKey,
    pub version: u32,
    pub created: DateTime<Utc>,
    pub created_by: Principal,
}

impl SecretMetadata {
    /// Combine a key name with its stored record.
    pub fn from_record(key: &str, record: &MetadataRecord) -> Self {
        Self {
            key: key.to_string(),
            version: record.version,
            created: record.created,
            created_by: record.created_by.clone(),
        }
    }
}

/// A secret as returned by reads and listings.
///
/// `value` is `None` when only metadata was requested.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Secret {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<SecretValue>,
    pub meta: SecretMetadata,
}

impl Secret {
    /// Secret's key name
    pub fn key(&self) -> &str {
        &self.meta.key
    }

    /// Per-key version number
    pub fn version(&self) -> u32 {
        self.meta.version
    }
}

impl std::fmt::Display for Secret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.meta.key)
    }
}

/// A bare key/value pair used for bulk export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RawSecret {
    pub key: SecretKey,
    pub value: SecretValue,
}
