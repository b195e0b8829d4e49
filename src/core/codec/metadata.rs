//! Embedded metadata document.
//!
//! Stored as a JSON string under the reserved container key:
//!
//! ```text
//! {"db_password":{"created":"2024-05-01T10:00:00Z","created_by":"alice@laptop","version":2}}
//! ```

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::types::{Principal, SecretKey};
use crate::error::{Error, Result};

/// Bookkeeping for one version of one key.
///
/// Superseded, never mutated, by the record of the next version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataRecord {
    pub created: DateTime<Utc>,
    pub created_by: Principal,
    pub version: u32,
}

impl MetadataRecord {
    /// Record a write made now by `principal`.
    pub fn now(principal: &str, version: u32) -> Self {
        Self {
            created: Utc::now(),
            created_by: principal.to_string(),
            version,
        }
    }
}

/// Mapping from key name to its current metadata record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MetadataDocument {
    records: BTreeMap<SecretKey, MetadataRecord>,
}

impl MetadataDocument {
    /// Empty document, as found in a brand-new blob.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse the reserved key's value.
    ///
    /// # Errors
    ///
    /// Returns `Error::MalformedContainer` if the value is not a metadata document.
    pub fn decode(raw: &str) -> Result<Self> {
        serde_json::from_str(raw)
            .map_err(|e| Error::MalformedContainer(format!("invalid metadata document: {}", e)))
    }

    /// Serialize to the reserved key's value.
    ///
    /// # Errors
    ///
    /// Returns `Error::EncodingFailure` if serialization fails.
    pub fn encode(&self) -> Result<String> {
        serde_json::to_string(self)
            .map_err(|e| Error::EncodingFailure(format!("metadata document: {}", e)))
    }

    /// Record stored for `key`, if any.
    pub fn get(&self, key: &str) -> Option<&MetadataRecord> {
        self.records.get(key)
    }

    /// Version the next write of `key` must use.
    ///
    /// # Errors
    ///
    /// Returns `Error::MalformedContainer` if the stored version is already
    /// the largest representable one.
    pub fn next_version(&self, key: &str) -> Result<u32> {
        match self.records.get(key) {
            None => Ok(1),
            Some(record) => record.version.checked_add(1).ok_or_else(|| {
                Error::MalformedContainer(format!(
                    "version of '{}' cannot advance past {}",
                    key, record.version
                ))
            }),
        }
    }

    /// Insert or supersede the record for `key`.
    pub fn insert(&mut self, key: &str, record: MetadataRecord) {
        self.records.insert(key.to_string(), record);
    }

    /// Drop the record for `key`. Absence is not an error.
    pub fn remove(&mut self, key: &str) -> Option<MetadataRecord> {
        self.records.remove(key)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_version_starts_at_one() {
        let doc = MetadataDocument::new();
        assert_eq!(doc.next_version("API_KEY").unwrap(), 1);
    }

    #[test]
    fn test_next_version_increments() {
        let mut doc = MetadataDocument::new();
        doc.insert("API_KEY", MetadataRecord::now("alice", 4));
        assert_eq!(doc.next_version("API_KEY").unwrap(), 5);
        assert_eq!(doc.next_version("OTHER").unwrap(), 1);
    }

    #[test]
    fn test_next_version_at_max_is_malformed() {
        let mut doc = MetadataDocument::new();
        doc.insert("API_KEY", MetadataRecord::now("alice", u32::MAX));
        assert!(matches!(
            doc.next_version("API_KEY"),
            Err(Error::MalformedContainer(_))
        ));
    }

    #[test]
    fn test_decode_field_names() {
        let raw = r#"{"db":{"created":"2024-05-01T10:00:00Z","created_by":"arn:aws:iam::1:user/a","version":2}}"#;
        let doc = MetadataDocument::decode(raw).unwrap();
        let rec = doc.get("db").unwrap();

        assert_eq!(rec.version, 2);
        assert_eq!(rec.created_by, "arn:aws:iam::1:user/a");
        assert_eq!(rec.created.to_rfc3339(), "2024-05-01T10:00:00+00:00");
    }

    #[test]
    fn test_decode_rejects_garbage() {
        let err = MetadataDocument::decode("not json").unwrap_err();
        assert!(matches!(err, Error::MalformedContainer(_)));
    }

    #[test]
    fn test_remove_missing_is_tolerated() {
        let mut doc = MetadataDocument::new();
        assert!(doc.remove("ghost").is_none());
        assert!(doc.is_empty());
    }

    #[test]
    fn test_encode_roundtrip() {
        let mut doc = MetadataDocument::new();
        doc.insert("a", MetadataRecord::now("alice", 1));
        doc.insert("b", MetadataRecord::now("bob", 7));

        let decoded = MetadataDocument::decode(&doc.encode().unwrap()).unwrap();
        assert_eq!(decoded, doc);
        assert_eq!(decoded.len(), 2);
    }
}
