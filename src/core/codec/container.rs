//! Decoded view of one service blob.

use std::collections::BTreeMap;

use super::MetadataDocument;
use crate::core::constants::METADATA_KEY;
use crate::core::types::{SecretKey, SecretValue};
use crate::error::{Error, Result};

/// Key/value mapping stored in a single blob.
///
/// The reserved [`METADATA_KEY`] entry carries the serialized
/// [`MetadataDocument`]; every other entry is a secret.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Container {
    entries: BTreeMap<SecretKey, SecretValue>,
}

impl Container {
    /// Empty container, as for a service that does not exist yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a blob payload.
    ///
    /// # Errors
    ///
    /// Returns `Error::MalformedContainer` if the payload is not a JSON object
    /// of string values.
    pub fn decode(payload: &str) -> Result<Self> {
        let entries: BTreeMap<SecretKey, SecretValue> = serde_json::from_str(payload)
            .map_err(|e| Error::MalformedContainer(e.to_string()))?;
        Ok(Self { entries })
    }

    /// Serialize to a blob payload.
    ///
    /// # Errors
    ///
    /// Returns `Error::EncodingFailure` if serialization fails.
    pub fn encode(&self) -> Result<String> {
        serde_json::to_string(&self.entries).map_err(|e| Error::EncodingFailure(e.to_string()))
    }

    /// Decode the embedded metadata document.
    ///
    /// A container without the reserved key yields an empty document.
    pub fn metadata(&self) -> Result<MetadataDocument> {
        match self.entries.get(METADATA_KEY) {
            Some(raw) => MetadataDocument::decode(raw),
            None => Ok(MetadataDocument::new()),
        }
    }

    /// Replace the embedded metadata document.
    pub fn set_metadata(&mut self, metadata: &MetadataDocument) -> Result<()> {
        let raw = metadata.encode()?;
        self.entries.insert(METADATA_KEY.to_string(), raw);
        Ok(())
    }

    /// Value of a secret key. The reserved key is never returned.
    pub fn get(&self, key: &str) -> Option<&str> {
        if key == METADATA_KEY {
            return None;
        }
        self.entries.get(key).map(String::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Insert or replace a secret value.
    pub fn insert(&mut self, key: &str, value: &str) {
        self.entries.insert(key.to_string(), value.to_string());
    }

    /// Remove a secret, returning its value.
    pub fn remove(&mut self, key: &str) -> Option<SecretValue> {
        if key == METADATA_KEY {
            return None;
        }
        self.entries.remove(key)
    }

    /// Secret entries in key order, without the reserved key.
    pub fn secrets(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .filter(|(k, _)| k.as_str() != METADATA_KEY)
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of secret entries.
    pub fn len(&self) -> usize {
        self.secrets().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
