//! Change events reconstructed from blob history.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::core::codec::MetadataRecord;
use crate::core::types::Principal;

/// Kind of change a version represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeType {
    Created,
    Updated,
}

impl ChangeType {
    /// Version 1 is a creation, every later version an update.
    pub fn from_version(version: u32) -> Self {
        if version == 1 {
            Self::Created
        } else {
            Self::Updated
        }
    }

    /// Display name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Updated => "updated",
        }
    }
}

impl std::fmt::Display for ChangeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.name())
    }
}

/// One entry of a key's change history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChangeEvent {
    #[serde(rename = "type")]
    pub kind: ChangeType,
    pub time: DateTime<Utc>,
    pub user: Principal,
    pub version: u32,
}

impl ChangeEvent {
    /// Derive an event from the record stored for one version.
    pub fn from_record(record: &MetadataRecord) -> Self {
        Self {
            kind: ChangeType::from_version(record.version),
            time: record.created,
            user: record.created_by.clone(),
            version: record.version,
        }
    }
}
