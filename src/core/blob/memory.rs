//! In-process blob backend.
//!
//! Keeps every blob version in memory. Used by tests and by callers that embed
//! the store without an external service. Cloning shares the same storage.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use tracing::trace;

use super::{BackendResult, Blob, BlobBackend, WriteCondition};
use crate::core::types::VersionId;
use crate::error::BackendError;

#[derive(Debug)]
struct StoredVersion {
    id: VersionId,
    payload: String,
}

type Blobs = HashMap<String, Vec<StoredVersion>>;

/// Thread-safe in-memory blob backend.
///
/// With a retention limit, versions older than the newest `n` are reported as
/// deprecated, the way managed services stop labelling old versions.
#[derive(Debug, Clone, Default)]
pub struct InMemory {
    blobs: Arc<Mutex<Blobs>>,
    retained: Option<usize>,
}

impl InMemory {
    /// Create an empty backend that never deprecates versions.
    pub fn new() -> Self {
        Self::default()
    }

    /// Only the newest `retained` versions of each blob stay non-deprecated.
    pub fn with_retention(retained: usize) -> Self {
        Self {
            blobs: Arc::default(),
            retained: Some(retained.max(1)),
        }
    }

    /// Number of versions stored for `name`, deprecated ones included.
    pub fn version_count(&self, name: &str) -> usize {
        self.lock()
            .map(|blobs| blobs.get(name).map_or(0, Vec::len))
            .unwrap_or(0)
    }

    fn lock(&self) -> BackendResult<MutexGuard<'_, Blobs>> {
        self.blobs
            .lock()
            .map_err(|_| BackendError::Request("in-memory backend lock poisoned".to_string()))
    }

    fn next_id(versions: &[StoredVersion]) -> VersionId {
        format!("{:08}", versions.len() + 1)
    }
}

impl BlobBackend for InMemory {
    fn name(&self) -> &'static str {
        "memory"
    }

    fn create_blob(&self, name: &str, payload: &str) -> BackendResult<()> {
        let mut blobs = self.lock()?;
        if blobs.contains_key(name) {
            return Err(BackendError::AlreadyExists(name.to_string()));
        }
        let id = Self::next_id(&[]);
        trace!(blob = %name, version_id = %id, "creating blob");
        blobs.insert(
            name.to_string(),
            vec![StoredVersion {
                id,
                payload: payload.to_string(),
            }],
        );
        Ok(())
    }

    fn store_version(
        &self,
        name: &str,
        payload: &str,
        condition: &WriteCondition,
    ) -> BackendResult<()> {
        let mut blobs = self.lock()?;
        let versions = blobs
            .get_mut(name)
            .ok_or_else(|| BackendError::NotFound(name.to_string()))?;

        if let WriteCondition::IfCurrent(expected) = condition {
            let actual = versions.last().map(|v| v.id.as_str()).unwrap_or_default();
            if actual != expected.as_str() {
                return Err(BackendError::Conflict {
                    name: name.to_string(),
                    expected: expected.clone(),
                    actual: actual.to_string(),
                });
            }
        }

        let id = Self::next_id(versions);
        trace!(blob = %name, version_id = %id, "storing blob version");
        versions.push(StoredVersion {
            id,
            payload: payload.to_string(),
        });
        Ok(())
    }

    fn get_current(&self, name: &str) -> BackendResult<Blob> {
        let blobs = self.lock()?;
        blobs
            .get(name)
            .and_then(|versions| versions.last())
            .map(|v| Blob {
                version_id: v.id.clone(),
                payload: v.payload.clone(),
            })
            .ok_or_else(|| BackendError::NotFound(name.to_string()))
    }

    fn get_version(&self, name: &str, version_id: &str) -> BackendResult<String> {
        let blobs = self.lock()?;
        let versions = blobs
            .get(name)
            .ok_or_else(|| BackendError::NotFound(name.to_string()))?;
        versions
            .iter()
            .find(|v| v.id == version_id)
            .map(|v| v.payload.clone())
            .ok_or_else(|| BackendError::VersionNotFound {
                name: name.to_string(),
                version_id: version_id.to_string(),
            })
    }

    fn list_version_ids(
        &self,
        name: &str,
        include_deprecated: bool,
    ) -> BackendResult<Vec<VersionId>> {
        let blobs = self.lock()?;
        let versions = blobs
            .get(name)
            .ok_or_else(|| BackendError::NotFound(name.to_string()))?;

        let skip = match (include_deprecated, self.retained) {
            (false, Some(retained)) => versions.len().saturating_sub(retained),
            _ => 0,
        };
        Ok(versions.iter().skip(skip).map(|v| v.id.clone()).collect())
    }

    fn supports_conditional_writes(&self) -> bool {
        true
    }
}
