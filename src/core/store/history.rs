//! Per-key history reconstruction.

use std::collections::BTreeMap;

use tracing::{debug, trace};

use super::BlobStore;
use crate::core::codec::MetadataDocument;
use crate::core::domain::{ChangeEvent, SecretId};
use crate::error::{Error, Result};

/// Project a key's change history out of whole-blob snapshots.
///
/// Snapshot order does not matter. Snapshots without a record for `key` are
/// skipped, and only the first event seen for each version number is kept,
/// since every snapshot taken while the key sat at version N repeats the
/// same record. Events come back in ascending version order.
pub(super) fn project<'a, I>(key: &str, snapshots: I) -> Vec<ChangeEvent>
where
    I: IntoIterator<Item = &'a MetadataDocument>,
{
    let mut by_version: BTreeMap<u32, ChangeEvent> = BTreeMap::new();
    for metadata in snapshots {
        if let Some(record) = metadata.get(key) {
            by_version
                .entry(record.version)
                .or_insert_with(|| ChangeEvent::from_record(record));
        }
    }
    by_version.into_values().collect()
}

impl BlobStore {
    /// Change events for a key across the service's blob history.
    ///
    /// # Errors
    ///
    /// Returns `Error::SecretNotFound` if the key appears in no snapshot.
    pub(super) fn collect_history(&self, id: &SecretId) -> Result<Vec<ChangeEvent>> {
        let snapshot_ids = self.snapshot_ids(id)?;

        let mut documents = Vec::with_capacity(snapshot_ids.len());
        for version_id in &snapshot_ids {
            match self.load_snapshot(id.service(), version_id)? {
                Some(container) => documents.push(container.metadata()?),
                None => trace!(version_id = %version_id, "skipping empty snapshot"),
            }
        }

        let events = project(id.key(), &documents);
        if events.is_empty() {
            return Err(Error::not_found(id.service(), id.key()));
        }

        debug!(
            service = %id.service(),
            key = %id.key(),
            snapshots = snapshot_ids.len(),
            events = events.len(),
            "reconstructed history"
        );
        Ok(events)
    }
}
