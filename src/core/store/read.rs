//! Point-in-time reads.

use tracing::{debug, trace};

use super::BlobStore;
use crate::core::domain::{Secret, SecretId, SecretMetadata};
use crate::error::{Error, Result};

impl BlobStore {
    /// Read a key from the current blob.
    ///
    /// # Errors
    ///
    /// Returns `Error::SecretNotFound` if the service, the value, or its
    /// metadata record is missing.
    pub(super) fn read_latest(&self, id: &SecretId) -> Result<Secret> {
        let container = self.require_current(id.service(), id.key())?;

        let value = container
            .get(id.key())
            .ok_or_else(|| Error::not_found(id.service(), id.key()))?;
        let metadata = container.metadata()?;
        let record = metadata
            .get(id.key())
            .ok_or_else(|| Error::not_found(id.service(), id.key()))?;

        debug!(service = %id.service(), key = %id.key(), version = record.version, "read latest");
        Ok(Secret {
            value: Some(value.to_string()),
            meta: SecretMetadata::from_record(id.key(), record),
        })
    }

    /// Read the value a key had at per-key `version`.
    ///
    /// Scans every non-deprecated snapshot until one carries that version of
    /// the key. Linear in the number of snapshots.
    ///
    /// # Errors
    ///
    /// Returns `Error::SecretNotFound` if no snapshot holds that version.
    pub(super) fn read_version(&self, id: &SecretId, version: u32) -> Result<Secret> {
        let snapshot_ids = self.snapshot_ids(id)?;

        for version_id in &snapshot_ids {
            let Some(container) = self.load_snapshot(id.service(), version_id)? else {
                trace!(version_id = %version_id, "skipping empty snapshot");
                continue;
            };

            let metadata = container.metadata()?;
            let Some(record) = metadata.get(id.key()) else {
                continue;
            };
            if record.version != version {
                continue;
            }

            trace!(version_id = %version_id, version, "found matching snapshot");
            let value = container
                .get(id.key())
                .ok_or_else(|| Error::not_found(id.service(), id.key()))?;
            return Ok(Secret {
                value: Some(value.to_string()),
                meta: SecretMetadata::from_record(id.key(), record),
            });
        }

        debug!(
            service = %id.service(),
            key = %id.key(),
            version,
            scanned = snapshot_ids.len(),
            "version not found in history"
        );
        Err(Error::not_found(id.service(), id.key()))
    }
}
