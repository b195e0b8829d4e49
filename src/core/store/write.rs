//! Versioned write and delete.

use tracing::debug;

use super::{BlobStore, Current};
use crate::core::blob::WriteCondition;
use crate::core::codec::{Container, MetadataRecord};
use crate::core::domain::SecretId;
use crate::error::{Error, Result};

impl BlobStore {
    /// Set a key to a non-empty value.
    ///
    /// Creates the service blob if it does not exist yet; otherwise appends a
    /// new blob version. The key's version is one past its current record, or
    /// 1 if it has none.
    ///
    /// # Errors
    ///
    /// Propagates backend and identity failures unchanged. Nothing is stored
    /// if any step before the final store fails.
    pub(super) fn put_key(&self, id: &SecretId, value: &str) -> Result<()> {
        let current = self.fetch_current(id.service())?;
        let principal = self.identity.current_principal()?;

        let mut container = current
            .as_ref()
            .map(|c| c.container.clone())
            .unwrap_or_else(Container::new);

        let mut metadata = container.metadata()?;
        let version = metadata.next_version(id.key())?;
        metadata.insert(id.key(), MetadataRecord::now(&principal, version));

        container.insert(id.key(), value);
        container.set_metadata(&metadata)?;
        let payload = container.encode()?;

        match current {
            None => {
                self.backend.create_blob(id.service(), &payload)?;
                debug!(
                    service = %id.service(),
                    key = %id.key(),
                    version,
                    "created service with secret"
                );
            }
            Some(base) => {
                self.store(id, &payload, &base)?;
                debug!(
                    service = %id.service(),
                    key = %id.key(),
                    version,
                    "stored secret version"
                );
            }
        }

        Ok(())
    }

    /// Remove a key and its metadata record.
    ///
    /// # Errors
    ///
    /// Returns `Error::SecretNotFound` if the service or the key does not exist.
    pub(super) fn remove_key(&self, id: &SecretId) -> Result<()> {
        let base = self
            .fetch_current(id.service())?
            .ok_or_else(|| Error::not_found(id.service(), id.key()))?;

        let mut container = base.container.clone();
        if container.remove(id.key()).is_none() {
            return Err(Error::not_found(id.service(), id.key()));
        }

        let mut metadata = container.metadata()?;
        metadata.remove(id.key());
        container.set_metadata(&metadata)?;
        let payload = container.encode()?;

        self.store(id, &payload, &base)?;
        debug!(service = %id.service(), key = %id.key(), "deleted secret");
        Ok(())
    }

    fn store(&self, id: &SecretId, payload: &str, base: &Current) -> Result<()> {
        let condition = self.condition_for(base);
        if let WriteCondition::IfCurrent(expected) = &condition {
            debug!(service = %id.service(), expected = %expected, "conditional store");
        }
        self.backend
            .store_version(id.service(), payload, &condition)
            .map_err(Into::into)
    }
}
