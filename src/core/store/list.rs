//! Service listings.

use tracing::{debug, warn};

use super::BlobStore;
use crate::core::codec::Container;
use crate::core::domain::{RawSecret, Secret, SecretMetadata};
use crate::error::{Error, Result};

impl BlobStore {
    /// Secrets present in both the container and the metadata document.
    ///
    /// Keys without a metadata record are skipped rather than failing the
    /// whole listing.
    pub(super) fn list_secrets(&self, service: &str, include_values: bool) -> Result<Vec<Secret>> {
        let container = self.current_for_listing(service)?;
        let metadata = container.metadata()?;

        let mut secrets = Vec::with_capacity(container.len());
        for (key, value) in container.secrets() {
            let Some(record) = metadata.get(key) else {
                warn!(service = %service, key = %key, "skipping secret without metadata");
                continue;
            };
            secrets.push(Secret {
                value: include_values.then(|| value.to_string()),
                meta: SecretMetadata::from_record(key, record),
            });
        }

        debug!(service = %service, count = secrets.len(), include_values, "listed secrets");
        Ok(secrets)
    }

    /// Every secret key/value pair, without metadata.
    pub(super) fn list_raw_secrets(&self, service: &str) -> Result<Vec<RawSecret>> {
        let container = self.current_for_listing(service)?;
        let secrets: Vec<RawSecret> = container
            .secrets()
            .map(|(key, value)| RawSecret {
                key: key.to_string(),
                value: value.to_string(),
            })
            .collect();

        debug!(service = %service, count = secrets.len(), "exported raw secrets");
        Ok(secrets)
    }

    fn current_for_listing(&self, service: &str) -> Result<Container> {
        match self.fetch_current(service)? {
            Some(current) if !current.empty => Ok(current.container),
            _ => Err(Error::SecretNotFound(service.to_string())),
        }
    }
}
