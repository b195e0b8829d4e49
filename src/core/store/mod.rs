//! Per-key versioned secret store.
//!
//! Packs every key of a service into one blob and derives per-key versions,
//! authors, and timestamps from the metadata document embedded in it. The
//! backend only ever sees whole blobs; per-key history is a projection over
//! the backend's blob history (see [`history::project`]).
//!
//! Writes are read-modify-write with no lock between the fetch and the store.
//! Two writers racing on the same service can lose one update unless
//! `conditional_writes` is enabled on a backend that enforces it.

mod history;
mod list;
mod read;
mod write;

use tracing::{debug, instrument, warn};

use crate::core::blob::{BlobBackend, WriteCondition};
use crate::core::codec::Container;
use crate::core::constants::LIST_SERVICES_UNSUPPORTED;
use crate::core::domain::{ChangeEvent, RawSecret, Secret, SecretId, Version};
use crate::core::identity::IdentityResolver;
use crate::core::types::VersionId;
use crate::core::validation::{validate_id, validate_service};
use crate::error::{BackendError, Error, Result};

/// Secret store operations.
///
/// Abstracts the per-key versioned view so callers do not depend on how a
/// particular backend lays secrets out.
pub trait SecretStore {
    /// Set `id` to `value`, assigning the next version for that key.
    ///
    /// An empty value deletes the key.
    fn write(&self, id: &SecretId, value: &str) -> Result<()>;

    /// Read the latest value or a specific version.
    fn read(&self, id: &SecretId, version: Version) -> Result<Secret>;

    /// Remove a key from its service.
    fn delete(&self, id: &SecretId) -> Result<()>;

    /// List keys present with metadata, optionally with values.
    fn list(&self, service: &str, include_values: bool) -> Result<Vec<Secret>>;

    /// Export every key/value pair without metadata.
    fn list_raw(&self, service: &str) -> Result<Vec<RawSecret>>;

    /// Change events for one key in ascending version order.
    fn history(&self, id: &SecretId) -> Result<Vec<ChangeEvent>>;

    /// List services.
    fn list_services(&self, service: &str, include_secret_name: bool) -> Result<Vec<String>>;
}

/// Current state of a service blob.
pub(super) struct Current {
    /// Backend version the container was decoded from.
    pub(super) version_id: VersionId,
    pub(super) container: Container,
    /// The blob exists but its payload is empty.
    pub(super) empty: bool,
}

/// [`SecretStore`] over a blob versioning backend.
///
/// Holds only injected collaborators; every call rebuilds its container from
/// the backend, so one instance can be shared across threads.
pub struct BlobStore {
    backend: Box<dyn BlobBackend>,
    identity: Box<dyn IdentityResolver>,
    conditional_writes: bool,
}

impl std::fmt::Debug for BlobStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlobStore")
            .field("backend", &self.backend_name())
            .field("conditional_writes", &self.conditional_writes)
            .finish()
    }
}

impl BlobStore {
    /// Create a store from its collaborators.
    pub fn new(
        backend: impl BlobBackend + 'static,
        identity: impl IdentityResolver + 'static,
    ) -> Self {
        Self::from_boxed(Box::new(backend), Box::new(identity))
    }

    /// Create a store from already-boxed collaborators.
    pub fn from_boxed(backend: Box<dyn BlobBackend>, identity: Box<dyn IdentityResolver>) -> Self {
        Self {
            backend,
            identity,
            conditional_writes: false,
        }
    }

    /// Guard each store against the version it was read from.
    ///
    /// Only has an effect on backends that enforce [`WriteCondition::IfCurrent`];
    /// a losing writer then gets `BackendError::Conflict` instead of silently
    /// overwriting the other update.
    pub fn with_conditional_writes(mut self, enabled: bool) -> Self {
        if enabled && !self.backend.supports_conditional_writes() {
            warn!(
                backend = self.backend_name(),
                "backend does not enforce conditional writes; concurrent updates may be lost"
            );
        }
        self.conditional_writes = enabled;
        self
    }

    /// Name of the underlying backend.
    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    /// Fetch and decode the current blob. `None` if the service does not exist.
    pub(super) fn fetch_current(&self, service: &str) -> Result<Option<Current>> {
        let blob = match self.backend.get_current(service) {
            Ok(blob) => blob,
            Err(BackendError::NotFound(_)) => {
                debug!(service = %service, "service blob does not exist");
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };

        let empty = blob.payload.is_empty();
        let container = if empty {
            Container::new()
        } else {
            Container::decode(&blob.payload)?
        };

        Ok(Some(Current {
            version_id: blob.version_id,
            container,
            empty,
        }))
    }

    /// Current container for a read. Missing service or empty blob is not found.
    pub(super) fn require_current(&self, service: &str, key: &str) -> Result<Container> {
        match self.fetch_current(service)? {
            Some(current) if !current.empty => Ok(current.container),
            _ => Err(Error::not_found(service, key)),
        }
    }

    /// Non-deprecated backend version ids of a service.
    pub(super) fn snapshot_ids(&self, id: &SecretId) -> Result<Vec<VersionId>> {
        match self.backend.list_version_ids(id.service(), false) {
            Ok(ids) => Ok(ids),
            Err(BackendError::NotFound(_)) => Err(Error::not_found(id.service(), id.key())),
            Err(e) => Err(e.into()),
        }
    }

    /// Decode one historical snapshot. `None` for an empty payload.
    pub(super) fn load_snapshot(&self, service: &str, version_id: &str) -> Result<Option<Container>> {
        let payload = self.backend.get_version(service, version_id)?;
        if payload.is_empty() {
            return Ok(None);
        }
        Container::decode(&payload).map(Some)
    }

    /// Write condition for a store based on `base`.
    pub(super) fn condition_for(&self, base: &Current) -> WriteCondition {
        if self.conditional_writes {
            WriteCondition::IfCurrent(base.version_id.clone())
        } else {
            WriteCondition::Unconditional
        }
    }
}

impl SecretStore for BlobStore {
    #[instrument(level = "debug", skip(self, value), fields(backend = self.backend.name()))]
    fn write(&self, id: &SecretId, value: &str) -> Result<()> {
        validate_id(id)?;
        if value.is_empty() {
            return self.remove_key(id);
        }
        self.put_key(id, value)
    }

    #[instrument(level = "debug", skip(self), fields(backend = self.backend.name()))]
    fn read(&self, id: &SecretId, version: Version) -> Result<Secret> {
        validate_id(id)?;
        match version {
            Version::Latest => self.read_latest(id),
            Version::Number(n) => self.read_version(id, n),
        }
    }

    fn delete(&self, id: &SecretId) -> Result<()> {
        self.write(id, "")
    }

    #[instrument(level = "debug", skip(self), fields(backend = self.backend.name()))]
    fn list(&self, service: &str, include_values: bool) -> Result<Vec<Secret>> {
        validate_service(service)?;
        self.list_secrets(service, include_values)
    }

    #[instrument(level = "debug", skip(self), fields(backend = self.backend.name()))]
    fn list_raw(&self, service: &str) -> Result<Vec<RawSecret>> {
        validate_service(service)?;
        self.list_raw_secrets(service)
    }

    #[instrument(level = "debug", skip(self), fields(backend = self.backend.name()))]
    fn history(&self, id: &SecretId) -> Result<Vec<ChangeEvent>> {
        validate_id(id)?;
        self.collect_history(id)
    }

    fn list_services(&self, _service: &str, _include_secret_name: bool) -> Result<Vec<String>> {
        Err(Error::Unsupported(LIST_SERVICES_UNSUPPORTED.to_string()))
    }
}
