//! Backend and identity test doubles.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use coffer::core::blob::{BackendResult, Blob};
use coffer::core::types::VersionId;
use coffer::error::{BackendError, IdentityError};
use coffer::{BlobBackend, IdentityResolver, InMemory, WriteCondition};

/// Wraps a backend and lists version ids newest-first, each twice, the way an
/// unordered service with duplicate markers might.
pub struct Scrambled {
    pub inner: InMemory,
}

impl BlobBackend for Scrambled {
    fn name(&self) -> &'static str {
        "scrambled"
    }

    fn create_blob(&self, name: &str, payload: &str) -> BackendResult<()> {
        self.inner.create_blob(name, payload)
    }

    fn store_version(
        &self,
        name: &str,
        payload: &str,
        condition: &WriteCondition,
    ) -> BackendResult<()> {
        self.inner.store_version(name, payload, condition)
    }

    fn get_current(&self, name: &str) -> BackendResult<Blob> {
        self.inner.get_current(name)
    }

    fn get_version(&self, name: &str, version_id: &str) -> BackendResult<String> {
        self.inner.get_version(name, version_id)
    }

    fn list_version_ids(
        &self,
        name: &str,
        include_deprecated: bool,
    ) -> BackendResult<Vec<VersionId>> {
        let ids = self.inner.list_version_ids(name, include_deprecated)?;
        Ok(ids
            .iter()
            .rev()
            .flat_map(|id| [id.clone(), id.clone()])
            .collect())
    }
}

/// Backend whose every call fails with a transport error, counting calls.
#[derive(Clone, Default)]
pub struct Unreachable {
    pub calls: Arc<AtomicUsize>,
}

impl Unreachable {
    fn fail<T>(&self) -> BackendResult<T> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(BackendError::Request("connection refused".to_string()))
    }
}

impl BlobBackend for Unreachable {
    fn name(&self) -> &'static str {
        "unreachable"
    }

    fn create_blob(&self, _name: &str, _payload: &str) -> BackendResult<()> {
        self.fail()
    }

    fn store_version(&self, _: &str, _: &str, _: &WriteCondition) -> BackendResult<()> {
        self.fail()
    }

    fn get_current(&self, _name: &str) -> BackendResult<Blob> {
        self.fail()
    }

    fn get_version(&self, _name: &str, _version_id: &str) -> BackendResult<String> {
        self.fail()
    }

    fn list_version_ids(&self, _name: &str, _: bool) -> BackendResult<Vec<VersionId>> {
        self.fail()
    }
}

/// Identity service that is down.
pub struct NoIdentity;

impl IdentityResolver for NoIdentity {
    fn current_principal(&self) -> Result<String, IdentityError> {
        Err(IdentityError::Unavailable("sts unreachable".to_string()))
    }
}

/// Identity that reports a different principal on every call.
#[derive(Default)]
pub struct Rotating {
    next: AtomicUsize,
}

impl IdentityResolver for Rotating {
    fn current_principal(&self) -> Result<String, IdentityError> {
        let n = self.next.fetch_add(1, Ordering::SeqCst);
        Ok(format!("user{}", n + 1))
    }
}
