//! Blob versioning backends.
//!
//! A backend knows nothing about keys: it stores whole payloads under a name,
//! keeps a history of them, and hands back the current or a historical one.
//! Per-key versioning is layered on top by [`crate::core::store`].
//!
//! ## Adding a New Backend
//!
//! 1. Implement the `BlobBackend` trait
//! 2. Add the implementation in a new file (e.g., `s3.rs`, `gcs.rs`)
//! 3. Feature-gate if it pulls in an SDK
//! 4. Wire it into `open_backend`
//!
//! ## Example
//!
//! ```ignore
//! struct Remote { /* ... */ }
//!
//! impl BlobBackend for Remote {
//!     fn name(&self) -> &'static str { "remote" }
//!     fn create_blob(&self, name: &str, payload: &str) -> BackendResult<()> { /* ... */ }
//!     fn store_version(&self, name: &str, payload: &str, condition: &WriteCondition) -> BackendResult<()> { /* ... */ }
//!     fn get_current(&self, name: &str) -> BackendResult<Blob> { /* ... */ }
//!     fn get_version(&self, name: &str, version_id: &str) -> BackendResult<String> { /* ... */ }
//!     fn list_version_ids(&self, name: &str, include_deprecated: bool) -> BackendResult<Vec<VersionId>> { /* ... */ }
//! }
//! ```

mod backend;
mod fs;
mod memory;

pub use backend::open_backend;
pub use fs::Filesystem;
pub use memory::InMemory;

use crate::core::types::VersionId;
use crate::error::BackendError;

/// Result type for backend calls.
pub type BackendResult<T> = std::result::Result<T, BackendError>;

/// The current blob of a service together with its backend version id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blob {
    pub version_id: VersionId,
    pub payload: String,
}

/// Precondition attached to a new version.
///
/// Backends that cannot compare-and-swap ignore it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum WriteCondition {
    /// Append unconditionally.
    #[default]
    Unconditional,
    /// Append only if the current version is still this one.
    IfCurrent(VersionId),
}

/// Blob versioning service.
///
/// Implementations must be safe to share across threads; they hold only
/// connection handles and no per-call state.
pub trait BlobBackend: Send + Sync {
    /// Backend display name, used in logs.
    fn name(&self) -> &'static str;

    /// Create a new blob.
    ///
    /// # Errors
    ///
    /// Returns `BackendError::AlreadyExists` if a blob with that name exists.
    fn create_blob(&self, name: &str, payload: &str) -> BackendResult<()>;

    /// Append a new current version to an existing blob.
    ///
    /// # Errors
    ///
    /// Returns `BackendError::NotFound` if the blob does not exist, or
    /// `BackendError::Conflict` if `condition` is enforced and fails.
    fn store_version(&self, name: &str, payload: &str, condition: &WriteCondition)
        -> BackendResult<()>;

    /// Fetch the current version.
    ///
    /// # Errors
    ///
    /// Returns `BackendError::NotFound` if the blob does not exist.
    fn get_current(&self, name: &str) -> BackendResult<Blob>;

    /// Fetch the payload of a specific version.
    fn get_version(&self, name: &str, version_id: &str) -> BackendResult<String>;

    /// List version ids. Callers must not rely on the order.
    fn list_version_ids(&self, name: &str, include_deprecated: bool)
        -> BackendResult<Vec<VersionId>>;

    /// Whether `WriteCondition::IfCurrent` is enforced.
    fn supports_conditional_writes(&self) -> bool {
        false
    }
}
