//! Coffer - per-key versioned secrets on top of whole-blob versioning.
//!
//! # Architecture
//!
//! ```text
//! src/
//! ├── cli/              # Command-line interface
//! │   ├── secrets       # write/read/delete/list/export/history
//! │   └── output        # Terminal output helpers
//! └── core/             # Core library components
//!     ├── blob/         # Blob versioning backends
//!     │   ├── mod       # BlobBackend trait
//!     │   ├── memory    # In-process backend
//!     │   └── fs        # Filesystem backend
//!     ├── aws           # Secrets Manager backend + STS identity (feature `aws`)
//!     ├── codec/        # Container and metadata encoding
//!     ├── store/        # Versioned write/read/history/list engine
//!     ├── identity      # Caller identity resolution
//!     ├── domain/       # SecretId, Secret, ChangeEvent, Version
//!     └── config        # coffer.toml handling
//! ```
//!
//! # Example
//!
//! ```
//! use coffer::{BlobStore, InMemory, SecretId, SecretStore, StaticIdentity, Version};
//!
//! let store = BlobStore::new(InMemory::new(), StaticIdentity::new("alice"));
//! let id = SecretId::new("app", "db_password");
//!
//! store.write(&id, "s3cr3t").unwrap();
//! let secret = store.read(&id, Version::Latest).unwrap();
//! assert_eq!(secret.value.as_deref(), Some("s3cr3t"));
//! assert_eq!(secret.meta.version, 1);
//! ```

pub mod cli;
pub mod core;
pub mod error;

pub use crate::core::blob::{BlobBackend, Filesystem, InMemory, WriteCondition};
pub use crate::core::config::Config;
pub use crate::core::domain::{ChangeEvent, ChangeType, RawSecret, Secret, SecretId, Version};
pub use crate::core::identity::{IdentityResolver, LocalIdentity, StaticIdentity};
pub use crate::core::store::{BlobStore, SecretStore};
pub use crate::error::{Error, Result};
