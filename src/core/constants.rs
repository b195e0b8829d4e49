//! Constants used throughout coffer.
//!
//! Centralizes magic strings and configuration values.

/// Reserved container key holding the serialized metadata document.
///
/// Part of the persisted blob layout; changing it orphans existing metadata.
pub const METADATA_KEY: &str = "_coffer_metadata";

/// Configuration file name, looked up in the working directory.
pub const CONFIG_FILE: &str = "coffer.toml";

/// Environment variable pointing at an explicit config file.
pub const CONFIG_ENV: &str = "COFFER_CONFIG";

/// Environment variable overriding the configured backend.
pub const BACKEND_ENV: &str = "COFFER_BACKEND";

/// Environment variable overriding the attributed principal.
pub const PRINCIPAL_ENV: &str = "COFFER_PRINCIPAL";

/// Environment variable overriding the filesystem backend root.
pub const FS_ROOT_ENV: &str = "COFFER_FS_ROOT";

/// Environment variable holding the tracing filter.
pub const LOG_ENV: &str = "COFFER_LOG";

/// Default blob directory relative to HOME (~/.coffer/blobs).
pub const BLOB_DIR: &str = ".coffer/blobs";

/// Read selector meaning "the latest version".
pub const LATEST_VERSION: i64 = -1;

/// Message returned by operations a backend cannot provide.
pub const LIST_SERVICES_UNSUPPORTED: &str =
    "the blob backend does not implement listing services";
