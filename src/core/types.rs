//! Type aliases for domain concepts.
//!
//! Provides semantic type aliases to make function signatures more descriptive.

/// A service name: the name of the blob holding a group of secrets.
pub type ServiceName = String;

/// A secret key name, unique within its service.
pub type SecretKey = String;

/// A plaintext secret value.
pub type SecretValue = String;

/// Identifier of the calling principal (user@host, ARN, ...).
pub type Principal = String;

/// Opaque version identifier assigned by the blob backend.
///
/// Unrelated to per-key version numbers.
pub type VersionId = String;
