//! Error types.
//!
//! Collaborator failures keep their own enums so callers can tell a backend
//! problem from a codec problem without string matching.

use thiserror::Error;

/// Top-level error for every coffer operation.
#[derive(Error, Debug)]
pub enum Error {
    /// The service or key does not exist where it is required to.
    #[error("secret not found: {0}")]
    SecretNotFound(String),

    /// A blob payload did not decode into the container layout.
    #[error("malformed container: {0}")]
    MalformedContainer(String),

    /// Serializing a container or metadata document failed.
    #[error("encoding failure: {0}")]
    EncodingFailure(String),

    /// The operation is permanently unavailable on this backend.
    #[error("{0}")]
    Unsupported(String),

    #[error(transparent)]
    Backend(#[from] BackendError),

    #[error(transparent)]
    Identity(#[from] IdentityError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Build a not-found error for a `service/key` pair.
    pub fn not_found(service: &str, key: &str) -> Self {
        Self::SecretNotFound(format!("{}/{}", service, key))
    }

    /// Whether this error means "does not exist" rather than "went wrong".
    ///
    /// A backend-level not-found counts too, so callers only need one check.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::SecretNotFound(_) | Self::Backend(BackendError::NotFound(_))
        )
    }
}

/// Errors raised by a blob versioning backend.
#[derive(Error, Debug)]
pub enum BackendError {
    #[error("blob not found: {0}")]
    NotFound(String),

    #[error("blob already exists: {0}")]
    AlreadyExists(String),

    #[error("blob version not found: {name}@{version_id}")]
    VersionNotFound { name: String, version_id: String },

    /// A conditional write lost against a newer version.
    #[error("blob {name} changed concurrently: expected version {expected}, found {actual}")]
    Conflict {
        name: String,
        expected: String,
        actual: String,
    },

    #[error("backend request failed: {0}")]
    Request(String),

    #[error("backend io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised while resolving the calling principal.
#[derive(Error, Debug)]
pub enum IdentityError {
    #[error("unable to resolve caller identity: {0}")]
    Unavailable(String),
}

/// Input validation errors.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("service name cannot be empty")]
    EmptyService,

    #[error("secret key cannot be empty")]
    EmptyKey,

    #[error("'{0}' is reserved for metadata and cannot be used as a secret key")]
    ReservedKey(String),
}

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("unknown backend '{0}' (expected 'filesystem' or 'aws')")]
    UnknownBackend(String),

    #[error("backend '{0}' requires building with `--features {0}`")]
    FeatureDisabled(&'static str),

    #[error("unable to determine home directory")]
    NoHomeDir,
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_classification() {
        assert!(Error::not_found("app", "db").is_not_found());
        assert!(Error::from(BackendError::NotFound("app".into())).is_not_found());
        assert!(!Error::from(BackendError::Request("denied".into())).is_not_found());
        assert!(!Error::Unsupported("nope".into()).is_not_found());
    }

    #[test]
    fn test_not_found_message() {
        let err = Error::not_found("app", "db_password");
        assert_eq!(err.to_string(), "secret not found: app/db_password");
    }
}
