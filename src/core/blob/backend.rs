//! Backend selection logic.
//!
//! Turns the configured backend kind into a blob backend, plus the identity
//! resolver that belongs with it when the backend has one.

use tracing::info;

use super::{BlobBackend, Filesystem};
use crate::core::config::{BackendKind, Config};
use crate::core::identity::IdentityResolver;
use crate::error::Result;

/// Backend and its native identity resolver, if any.
pub type BackendParts = (Box<dyn BlobBackend>, Option<Box<dyn IdentityResolver>>);

/// Open the backend named by `config`.
///
/// # Errors
///
/// Returns `ConfigError::FeatureDisabled` when the backend was not compiled in.
pub fn open_backend(config: &Config) -> Result<BackendParts> {
    match config.backend {
        BackendKind::Filesystem => {
            let root = config.filesystem_root()?;
            info!(root = %root.display(), "using filesystem backend");
            let backend =
                Filesystem::new(root).with_retention(config.filesystem.retained_versions);
            Ok((Box::new(backend), None))
        }
        BackendKind::Aws => open_aws(config),
    }
}

#[cfg(feature = "aws")]
fn open_aws(config: &Config) -> Result<BackendParts> {
    use crate::core::aws::{AwsSession, CallerIdentity, SecretsManager};

    info!(region = ?config.aws.region, "using AWS Secrets Manager backend");
    let session = AwsSession::connect(&config.aws)?;
    Ok((
        Box::new(SecretsManager::new(&session)),
        Some(Box::new(CallerIdentity::new(&session))),
    ))
}

#[cfg(not(feature = "aws"))]
fn open_aws(_config: &Config) -> Result<BackendParts> {
    Err(crate::error::ConfigError::FeatureDisabled("aws").into())
}
