//! Configuration file management.
//!
//! Reads `coffer.toml` (or the file named by `COFFER_CONFIG`) and applies
//! environment overrides. A missing file means defaults: filesystem backend
//! under `~/.coffer/blobs`, local user attribution.
//!
//! ```toml
//! backend = "aws"
//! principal = "ci@build"
//! conditional_writes = false
//!
//! [filesystem]
//! root = "/var/lib/coffer"
//! retained_versions = 100
//!
//! [aws]
//! region = "us-east-1"
//! endpoint = "http://localhost:4566"
//! retries = 5
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::blob;
use crate::core::constants;
use crate::core::identity::{IdentityResolver, LocalIdentity, StaticIdentity};
use crate::core::store::BlobStore;
use crate::error::{ConfigError, Result};

/// Which blob backend to use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    #[default]
    Filesystem,
    Aws,
}

impl std::str::FromStr for BackendKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "filesystem" | "fs" => Ok(Self::Filesystem),
            "aws" | "secretsmanager" => Ok(Self::Aws),
            other => Err(ConfigError::UnknownBackend(other.to_string())),
        }
    }
}

/// Filesystem backend settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilesystemConfig {
    /// Blob directory; defaults to `~/.coffer/blobs`.
    pub root: Option<PathBuf>,
    /// Versions kept visible to history reads.
    pub retained_versions: Option<usize>,
}

/// AWS backend settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AwsConfig {
    pub region: Option<String>,
    /// Custom endpoint, e.g. a local emulator.
    pub endpoint: Option<String>,
    /// Maximum SDK attempts per request.
    pub retries: Option<u32>,
}

/// Store configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub backend: BackendKind,
    /// Fixed principal for attribution instead of asking the identity service.
    pub principal: Option<String>,
    /// Pass the base version to the backend as a write precondition.
    pub conditional_writes: bool,
    pub filesystem: FilesystemConfig,
    pub aws: AwsConfig,
}

impl Config {
    /// Default config path: `coffer.toml` in the current directory.
    pub fn config_path() -> PathBuf {
        std::env::var_os(constants::CONFIG_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(constants::CONFIG_FILE))
    }

    /// Load configuration from `path` (or the default path) plus environment
    /// overrides.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ReadFile` if the file exists but cannot be read,
    /// `ConfigError::Parse` if the TOML is malformed, or
    /// `ConfigError::UnknownBackend` for a bad `COFFER_BACKEND`.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = path.map(Path::to_path_buf).unwrap_or_else(Self::config_path);

        let mut config = if path.exists() {
            debug!(path = %path.display(), "loading config");
            let contents = std::fs::read_to_string(&path).map_err(ConfigError::ReadFile)?;
            Self::parse(&contents)?
        } else {
            debug!(path = %path.display(), "no config file, using defaults");
            Self::default()
        };

        config.apply_env()?;
        debug!(backend = ?config.backend, "config loaded");
        Ok(config)
    }

    /// Parse TOML contents.
    pub fn parse(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents).map_err(ConfigError::Parse)?)
    }

    fn apply_env(&mut self) -> Result<()> {
        if let Ok(backend) = std::env::var(constants::BACKEND_ENV) {
            self.backend = backend.parse()?;
        }
        if let Ok(principal) = std::env::var(constants::PRINCIPAL_ENV) {
            if !principal.trim().is_empty() {
                self.principal = Some(principal);
            }
        }
        if let Some(root) = std::env::var_os(constants::FS_ROOT_ENV) {
            self.filesystem.root = Some(PathBuf::from(root));
        }
        Ok(())
    }

    /// Filesystem root, falling back to `~/.coffer/blobs`.
    pub fn filesystem_root(&self) -> Result<PathBuf> {
        if let Some(root) = &self.filesystem.root {
            return Ok(root.clone());
        }
        let home = dirs::home_dir().ok_or(ConfigError::NoHomeDir)?;
        Ok(home.join(constants::BLOB_DIR))
    }

    /// Identity resolver to attribute writes with, unless a backend
    /// supplies its own.
    pub(crate) fn identity_override(&self) -> Option<Box<dyn IdentityResolver>> {
        self.principal
            .as_ref()
            .map(|p| Box::new(StaticIdentity::new(p.clone())) as Box<dyn IdentityResolver>)
    }

    /// Build a store from this configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::FeatureDisabled` if the configured backend was
    /// not compiled in, or any error from constructing it.
    pub fn open_store(&self) -> Result<BlobStore> {
        let (backend, identity) = blob::open_backend(self)?;
        let identity = self
            .identity_override()
            .or(identity)
            .unwrap_or_else(|| Box::new(LocalIdentity));

        Ok(BlobStore::from_boxed(backend, identity).with_conditional_writes(self.conditional_writes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let config = Config::parse(
            r#"
            backend = "aws"
            principal = "ci@build"
            conditional_writes = true

            [filesystem]
            root = "/tmp/blobs"
            retained_versions = 10

            [aws]
            region = "eu-west-1"
            retries = 3
            "#,
        )
        .unwrap();

        assert_eq!(config.backend, BackendKind::Aws);
        assert_eq!(config.principal.as_deref(), Some("ci@build"));
        assert!(config.conditional_writes);
        assert_eq!(config.filesystem.root, Some(PathBuf::from("/tmp/blobs")));
        assert_eq!(config.filesystem.retained_versions, Some(10));
        assert_eq!(config.aws.region.as_deref(), Some("eu-west-1"));
        assert_eq!(config.aws.retries, Some(3));
        assert!(config.aws.endpoint.is_none());
    }

    #[test]
    fn test_parse_empty_is_default() {
        let config = Config::parse("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.backend, BackendKind::Filesystem);
        assert!(!config.conditional_writes);
    }

    #[test]
    fn test_parse_rejects_unknown_backend() {
        assert!(Config::parse(r#"backend = "floppy""#).is_err());
    }

    #[test]
    fn test_backend_kind_from_str() {
        assert_eq!("fs".parse::<BackendKind>().unwrap(), BackendKind::Filesystem);
        assert_eq!("AWS".parse::<BackendKind>().unwrap(), BackendKind::Aws);
        assert!(matches!(
            "tape".parse::<BackendKind>(),
            Err(ConfigError::UnknownBackend(_))
        ));
    }

    #[test]
    fn test_filesystem_root_explicit() {
        let mut config = Config::default();
        config.filesystem.root = Some(PathBuf::from("/srv/coffer"));
        assert_eq!(config.filesystem_root().unwrap(), PathBuf::from("/srv/coffer"));
    }

    #[test]
    fn test_principal_override_used() {
        let config = Config {
            principal: Some("deployer".to_string()),
            ..Config::default()
        };
        let identity = config.identity_override().unwrap();
        assert_eq!(identity.current_principal().unwrap(), "deployer");
    }
}
