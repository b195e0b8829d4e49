//! Filesystem blob backend.
//!
//! Each blob is a directory under the root (`~/.coffer/blobs/` by default):
//!
//! ```text
//! <root>/<encoded-name>/
//! ├── CURRENT              # id of the current version
//! └── versions/
//!     ├── 00000001.json
//!     └── 00000002.json
//! ```
//!
//! Every file is written under a unique temporary name and renamed into
//! place, so readers never see a partial version or pointer. A new blob is
//! assembled in a hidden staging directory and renamed in whole. Version
//! files are written with 0600 permissions on Unix.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use tracing::{debug, trace};

use super::{BackendResult, Blob, BlobBackend, WriteCondition};
use crate::core::types::VersionId;
use crate::error::BackendError;

const CURRENT_FILE: &str = "CURRENT";
const VERSIONS_DIR: &str = "versions";
const VERSION_EXT: &str = "json";

/// Filesystem-based blob storage.
#[derive(Debug, Clone)]
pub struct Filesystem {
    root: PathBuf,
    retained: Option<usize>,
}

impl Filesystem {
    /// Store blobs under `root`. The directory is created on first write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            retained: None,
        }
    }

    /// Only the newest `retained` versions stay non-deprecated.
    pub fn with_retention(mut self, retained: Option<usize>) -> Self {
        self.retained = retained.map(|n| n.max(1));
        self
    }

    /// Directory holding one blob.
    fn blob_dir(&self, name: &str) -> PathBuf {
        self.root.join(encode_name(name))
    }

    fn version_path(&self, name: &str, version_id: &str) -> PathBuf {
        self.blob_dir(name)
            .join(VERSIONS_DIR)
            .join(format!("{}.{}", version_id, VERSION_EXT))
    }

    fn read_current_id(&self, name: &str) -> BackendResult<VersionId> {
        let path = self.blob_dir(name).join(CURRENT_FILE);
        match fs::read_to_string(&path) {
            Ok(id) => Ok(id.trim().to_string()),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Err(BackendError::NotFound(name.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// All version ids in ascending order.
    fn all_version_ids(&self, name: &str) -> BackendResult<Vec<VersionId>> {
        let dir = self.blob_dir(name).join(VERSIONS_DIR);
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(BackendError::NotFound(name.to_string()))
            }
            Err(e) => return Err(e.into()),
        };

        let mut ids = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some(VERSION_EXT) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                ids.push(stem.to_string());
            }
        }
        ids.sort();
        Ok(ids)
    }

    /// Move a fully written staging directory to `dir`.
    ///
    /// A directory left without CURRENT by an interrupted create is replaced.
    fn publish(&self, name: &str, staging: &Path, dir: &Path) -> BackendResult<()> {
        if dir.join(CURRENT_FILE).exists() {
            return Err(BackendError::AlreadyExists(name.to_string()));
        }
        if dir.exists() {
            debug!(blob = %name, dir = %dir.display(), "replacing incomplete blob directory");
            fs::remove_dir_all(dir)?;
        }

        match fs::rename(staging, dir) {
            Ok(()) => Ok(()),
            Err(_) if dir.join(CURRENT_FILE).exists() => {
                Err(BackendError::AlreadyExists(name.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }
}

/// Write a new version file in `dir` and point CURRENT at it.
fn append(dir: &Path, payload: &str, next: u64) -> BackendResult<()> {
    let version_id = format!("{:08}", next);
    let path = dir
        .join(VERSIONS_DIR)
        .join(format!("{}.{}", version_id, VERSION_EXT));
    trace!(path = %path.display(), "writing blob version");

    write_private(&path, payload)?;
    write_private(&dir.join(CURRENT_FILE), &version_id)?;
    Ok(())
}

impl BlobBackend for Filesystem {
    fn name(&self) -> &'static str {
        "filesystem"
    }

    fn create_blob(&self, name: &str, payload: &str) -> BackendResult<()> {
        let dir = self.blob_dir(name);
        if dir.join(CURRENT_FILE).exists() {
            return Err(BackendError::AlreadyExists(name.to_string()));
        }

        fs::create_dir_all(&self.root)?;
        let staging = temp_path(&self.root, &encode_name(name));
        let result = fs::create_dir(&staging)
            .and_then(|()| fs::create_dir(staging.join(VERSIONS_DIR)))
            .map_err(BackendError::from)
            .and_then(|()| append(&staging, payload, 1))
            .and_then(|()| self.publish(name, &staging, &dir));

        if result.is_err() {
            let _ = fs::remove_dir_all(&staging);
            return result;
        }

        debug!(blob = %name, dir = %dir.display(), "created blob directory");
        Ok(())
    }

    fn store_version(
        &self,
        name: &str,
        payload: &str,
        condition: &WriteCondition,
    ) -> BackendResult<()> {
        let current = self.read_current_id(name)?;

        if let WriteCondition::IfCurrent(expected) = condition {
            if &current != expected {
                return Err(BackendError::Conflict {
                    name: name.to_string(),
                    expected: expected.clone(),
                    actual: current,
                });
            }
        }

        let last = self
            .all_version_ids(name)?
            .iter()
            .filter_map(|id| id.parse::<u64>().ok())
            .max()
            .unwrap_or(0);
        append(&self.blob_dir(name), payload, last + 1)
    }

    fn get_current(&self, name: &str) -> BackendResult<Blob> {
        let version_id = self.read_current_id(name)?;
        let payload = self.get_version(name, &version_id)?;
        Ok(Blob {
            version_id,
            payload,
        })
    }

    fn get_version(&self, name: &str, version_id: &str) -> BackendResult<String> {
        let path = self.version_path(name, version_id);
        match fs::read_to_string(&path) {
            Ok(payload) => Ok(payload),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(BackendError::VersionNotFound {
                name: name.to_string(),
                version_id: version_id.to_string(),
            }),
            Err(e) => Err(e.into()),
        }
    }

    fn list_version_ids(
        &self,
        name: &str,
        include_deprecated: bool,
    ) -> BackendResult<Vec<VersionId>> {
        let mut ids = self.all_version_ids(name)?;
        if let (false, Some(retained)) = (include_deprecated, self.retained) {
            let skip = ids.len().saturating_sub(retained);
            ids.drain(..skip);
        }
        Ok(ids)
    }

    fn supports_conditional_writes(&self) -> bool {
        true
    }
}

/// Make a blob name safe as a single path component.
///
/// ASCII alphanumerics, `-` and `_` pass through; every other byte becomes `%XX`.
fn encode_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for byte in name.bytes() {
        if byte.is_ascii_alphanumeric() || byte == b'-' || byte == b'_' {
            out.push(byte as char);
        } else {
            out.push_str(&format!("%{:02X}", byte));
        }
    }
    out
}

/// Hidden sibling path unique to this process and call.
///
/// Encoded names never start with `.`, so these never collide with a blob.
fn temp_path(dir: &Path, stem: &str) -> PathBuf {
    static COUNTER: AtomicU64 = AtomicU64::new(0);
    let n = COUNTER.fetch_add(1, Ordering::Relaxed);
    dir.join(format!(".{}.{}.{}.tmp", stem, std::process::id(), n))
}

/// Write a file readable only by the owner (Unix), replacing `path` atomically.
fn write_private(path: &Path, contents: &str) -> std::io::Result<()> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let stem = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("file");
    let tmp = temp_path(dir, stem);

    let result = fs::write(&tmp, contents)
        .and_then(|()| restrict(&tmp))
        .and_then(|()| fs::rename(&tmp, path));
    if result.is_err() {
        let _ = fs::remove_file(&tmp);
    }
    result
}

#[cfg(unix)]
fn restrict(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o600))
}

#[cfg(not(unix))]
fn restrict(_path: &Path) -> std::io::Result<()> {
    Ok(())
}
