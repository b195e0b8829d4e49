//! Test support utilities for coffer integration tests.
//!
//! Provides store setup, backend/identity test doubles, and a CLI harness.

#![allow(dead_code)]

pub mod assertions;
pub mod doubles;

#[allow(unused_imports)]
pub use assertions::*;
#[allow(unused_imports)]
pub use doubles::*;

use assert_cmd::Command;
use coffer::{BlobStore, InMemory, SecretId, StaticIdentity};
use tempfile::TempDir;

/// Principal attributed to writes in tests.
pub const TEST_USER: &str = "tester@ci";

/// A store over a fresh in-memory backend, plus a handle to that backend.
pub fn memory_store() -> (InMemory, BlobStore) {
    let backend = InMemory::new();
    let store = BlobStore::new(backend.clone(), StaticIdentity::new(TEST_USER));
    (backend, store)
}

/// Shorthand for building ids.
pub fn id(service: &str, key: &str) -> SecretId {
    SecretId::new(service, key)
}

/// CLI test environment with its own blob directory.
///
/// Child processes get their environment explicitly, so tests can run in
/// parallel without touching process-global state.
pub struct Cli {
    pub dir: TempDir,
}

impl Cli {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("failed to create temp dir"),
        }
    }

    /// A `coffer` command wired to this environment.
    pub fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("coffer").expect("binary not built");
        cmd.current_dir(self.dir.path())
            .env("COFFER_CONFIG", self.dir.path().join("coffer.toml"))
            .env("COFFER_BACKEND", "filesystem")
            .env("COFFER_FS_ROOT", self.dir.path().join("blobs"))
            .env("COFFER_PRINCIPAL", TEST_USER)
            .env("NO_COLOR", "1")
            .env_remove("COFFER_LOG");
        cmd
    }

    /// Run `coffer write`.
    pub fn write(&self, service: &str, key: &str, value: &str) -> std::process::Output {
        self.cmd()
            .args(["write", service, key, value])
            .output()
            .expect("failed to run coffer")
    }
}

impl Default for Cli {
    fn default() -> Self {
        Self::new()
    }
}
