//! Test assertion helpers.

use std::process::Output;

use coffer::Error;

/// Assert that a command output was successful.
pub fn assert_success(output: &Output) {
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        panic!("Command failed:\n{}", stderr);
    }
}

/// Assert that a command output failed.
pub fn assert_failure(output: &Output) {
    assert!(
        !output.status.success(),
        "Expected command to fail but it succeeded"
    );
}

/// Get stdout as String.
pub fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

/// Get stderr as String.
pub fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

/// Assert that a store result is a not-found error.
#[track_caller]
pub fn assert_not_found<T: std::fmt::Debug>(result: coffer::Result<T>) {
    match result {
        Err(Error::SecretNotFound(_)) => {}
        other => panic!("expected SecretNotFound, got {:?}", other),
    }
}
