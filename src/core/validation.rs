//! Input validation for store operations.

use crate::core::constants::METADATA_KEY;
use crate::core::domain::SecretId;
use crate::error::{Result, ValidationError};

/// Validate a service name.
///
/// # Errors
///
/// Returns `ValidationError::EmptyService` if the name is empty or whitespace.
pub fn validate_service(service: &str) -> Result<()> {
    if service.trim().is_empty() {
        return Err(ValidationError::EmptyService.into());
    }
    Ok(())
}

/// Validate a secret key name.
///
/// Keys may contain anything except the reserved metadata key, which would
/// clobber the embedded metadata document.
///
/// # Errors
///
/// Returns `ValidationError` if the key is empty or reserved.
pub fn validate_key(key: &str) -> Result<()> {
    if key.is_empty() {
        return Err(ValidationError::EmptyKey.into());
    }
    if key == METADATA_KEY {
        return Err(ValidationError::ReservedKey(key.to_string()).into());
    }
    Ok(())
}

/// Validate both halves of a secret id.
pub fn validate_id(id: &SecretId) -> Result<()> {
    validate_service(id.service())?;
    validate_key(id.key())
}
