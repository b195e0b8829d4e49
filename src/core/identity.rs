//! Caller identity resolution.
//!
//! Every write is attributed to the principal returned here.

use tracing::debug;

use crate::core::types::Principal;
use crate::error::IdentityError;

/// Resolves the principal making the current call.
pub trait IdentityResolver: Send + Sync {
    /// Stable identifier of the caller.
    ///
    /// # Errors
    ///
    /// Returns `IdentityError::Unavailable` if the caller cannot be determined.
    fn current_principal(&self) -> Result<Principal, IdentityError>;
}

/// Local OS user, reported as `user@host`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalIdentity;

impl IdentityResolver for LocalIdentity {
    fn current_principal(&self) -> Result<Principal, IdentityError> {
        let user = whoami::username();
        if user.trim().is_empty() {
            return Err(IdentityError::Unavailable(
                "current user has no name".to_string(),
            ));
        }

        let principal = match whoami::fallible::hostname() {
            Ok(host) if !host.is_empty() => format!("{}@{}", user, host),
            _ => user,
        };
        debug!(%principal, "resolved local identity");
        Ok(principal)
    }
}

/// A fixed principal, for configured overrides and tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticIdentity {
    principal: Principal,
}

impl StaticIdentity {
    pub fn new(principal: impl Into<Principal>) -> Self {
        Self {
            principal: principal.into(),
        }
    }
}

impl IdentityResolver for StaticIdentity {
    fn current_principal(&self) -> Result<Principal, IdentityError> {
        Ok(self.principal.clone())
    }
}
