//! Secret identifier.

use crate::core::types::{SecretKey, ServiceName};

/// Identifies one secret: the service (blob name) and the key inside it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SecretId {
    service: ServiceName,
    key: SecretKey,
}

impl SecretId {
    /// Create a new secret id.
    pub fn new(service: impl Into<ServiceName>, key: impl Into<SecretKey>) -> Self {
        Self {
            service: service.into(),
            key: key.into(),
        }
    }

    /// Service (blob) name.
    pub fn service(&self) -> &str {
        &self.service
    }

    /// Key name within the service.
    pub fn key(&self) -> &str {
        &self.key
    }
}

impl std::fmt::Display for SecretId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.service, self.key)
    }
}
