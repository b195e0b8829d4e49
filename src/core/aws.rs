//! AWS Secrets Manager blob backend and STS identity.
//!
//! Enable with `--features aws`.
//!
//! Each service maps to one Secrets Manager secret whose `SecretString` is the
//! container payload. Secrets Manager version ids are the blob version ids;
//! versions that lost every staging label are "deprecated" and excluded from
//! history scans. Writes are attributed to the caller ARN from
//! `sts:GetCallerIdentity`.
//!
//! Credentials come from the default provider chain (environment, profile,
//! instance role, ...).

use std::sync::Arc;

use aws_config::retry::RetryConfig;
use aws_config::{BehaviorVersion, Region, SdkConfig};
use aws_sdk_secretsmanager::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use tokio::runtime::Runtime;
use tracing::{debug, trace};

use crate::core::blob::{BackendResult, Blob, BlobBackend, WriteCondition};
use crate::core::config::AwsConfig;
use crate::core::identity::IdentityResolver;
use crate::core::types::{Principal, VersionId};
use crate::error::{BackendError, IdentityError, Result};

/// Shared SDK configuration and the runtime used to drive it.
///
/// The store is synchronous; every SDK call is driven to completion on a
/// current-thread runtime owned here.
#[derive(Clone)]
pub struct AwsSession {
    runtime: Arc<Runtime>,
    config: SdkConfig,
}

impl AwsSession {
    /// Load AWS configuration with optional region, endpoint, and retry overrides.
    pub fn connect(settings: &AwsConfig) -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| BackendError::Request(format!("failed to create runtime: {}", e)))?;

        let mut loader = aws_config::defaults(BehaviorVersion::latest());
        if let Some(region) = &settings.region {
            loader = loader.region(Region::new(region.clone()));
        }
        if let Some(endpoint) = settings.endpoint.as_deref().filter(|e| !e.trim().is_empty()) {
            loader = loader.endpoint_url(endpoint);
        }
        if let Some(retries) = settings.retries {
            loader = loader.retry_config(RetryConfig::standard().with_max_attempts(retries.max(1)));
        }

        let config = runtime.block_on(loader.load());
        debug!(region = ?config.region(), "loaded AWS config");

        Ok(Self {
            runtime: Arc::new(runtime),
            config,
        })
    }
}

/// Secrets Manager as a blob versioning backend.
///
/// Does not enforce [`WriteCondition::IfCurrent`].
pub struct SecretsManager {
    client: aws_sdk_secretsmanager::Client,
    runtime: Arc<Runtime>,
}

impl SecretsManager {
    pub fn new(session: &AwsSession) -> Self {
        Self {
            client: aws_sdk_secretsmanager::Client::new(&session.config),
            runtime: Arc::clone(&session.runtime),
        }
    }
}

/// Map an SDK failure onto the backend error taxonomy.
fn classify<E, R>(operation: &str, name: &str, err: SdkError<E, R>) -> BackendError
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
    R: std::fmt::Debug,
{
    match err.code() {
        Some("ResourceNotFoundException") => BackendError::NotFound(name.to_string()),
        Some("ResourceExistsException") => BackendError::AlreadyExists(name.to_string()),
        _ => BackendError::Request(format!("{} {}: {}", operation, name, DisplayErrorContext(&err))),
    }
}

impl BlobBackend for SecretsManager {
    fn name(&self) -> &'static str {
        "aws-secretsmanager"
    }

    fn create_blob(&self, name: &str, payload: &str) -> BackendResult<()> {
        trace!(blob = %name, "CreateSecret");
        self.runtime.block_on(async {
            self.client
                .create_secret()
                .name(name)
                .secret_string(payload)
                .send()
                .await
                .map(|_| ())
                .map_err(|e| classify("CreateSecret", name, e))
        })
    }

    fn store_version(
        &self,
        name: &str,
        payload: &str,
        _condition: &WriteCondition,
    ) -> BackendResult<()> {
        trace!(blob = %name, "PutSecretValue");
        self.runtime.block_on(async {
            self.client
                .put_secret_value()
                .secret_id(name)
                .secret_string(payload)
                .send()
                .await
                .map(|_| ())
                .map_err(|e| classify("PutSecretValue", name, e))
        })
    }

    fn get_current(&self, name: &str) -> BackendResult<Blob> {
        trace!(blob = %name, "GetSecretValue (current)");
        self.runtime.block_on(async {
            let output = self
                .client
                .get_secret_value()
                .secret_id(name)
                .send()
                .await
                .map_err(|e| classify("GetSecretValue", name, e))?;
            Ok::<_, BackendError>(Blob {
                version_id: output.version_id().unwrap_or_default().to_string(),
                payload: output.secret_string().unwrap_or_default().to_string(),
            })
        })
    }

    fn get_version(&self, name: &str, version_id: &str) -> BackendResult<String> {
        trace!(blob = %name, version_id = %version_id, "GetSecretValue");
        self.runtime.block_on(async {
            let output = self
                .client
                .get_secret_value()
                .secret_id(name)
                .version_id(version_id)
                .send()
                .await
                .map_err(|e| classify("GetSecretValue", name, e))?;
            Ok::<_, BackendError>(output.secret_string().unwrap_or_default().to_string())
        })
    }

    fn list_version_ids(
        &self,
        name: &str,
        include_deprecated: bool,
    ) -> BackendResult<Vec<VersionId>> {
        self.runtime.block_on(async {
            let mut ids = Vec::new();
            let mut token: Option<String> = None;

            loop {
                let mut request = self
                    .client
                    .list_secret_version_ids()
                    .secret_id(name)
                    .include_deprecated(include_deprecated);
                if let Some(next) = &token {
                    request = request.next_token(next);
                }

                let page = request
                    .send()
                    .await
                    .map_err(|e| classify("ListSecretVersionIds", name, e))?;
                ids.extend(
                    page.versions()
                        .iter()
                        .filter_map(|v| v.version_id().map(str::to_string)),
                );

                match page.next_token() {
                    Some(next) => token = Some(next.to_string()),
                    None => break,
                }
            }

            trace!(blob = %name, count = ids.len(), "listed secret versions");
            Ok::<_, BackendError>(ids)
        })
    }
}

/// Caller ARN from `sts:GetCallerIdentity`.
pub struct CallerIdentity {
    client: aws_sdk_sts::Client,
    runtime: Arc<Runtime>,
}

impl CallerIdentity {
    pub fn new(session: &AwsSession) -> Self {
        Self {
            client: aws_sdk_sts::Client::new(&session.config),
            runtime: Arc::clone(&session.runtime),
        }
    }
}

impl IdentityResolver for CallerIdentity {
    fn current_principal(&self) -> std::result::Result<Principal, IdentityError> {
        self.runtime.block_on(async {
            let output = self
                .client
                .get_caller_identity()
                .send()
                .await
                .map_err(|e| {
                    IdentityError::Unavailable(format!(
                        "GetCallerIdentity: {}",
                        aws_sdk_sts::error::DisplayErrorContext(&e)
                    ))
                })?;
            output
                .arn()
                .map(str::to_string)
                .ok_or_else(|| IdentityError::Unavailable("caller identity has no ARN".into()))
        })
    }
}
