//! Secret Store
//!
//! Secrets are addressed by full resource names:
//! `projects/<project>/secrets/<secret>/versions/<version>`. Payloads carry a
//! CRC32C checksum that is verified on every fetch.

pub mod client;
pub mod commands;

use crate::error::BootstrapError;
use async_trait::async_trait;
use tracing::{error, info};

pub use client::SecretManagerClient;
pub use commands::{
    read_version_data, SecretAddVersionResult, SecretCommandService, SecretCreateResult,
    SecretGetResult, SecretListResult,
};

/// Version alias resolving to the newest enabled version.
pub const LATEST_VERSION: &str = "latest";

/// `projects/<project>/secrets/<secret>`
pub fn secret_name(project_id: &str, secret_id: &str) -> String {
    format!("projects/{}/secrets/{}", project_id, secret_id)
}

/// `projects/<project>/secrets/<secret>/versions/<version>`
pub fn version_name(project_id: &str, secret_id: &str, version: &str) -> String {
    format!("{}/versions/{}", secret_name(project_id, secret_id), version)
}

/// Short secret id from a full resource name.
pub fn short_id(name: &str) -> &str {
    name.rsplit('/').next().unwrap_or(name)
}

/// Secret bytes plus the checksum reported by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecretPayload {
    pub data: Vec<u8>,
    pub data_crc32c: Option<u32>,
}

impl SecretPayload {
    /// Payload with its checksum computed locally.
    pub fn new(data: impl Into<Vec<u8>>) -> Self {
        let data = data.into();
        let data_crc32c = Some(crc32c::crc32c(&data));
        Self { data, data_crc32c }
    }

    pub fn computed_crc32c(&self) -> u32 {
        crc32c::crc32c(&self.data)
    }

    /// Fail with `Checksum` when the reported checksum does not match the data.
    pub fn verify(&self, resource: &str) -> Result<(), BootstrapError> {
        let computed = self.computed_crc32c();
        match self.data_crc32c {
            Some(expected) if expected != computed => {
                error!(resource, expected, computed, "Data corruption detected");
                Err(BootstrapError::Checksum {
                    resource: resource.to_string(),
                    expected,
                    computed,
                })
            }
            _ => Ok(()),
        }
    }

    /// Payload as UTF-8 text.
    pub fn text(&self) -> Result<String, BootstrapError> {
        String::from_utf8(self.data.clone()).map_err(|_| {
            BootstrapError::InvalidInput("secret payload is not valid UTF-8".to_string())
        })
    }
}

/// Secret storage backend.
#[async_trait]
pub trait SecretStore: Send + Sync {
    /// Full resource names of every secret in the project.
    async fn list_secrets(&self, project_id: &str) -> Result<Vec<String>, BootstrapError>;

    /// Payload of one version, addressed by its full resource name.
    async fn access_secret_version(&self, name: &str) -> Result<SecretPayload, BootstrapError>;

    /// Create a secret with automatic replication; returns its resource name.
    async fn create_secret(&self, project_id: &str, secret_id: &str) -> Result<String, BootstrapError>;

    /// Add a version under `secret` (full secret name); returns the version name.
    async fn add_secret_version(&self, secret: &str, data: &[u8]) -> Result<String, BootstrapError>;
}

/// Fetch and verify a secret version as text.
pub async fn fetch_secret(
    store: &dyn SecretStore,
    project_id: &str,
    secret_id: &str,
    version: &str,
) -> Result<String, BootstrapError> {
    let name = version_name(project_id, secret_id, version);
    let payload = store.access_secret_version(&name).await?;
    payload.verify(&name)?;
    let text = payload.text()?;
    info!(secret = %name, "Fetched secret");
    Ok(text)
}
