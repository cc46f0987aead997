//! Secret command service: one entry point per `secrets` CLI variant.

use super::{fetch_secret, secret_name, short_id, version_name, SecretStore};
use crate::error::BootstrapError;
use std::path::Path;
use tracing::info;

pub struct SecretCommandService;

#[derive(Debug, Clone)]
pub struct SecretListResult {
    pub project_id: String,
    /// Short secret ids in store order
    pub secrets: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct SecretGetResult {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone)]
pub struct SecretCreateResult {
    pub name: String,
}

#[derive(Debug, Clone)]
pub struct SecretAddVersionResult {
    pub name: String,
}

impl SecretCommandService {
    pub async fn list(
        store: &dyn SecretStore,
        project_id: &str,
    ) -> Result<SecretListResult, BootstrapError> {
        let names = store.list_secrets(project_id).await?;
        Ok(SecretListResult {
            project_id: project_id.to_string(),
            secrets: names.iter().map(|n| short_id(n).to_string()).collect(),
        })
    }

    /// Read one version; the checksum is verified before the value is returned.
    pub async fn get(
        store: &dyn SecretStore,
        project_id: &str,
        secret_id: &str,
        version: &str,
    ) -> Result<SecretGetResult, BootstrapError> {
        let value = fetch_secret(store, project_id, secret_id, version).await?;
        Ok(SecretGetResult {
            name: version_name(project_id, secret_id, version),
            value,
        })
    }

    pub async fn create(
        store: &dyn SecretStore,
        project_id: &str,
        secret_id: &str,
    ) -> Result<SecretCreateResult, BootstrapError> {
        let name = store.create_secret(project_id, secret_id).await?;
        info!(secret = %name, "Created secret");
        Ok(SecretCreateResult { name })
    }

    pub async fn add_version(
        store: &dyn SecretStore,
        project_id: &str,
        secret_id: &str,
        data: &[u8],
    ) -> Result<SecretAddVersionResult, BootstrapError> {
        let name = store
            .add_secret_version(&secret_name(project_id, secret_id), data)
            .await?;
        info!(version = %name, "Added secret version");
        Ok(SecretAddVersionResult { name })
    }
}

/// Payload for `add-version`: exactly one of inline data or a file.
pub fn read_version_data(
    data: Option<&str>,
    data_file: Option<&Path>,
) -> Result<Vec<u8>, BootstrapError> {
    match (data, data_file) {
        (Some(_), Some(_)) => Err(BootstrapError::InvalidInput(
            "--data and --data-file are mutually exclusive".to_string(),
        )),
        (None, None) => Err(BootstrapError::InvalidInput(
            "one of --data or --data-file is required".to_string(),
        )),
        (Some(text), None) => Ok(text.as_bytes().to_vec()),
        (None, Some(path)) => std::fs::read(path).map_err(|e| {
            BootstrapError::NotFound(format!("Cannot read data file '{}': {}", path.display(), e))
        }),
    }
}
