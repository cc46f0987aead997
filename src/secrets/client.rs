//! Secret Manager v1 REST client.

use super::{SecretPayload, SecretStore};
use crate::error::BootstrapError;
use crate::rest::read_json;
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::debug;

pub const SECRET_MANAGER_URL: &str = "https://secretmanager.googleapis.com/v1";

#[derive(Clone)]
pub struct SecretManagerClient {
    client: reqwest::Client,
    base_url: String,
    access_token: String,
}

impl SecretManagerClient {
    pub fn new(access_token: String) -> Self {
        Self::with_base_url(access_token, SECRET_MANAGER_URL.to_string())
    }

    pub fn with_base_url(access_token: String, base_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            access_token,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListSecretsResponse {
    #[serde(default)]
    secrets: Vec<NamedResource>,
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct NamedResource {
    name: String,
}

#[derive(Debug, Deserialize)]
struct AccessResponse {
    payload: ApiPayload,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiPayload {
    #[serde(default)]
    data: String,
    /// int64 rendered as a JSON string
    #[serde(skip_serializing_if = "Option::is_none")]
    data_crc32c: Option<Value>,
}

impl ApiPayload {
    fn encode(data: &[u8]) -> Self {
        Self {
            data: BASE64.encode(data),
            data_crc32c: Some(Value::String(crc32c::crc32c(data).to_string())),
        }
    }

    fn decode(self) -> Result<SecretPayload, BootstrapError> {
        let data = BASE64
            .decode(self.data.as_bytes())
            .map_err(|e| BootstrapError::RemoteApi {
                status: 0,
                message: format!("invalid base64 payload: {}", e),
            })?;
        let data_crc32c = match self.data_crc32c {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) => Some(s.parse::<u32>().map_err(|_| invalid_crc(&s))?),
            Some(Value::Number(n)) => Some(
                n.as_u64()
                    .and_then(|v| u32::try_from(v).ok())
                    .ok_or_else(|| invalid_crc(&n))?,
            ),
            Some(other) => return Err(invalid_crc(&other)),
        };
        Ok(SecretPayload { data, data_crc32c })
    }
}

fn invalid_crc(value: &dyn std::fmt::Display) -> BootstrapError {
    BootstrapError::RemoteApi {
        status: 0,
        message: format!("invalid dataCrc32c in payload: {}", value),
    }
}

#[async_trait]
impl SecretStore for SecretManagerClient {
    async fn list_secrets(&self, project_id: &str) -> Result<Vec<String>, BootstrapError> {
        let mut names = Vec::new();
        let mut page_token: Option<String> = None;
        loop {
            let mut request = self
                .client
                .get(self.url(&format!("projects/{}/secrets", project_id)))
                .bearer_auth(&self.access_token);
            if let Some(token) = &page_token {
                request = request.query(&[("pageToken", token)]);
            }
            let page: ListSecretsResponse = read_json(request.send().await?).await?;
            names.extend(page.secrets.into_iter().map(|s| s.name));
            match page.next_page_token.filter(|t| !t.is_empty()) {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }
        debug!(project_id, count = names.len(), "Listed secrets");
        Ok(names)
    }

    async fn access_secret_version(&self, name: &str) -> Result<SecretPayload, BootstrapError> {
        let response = self
            .client
            .get(self.url(&format!("{}:access", name)))
            .bearer_auth(&self.access_token)
            .send()
            .await?;
        let body: AccessResponse = read_json(response).await?;
        body.payload.decode()
    }

    async fn create_secret(&self, project_id: &str, secret_id: &str) -> Result<String, BootstrapError> {
        let response = self
            .client
            .post(self.url(&format!("projects/{}/secrets", project_id)))
            .query(&[("secretId", secret_id)])
            .bearer_auth(&self.access_token)
            .json(&json!({ "replication": { "automatic": {} } }))
            .send()
            .await?;
        let created: NamedResource = read_json(response).await?;
        Ok(created.name)
    }

    async fn add_secret_version(&self, secret: &str, data: &[u8]) -> Result<String, BootstrapError> {
        let response = self
            .client
            .post(self.url(&format!("{}:addVersion", secret)))
            .bearer_auth(&self.access_token)
            .json(&json!({ "payload": ApiPayload::encode(data) }))
            .send()
            .await?;
        let created: NamedResource = read_json(response).await?;
        Ok(created.name)
    }
}
