//! Google Cloud REST plumbing shared by the Secret Manager and Vertex AI clients.

use crate::error::BootstrapError;
use crate::process::{require, CommandSpec, ProcessRunner};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

/// Pre-issued OAuth token; skips the `gcloud` call when set.
pub const ACCESS_TOKEN_ENV: &str = "GOOGLE_OAUTH_ACCESS_TOKEN";

/// Bearer token for Google APIs.
pub fn access_token(runner: &dyn ProcessRunner) -> Result<String, BootstrapError> {
    access_token_from(std::env::var(ACCESS_TOKEN_ENV).ok(), runner)
}

/// Token from `preset` when non-empty, otherwise `gcloud auth print-access-token`.
pub fn access_token_from(
    preset: Option<String>,
    runner: &dyn ProcessRunner,
) -> Result<String, BootstrapError> {
    if let Some(token) = preset.map(|t| t.trim().to_string()).filter(|t| !t.is_empty()) {
        debug!("Using access token from {}", ACCESS_TOKEN_ENV);
        return Ok(token);
    }
    require(runner, "gcloud")?;
    let output = runner
        .run(&CommandSpec::new("gcloud").args(["auth", "print-access-token"]))?
        .into_result("gcloud")?;
    let token = output.stdout.trim().to_string();
    if token.is_empty() {
        return Err(BootstrapError::ConfigError(
            "gcloud returned an empty access token. Run 'gcloud auth login'.".to_string(),
        ));
    }
    Ok(token)
}

/// Regional Vertex AI host; `global` has no region prefix.
pub fn vertex_host(location: &str) -> String {
    if location == "global" {
        "https://aiplatform.googleapis.com".to_string()
    } else {
        format!("https://{}-aiplatform.googleapis.com", location)
    }
}

/// Decode a successful JSON response or map the failure to `RemoteApi`.
pub async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, BootstrapError> {
    let status = response.status();
    let bytes = response.bytes().await?;
    debug!(status = %status, body_len = bytes.len(), "REST response");
    if !status.is_success() {
        return Err(BootstrapError::RemoteApi {
            status: status.as_u16(),
            message: error_message(&bytes),
        });
    }
    serde_json::from_slice(&bytes).map_err(|e| BootstrapError::RemoteApi {
        status: status.as_u16(),
        message: format!("failed to parse response: {}", e),
    })
}

/// `error.message` of a Google error body, or the raw body text.
pub fn error_message(body: &[u8]) -> String {
    serde_json::from_slice::<Value>(body)
        .ok()
        .and_then(|v| v["error"]["message"].as_str().map(str::to_string))
        .unwrap_or_else(|| String::from_utf8_lossy(body).trim().to_string())
}
