//! Vertex AI prompt registry.
//!
//! Saved prompts are Vertex AI datasets using the text-prompt metadata schema;
//! revisions are dataset versions.

use super::{PromptRecord, PromptStore, ValidPrompt};
use crate::error::BootstrapError;
use crate::rest::{read_json, vertex_host};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, info};

pub const PROMPT_SCHEMA_URI: &str =
    "gs://google-cloud-aiplatform/schema/dataset/metadata/text_prompt_1.0.0.yaml";

#[derive(Clone)]
pub struct VertexPromptRegistry {
    client: reqwest::Client,
    host: String,
    access_token: String,
    project_id: String,
    location: String,
}

impl VertexPromptRegistry {
    pub fn new(access_token: String, project_id: String, location: String) -> Self {
        let host = vertex_host(&location);
        Self::with_host(access_token, project_id, location, host)
    }

    pub fn with_host(access_token: String, project_id: String, location: String, host: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            host: host.trim_end_matches('/').to_string(),
            access_token,
            project_id,
            location,
        }
    }

    fn parent(&self) -> String {
        format!("projects/{}/locations/{}", self.project_id, self.location)
    }

    fn datasets_url(&self) -> String {
        format!("{}/v1/{}/datasets", self.host, self.parent())
    }

    fn dataset_url(&self, id: &str) -> String {
        format!("{}/{}", self.datasets_url(), id)
    }

    /// Full model resource for a short model name.
    fn model_resource(&self, model: &str) -> String {
        if model.starts_with("projects/") {
            model.to_string()
        } else {
            format!("{}/publishers/google/models/{}", self.parent(), model)
        }
    }

    /// Request body creating a prompt dataset.
    pub fn create_body(&self, prompt: &ValidPrompt) -> Value {
        let mut message = json!({
            "model": self.model_resource(&prompt.model_name),
            "contents": [{ "role": "user", "parts": [{ "text": prompt.prompt_data }] }],
        });
        if let Some(system) = &prompt.system_instruction {
            message["systemInstruction"] = json!({ "parts": [{ "text": system }] });
        }
        json!({
            "displayName": prompt.prompt_name,
            "metadataSchemaUri": PROMPT_SCHEMA_URI,
            "metadata": {
                "promptType": "freeform",
                "promptApiSchema": {
                    "apiSchemaVersion": "1.0.0",
                    "multimodalPrompt": { "promptMessage": message },
                },
            },
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DatasetList {
    #[serde(default)]
    datasets: Vec<Dataset>,
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Dataset {
    name: String,
    #[serde(default)]
    display_name: String,
    #[serde(default)]
    metadata: Value,
}

#[derive(Debug, Deserialize)]
struct Operation {
    name: String,
}

impl Dataset {
    fn into_record(self, version: Option<String>, with_content: bool) -> PromptRecord {
        let message = &self.metadata["promptApiSchema"]["multimodalPrompt"]["promptMessage"];
        let model = message["model"]
            .as_str()
            .map(|m| m.rsplit('/').next().unwrap_or(m).to_string());
        let content = if with_content {
            message["contents"][0]["parts"][0]["text"]
                .as_str()
                .map(str::to_string)
        } else {
            None
        };
        PromptRecord {
            id: dataset_id(&self.name).to_string(),
            display_name: self.display_name,
            version,
            model,
            content,
        }
    }
}

/// Dataset id from a dataset, version, or operation resource name.
pub fn dataset_id(name: &str) -> &str {
    let mut parts = name.split('/');
    while let Some(part) = parts.next() {
        if part == "datasets" {
            if let Some(id) = parts.next() {
                return id;
            }
        }
    }
    name.rsplit('/').next().unwrap_or(name)
}

#[async_trait]
impl PromptStore for VertexPromptRegistry {
    fn describe(&self) -> String {
        format!(
            "Vertex AI prompt registry (project '{}', location '{}')",
            self.project_id, self.location
        )
    }

    async fn list(&self) -> Result<Vec<PromptRecord>, BootstrapError> {
        let filter = format!("metadata_schema_uri=\"{}\"", PROMPT_SCHEMA_URI);
        let mut records = Vec::new();
        let mut page_token: Option<String> = None;
        loop {
            let mut request = self
                .client
                .get(self.datasets_url())
                .query(&[("filter", filter.as_str())])
                .bearer_auth(&self.access_token);
            if let Some(token) = &page_token {
                request = request.query(&[("pageToken", token)]);
            }
            let page: DatasetList = read_json(request.send().await?).await?;
            records.extend(page.datasets.into_iter().map(|d| d.into_record(None, false)));
            match page.next_page_token.filter(|t| !t.is_empty()) {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }
        debug!(count = records.len(), "Listed remote prompts");
        Ok(records)
    }

    async fn get(&self, id: &str, version: Option<&str>) -> Result<PromptRecord, BootstrapError> {
        let url = match version {
            Some(v) => format!("{}/datasetVersions/{}", self.dataset_url(id), v),
            None => self.dataset_url(id),
        };
        let response = self
            .client
            .get(url)
            .bearer_auth(&self.access_token)
            .send()
            .await?;
        let dataset: Dataset = read_json(response).await?;
        let mut record = dataset.into_record(version.map(str::to_string), true);
        record.id = id.to_string();
        Ok(record)
    }

    async fn create(&self, prompt: &ValidPrompt) -> Result<PromptRecord, BootstrapError> {
        let response = self
            .client
            .post(self.datasets_url())
            .bearer_auth(&self.access_token)
            .json(&self.create_body(prompt))
            .send()
            .await?;
        let operation: Operation = read_json(response).await?;
        let id = dataset_id(&operation.name).to_string();
        info!(prompt = %prompt.prompt_name, dataset = %id, "Created remote prompt");
        Ok(PromptRecord {
            id,
            display_name: prompt.prompt_name.clone(),
            version: None,
            model: Some(prompt.model_name.clone()),
            content: Some(prompt.prompt_data.clone()),
        })
    }
}
