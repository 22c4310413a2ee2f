use anyhow::{anyhow, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::RequestFailure;
use crate::settings::Settings;

pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:8000";

/// Body of `POST /api/reason`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReasonRequest {
    pub query: String,
    pub temperature: f32,
    pub structured_output: bool,
    pub use_tools: bool,
}

impl ReasonRequest {
    pub fn new(query: &str, settings: &Settings) -> Self {
        Self {
            query: query.to_string(),
            temperature: settings.temperature,
            structured_output: settings.structured_output,
            use_tools: settings.use_tools,
        }
    }
}

#[derive(Deserialize)]
struct ReasonResponse {
    #[serde(default)]
    result: Value,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub version: Option<String>,
}

#[derive(Clone)]
pub struct ReasonClient {
    client: Client,
    base_url: String,
}

impl ReasonClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Send one query and return the raw `result` payload.
    pub async fn reason(&self, request: &ReasonRequest) -> Result<Value, RequestFailure> {
        let url = format!("{}/api/reason", self.base_url);
        debug!(
            url = %url,
            temperature = request.temperature,
            structured_output = request.structured_output,
            use_tools = request.use_tools,
            "sending reasoning request"
        );

        let response = self.client.post(&url).json(request).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            warn!(status = status.as_u16(), "reasoning request rejected");
            return Err(RequestFailure::Status(status.as_u16()));
        }

        let reason_response: ReasonResponse = response.json().await?;
        Ok(reason_response.result)
    }

    pub async fn health(&self) -> Result<HealthStatus> {
        let url = format!("{}/health", self.base_url);

        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(anyhow!(
                "Health check failed with status: {}. Make sure the reasoning server is running at {}",
                response.status(),
                self.base_url
            ));
        }

        let health: HealthStatus = response.json().await?;
        Ok(health)
    }
}
