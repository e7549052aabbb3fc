//! ClickUp task-creation client.
//!
//! Issues a single POST to the "create task in list" endpoint and decodes
//! the outcome. There is no retry: non-2xx statuses and transport faults
//! both surface as [`BridgeError::Upstream`] for the dispatcher to report.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use taskbridge_core::{BridgeError, CreatedTask, TaskCreator, TaskRequest};

pub const CLICKUP_DEFAULT_API_BASE_URL: &str = "https://api.clickup.com/api/v2";

const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Connection settings for the ClickUp API, read once at startup.
#[derive(Debug, Clone)]
pub struct ClickUpConfig {
    /// Personal API token, sent verbatim in the Authorization header.
    pub api_token: String,
    /// List the created tasks land in.
    pub list_id: String,
    /// Optional member to assign to every created task.
    pub assignee_id: Option<String>,
    /// API base URL; overridable for tests.
    pub base_url: String,
}

impl ClickUpConfig {
    pub fn new(api_token: impl Into<String>, list_id: impl Into<String>) -> Self {
        Self {
            api_token: api_token.into(),
            list_id: list_id.into(),
            assignee_id: None,
            base_url: CLICKUP_DEFAULT_API_BASE_URL.to_string(),
        }
    }
}

/// A client that creates tasks via the ClickUp REST API.
pub struct ClickUpClient {
    client: reqwest::Client,
    config: ClickUpConfig,
}

#[derive(Debug, Serialize)]
struct CreateTaskBody<'a> {
    name: &'a str,
    description: &'a str,
    assignees: Vec<&'a str>,
}

#[derive(Debug, Default, Deserialize)]
struct CreateTaskResponse {
    id: Option<String>,
    url: Option<String>,
}

impl ClickUpClient {
    /// Build a client with a shared connection pool and request timeout.
    pub fn new(config: ClickUpConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .expect("reqwest client init");
        Self { client, config }
    }

    /// Build the API endpoint URL for a path.
    fn api_url(&self, path: &str) -> String {
        let base = self.config.base_url.trim_end_matches('/');
        format!("{}/{}", base, path)
    }
}

#[async_trait]
impl TaskCreator for ClickUpClient {
    async fn create_task(&self, req: &TaskRequest) -> Result<CreatedTask, BridgeError> {
        let body = CreateTaskBody {
            name: &req.name,
            description: &req.description,
            assignees: self.config.assignee_id.as_deref().into_iter().collect(),
        };

        debug!(task = %req.name, list = %self.config.list_id, "creating ClickUp task");

        let response = self
            .client
            .post(self.api_url(&format!("list/{}/task", self.config.list_id)))
            .header(reqwest::header::AUTHORIZATION, self.config.api_token.as_str())
            .json(&body)
            .send()
            .await
            .map_err(|err| {
                warn!(task = %req.name, error = %err, "ClickUp request failed");
                BridgeError::Upstream {
                    status: None,
                    message: format!("request failed: {err}"),
                }
            })?;

        let status = response.status();
        let text = response.text().await.unwrap_or_default();
        parse_task_response(status, &text)
    }
}

/// Decode a create-task response. Success bodies yield the task
/// reference; anything else is a [`BridgeError::Upstream`] carrying the
/// status and the service's `err` detail when present.
pub fn parse_task_response(status: StatusCode, body: &str) -> Result<CreatedTask, BridgeError> {
    if status.is_success() {
        let parsed: CreateTaskResponse = serde_json::from_str(body).unwrap_or_default();
        return Ok(CreatedTask {
            id: parsed.id,
            url: parsed.url,
        });
    }

    let message = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("err").and_then(|e| e.as_str()).map(str::to_owned))
        .unwrap_or_else(|| {
            if body.is_empty() {
                format!("HTTP {status}")
            } else {
                body.to_string()
            }
        });

    Err(BridgeError::Upstream {
        status: Some(status.as_u16()),
        message,
    })
}
