use std::collections::HashMap;

use serde::Deserialize;

use taskbridge_channels::discord::parse_verifying_key;
use taskbridge_core::BridgeError;

/// Taskbridge runtime configuration. Read once at startup, then passed by
/// parameter into the verifier and the task client.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// HTTP server bind address
    pub bind_address: String,
    /// HTTP server port
    pub port: u16,
    /// Log level
    pub log_level: String,
    /// Hex-encoded Ed25519 public key of the Discord application
    pub discord_public_key: String,
    /// ClickUp personal API token
    pub clickup_api_token: String,
    /// ClickUp list that receives created tasks
    pub clickup_list_id: String,
    /// Optional ClickUp member assigned to every created task
    pub clickup_assignee_id: Option<String>,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, BridgeError> {
        Self::from_map(&std::env::vars().collect())
    }

    /// Load configuration from a prepared variable map (useful for testing).
    pub fn from_map(vars: &HashMap<String, String>) -> Result<Self, BridgeError> {
        let required = |name: &str| -> Result<String, BridgeError> {
            vars.get(name)
                .filter(|v| !v.is_empty())
                .cloned()
                .ok_or_else(|| BridgeError::Config(format!("missing required env var {name}")))
        };

        let config = Self {
            bind_address: vars
                .get("TASKBRIDGE_BIND")
                .cloned()
                .unwrap_or_else(|| "0.0.0.0".to_string()),
            port: vars
                .get("TASKBRIDGE_PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            log_level: vars
                .get("RUST_LOG")
                .cloned()
                .unwrap_or_else(|| "info".to_string()),
            discord_public_key: required("DISCORD_PUBLIC_KEY")?,
            clickup_api_token: required("CLICKUP_API_TOKEN")?,
            clickup_list_id: required("CLICKUP_LIST_ID")?,
            clickup_assignee_id: vars
                .get("CLICKUP_ASSIGNEE")
                .filter(|v| !v.is_empty())
                .cloned(),
        };

        // Reject a malformed key before the server binds.
        parse_verifying_key(&config.discord_public_key).map_err(|err| {
            BridgeError::Config(format!("DISCORD_PUBLIC_KEY is not a valid Ed25519 key: {err}"))
        })?;

        Ok(config)
    }
}
