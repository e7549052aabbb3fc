//! Discord interaction wire contract.
//!
//! Inbound payloads are deserialized from the exact bytes that passed
//! signature verification; outbound responses serialize to the shapes the
//! interactions endpoint expects (`{"type":1}` for pongs,
//! `{"type":4,"data":{...}}` for message replies).

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Liveness check from the platform.
pub const INTERACTION_TYPE_PING: u8 = 1;
/// Slash command invocation.
pub const INTERACTION_TYPE_APPLICATION_COMMAND: u8 = 2;

/// Pong reply to a ping interaction.
pub const RESPONSE_TYPE_PONG: u8 = 1;
/// Message reply shown in the channel.
pub const RESPONSE_TYPE_CHANNEL_MESSAGE: u8 = 4;

/// Message flag marking a reply visible only to the invoking user.
pub const FLAG_EPHEMERAL: u32 = 64;

/// Top-level inbound interaction envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct Interaction {
    #[serde(rename = "type")]
    pub kind: u8,
    /// Present on command interactions.
    #[serde(default)]
    pub data: Option<CommandData>,
}

/// Command portion of an application-command interaction.
#[derive(Debug, Clone, Deserialize)]
pub struct CommandData {
    pub name: String,
    #[serde(default)]
    pub options: Vec<CommandOption>,
}

/// A single command argument. Options are positional for this bridge;
/// `name` is kept for logging only.
#[derive(Debug, Clone, Deserialize)]
pub struct CommandOption {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub value: Value,
}

/// Outbound interaction response envelope.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct InteractionResponse {
    #[serde(rename = "type")]
    pub kind: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<ResponseData>,
}

/// Message content of a channel-message response.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ResponseData {
    pub content: String,
    pub flags: u32,
}

impl Interaction {
    /// Parse an interaction from the exact bytes that passed signature
    /// verification.
    pub fn from_bytes(body: &[u8]) -> Result<Self, crate::BridgeError> {
        serde_json::from_slice(body)
            .map_err(|err| crate::BridgeError::MalformedPayload(err.to_string()))
    }
}

impl InteractionResponse {
    /// Acknowledgment for a ping interaction.
    pub fn pong() -> Self {
        Self {
            kind: RESPONSE_TYPE_PONG,
            data: None,
        }
    }

    /// Message reply visible only to the invoking user.
    pub fn ephemeral(content: impl Into<String>) -> Self {
        Self {
            kind: RESPONSE_TYPE_CHANNEL_MESSAGE,
            data: Some(ResponseData {
                content: content.into(),
                flags: FLAG_EPHEMERAL,
            }),
        }
    }
}
