//! Task-creation contract between the interaction dispatcher and the
//! outbound task-service client.

use async_trait::async_trait;

use crate::error::BridgeError;

/// A task to create, extracted from the command options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskRequest {
    pub name: String,
    pub description: String,
}

/// Reference to the task the remote service created.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreatedTask {
    pub id: Option<String>,
    pub url: Option<String>,
}

/// Anything that can turn a [`TaskRequest`] into a remote task.
///
/// The production implementation talks to ClickUp; tests substitute a
/// recording stub.
#[async_trait]
pub trait TaskCreator: Send + Sync {
    /// Create the task with a single attempt. Non-2xx and transport
    /// faults both surface as [`BridgeError::Upstream`].
    async fn create_task(&self, req: &TaskRequest) -> Result<CreatedTask, BridgeError>;
}
