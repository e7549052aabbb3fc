//! Interaction dispatch.
//!
//! One transition per request: a verified, parsed payload is classified by
//! interaction type (and command name for application commands) and owes
//! exactly one response.

use tracing::{info, warn};

use taskbridge_core::{
    BridgeError, CommandData, Interaction, InteractionResponse, TaskCreator, TaskRequest,
    INTERACTION_TYPE_APPLICATION_COMMAND, INTERACTION_TYPE_PING,
};

/// The slash command this bridge forwards to the task service.
pub const TASK_COMMAND: &str = "task";

/// Classify a verified interaction and produce its response.
///
/// Ping interactions are acknowledged unconditionally. The `task` command
/// invokes the task creator once; upstream failures and bad arguments
/// become user-visible ephemeral replies. Anything else is
/// [`BridgeError::UnsupportedInteraction`], which the entrypoint maps to
/// HTTP 400.
pub async fn dispatch_interaction(
    interaction: &Interaction,
    tasks: &dyn TaskCreator,
) -> Result<InteractionResponse, BridgeError> {
    match interaction.kind {
        INTERACTION_TYPE_PING => Ok(InteractionResponse::pong()),
        INTERACTION_TYPE_APPLICATION_COMMAND => {
            let data = interaction
                .data
                .as_ref()
                .ok_or(BridgeError::UnsupportedInteraction)?;
            if data.name != TASK_COMMAND {
                return Err(BridgeError::UnsupportedInteraction);
            }
            handle_task_command(data, tasks).await
        }
        _ => Err(BridgeError::UnsupportedInteraction),
    }
}

async fn handle_task_command(
    data: &CommandData,
    tasks: &dyn TaskCreator,
) -> Result<InteractionResponse, BridgeError> {
    let request = match extract_task_request(data) {
        Ok(request) => request,
        Err(BridgeError::InvalidArguments(reason)) => {
            warn!(%reason, "task command with invalid arguments");
            return Ok(InteractionResponse::ephemeral(
                "Task name and description are required.",
            ));
        }
        Err(err) => return Err(err),
    };

    info!(task = %request.name, "received task request");

    match tasks.create_task(&request).await {
        Ok(created) => {
            info!(task = %request.name, url = ?created.url, "task created");
            Ok(InteractionResponse::ephemeral(format!(
                "Task \"{}\" has been created!",
                request.name
            )))
        }
        Err(BridgeError::Upstream { status, message }) => {
            warn!(task = %request.name, ?status, %message, "task creation failed");
            Ok(InteractionResponse::ephemeral(format!(
                "Failed to create task \"{}\".",
                request.name
            )))
        }
        Err(err) => Err(err),
    }
}

/// Options are positional for the `task` command: name first, description
/// second. A missing or non-string option fails closed instead of
/// panicking on an out-of-bounds index.
fn extract_task_request(data: &CommandData) -> Result<TaskRequest, BridgeError> {
    Ok(TaskRequest {
        name: string_option(data, 0)?,
        description: string_option(data, 1)?,
    })
}

fn string_option(data: &CommandData, index: usize) -> Result<String, BridgeError> {
    data.options
        .get(index)
        .and_then(|option| option.value.as_str())
        .map(str::to_owned)
        .ok_or_else(|| {
            BridgeError::InvalidArguments(format!("missing string option at position {index}"))
        })
}
