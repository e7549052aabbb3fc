use thiserror::Error;

/// Top-level error type for the taskbridge pipeline.
#[derive(Debug, Error)]
pub enum BridgeError {
    /// Request body was not valid JSON after passing the signature check.
    #[error("malformed interaction payload: {0}")]
    MalformedPayload(String),

    /// Required command options are missing or have the wrong type.
    /// Answered with a user-visible ephemeral message, never a crash.
    #[error("invalid command arguments: {0}")]
    InvalidArguments(String),

    /// Interaction type or command name this bridge does not handle.
    #[error("unsupported interaction type or command")]
    UnsupportedInteraction,

    /// Task service returned non-2xx or failed at the transport level.
    /// `status` is `None` for transport faults. Never retried.
    #[error("upstream task service failed ({status:?}): {message}")]
    Upstream {
        status: Option<u16>,
        message: String,
    },

    #[error("configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
