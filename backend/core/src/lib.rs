pub mod error;
pub mod interaction;
pub mod task;

pub use error::BridgeError;
pub use interaction::{
    CommandData, CommandOption, Interaction, InteractionResponse, ResponseData,
    INTERACTION_TYPE_APPLICATION_COMMAND, INTERACTION_TYPE_PING,
};
pub use task::{CreatedTask, TaskCreator, TaskRequest};
