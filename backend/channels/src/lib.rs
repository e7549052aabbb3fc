//! Channel logic for the taskbridge service.
//!
//! `discord` verifies inbound interaction requests; `dispatch` classifies
//! a verified payload and produces the single response it is owed.

pub mod discord;
pub mod dispatch;

pub use discord::{verify_signature, SIGNATURE_HEADER, TIMESTAMP_HEADER};
pub use dispatch::dispatch_interaction;
