//! All Bot Framework-specific functionality

pub mod auth;
pub mod commands;
pub mod connector;
pub mod dispatcher;
pub mod mention;
pub mod response_builder;

// Re-export main types for convenience
pub use auth::{ActivityVerifier, BotFrameworkVerifier};
pub use commands::{ActivityKind, CommandTable, classify};
pub use connector::{ActivitySender, ConnectorClient};
pub use dispatcher::{OutboundAction, WebhookDispatcher, WebhookRequest, method_gate};
