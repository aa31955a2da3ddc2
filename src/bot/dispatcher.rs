//! Webhook dispatcher: method gate, authentication, classification, reply.

use std::sync::Arc;

use serde_json::Value;
use tracing::{error, info, warn};

use super::auth::ActivityVerifier;
use super::commands::{CommandTable, classify};
use super::connector::ActivitySender;
use super::response_builder::build_reply;
use crate::api::parsing::get_header_value;
use crate::core::models::Activity;

/// Raw webhook call as received from the HTTP front door.
#[derive(Debug, Clone)]
pub struct WebhookRequest {
    pub method: String,
    pub headers: Value,
    pub body: String,
}

impl WebhookRequest {
    /// Case-insensitive header lookup.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        get_header_value(&self.headers, name)
    }
}

/// Outcome of one webhook turn.
#[derive(Debug, Clone, PartialEq)]
pub enum OutboundAction {
    /// CORS preflight; headers only.
    Preflight,
    /// Liveness acknowledgment for `GET`.
    Alive,
    NoReply,
    /// A reply was decided and delivered.
    Reply(Activity),
    Error { status: u16, message: String },
}

/// Answers requests that never reach authentication. `None` means the
/// request is a `POST` and must be dispatched.
#[must_use]
pub fn method_gate(method: &str) -> Option<OutboundAction> {
    match method.to_ascii_uppercase().as_str() {
        "OPTIONS" => Some(OutboundAction::Preflight),
        "GET" => Some(OutboundAction::Alive),
        "POST" => None,
        other => Some(OutboundAction::Error {
            status: 405,
            message: format!("Method {other} not allowed"),
        }),
    }
}

pub struct WebhookDispatcher {
    verifier: Arc<dyn ActivityVerifier>,
    sender: Arc<dyn ActivitySender>,
    commands: CommandTable,
}

impl WebhookDispatcher {
    #[must_use]
    pub fn new(
        verifier: Arc<dyn ActivityVerifier>,
        sender: Arc<dyn ActivitySender>,
        commands: CommandTable,
    ) -> Self {
        Self {
            verifier,
            sender,
            commands,
        }
    }

    /// Runs one turn. At most one activity is sent; nothing is retried.
    pub async fn dispatch(&self, request: &WebhookRequest) -> OutboundAction {
        if let Some(action) = method_gate(&request.method) {
            return action;
        }

        let activity = match self.verifier.verify(request).await {
            Ok(activity) => activity,
            Err(e) => {
                warn!("Webhook request rejected: {}", e);
                return OutboundAction::Error {
                    status: e.status_code(),
                    message: e.to_string(),
                };
            }
        };

        let kind = classify(&activity);
        info!(
            activity_type = %activity.activity_type,
            kind = ?kind,
            "Classified inbound activity"
        );

        let Some(text) = self.commands.decide(&kind) else {
            return OutboundAction::NoReply;
        };

        let reply = build_reply(&activity, &text);
        match self.sender.send(&reply).await {
            Ok(()) => OutboundAction::Reply(reply),
            Err(e) => {
                error!("Reply decided but not delivered: {}", e);
                OutboundAction::Error {
                    status: 500,
                    message: format!("Reply not delivered: {e}"),
                }
            }
        }
    }
}
