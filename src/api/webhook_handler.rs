//! Handler for the Bot Framework messaging endpoint.

use std::sync::Arc;

use serde_json::Value;
use tracing::error;

use super::helpers::{err_response, webhook_response};
use super::parsing;
use crate::bot::{
    BotFrameworkVerifier, ConnectorClient, WebhookDispatcher, WebhookRequest, method_gate,
};
use crate::core::config::AppConfig;

/// Handle one webhook call.
///
/// Preflight and liveness requests are answered without configuration; a
/// `POST` without bot credentials gets a 503.
pub async fn handle_webhook(config: &AppConfig, payload: &Value) -> Value {
    let method = parsing::request_method(payload);
    if let Some(action) = method_gate(&method) {
        return webhook_response(&action);
    }

    let Some(bot) = config.bot.clone() else {
        error!("Webhook called but MicrosoftAppId/MicrosoftAppPassword are not configured");
        return err_response(
            503,
            "Bot not configured",
            "MicrosoftAppId and MicrosoftAppPassword must be set",
        );
    };

    let body = match parsing::request_body(payload) {
        Ok(b) => b,
        Err(e) => return err_response(e.status_code(), "Bad request", &e.to_string()),
    };

    let request = WebhookRequest {
        method,
        headers: payload.get("headers").cloned().unwrap_or(Value::Null),
        body,
    };

    let dispatcher = WebhookDispatcher::new(
        Arc::new(BotFrameworkVerifier::new(&bot)),
        Arc::new(ConnectorClient::new(bot)),
        config.commands.clone(),
    );

    webhook_response(&dispatcher.dispatch(&request).await)
}
