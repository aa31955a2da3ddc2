//! Common helper functions for API handlers.
//!
//! Every response carries the same CORS headers; preflight answers add the
//! allowed methods and headers.

use serde_json::{Map, Value, json};
use tracing::error;

use crate::bot::OutboundAction;

pub const ALLOWED_METHODS: &str = "GET,POST,OPTIONS";
pub const ALLOWED_HEADERS: &str = "Content-Type, Authorization";

// ============================================================================
// Response Builders
// ============================================================================

fn cors_headers(content_type: Option<&str>) -> Map<String, Value> {
    let mut headers = Map::new();
    headers.insert("Access-Control-Allow-Origin".into(), json!("*"));
    if let Some(ct) = content_type {
        headers.insert("Content-Type".into(), json!(ct));
    }
    headers
}

/// Returns a 200 CORS preflight response with no body.
#[must_use]
pub fn preflight() -> Value {
    let mut headers = cors_headers(None);
    headers.insert("Access-Control-Allow-Methods".into(), json!(ALLOWED_METHODS));
    headers.insert("Access-Control-Allow-Headers".into(), json!(ALLOWED_HEADERS));
    headers.insert("Access-Control-Max-Age".into(), json!("86400"));
    json!({ "statusCode": 200, "headers": headers, "body": "" })
}

/// Returns a 200 plain-text response.
#[must_use]
pub fn ok_text(text: &str) -> Value {
    json!({
        "statusCode": 200,
        "headers": cors_headers(Some("text/plain; charset=utf-8")),
        "body": text
    })
}

/// Returns a 200 response with an empty body.
#[must_use]
pub fn ok_empty() -> Value {
    json!({ "statusCode": 200, "headers": cors_headers(None), "body": "" })
}

/// Returns a 200 response carrying `body` unchanged; `extra_headers` are
/// added to the CORS set.
#[must_use]
pub fn ok_raw(body: &str, content_type: &str, extra_headers: &[(&str, &str)]) -> Value {
    let mut headers = cors_headers(Some(content_type));
    for (name, value) in extra_headers {
        headers.insert((*name).to_string(), json!(value));
    }
    json!({ "statusCode": 200, "headers": headers, "body": body })
}

/// Returns a 200 JSON response; `extra_headers` are added to the CORS set.
#[must_use]
pub fn ok_json(body: &Value, extra_headers: &[(&str, &str)]) -> Value {
    ok_raw(&body.to_string(), "application/json", extra_headers)
}

/// Returns an error response with `{error, message}` as its JSON body.
#[must_use]
pub fn err_response(status_code: u16, error: &str, message: &str) -> Value {
    json!({
        "statusCode": status_code,
        "headers": cors_headers(Some("application/json")),
        "body": json!({ "error": error, "message": message }).to_string()
    })
}

/// Converts a webhook turn outcome into a proxy response.
#[must_use]
pub fn webhook_response(action: &OutboundAction) -> Value {
    match action {
        OutboundAction::Preflight => preflight(),
        OutboundAction::Alive => ok_text("messages endpoint is alive"),
        OutboundAction::NoReply => ok_empty(),
        OutboundAction::Reply(reply) => match serde_json::to_value(reply) {
            Ok(v) => ok_json(&v, &[]),
            Err(e) => {
                error!("Reply was delivered but could not be echoed: {}", e);
                ok_empty()
            }
        },
        OutboundAction::Error { status, message } => {
            let error = match status {
                401 => "Unauthorized",
                400 => "Bad request",
                405 => "Method not allowed",
                503 => "Bot not configured",
                _ => "Bot processing failed",
            };
            err_response(*status, error, message)
        }
    }
}
