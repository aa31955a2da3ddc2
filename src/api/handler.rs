//! API Lambda handler - thin router that delegates to specialized handlers.
//!
//! This module handles:
//! - Case creation (delegated to `case_handler`)
//! - Health reporting (delegated to `health`)
//! - Bot Framework webhook calls (delegated to `webhook_handler`)

use lambda_runtime::{Error, LambdaEvent};
use serde_json::Value;
use tracing::{Instrument, info, info_span};
use uuid::Uuid;

use super::{case_handler, health, parsing, webhook_handler};
use crate::core::config::AppConfig;

pub use self::function_handler as handler;

/// Lambda handler for the API entrypoint.
///
/// # Errors
///
/// Never fails: every outcome, including internal errors, is turned into a
/// proxy response.
pub async fn function_handler(event: LambdaEvent<Value>) -> Result<Value, Error> {
    let config = AppConfig::from_env();
    Ok(route(&config, &event.payload).await)
}

/// Routes a proxy event by path.
pub async fn route(config: &AppConfig, payload: &Value) -> Value {
    let correlation_id = Uuid::new_v4().to_string();
    let path = parsing::request_path(payload).to_string();
    let method = parsing::request_method(payload);

    let span = info_span!("request", correlation_id = %correlation_id);
    async move {
        info!(raw_path = %path, method = %method, "API request");

        let response = if path.ends_with("/api/create-case") {
            case_handler::handle_create_case(config, payload).await
        } else if path.ends_with("/api/health") {
            health::handle_health(config, payload)
        } else {
            webhook_handler::handle_webhook(config, payload).await
        };

        let status = response
            .get("statusCode")
            .and_then(Value::as_u64)
            .unwrap_or(0);
        info!(status, "API response");
        response
    }
    .instrument(span)
    .await
}
