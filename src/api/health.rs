use chrono::{SecondsFormat, Utc};
use serde_json::{Value, json};

use super::helpers::{err_response, ok_json, preflight};
use super::parsing;
use crate::core::config::AppConfig;

/// Reports which settings are present; never their values.
#[must_use]
pub fn health_report(config: &AppConfig) -> Value {
    let settings = &config.bot_settings;
    json!({
        "MicrosoftAppId": settings.app_id,
        "MicrosoftAppPassword": settings.app_password,
        "MicrosoftAppType": settings.app_type,
        "MicrosoftAppTenantId": settings.tenant_id,
        "BotConfigured": config.bot.is_some(),
        "ServiceDesk": config.service_desk.is_ok(),
        "timestamp": Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
    })
}

#[must_use]
pub fn handle_health(config: &AppConfig, payload: &Value) -> Value {
    match parsing::request_method(payload).as_str() {
        "OPTIONS" => preflight(),
        "GET" => ok_json(&health_report(config), &[]),
        other => err_response(405, "Method not allowed", &format!("Method {other} not allowed")),
    }
}
