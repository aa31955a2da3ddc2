//! Handler for `POST /api/create-case`.

use serde_json::Value;
use tracing::error;

use super::helpers::{err_response, ok_raw, preflight};
use super::parsing;
use crate::core::config::AppConfig;
use crate::core::models::CaseRequest;
use crate::errors::BridgeError;
use crate::service_desk::CaseSubmitter;

const FAILURE: &str = "Failed to create service desk case";

fn failure_response(e: &BridgeError) -> Value {
    let status = match e {
        BridgeError::Client(_) | BridgeError::Parse(_) => 400,
        _ => 500,
    };
    err_response(status, FAILURE, &e.to_string())
}

pub async fn handle_create_case(config: &AppConfig, payload: &Value) -> Value {
    handle_with(&CaseSubmitter::new(config), payload).await
}

/// Runs the endpoint against an already-built submitter.
pub async fn handle_with(submitter: &CaseSubmitter, payload: &Value) -> Value {
    match parsing::request_method(payload).as_str() {
        "OPTIONS" => return preflight(),
        "POST" => {}
        other => {
            return err_response(405, "Method not allowed", &format!("Method {other} not allowed"));
        }
    }

    let request = match parsing::request_body(payload).and_then(|body| {
        serde_json::from_str::<CaseRequest>(&body).map_err(BridgeError::from)
    }) {
        Ok(r) => r,
        Err(e) => {
            error!("Invalid create-case body: {}", e);
            return failure_response(&e);
        }
    };

    match submitter.submit_case(request).await {
        Ok(receipt) => {
            let headers: Vec<(&str, &str)> = receipt
                .case_url
                .as_deref()
                .map(|url| vec![("X-Case-Url", url)])
                .unwrap_or_default();
            let content_type = if receipt.json.is_some() {
                "application/json"
            } else {
                "text/plain; charset=utf-8"
            };
            ok_raw(&receipt.body, content_type, &headers)
        }
        Err(e) => {
            error!("Error creating case: {}", e);
            failure_response(&e)
        }
    }
}
