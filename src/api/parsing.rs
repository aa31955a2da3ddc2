use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde_json::Value;

use crate::errors::BridgeError;

pub fn v_path<'a>(root: &'a Value, path: &[&str]) -> Option<&'a Value> {
    let mut cur = root;
    for key in path {
        cur = cur.get(*key)?;
    }
    Some(cur)
}

pub fn v_str<'a>(root: &'a Value, path: &[&str]) -> Option<&'a str> {
    v_path(root, path).and_then(|v| v.as_str())
}

pub fn v_array<'a>(root: &'a Value, path: &[&str]) -> Option<&'a Vec<Value>> {
    v_path(root, path).and_then(|v| v.as_array())
}

pub fn get_header_value<'a>(headers: &'a Value, name: &str) -> Option<&'a str> {
    if let Some(v) = headers.get(name).and_then(|s| s.as_str()) {
        return Some(v);
    }
    headers.as_object().and_then(|map| {
        map.iter().find_map(|(k, v)| {
            if k.eq_ignore_ascii_case(name) {
                v.as_str()
            } else {
                None
            }
        })
    })
}

/// HTTP method of a proxy event (HTTP API v2 first, then REST v1).
#[must_use]
pub fn request_method(payload: &Value) -> String {
    v_str(payload, &["requestContext", "http", "method"])
        .or_else(|| v_str(payload, &["httpMethod"]))
        .unwrap_or("GET")
        .to_ascii_uppercase()
}

#[must_use]
pub fn request_path(payload: &Value) -> &str {
    v_str(payload, &["rawPath"])
        .or_else(|| v_str(payload, &["path"]))
        .unwrap_or("")
}

/// Request body as text, base64-decoded when the event says so.
///
/// # Errors
///
/// Returns [`BridgeError::Client`] if an encoded body is not valid base64/UTF-8.
pub fn request_body(payload: &Value) -> Result<String, BridgeError> {
    let Some(body) = v_str(payload, &["body"]) else {
        return Ok(String::new());
    };

    let encoded = payload
        .get("isBase64Encoded")
        .and_then(Value::as_bool)
        .unwrap_or(false);
    if !encoded {
        return Ok(body.to_string());
    }

    let bytes = STANDARD
        .decode(body)
        .map_err(|e| BridgeError::Client(format!("invalid base64 body: {e}")))?;
    String::from_utf8(bytes).map_err(|e| BridgeError::Client(format!("body is not UTF-8: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn header_lookup_ignores_case() {
        let headers = json!({"content-type": "application/json"});
        assert_eq!(
            get_header_value(&headers, "Content-Type"),
            Some("application/json")
        );
        assert_eq!(get_header_value(&headers, "Authorization"), None);
    }

    #[test]
    fn method_and_path_from_http_api_event() {
        let event = json!({
            "rawPath": "/api/messages",
            "requestContext": {"http": {"method": "post"}}
        });
        assert_eq!(request_method(&event), "POST");
        assert_eq!(request_path(&event), "/api/messages");

        let rest = json!({"path": "/api/health", "httpMethod": "OPTIONS"});
        assert_eq!(request_method(&rest), "OPTIONS");
        assert_eq!(request_path(&rest), "/api/health");
    }

    #[test]
    fn decodes_base64_bodies() {
        let event = json!({"body": "eyJhIjoxfQ==", "isBase64Encoded": true});
        assert_eq!(request_body(&event).expect("body"), "{\"a\":1}");

        let bad = json!({"body": "%%%", "isBase64Encoded": true});
        assert_eq!(request_body(&bad).unwrap_err().status_code(), 400);
    }
}
