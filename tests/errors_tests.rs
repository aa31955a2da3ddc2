use std::error::Error;
use teams2go::errors::{BridgeError, UPSTREAM_BODY_LIMIT, truncate_chars};

#[test]
fn test_bridge_error_implements_error_trait() {
    fn assert_error<T: Error>(_: &T) {}

    let error = BridgeError::Parse("test error".to_string());
    assert_error(&error);
}

#[test]
fn test_bridge_error_display() {
    let error = BridgeError::upstream(502, "bad gateway");
    assert_eq!(format!("{error}"), "Upstream error: 502 - bad gateway");

    let error = BridgeError::Transport("Connection error".to_string());
    assert_eq!(
        format!("{error}"),
        "Failed to send HTTP request: Connection error"
    );

    let error = BridgeError::Configuration("missing SERVICE_DESK_ENDPOINT".to_string());
    assert_eq!(
        format!("{error}"),
        "Configuration missing: missing SERVICE_DESK_ENDPOINT"
    );
}

#[test]
fn test_status_codes() {
    assert_eq!(BridgeError::Client("x".into()).status_code(), 400);
    assert_eq!(BridgeError::Parse("x".into()).status_code(), 400);
    assert_eq!(BridgeError::Unauthorized("x".into()).status_code(), 401);
    assert_eq!(BridgeError::Configuration("x".into()).status_code(), 503);
    assert_eq!(BridgeError::upstream(404, "").status_code(), 500);
    assert_eq!(BridgeError::Transport("x".into()).status_code(), 500);
}

#[test]
fn test_upstream_body_is_truncated() {
    let body = "é".repeat(UPSTREAM_BODY_LIMIT + 50);
    match BridgeError::upstream(500, &body) {
        BridgeError::Upstream { body, .. } => {
            assert_eq!(body.chars().count(), UPSTREAM_BODY_LIMIT);
        }
        other => panic!("Unexpected error type: {other:?}"),
    }
}

#[test]
fn test_bridge_error_from_conversions() {
    let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
    let err: BridgeError = json_err.into();
    assert!(matches!(err, BridgeError::Parse(_)));

    let jwt_err = jsonwebtoken::decode_header("not-a-token").unwrap_err();
    let err: BridgeError = jwt_err.into();
    assert!(matches!(err, BridgeError::Unauthorized(ref m) if m.starts_with("token validation failed")));

    // Compile-time check that reqwest errors convert
    #[allow(unused)]
    #[allow(clippy::items_after_statements)]
    fn _check_reqwest_conversion(err: reqwest::Error) -> BridgeError {
        BridgeError::from(err)
    }
}

#[test]
fn test_truncate_chars_keeps_code_points() {
    assert_eq!(truncate_chars("åäö", 2), "åä");
    assert_eq!(truncate_chars("abc", 10), "abc");
}
