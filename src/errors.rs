use thiserror::Error;

/// Longest slice of an upstream response body kept in error messages.
pub const UPSTREAM_BODY_LIMIT: usize = 200;

#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("Invalid request: {0}")]
    Client(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Configuration missing: {0}")]
    Configuration(String),

    #[error("Upstream error: {status} - {body}")]
    Upstream { status: u16, body: String },

    #[error("Failed to send HTTP request: {0}")]
    Transport(String),

    #[error("Failed to parse payload: {0}")]
    Parse(String),
}

impl BridgeError {
    /// Builds an upstream failure, keeping only the head of the response body.
    #[must_use]
    pub fn upstream(status: u16, body: &str) -> Self {
        BridgeError::Upstream {
            status,
            body: truncate_chars(body, UPSTREAM_BODY_LIMIT),
        }
    }

    /// HTTP status a handler answers with when this error ends a request.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            BridgeError::Client(_) | BridgeError::Parse(_) => 400,
            BridgeError::Unauthorized(_) => 401,
            BridgeError::Configuration(_) => 503,
            BridgeError::Upstream { .. } | BridgeError::Transport(_) => 500,
        }
    }
}

impl From<reqwest::Error> for BridgeError {
    fn from(error: reqwest::Error) -> Self {
        BridgeError::Transport(error.to_string())
    }
}

impl From<jsonwebtoken::errors::Error> for BridgeError {
    fn from(error: jsonwebtoken::errors::Error) -> Self {
        BridgeError::Unauthorized(format!("token validation failed: {error}"))
    }
}

impl From<serde_json::Error> for BridgeError {
    fn from(error: serde_json::Error) -> Self {
        BridgeError::Parse(error.to_string())
    }
}

/// Cuts `text` to at most `limit` characters without splitting a code point.
#[must_use]
pub fn truncate_chars(text: &str, limit: usize) -> String {
    match text.char_indices().nth(limit) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.to_string(),
    }
}
