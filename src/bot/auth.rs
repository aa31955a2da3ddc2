//! Inbound activity authentication.
//!
//! Bot Framework signs every webhook call with a JWT whose signing keys are
//! published through an OpenID metadata document.

use async_trait::async_trait;
use jsonwebtoken::jwk::JwkSet;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode, decode_header};
use reqwest::Client as HttpClient;
use serde::Deserialize;
use tracing::{debug, warn};

use super::dispatcher::WebhookRequest;
use crate::core::config::BotConfig;
use crate::core::models::Activity;
use crate::errors::BridgeError;

pub const BOT_FRAMEWORK_ISSUER: &str = "https://api.botframework.com";

/// Authenticates a raw webhook request and unwraps the activity it carries.
#[async_trait]
pub trait ActivityVerifier: Send + Sync {
    /// # Errors
    ///
    /// Returns [`BridgeError::Unauthorized`] when the caller cannot be
    /// authenticated, or [`BridgeError::Parse`] when the body is not an activity.
    async fn verify(&self, request: &WebhookRequest) -> Result<Activity, BridgeError>;
}

#[derive(Debug, Deserialize)]
struct OpenIdMetadata {
    jwks_uri: String,
}

#[derive(Debug, Clone, Deserialize)]
struct ConnectorClaims {
    #[serde(default)]
    serviceurl: Option<String>,
}

/// Verifies Bot Framework connector tokens against the published signing keys.
pub struct BotFrameworkVerifier {
    app_id: String,
    openid_metadata_url: String,
    http: HttpClient,
}

impl BotFrameworkVerifier {
    #[must_use]
    pub fn new(config: &BotConfig) -> Self {
        Self::with_client(config, HttpClient::new())
    }

    #[must_use]
    pub fn with_client(config: &BotConfig, http: HttpClient) -> Self {
        Self {
            app_id: config.app_id.clone(),
            openid_metadata_url: config.openid_metadata_url.clone(),
            http,
        }
    }

    async fn signing_keys(&self) -> Result<JwkSet, BridgeError> {
        let resp = self.http.get(&self.openid_metadata_url).send().await?;
        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(BridgeError::upstream(status, &body));
        }
        let status = resp.status().as_u16();
        let metadata: OpenIdMetadata = resp
            .json()
            .await
            .map_err(|e| BridgeError::upstream(status, &format!("unreadable OpenID metadata: {e}")))?;

        let resp = self.http.get(&metadata.jwks_uri).send().await?;
        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(BridgeError::upstream(status, &body));
        }
        let status = resp.status().as_u16();
        resp.json::<JwkSet>()
            .await
            .map_err(|e| BridgeError::upstream(status, &format!("unreadable signing keys: {e}")))
    }
}

/// Pulls the bearer token out of the `Authorization` header.
///
/// # Errors
///
/// Returns [`BridgeError::Unauthorized`] when the header is missing or is not
/// a non-empty bearer credential.
pub fn bearer_token(request: &WebhookRequest) -> Result<&str, BridgeError> {
    let Some(value) = request.header("Authorization") else {
        return Err(BridgeError::Unauthorized(
            "Missing Authorization header".to_string(),
        ));
    };
    let value = value.trim();
    let token = match value.split_once(' ') {
        Some((scheme, token)) if scheme.eq_ignore_ascii_case("Bearer") => token.trim(),
        _ => "",
    };
    if token.is_empty() {
        return Err(BridgeError::Unauthorized(
            "Authorization header is not a bearer token".to_string(),
        ));
    }
    Ok(token)
}

fn same_service_url(claimed: &str, actual: &str) -> bool {
    claimed
        .trim_end_matches('/')
        .eq_ignore_ascii_case(actual.trim_end_matches('/'))
}

#[async_trait]
impl ActivityVerifier for BotFrameworkVerifier {
    async fn verify(&self, request: &WebhookRequest) -> Result<Activity, BridgeError> {
        let token = bearer_token(request)?;

        let header = decode_header(token)?;
        let kid = header
            .kid
            .ok_or_else(|| BridgeError::Unauthorized("token has no key id".to_string()))?;

        let keys = self.signing_keys().await?;
        let jwk = keys.find(&kid).ok_or_else(|| {
            BridgeError::Unauthorized(format!("no signing key matches kid {kid}"))
        })?;
        let key = DecodingKey::from_jwk(jwk)?;

        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_issuer(&[BOT_FRAMEWORK_ISSUER]);
        validation.set_audience(&[self.app_id.as_str()]);

        let claims = decode::<ConnectorClaims>(token, &key, &validation)?.claims;
        debug!("Connector token verified for kid {}", kid);

        let activity: Activity = serde_json::from_str(&request.body)?;

        if let (Some(claimed), Some(actual)) =
            (claims.serviceurl.as_deref(), activity.service_url.as_deref())
        {
            if !same_service_url(claimed, actual) {
                warn!(
                    claimed_service_url = %claimed,
                    activity_service_url = %actual,
                    "serviceUrl claim does not match activity"
                );
                return Err(BridgeError::Unauthorized(
                    "serviceUrl claim does not match activity".to_string(),
                ));
            }
        }

        Ok(activity)
    }
}
