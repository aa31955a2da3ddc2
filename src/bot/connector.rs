//! Bot Connector client: delivers reply activities back to Teams.

use async_trait::async_trait;
use percent_encoding::{NON_ALPHANUMERIC, utf8_percent_encode};
use reqwest::Client as HttpClient;
use serde::Deserialize;
use tracing::{error, info};
use url::Url;

use crate::core::config::BotConfig;
use crate::core::models::Activity;
use crate::errors::BridgeError;

pub const CONNECTOR_SCOPE: &str = "https://api.botframework.com/.default";

/// Delivers an outbound activity to the channel it is addressed to.
#[async_trait]
pub trait ActivitySender: Send + Sync {
    /// # Errors
    ///
    /// Returns an error if the activity could not be delivered.
    async fn send(&self, activity: &Activity) -> Result<(), BridgeError>;
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
}

/// Posts replies to the Bot Connector REST API using an app token.
pub struct ConnectorClient {
    config: BotConfig,
    http: HttpClient,
}

impl ConnectorClient {
    #[must_use]
    pub fn new(config: BotConfig) -> Self {
        Self::with_client(config, HttpClient::new())
    }

    #[must_use]
    pub fn with_client(config: BotConfig, http: HttpClient) -> Self {
        Self { config, http }
    }

    /// Client-credentials token for the connector; fetched per reply.
    async fn access_token(&self) -> Result<String, BridgeError> {
        let token_url = format!(
            "{}/{}/oauth2/v2.0/token",
            self.config.token_endpoint_base.trim_end_matches('/'),
            self.config.token_tenant()
        );

        let resp = self
            .http
            .post(&token_url)
            .form(&[
                ("grant_type", "client_credentials"),
                ("client_id", self.config.app_id.as_str()),
                ("client_secret", self.config.app_password.as_str()),
                ("scope", CONNECTOR_SCOPE),
            ])
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            error!("Connector token request failed: status={}", status);
            return Err(BridgeError::upstream(status, &body));
        }

        let status = resp.status().as_u16();
        let payload: TokenResponse = resp
            .json()
            .await
            .map_err(|e| BridgeError::upstream(status, &format!("unreadable token response: {e}")))?;
        payload
            .access_token
            .ok_or_else(|| BridgeError::upstream(status, "token response has no access_token"))
    }
}

/// Connector endpoint for `activity`: a threaded reply when `replyToId` is set.
///
/// # Errors
///
/// Returns [`BridgeError::Client`] when the activity lacks routing data.
pub fn activities_url(activity: &Activity) -> Result<Url, BridgeError> {
    let service_url = activity
        .service_url
        .as_deref()
        .filter(|s| !s.is_empty())
        .ok_or_else(|| BridgeError::Client("activity has no serviceUrl".to_string()))?;
    let conversation_id = activity
        .conversation_id()
        .filter(|s| !s.is_empty())
        .ok_or_else(|| BridgeError::Client("activity has no conversation id".to_string()))?;

    let base = if service_url.ends_with('/') {
        Url::parse(service_url)
    } else {
        Url::parse(&format!("{service_url}/"))
    }
    .map_err(|e| BridgeError::Client(format!("invalid serviceUrl: {e}")))?;

    let mut path = format!(
        "v3/conversations/{}/activities",
        utf8_percent_encode(conversation_id, NON_ALPHANUMERIC)
    );
    if let Some(reply_to) = activity.reply_to_id.as_deref().filter(|s| !s.is_empty()) {
        path.push('/');
        path.push_str(&utf8_percent_encode(reply_to, NON_ALPHANUMERIC).to_string());
    }

    base.join(&path)
        .map_err(|e| BridgeError::Client(format!("invalid connector path: {e}")))
}

#[async_trait]
impl ActivitySender for ConnectorClient {
    async fn send(&self, activity: &Activity) -> Result<(), BridgeError> {
        let url = activities_url(activity)?;
        let token = self.access_token().await?;

        let resp = self
            .http
            .post(url.clone())
            .bearer_auth(token)
            .json(activity)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp
                .text()
                .await
                .unwrap_or_else(|_| "<failed to read body>".to_string());
            error!(
                "Connector POST failed: status={} body={}",
                status,
                crate::errors::truncate_chars(&body, 500)
            );
            return Err(BridgeError::upstream(status.as_u16(), &body));
        }

        info!(
            conversation_id = activity.conversation_id().unwrap_or(""),
            "Reply delivered via {}",
            url
        );
        Ok(())
    }
}
