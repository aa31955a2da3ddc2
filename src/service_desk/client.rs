//! easitGO integration API client.

use reqwest::Client as HttpClient;
use serde::Serialize;
use tracing::{error, info};

use crate::core::config::ServiceDeskConfig;
use crate::errors::{BridgeError, truncate_chars};

pub const CASE_SOURCE: &str = "Microsoft Teams";
pub const CASE_PRIORITY: &str = "Normal";
pub const CASE_CATEGORY: &str = "IT Support";

/// Ticket body sent upstream. The trailing metadata fields are fixed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CasePayload {
    pub title: String,
    pub description: String,
    pub manager: String,
    pub contact: String,
    pub source: &'static str,
    pub priority: &'static str,
    pub category: &'static str,
}

impl CasePayload {
    #[must_use]
    pub fn new(title: String, description: String, manager: String, contact: String) -> Self {
        Self {
            title,
            description,
            manager,
            contact,
            source: CASE_SOURCE,
            priority: CASE_PRIORITY,
            category: CASE_CATEGORY,
        }
    }
}

pub struct ServiceDeskClient {
    http: HttpClient,
}

impl Default for ServiceDeskClient {
    fn default() -> Self {
        Self::new(HttpClient::new())
    }
}

impl ServiceDeskClient {
    #[must_use]
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }

    /// Creates one case with a single authenticated POST.
    ///
    /// The success body is returned as received.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::Upstream`] for non-2xx answers and
    /// [`BridgeError::Transport`] when the endpoint cannot be reached.
    pub async fn create_case(
        &self,
        config: &ServiceDeskConfig,
        payload: &CasePayload,
    ) -> Result<String, BridgeError> {
        let resp = self
            .http
            .post(&config.endpoint)
            .basic_auth(&config.username, Some(config.auth_password()))
            .json(payload)
            .send()
            .await?;

        let status = resp.status();
        let body = resp.text().await?;

        if !status.is_success() {
            error!(
                "Service desk API error: status={} body={}",
                status,
                truncate_chars(&body, 500)
            );
            return Err(BridgeError::upstream(status.as_u16(), &body));
        }

        info!(status = status.as_u16(), "Service desk accepted case");
        Ok(body)
    }
}
