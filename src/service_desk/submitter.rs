use tracing::info;

use super::case_url::{CaseUrlExtractor, ExtractorChain};
use super::client::{CasePayload, ServiceDeskClient};
use super::title::derive_title;
use super::transcript::format_transcript;
use crate::core::config::AppConfig;
use crate::core::models::{CaseReceipt, CaseRequest, CaseResult};
use crate::errors::BridgeError;

/// Turns a case request into one upstream ticket.
pub struct CaseSubmitter {
    config: AppConfig,
    client: ServiceDeskClient,
    extractor: Box<dyn CaseUrlExtractor>,
}

impl CaseSubmitter {
    #[must_use]
    pub fn new(config: &AppConfig) -> Self {
        Self::with_client(config, ServiceDeskClient::default())
    }

    #[must_use]
    pub fn with_client(config: &AppConfig, client: ServiceDeskClient) -> Self {
        Self {
            config: config.clone(),
            client,
            extractor: Box::new(ExtractorChain::default()),
        }
    }

    /// Replaces the response-shape adapter used to find the case URL.
    #[must_use]
    pub fn with_extractor(mut self, extractor: Box<dyn CaseUrlExtractor>) -> Self {
        self.extractor = extractor;
        self
    }

    /// Validates the request and builds the upstream payload.
    ///
    /// An empty description is rebuilt from `messages`; an empty title is
    /// derived from the description.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::Client`] naming the first missing field.
    pub fn prepare(&self, request: CaseRequest) -> Result<CasePayload, BridgeError> {
        let manager = request.manager.trim().to_string();
        if manager.is_empty() {
            return Err(BridgeError::Client("manager is required".to_string()));
        }
        let contact = request.contact.trim().to_string();
        if contact.is_empty() {
            return Err(BridgeError::Client("contact is required".to_string()));
        }

        let description = match request.messages.as_deref() {
            Some(messages) if request.description.trim().is_empty() && !messages.is_empty() => {
                format_transcript(messages, self.config.case_timezone)
            }
            _ => request.description,
        };
        if description.trim().is_empty() {
            return Err(BridgeError::Client("description is required".to_string()));
        }

        let title = match request.title.trim() {
            "" => derive_title(&description),
            given => given.to_string(),
        };
        if title.is_empty() {
            return Err(BridgeError::Client("title is required".to_string()));
        }

        Ok(CasePayload::new(title, description, manager, contact))
    }

    /// Submits one case. Single attempt, no retry.
    ///
    /// # Errors
    ///
    /// Client errors are raised before configuration is consulted, and
    /// configuration errors before any network call.
    pub async fn submit_case(&self, request: CaseRequest) -> CaseResult {
        let payload = self.prepare(request)?;

        let config = self.config.require_service_desk()?;

        info!(
            title = %crate::errors::truncate_chars(&payload.title, 50),
            manager = %payload.manager,
            contact = %payload.contact,
            "Submitting case to service desk"
        );

        let body = self.client.create_case(config, &payload).await?;
        let json = serde_json::from_str::<serde_json::Value>(&body).ok();
        let case_url = json.as_ref().and_then(|v| self.extractor.extract(v));
        match case_url.as_deref() {
            Some(url) => info!(case_url = %url, "Case created"),
            None => info!("Case created; no case URL in response"),
        }

        Ok(CaseReceipt {
            body,
            json,
            case_url,
        })
    }
}
