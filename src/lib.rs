//! Teams2Go - a Microsoft Teams bot that turns conversations into service-desk cases.
//!
//! This crate implements one API Lambda with two request handlers:
//! 1. A Bot Framework webhook that authenticates inbound activities and
//!    answers greetings, help requests and installs
//! 2. A case-creation endpoint that forwards selected conversation text to
//!    the easitGO service desk
//!
//! # Architecture
//!
//! The system uses:
//! - AWS Lambda for serverless execution
//! - jsonwebtoken for Bot Framework token verification
//! - reqwest for the Bot Connector and service-desk REST calls
//! - Tokio for async runtime
//!
//! Both handlers are stateless; each invocation reads configuration, handles
//! one request and returns one proxy response.
//!
//! # Example
//!
//! ```no_run
//! use teams2go::core::config::AppConfig;
//! use teams2go::core::models::CaseRequest;
//! use teams2go::service_desk::CaseSubmitter;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     teams2go::setup_logging();
//!
//!     let config = AppConfig::from_env();
//!     let submitter = CaseSubmitter::new(&config);
//!     let receipt = submitter
//!         .submit_case(CaseRequest {
//!             title: String::new(),
//!             description: "Printer on floor 3 is jammed".into(),
//!             manager: "helpdesk@example.com".into(),
//!             contact: "alice@example.com".into(),
//!             messages: None,
//!         })
//!         .await?;
//!
//!     println!("Case URL: {:?}", receipt.case_url);
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod bot;
pub mod core;
pub mod errors;
pub mod service_desk;

pub use errors::BridgeError;

/// Configure structured logging with JSON format for AWS Lambda environments.
///
/// Call once at the start of the Lambda binary; repeated calls are ignored.
///
/// # Example
///
/// ```
/// teams2go::setup_logging();
/// ```
pub fn setup_logging() {
    use tracing_subscriber::prelude::*;
    let fmt_layer = tracing_subscriber::fmt::layer().json().with_target(true);

    let _ = tracing_subscriber::registry().with(fmt_layer).try_init();
}
