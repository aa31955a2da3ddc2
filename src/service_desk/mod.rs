//! Service-desk (easitGO) case creation

pub mod case_url;
pub mod client;
pub mod submitter;
pub mod title;
pub mod transcript;

pub use client::{CasePayload, ServiceDeskClient};
pub use submitter::CaseSubmitter;
