//! API Lambda handler and request processing

pub mod case_handler;
pub mod handler;
pub mod health;
pub mod helpers;
pub mod parsing;
pub mod webhook_handler;

// Re-export the main handler for convenience
pub use handler::handler;
