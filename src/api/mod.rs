//! Webhook Lambda handler and request processing

pub mod event_handler;
pub mod handler;
pub mod helpers;
pub mod parsing;
pub mod signature;
pub mod verification;

// Re-export the main handler for convenience
pub use handler::{handle_request, handler};
