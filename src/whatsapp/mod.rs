//! All WhatsApp-specific functionality

pub mod bot;
pub mod client;

// Re-export main types for convenience
pub use bot::VoiceBot;
pub use client::{WhatsAppApi, WhatsAppClient};
