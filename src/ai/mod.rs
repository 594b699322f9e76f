//! Transcription and summarization

pub mod client;
pub mod pipeline;
pub mod prompt;

// Re-export main types for convenience
pub use client::{ChatChoice, OpenAiClient, SpeechAi};
pub use pipeline::summarize_audio;
