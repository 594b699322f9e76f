/// WA Summarizer - a WhatsApp webhook that summarizes voice notes with `OpenAI`.
///
/// A single AWS Lambda receives WhatsApp Cloud API webhooks:
/// 1. `GET` subscription checks are answered with the `hub.challenge`
/// 2. `POST` message callbacks are authenticated with `X-Hub-Signature-256`;
///    text messages are acknowledged and voice notes are downloaded,
///    transcribed with Whisper, summarized with a chat model and the summary
///    is sent back to the sender
///
/// # Architecture
///
/// The system uses:
/// - AWS Lambda (`lambda_runtime`) for serverless execution
/// - reqwest for the Graph API and `OpenAI` REST calls
/// - openai-api-rs for chat prompt types
/// - Tokio for async runtime
///
/// # Example
///
/// ```no_run
/// use wa_summarizer::core::config::AppConfig;
/// use wa_summarizer::whatsapp::VoiceBot;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
///     wa_summarizer::setup_logging();
///
///     let config = AppConfig::new("verify-me", "graph-token", "app-secret", "sk-test");
///     let bot = VoiceBot::new(&config);
///
///     let event = serde_json::json!({
///         "requestContext": { "http": { "method": "GET" } },
///         "queryStringParameters": {
///             "hub.mode": "subscribe",
///             "hub.verify_token": "verify-me",
///             "hub.challenge": "1158201444"
///         }
///     });
///     let response = wa_summarizer::api::handle_request(&bot, &event).await?;
///     println!("{response}");
///     Ok(())
/// }
/// ```
// Module declarations
pub mod ai;
pub mod api;
pub mod core;
pub mod errors;
pub mod whatsapp;

pub use errors::BridgeError;

/// Configure structured logging with JSON format for AWS Lambda environments.
///
/// Sets up tracing-subscriber with a JSON formatter suitable for `CloudWatch`
/// Logs. The level comes from `RUST_LOG` and defaults to `info`. Calling it
/// more than once is harmless.
///
/// # Example
///
/// ```
/// wa_summarizer::setup_logging();
/// ```
pub fn setup_logging() {
    use tracing_subscriber::EnvFilter;
    use tracing_subscriber::prelude::*;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let fmt_layer = tracing_subscriber::fmt::layer().json().with_target(true);

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
}
