//! Lambda entrypoint - routes on HTTP method.
//!
//! - `GET` - subscription verification (delegated to `verification`)
//! - `POST` - message callbacks (delegated to `event_handler`)

use super::{event_handler, helpers, parsing, signature, verification};
use crate::errors::BridgeError;
use crate::whatsapp::VoiceBot;
use lambda_runtime::{Error, LambdaEvent};
use serde_json::Value;
use tracing::{error, info};

pub use self::function_handler as handler;

/// Lambda handler for the webhook entrypoint.
///
/// # Errors
///
/// Returns an error when a downstream service call fails while processing a
/// message; verification and signature failures are regular 403 responses.
#[tracing::instrument(level = "info", skip(bot, event), fields(request_id = %event.context.request_id))]
pub async fn function_handler(bot: &VoiceBot, event: LambdaEvent<Value>) -> Result<Value, Error> {
    handle_request(bot, &event.payload).await.map_err(|e| {
        error!("Webhook processing failed: {}", e);
        Error::from(e)
    })
}

/// Routes one proxy event and builds its response.
///
/// # Errors
///
/// See [`function_handler`].
pub async fn handle_request(bot: &VoiceBot, payload: &Value) -> Result<Value, BridgeError> {
    #[cfg(feature = "debug-logs")]
    info!("Webhook received event: {}", payload);

    let method = parsing::http_method(payload).unwrap_or_default();
    info!(method, "Webhook request");

    match method {
        "GET" => Ok(verification::handle_verification(
            parsing::query_params(payload),
            bot.verify_token(),
        )),
        "POST" => {
            let signature = payload
                .get("headers")
                .and_then(|headers| parsing::get_header_value(headers, signature::SIGNATURE_HEADER));
            let body = match parsing::raw_body(payload) {
                Ok(body) => body,
                Err(e) => {
                    error!("Unreadable request body: {}", e);
                    return Ok(helpers::message_response(400, helpers::ERR_INVALID_EVENT));
                }
            };
            event_handler::handle_event_callback(bot, &body, signature).await
        }
        other => Ok(helpers::forbidden(&format!("Unsupported method {other}"))),
    }
}
