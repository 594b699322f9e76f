//! Handler for WhatsApp message callbacks (`POST`).
//!
//! Every message of every change of every entry is handled in order:
//! - `text` - acknowledged with an echo of the message
//! - `audio` - downloaded, transcribed, summarized and answered with the summary
//! - anything else - ignored
//!
//! Each handled message overwrites the response, so the platform sees the
//! outcome of the last one.

use serde_json::Value;
use tracing::{debug, info, warn};

use super::helpers::{
    DONE, ERR_INVALID_EVENT, ERR_WRONG_SIGNATURE, IGNORED, SUMMARY_DONE, SUMMARY_PREFIX,
    TEXT_ACK_PREFIX, forbidden, message_response, ok_response,
};
use super::signature::verify_webhook_signature;
use crate::ai::summarize_audio;
use crate::core::models::{InboundMessage, MediaContent, MessageKind, WebhookEvent};
use crate::errors::BridgeError;
use crate::whatsapp::VoiceBot;

/// Verifies and processes one webhook delivery.
///
/// # Errors
///
/// Returns an error if any downstream call (media lookup, download,
/// transcription, completion, reply) fails; earlier messages in the same
/// delivery have already been answered by then.
pub async fn handle_event_callback(
    bot: &VoiceBot,
    body: &[u8],
    signature: Option<&str>,
) -> Result<Value, BridgeError> {
    if !verify_webhook_signature(body, signature, bot.app_secret()) {
        return Ok(forbidden(ERR_WRONG_SIGNATURE));
    }

    info!("WhatsApp signature verified successfully");

    let event: WebhookEvent = match serde_json::from_slice(body) {
        Ok(event) => event,
        Err(e) => {
            warn!(error = %e, "Signed body is not a webhook event");
            return Ok(message_response(400, ERR_INVALID_EVENT));
        }
    };

    let mut response = None;

    for entry in &event.entry {
        for change in &entry.changes {
            let Some(value) = &change.value else {
                continue;
            };
            if value.messages.is_empty() {
                continue;
            }
            let Some(phone_number_id) = value.phone_number_id() else {
                warn!(
                    entry_id = ?entry.id,
                    "Change has messages but no phone_number_id, skipping"
                );
                continue;
            };

            for message in &value.messages {
                if let Some(outcome) = handle_message(bot, phone_number_id, message).await? {
                    response = Some(outcome);
                }
            }
        }
    }

    Ok(response.unwrap_or_else(|| {
        debug!("No handled messages in delivery");
        ok_response(IGNORED)
    }))
}

async fn handle_message(
    bot: &VoiceBot,
    phone_number_id: &str,
    message: &InboundMessage,
) -> Result<Option<Value>, BridgeError> {
    info!(
        message_id = ?message.id,
        kind = message.kind.label(),
        "Processing message"
    );

    match &message.kind {
        MessageKind::Text { text } => {
            let reply = format!("{TEXT_ACK_PREFIX}{}", text.body);
            send_reply(bot, phone_number_id, &message.from, &reply).await?;
            Ok(Some(ok_response(DONE)))
        }
        MessageKind::Audio { audio } => {
            handle_audio(bot, phone_number_id, &message.from, audio).await
        }
        MessageKind::Other => {
            debug!("Ignoring unsupported message type");
            Ok(None)
        }
    }
}

async fn handle_audio(
    bot: &VoiceBot,
    phone_number_id: &str,
    from: &str,
    audio: &MediaContent,
) -> Result<Option<Value>, BridgeError> {
    let media_url = bot.whatsapp().media_url(&audio.id).await?;
    let Some(file) = bot.whatsapp().download_media(&media_url).await? else {
        warn!(media_id = %audio.id, "No audio content downloaded, not replying");
        return Ok(None);
    };

    let summary = summarize_audio(bot.ai(), &file).await?;
    let reply = format!("{SUMMARY_PREFIX}{summary}");
    send_reply(bot, phone_number_id, from, &reply).await?;
    info!(media_id = %audio.id, "Audio file conversion finished");

    Ok(Some(ok_response(SUMMARY_DONE)))
}

async fn send_reply(
    bot: &VoiceBot,
    phone_number_id: &str,
    to: &str,
    body: &str,
) -> Result<(), BridgeError> {
    let status = bot.whatsapp().send_reply(phone_number_id, to, body).await?;
    if status.is_success() {
        debug!(%status, "Reply sent");
    } else {
        warn!(%status, "WhatsApp rejected the reply");
    }
    Ok(())
}
