//! WhatsApp Cloud API webhook payload and outbound message types.

use serde::{Deserialize, Deserializer, Serialize};

/// Name given to downloaded voice notes so the transcription service can
/// infer the container format.
pub const AUDIO_FILE_NAME: &str = "audio.ogg";

/// Missing and `null` lists both read as empty.
fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, Deserialize)]
pub struct WebhookEvent {
    /// Always `whatsapp_business_account` for Cloud API callbacks.
    pub object: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub entry: Vec<WebhookEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WebhookEntry {
    pub id: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub changes: Vec<WebhookChange>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WebhookChange {
    pub field: Option<String>,
    pub value: Option<ChangeValue>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChangeValue {
    pub metadata: Option<PhoneMetadata>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub messages: Vec<InboundMessage>,
}

impl ChangeValue {
    #[must_use]
    pub fn phone_number_id(&self) -> Option<&str> {
        self.metadata
            .as_ref()
            .and_then(|m| m.phone_number_id.as_deref())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PhoneMetadata {
    pub display_phone_number: Option<String>,
    /// Id of the business number, used as the path for replies.
    pub phone_number_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InboundMessage {
    /// Sender's WhatsApp id (phone number without `+`).
    pub from: String,
    pub id: Option<String>,
    pub timestamp: Option<String>,
    #[serde(flatten)]
    pub kind: MessageKind,
}

/// Message payload, keyed by the `type` field.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum MessageKind {
    Text {
        text: TextContent,
    },
    Audio {
        audio: MediaContent,
    },
    #[serde(other)]
    Other,
}

impl MessageKind {
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            MessageKind::Text { .. } => "text",
            MessageKind::Audio { .. } => "audio",
            MessageKind::Other => "other",
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TextContent {
    pub body: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MediaContent {
    /// Media identifier, exchanged for a short-lived download URL.
    pub id: String,
    pub mime_type: Option<String>,
}

/// A downloaded media file held in memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl AudioFile {
    #[must_use]
    pub fn new(bytes: Vec<u8>) -> Self {
        Self {
            name: AUDIO_FILE_NAME.to_string(),
            bytes,
        }
    }

    #[must_use]
    pub fn mime_type(&self) -> String {
        mime_guess::from_path(&self.name)
            .first_or_octet_stream()
            .essence_str()
            .to_string()
    }
}

/// Body of `POST /{phone_number_id}/messages`.
#[derive(Debug, Clone, Serialize)]
pub struct OutboundReply {
    pub messaging_product: &'static str,
    pub to: String,
    pub text: OutboundText,
}

#[derive(Debug, Clone, Serialize)]
pub struct OutboundText {
    pub body: String,
}

impl OutboundReply {
    #[must_use]
    pub fn text(to: &str, body: &str) -> Self {
        Self {
            messaging_product: "whatsapp",
            to: to.to_string(),
            text: OutboundText {
                body: body.to_string(),
            },
        }
    }
}
