//! WhatsApp Cloud API client module
//!
//! Media lookup, media download and text replies over the Graph API.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::core::config::AppConfig;
use crate::core::models::{AudioFile, OutboundReply};
use crate::errors::BridgeError;

/// The subset of the Graph API the webhook needs.
#[async_trait]
pub trait WhatsAppApi: Send + Sync {
    /// Exchanges a media identifier for a short-lived download URL.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::LookupError`] if the response carries no `url`.
    async fn media_url(&self, media_id: &str) -> Result<String, BridgeError>;

    /// Downloads a media file. `Ok(None)` means the platform returned no
    /// content for the URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the request cannot be sent.
    async fn download_media(&self, media_url: &str) -> Result<Option<AudioFile>, BridgeError>;

    /// Sends a plain-text message and hands back the platform's status code
    /// without judging it.
    ///
    /// # Errors
    ///
    /// Returns an error if the request cannot be sent.
    async fn send_reply(
        &self,
        phone_number_id: &str,
        to: &str,
        body: &str,
    ) -> Result<StatusCode, BridgeError>;
}

/// Bearer-authenticated Graph API client.
pub struct WhatsAppClient {
    http: Client,
    token: String,
    base_url: String,
}

impl WhatsAppClient {
    #[must_use]
    pub fn new(token: String, base_url: String) -> Self {
        Self {
            http: Client::new(),
            token,
            base_url,
        }
    }

    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            config.whatsapp_token.clone(),
            config.graph_api_base_url.clone(),
        )
    }

    #[must_use]
    pub fn media_endpoint(&self, media_id: &str) -> String {
        format!(
            "{}/{}/?debug=all",
            self.base_url,
            urlencoding::encode(media_id)
        )
    }

    #[must_use]
    pub fn messages_endpoint(&self, phone_number_id: &str) -> String {
        format!(
            "{}/{}/messages",
            self.base_url,
            urlencoding::encode(phone_number_id)
        )
    }
}

#[async_trait]
impl WhatsAppApi for WhatsAppClient {
    async fn media_url(&self, media_id: &str) -> Result<String, BridgeError> {
        let response = self
            .http
            .get(self.media_endpoint(media_id))
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(|e| BridgeError::HttpError(format!("Media lookup request failed: {e}")))?;

        let status = response.status();
        let media: Value = response.json().await.map_err(|e| {
            BridgeError::WhatsAppError(format!("Failed to parse media lookup response: {e}"))
        })?;
        debug!(%status, media_id, "Media lookup response: {}", media);

        media
            .get("url")
            .and_then(Value::as_str)
            .map(ToString::to_string)
            .ok_or_else(|| {
                BridgeError::LookupError(format!("url for media {media_id} (status {status})"))
            })
    }

    async fn download_media(&self, media_url: &str) -> Result<Option<AudioFile>, BridgeError> {
        let response = self
            .http
            .get(media_url)
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(|e| BridgeError::HttpError(format!("Media download request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            warn!(%status, "Media download returned an error status");
            return Ok(None);
        }

        let bytes = response.bytes().await?;
        if bytes.is_empty() {
            warn!("Media download returned an empty body");
            return Ok(None);
        }

        info!(bytes = bytes.len(), "Media downloaded");
        Ok(Some(AudioFile::new(bytes.to_vec())))
    }

    async fn send_reply(
        &self,
        phone_number_id: &str,
        to: &str,
        body: &str,
    ) -> Result<StatusCode, BridgeError> {
        let payload = OutboundReply::text(to, body);

        let response = self
            .http
            .post(self.messages_endpoint(phone_number_id))
            .bearer_auth(&self.token)
            .json(&payload)
            .send()
            .await
            .map_err(|e| BridgeError::HttpError(format!("Reply request failed: {e}")))?;

        Ok(response.status())
    }
}
