use std::env;

use crate::errors::BridgeError;

pub const DEFAULT_GRAPH_API_BASE_URL: &str = "https://graph.facebook.com/v18.0";
pub const DEFAULT_OPENAI_API_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4";
pub const DEFAULT_TRANSCRIPTION_MODEL: &str = "whisper-1";

fn required_var(name: &str) -> Result<String, BridgeError> {
    env::var(name).map_err(|e| BridgeError::ConfigError(format!("{name}: {e}")))
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub verify_token: String,
    pub whatsapp_token: String,
    /// HMAC key for `X-Hub-Signature-256`.
    pub whatsapp_secret: String,
    pub openai_api_key: String,
    pub openai_model: String,
    pub transcription_model: String,
    pub graph_api_base_url: String,
    pub openai_api_base_url: String,
}

impl AppConfig {
    /// # Errors
    ///
    /// Returns [`BridgeError::ConfigError`] naming the first required
    /// variable that is not set.
    pub fn from_env() -> Result<Self, BridgeError> {
        Ok(Self {
            verify_token: required_var("VERIFY_TOKEN")?,
            whatsapp_token: required_var("WHATSAPP_TOKEN")?,
            whatsapp_secret: required_var("WHATSAPP_SECRET")?,
            openai_api_key: required_var("OPENAI_KEY")?,
            openai_model: env::var("OPENAI_MODEL")
                .unwrap_or_else(|_| DEFAULT_OPENAI_MODEL.to_string()),
            transcription_model: env::var("OPENAI_TRANSCRIPTION_MODEL")
                .unwrap_or_else(|_| DEFAULT_TRANSCRIPTION_MODEL.to_string()),
            graph_api_base_url: env::var("GRAPH_API_BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|_| DEFAULT_GRAPH_API_BASE_URL.to_string()),
            openai_api_base_url: env::var("OPENAI_API_BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|_| DEFAULT_OPENAI_API_BASE_URL.to_string()),
        })
    }

    /// Config pointing at the production endpoints, for wiring up in code.
    #[must_use]
    pub fn new(
        verify_token: impl Into<String>,
        whatsapp_token: impl Into<String>,
        whatsapp_secret: impl Into<String>,
        openai_api_key: impl Into<String>,
    ) -> Self {
        Self {
            verify_token: verify_token.into(),
            whatsapp_token: whatsapp_token.into(),
            whatsapp_secret: whatsapp_secret.into(),
            openai_api_key: openai_api_key.into(),
            openai_model: DEFAULT_OPENAI_MODEL.to_string(),
            transcription_model: DEFAULT_TRANSCRIPTION_MODEL.to_string(),
            graph_api_base_url: DEFAULT_GRAPH_API_BASE_URL.to_string(),
            openai_api_base_url: DEFAULT_OPENAI_API_BASE_URL.to_string(),
        }
    }
}
