use crate::ai::{OpenAiClient, SpeechAi};
use crate::core::config::AppConfig;

use super::client::{WhatsAppApi, WhatsAppClient};

/// Everything one webhook invocation needs: the secrets used to authenticate
/// requests and the two outbound clients.
pub struct VoiceBot {
    verify_token: String,
    app_secret: String,
    whatsapp: Box<dyn WhatsAppApi>,
    ai: Box<dyn SpeechAi>,
}

impl VoiceBot {
    /// Construct a `VoiceBot` backed by the real Graph API and `OpenAI` clients.
    #[must_use]
    pub fn new(config: &AppConfig) -> Self {
        Self::with_clients(
            config,
            Box::new(WhatsAppClient::from_config(config)),
            Box::new(OpenAiClient::from_config(config)),
        )
    }

    /// Construct a `VoiceBot` around caller-supplied clients.
    #[must_use]
    pub fn with_clients(
        config: &AppConfig,
        whatsapp: Box<dyn WhatsAppApi>,
        ai: Box<dyn SpeechAi>,
    ) -> Self {
        Self {
            verify_token: config.verify_token.clone(),
            app_secret: config.whatsapp_secret.clone(),
            whatsapp,
            ai,
        }
    }

    #[must_use]
    pub fn verify_token(&self) -> &str {
        &self.verify_token
    }

    #[must_use]
    pub fn app_secret(&self) -> &str {
        &self.app_secret
    }

    #[must_use]
    pub fn whatsapp(&self) -> &dyn WhatsAppApi {
        self.whatsapp.as_ref()
    }

    #[must_use]
    pub fn ai(&self) -> &dyn SpeechAi {
        self.ai.as_ref()
    }
}
