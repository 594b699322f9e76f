use thiserror::Error;

#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("Failed to parse payload: {0}")]
    ParseError(String),

    #[error("Missing field in API response: {0}")]
    LookupError(String),

    #[error("Failed to access WhatsApp API: {0}")]
    WhatsAppError(String),

    #[error("Failed to access OpenAI API: {0}")]
    OpenAIError(String),

    #[error("Failed to send HTTP request: {0}")]
    HttpError(String),

    #[error("Invalid configuration: {0}")]
    ConfigError(String),
}

impl From<reqwest::Error> for BridgeError {
    fn from(error: reqwest::Error) -> Self {
        BridgeError::HttpError(error.to_string())
    }
}

impl From<serde_json::Error> for BridgeError {
    fn from(error: serde_json::Error) -> Self {
        BridgeError::ParseError(error.to_string())
    }
}

impl From<base64::DecodeError> for BridgeError {
    fn from(error: base64::DecodeError) -> Self {
        BridgeError::ParseError(format!("Invalid base64 body: {error}"))
    }
}
