//! `OpenAI` API client module
//!
//! Wraps the audio transcription and chat completion endpoints used to turn a
//! voice note into a short summary.

use async_trait::async_trait;
use openai_api_rs::v1::chat_completion::{ChatCompletionMessage, Content, MessageRole};
use reqwest::Client;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{debug, info};

use crate::core::config::AppConfig;
use crate::core::models::AudioFile;
use crate::errors::BridgeError;

/// One completion choice; `content` is `None` when the model returned null.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatChoice {
    pub content: Option<String>,
}

/// Transcription and text generation, as used by the summary pipeline.
#[async_trait]
pub trait SpeechAi: Send + Sync {
    /// # Errors
    ///
    /// Returns an error if the transcription request fails.
    async fn transcribe(&self, audio: &AudioFile) -> Result<String, BridgeError>;

    /// # Errors
    ///
    /// Returns an error if the completion request fails.
    async fn chat_completion(
        &self,
        prompt: Vec<ChatCompletionMessage>,
    ) -> Result<Vec<ChatChoice>, BridgeError>;
}

#[derive(Debug, Deserialize)]
struct TranscriptionResponse {
    text: String,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    message: CompletionMessage,
}

#[derive(Debug, Deserialize)]
struct CompletionMessage {
    content: Option<String>,
}

/// HTTP client for the `OpenAI` REST API.
pub struct OpenAiClient {
    http: Client,
    api_key: String,
    base_url: String,
    model_name: String,
    transcription_model: String,
}

impl OpenAiClient {
    #[must_use]
    pub fn new(
        api_key: String,
        base_url: String,
        model_name: String,
        transcription_model: String,
    ) -> Self {
        Self {
            http: Client::new(),
            api_key,
            base_url,
            model_name,
            transcription_model,
        }
    }

    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            config.openai_api_key.clone(),
            config.openai_api_base_url.clone(),
            config.openai_model.clone(),
            config.transcription_model.clone(),
        )
    }

    async fn error_body(response: reqwest::Response) -> BridgeError {
        let status = response.status();
        let error_text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        BridgeError::OpenAIError(format!("{status}: {error_text}"))
    }
}

/// Converts the prompt to chat-completions `messages`. Only system, user and
/// assistant text turns are sent; anything else is dropped.
#[must_use]
pub fn build_chat_messages(prompt: &[ChatCompletionMessage]) -> Vec<Value> {
    prompt
        .iter()
        .filter_map(|msg| {
            let Content::Text(text) = &msg.content else {
                return None;
            };
            let role = match msg.role {
                MessageRole::system => "system",
                MessageRole::user => "user",
                MessageRole::assistant => "assistant",
                _ => return None,
            };
            Some(json!({ "role": role, "content": text }))
        })
        .collect()
}

#[async_trait]
impl SpeechAi for OpenAiClient {
    async fn transcribe(&self, audio: &AudioFile) -> Result<String, BridgeError> {
        info!(
            file_name = %audio.name,
            bytes = audio.bytes.len(),
            model = %self.transcription_model,
            "Requesting transcription"
        );

        let part = Part::bytes(audio.bytes.clone())
            .file_name(audio.name.clone())
            .mime_str(&audio.mime_type())?;
        let form = Form::new()
            .text("model", self.transcription_model.clone())
            .part("file", part);

        let response = self
            .http
            .post(format!("{}/audio/transcriptions", self.base_url))
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await
            .map_err(|e| BridgeError::HttpError(format!("OpenAI transcription request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(Self::error_body(response).await);
        }

        let transcription: TranscriptionResponse = response.json().await.map_err(|e| {
            BridgeError::OpenAIError(format!("Failed to parse transcription response: {e}"))
        })?;

        debug!(chars = transcription.text.chars().count(), "Transcription received");
        Ok(transcription.text)
    }

    async fn chat_completion(
        &self,
        prompt: Vec<ChatCompletionMessage>,
    ) -> Result<Vec<ChatChoice>, BridgeError> {
        #[cfg(feature = "debug-logs")]
        info!("Using chat prompt:\n{:?}", prompt);

        #[cfg(not(feature = "debug-logs"))]
        info!(
            model = %self.model_name,
            "Requesting chat completion with {} messages",
            prompt.len()
        );

        let request_body = json!({
            "model": self.model_name,
            "messages": build_chat_messages(&prompt),
        });

        let response = self
            .http
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| BridgeError::HttpError(format!("OpenAI API request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(Self::error_body(response).await);
        }

        let completion: CompletionResponse = response.json().await.map_err(|e| {
            BridgeError::OpenAIError(format!("Failed to parse OpenAI response: {e}"))
        })?;

        Ok(completion
            .choices
            .into_iter()
            .map(|choice| ChatChoice {
                content: choice.message.content,
            })
            .collect())
    }
}
