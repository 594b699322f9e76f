use tracing::info;

use super::client::SpeechAi;
use super::prompt::{NO_CONTENT, build_summary_prompt};
use crate::core::models::AudioFile;
use crate::errors::BridgeError;

/// Transcribes a voice note and asks the model to summarize the transcript.
///
/// Returns the first choice's text, or [`NO_CONTENT`] when the model returns
/// no usable choice.
///
/// # Errors
///
/// Propagates any failure from the transcription or completion call.
pub async fn summarize_audio(ai: &dyn SpeechAi, audio: &AudioFile) -> Result<String, BridgeError> {
    let transcript = ai.transcribe(audio).await?;
    let choices = ai.chat_completion(build_summary_prompt(&transcript)).await?;
    info!(choices = choices.len(), "Summary generated");

    Ok(choices
        .into_iter()
        .next()
        .and_then(|choice| choice.content)
        .unwrap_or_else(|| NO_CONTENT.to_string()))
}
