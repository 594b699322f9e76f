use openai_api_rs::v1::chat_completion::{ChatCompletionMessage, Content, MessageRole};

/// System instruction for voice-note summaries. Users write in Italian, so the
/// instruction is too.
pub const SUMMARY_SYSTEM_PROMPT: &str = "Sei un utile assistente. Il tuo compito è quello di \
riassumere il messaggio che ti verrà inviato. Puoi aggiungere la punteggiatura, come punti, \
virgole e altre.";

/// Returned in place of a summary when the model produces no choices.
pub const NO_CONTENT: &str = "No Content";

/// Builds the two-message chat prompt: fixed instruction, then the transcript.
#[must_use]
pub fn build_summary_prompt(transcript: &str) -> Vec<ChatCompletionMessage> {
    vec![
        ChatCompletionMessage {
            role: MessageRole::system,
            content: Content::Text(SUMMARY_SYSTEM_PROMPT.to_string()),
            name: None,
            tool_calls: None,
            tool_call_id: None,
        },
        ChatCompletionMessage {
            role: MessageRole::user,
            content: Content::Text(transcript.to_string()),
            name: None,
            tool_calls: None,
            tool_call_id: None,
        },
    ]
}
