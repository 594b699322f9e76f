use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use openai_api_rs::v1::chat_completion::{ChatCompletionMessage, Content};
use reqwest::StatusCode;
use serde_json::{Value, json};
use wa_summarizer::ai::{ChatChoice, SpeechAi};
use wa_summarizer::api::handle_request;
use wa_summarizer::api::signature::compute_signature;
use wa_summarizer::core::config::AppConfig;
use wa_summarizer::core::models::AudioFile;
use wa_summarizer::errors::BridgeError;
use wa_summarizer::whatsapp::{VoiceBot, WhatsAppApi};

const VERIFY_TOKEN: &str = "verify-me";
const SECRET: &str = "app-secret";

#[derive(Debug, Clone, PartialEq, Eq)]
struct SentReply {
    phone_number_id: String,
    to: String,
    body: String,
}

#[derive(Default)]
struct Recorded {
    lookups: Vec<String>,
    downloads: Vec<String>,
    replies: Vec<SentReply>,
    transcribed: Vec<AudioFile>,
    prompts: Vec<Vec<ChatCompletionMessage>>,
}

type Shared = Arc<Mutex<Recorded>>;

struct FakeWhatsApp {
    recorded: Shared,
    media: Option<Vec<u8>>,
    lookup_fails: bool,
}

#[async_trait]
impl WhatsAppApi for FakeWhatsApp {
    async fn media_url(&self, media_id: &str) -> Result<String, BridgeError> {
        self.recorded.lock().unwrap().lookups.push(media_id.to_string());
        if self.lookup_fails {
            return Err(BridgeError::LookupError(format!("url for media {media_id}")));
        }
        Ok(format!("https://lookaside.example/{media_id}"))
    }

    async fn download_media(&self, media_url: &str) -> Result<Option<AudioFile>, BridgeError> {
        self.recorded.lock().unwrap().downloads.push(media_url.to_string());
        Ok(self.media.clone().map(AudioFile::new))
    }

    async fn send_reply(
        &self,
        phone_number_id: &str,
        to: &str,
        body: &str,
    ) -> Result<StatusCode, BridgeError> {
        self.recorded.lock().unwrap().replies.push(SentReply {
            phone_number_id: phone_number_id.to_string(),
            to: to.to_string(),
            body: body.to_string(),
        });
        Ok(StatusCode::OK)
    }
}

struct FakeAi {
    recorded: Shared,
    choices: Vec<ChatChoice>,
}

#[async_trait]
impl SpeechAi for FakeAi {
    async fn transcribe(&self, audio: &AudioFile) -> Result<String, BridgeError> {
        self.recorded.lock().unwrap().transcribed.push(audio.clone());
        Ok("ciao ti chiamo domani per la riunione".to_string())
    }

    async fn chat_completion(
        &self,
        prompt: Vec<ChatCompletionMessage>,
    ) -> Result<Vec<ChatChoice>, BridgeError> {
        self.recorded.lock().unwrap().prompts.push(prompt);
        Ok(self.choices.clone())
    }
}

struct Harness {
    bot: VoiceBot,
    recorded: Shared,
}

fn harness_with(media: Option<Vec<u8>>, choices: Vec<ChatChoice>, lookup_fails: bool) -> Harness {
    let config = AppConfig::new(VERIFY_TOKEN, "graph-token", SECRET, "sk-test");
    let recorded = Shared::default();
    let bot = VoiceBot::with_clients(
        &config,
        Box::new(FakeWhatsApp {
            recorded: recorded.clone(),
            media,
            lookup_fails,
        }),
        Box::new(FakeAi {
            recorded: recorded.clone(),
            choices,
        }),
    );
    Harness { bot, recorded }
}

fn harness() -> Harness {
    harness_with(
        Some(b"OggS-voice-note".to_vec()),
        vec![ChatChoice {
            content: Some("Ci sentiamo domani per la riunione.".to_string()),
        }],
        false,
    )
}

fn post_event(body: &str, signature: &str) -> Value {
    json!({
        "requestContext": { "http": { "method": "POST" } },
        "headers": { "content-type": "application/json", "x-hub-signature-256": signature },
        "body": body,
        "isBase64Encoded": false
    })
}

fn signed_post(body: &Value) -> Value {
    let raw = body.to_string();
    let signature = compute_signature(raw.as_bytes(), SECRET);
    post_event(&raw, &signature)
}

fn webhook(messages: Value) -> Value {
    json!({
        "object": "whatsapp_business_account",
        "entry": [{
            "id": "WABA_ID",
            "changes": [{
                "field": "messages",
                "value": {
                    "messaging_product": "whatsapp",
                    "metadata": { "display_phone_number": "15550001111", "phone_number_id": "PN_ID" },
                    "messages": messages
                }
            }]
        }]
    })
}

fn text_message(from: &str, body: &str) -> Value {
    json!({ "from": from, "id": "wamid.text", "timestamp": "1700000000", "type": "text", "text": { "body": body } })
}

fn audio_message(from: &str, media_id: &str) -> Value {
    json!({
        "from": from, "id": "wamid.audio", "timestamp": "1700000001", "type": "audio",
        "audio": { "id": media_id, "mime_type": "audio/ogg; codecs=opus", "voice": true }
    })
}

fn body_string(response: &Value) -> String {
    let raw = response["body"].as_str().expect("string body");
    serde_json::from_str::<String>(raw).expect("JSON string literal body")
}

#[tokio::test]
async fn test_wrong_signature_is_forbidden_and_sends_nothing() {
    let h = harness();
    let raw = webhook(json!([text_message("39333", "hello")])).to_string();
    let bad_sig = compute_signature(raw.as_bytes(), "not-the-secret");

    let response = handle_request(&h.bot, &post_event(&raw, &bad_sig)).await.unwrap();

    assert_eq!(response["statusCode"], 403);
    assert_eq!(body_string(&response), "Error, wrong X-Hub-Signature-256");
    assert!(h.recorded.lock().unwrap().replies.is_empty());
}

#[tokio::test]
async fn test_missing_signature_header_is_forbidden() {
    let h = harness();
    let raw = webhook(json!([text_message("39333", "hello")])).to_string();
    let event = json!({
        "requestContext": { "http": { "method": "POST" } },
        "headers": {},
        "body": raw
    });

    let response = handle_request(&h.bot, &event).await.unwrap();

    assert_eq!(response["statusCode"], 403);
    assert!(h.recorded.lock().unwrap().replies.is_empty());
}

#[tokio::test]
async fn test_text_message_is_acknowledged() {
    let h = harness();
    let event = signed_post(&webhook(json!([text_message("39333", "hello")])));

    let response = handle_request(&h.bot, &event).await.unwrap();

    assert_eq!(response["statusCode"], 200);
    assert_eq!(body_string(&response), "Done");
    assert_eq!(
        h.recorded.lock().unwrap().replies,
        vec![SentReply {
            phone_number_id: "PN_ID".to_string(),
            to: "39333".to_string(),
            body: "Ack from AWS lambda: hello".to_string(),
        }]
    );
}

#[tokio::test]
async fn test_signature_header_lookup_ignores_case() {
    let h = harness();
    let raw = webhook(json!([text_message("39333", "hello")])).to_string();
    let event = json!({
        "requestContext": { "http": { "method": "POST" } },
        "headers": { "X-Hub-Signature-256": compute_signature(raw.as_bytes(), SECRET) },
        "body": raw
    });

    let response = handle_request(&h.bot, &event).await.unwrap();
    assert_eq!(response["statusCode"], 200);
}

#[tokio::test]
async fn test_audio_message_is_summarized() {
    let h = harness();
    let event = signed_post(&webhook(json!([audio_message("39333", "MEDIA_1")])));

    let response = handle_request(&h.bot, &event).await.unwrap();

    assert_eq!(response["statusCode"], 200);
    assert_eq!(body_string(&response), "Transcription and summarization done");

    let recorded = h.recorded.lock().unwrap();
    assert_eq!(recorded.lookups, vec!["MEDIA_1".to_string()]);
    assert_eq!(
        recorded.downloads,
        vec!["https://lookaside.example/MEDIA_1".to_string()]
    );
    assert_eq!(recorded.transcribed.len(), 1);
    assert_eq!(recorded.transcribed[0].name, "audio.ogg");
    assert_eq!(recorded.transcribed[0].bytes, b"OggS-voice-note".to_vec());

    let prompt = &recorded.prompts[0];
    assert_eq!(prompt.len(), 2);
    match &prompt[1].content {
        Content::Text(text) => assert_eq!(text, "ciao ti chiamo domani per la riunione"),
        Content::ImageUrl(_) => panic!("transcript should be sent as text"),
    }

    assert_eq!(recorded.replies.len(), 1);
    assert_eq!(
        recorded.replies[0].body,
        "Summary: Ci sentiamo domani per la riunione."
    );
}

#[tokio::test]
async fn test_audio_without_choices_replies_no_content() {
    let h = harness_with(Some(b"OggS".to_vec()), Vec::new(), false);
    let event = signed_post(&webhook(json!([audio_message("39333", "MEDIA_1")])));

    let response = handle_request(&h.bot, &event).await.unwrap();

    assert_eq!(response["statusCode"], 200);
    assert_eq!(
        h.recorded.lock().unwrap().replies[0].body,
        "Summary: No Content"
    );
}

#[tokio::test]
async fn test_failed_download_sends_no_reply() {
    let h = harness_with(None, Vec::new(), false);
    let event = signed_post(&webhook(json!([audio_message("39333", "MEDIA_1")])));

    let response = handle_request(&h.bot, &event).await.unwrap();

    let recorded = h.recorded.lock().unwrap();
    assert!(recorded.replies.is_empty());
    assert!(recorded.transcribed.is_empty());
    assert_eq!(response["statusCode"], 200);
    assert_eq!(body_string(&response), "Ignored");
}

#[tokio::test]
async fn test_media_lookup_failure_propagates() {
    let h = harness_with(Some(b"OggS".to_vec()), Vec::new(), true);
    let event = signed_post(&webhook(json!([audio_message("39333", "MEDIA_1")])));

    let result = handle_request(&h.bot, &event).await;

    assert!(matches!(result, Err(BridgeError::LookupError(_))));
    assert!(h.recorded.lock().unwrap().replies.is_empty());
}

#[tokio::test]
async fn test_unsupported_message_types_are_ignored() {
    let h = harness();
    let image = json!({ "from": "39333", "id": "wamid.img", "type": "image", "image": { "id": "IMG" } });
    let event = signed_post(&webhook(json!([image])));

    let response = handle_request(&h.bot, &event).await.unwrap();

    assert_eq!(response["statusCode"], 200);
    assert_eq!(body_string(&response), "Ignored");
    assert!(h.recorded.lock().unwrap().replies.is_empty());
}

#[tokio::test]
async fn test_status_callbacks_are_ignored() {
    let h = harness();
    let body = json!({
        "object": "whatsapp_business_account",
        "entry": [{ "id": "WABA_ID", "changes": [{ "field": "messages", "value": {
            "metadata": { "phone_number_id": "PN_ID" },
            "statuses": [{ "id": "wamid.x", "status": "read" }]
        }}]}]
    });

    let response = handle_request(&h.bot, &signed_post(&body)).await.unwrap();

    assert_eq!(body_string(&response), "Ignored");
}

#[tokio::test]
async fn test_every_message_is_answered_and_last_one_wins() {
    let h = harness();
    let body = json!({
        "object": "whatsapp_business_account",
        "entry": [
            { "id": "A", "changes": [{ "value": {
                "metadata": { "phone_number_id": "PN_A" },
                "messages": [text_message("111", "first"), audio_message("222", "MEDIA_2")]
            }}]},
            { "id": "B", "changes": [{ "value": {
                "metadata": { "phone_number_id": "PN_B" },
                "messages": [text_message("333", "last")]
            }}]}
        ]
    });

    let response = handle_request(&h.bot, &signed_post(&body)).await.unwrap();

    assert_eq!(body_string(&response), "Done");

    let recorded = h.recorded.lock().unwrap();
    let replies = &recorded.replies;
    let summary: Vec<(&str, &str)> = replies
        .iter()
        .map(|r| (r.phone_number_id.as_str(), r.to.as_str()))
        .collect();
    assert_eq!(summary, vec![("PN_A", "111"), ("PN_A", "222"), ("PN_B", "333")]);
    assert_eq!(replies[2].body, "Ack from AWS lambda: last");
}

#[tokio::test]
async fn test_audio_after_text_sets_summary_response() {
    let h = harness();
    let body = webhook(json!([
        text_message("111", "first"),
        audio_message("111", "MEDIA_1")
    ]));

    let response = handle_request(&h.bot, &signed_post(&body)).await.unwrap();

    assert_eq!(body_string(&response), "Transcription and summarization done");
}

#[tokio::test]
async fn test_change_without_phone_number_id_is_skipped() {
    let h = harness();
    let body = json!({
        "entry": [{ "changes": [{ "value": { "messages": [text_message("111", "hi")] } }] }]
    });

    let response = handle_request(&h.bot, &signed_post(&body)).await.unwrap();

    assert_eq!(body_string(&response), "Ignored");
    assert!(h.recorded.lock().unwrap().replies.is_empty());
}

#[tokio::test]
async fn test_signed_garbage_is_bad_request() {
    let h = harness();
    let raw = "not json at all";
    let event = post_event(raw, &compute_signature(raw.as_bytes(), SECRET));

    let response = handle_request(&h.bot, &event).await.unwrap();

    assert_eq!(response["statusCode"], 400);
    assert_eq!(body_string(&response), "Error, invalid event payload");
}

#[tokio::test]
async fn test_base64_encoded_body_is_verified_on_decoded_bytes() {
    use base64::Engine;
    use base64::engine::general_purpose::STANDARD;

    let h = harness();
    let raw = webhook(json!([text_message("39333", "hello")])).to_string();
    let event = json!({
        "requestContext": { "http": { "method": "POST" } },
        "headers": { "x-hub-signature-256": compute_signature(raw.as_bytes(), SECRET) },
        "body": STANDARD.encode(raw.as_bytes()),
        "isBase64Encoded": true
    });

    let response = handle_request(&h.bot, &event).await.unwrap();

    assert_eq!(response["statusCode"], 200);
    assert_eq!(h.recorded.lock().unwrap().replies.len(), 1);
}

#[tokio::test]
async fn test_unsupported_method_is_forbidden() {
    let h = harness();
    let event = json!({ "requestContext": { "http": { "method": "PUT" } } });

    let response = handle_request(&h.bot, &event).await.unwrap();

    assert_eq!(response["statusCode"], 403);
    assert_eq!(body_string(&response), "Unsupported method PUT");
}

#[tokio::test]
async fn test_metadata_without_phone_number_id_skips_only_that_change() {
    let h = harness();
    let body = json!({
        "object": "whatsapp_business_account",
        "entry": [
            { "id": "A", "changes": [{ "value": {
                "metadata": { "display_phone_number": "15550001111" },
                "messages": [text_message("111", "lost")]
            }}]},
            { "id": "B", "changes": [{ "value": {
                "metadata": { "phone_number_id": "PN_B" },
                "messages": [text_message("222", "hello")]
            }}]}
        ]
    });

    let response = handle_request(&h.bot, &signed_post(&body)).await.unwrap();

    assert_eq!(response["statusCode"], 200);
    assert_eq!(body_string(&response), "Done");
    assert_eq!(
        h.recorded.lock().unwrap().replies,
        vec![SentReply {
            phone_number_id: "PN_B".to_string(),
            to: "222".to_string(),
            body: "Ack from AWS lambda: hello".to_string(),
        }]
    );
}

#[tokio::test]
async fn test_null_lists_do_not_reject_the_delivery() {
    let h = harness();
    let body = json!({
        "object": "whatsapp_business_account",
        "entry": [
            { "id": "A", "changes": null },
            { "id": "B", "changes": [{ "value": {
                "metadata": { "phone_number_id": "PN_B" },
                "messages": null
            }}]},
            { "id": "C", "changes": [{ "value": {
                "metadata": { "phone_number_id": "PN_C" },
                "messages": [text_message("333", "hello")]
            }}]}
        ]
    });

    let response = handle_request(&h.bot, &signed_post(&body)).await.unwrap();

    assert_eq!(response["statusCode"], 200);
    assert_eq!(body_string(&response), "Done");
    let recorded = h.recorded.lock().unwrap();
    assert_eq!(recorded.replies.len(), 1);
    assert_eq!(recorded.replies[0].phone_number_id, "PN_C");
}
