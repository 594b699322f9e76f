//! Lambda proxy response builders.
//!
//! Bodies are JSON-encoded string literals (`"\"Done\""`), except for the
//! verification challenge which is echoed back as a bare integer.

use serde_json::{Value, json};

pub const TEXT_ACK_PREFIX: &str = "Ack from AWS lambda: ";
pub const SUMMARY_PREFIX: &str = "Summary: ";

pub const DONE: &str = "Done";
pub const SUMMARY_DONE: &str = "Transcription and summarization done";
pub const IGNORED: &str = "Ignored";

pub const ERR_NO_QUERY: &str = "Error, no query parameters";
pub const ERR_WRONG_MODE: &str = "Error, wrong mode";
pub const ERR_WRONG_TOKEN: &str = "Error, wrong validation token";
pub const ERR_INVALID_CHALLENGE: &str = "Error, invalid challenge";
pub const ERR_WRONG_SIGNATURE: &str = "Error, wrong X-Hub-Signature-256";
pub const ERR_INVALID_EVENT: &str = "Error, invalid event payload";

/// Returns a response whose body is `message` encoded as a JSON string.
#[must_use]
pub fn message_response(status_code: u16, message: &str) -> Value {
    json!({
        "statusCode": status_code,
        "body": Value::String(message.to_string()).to_string(),
        "isBase64Encoded": false
    })
}

/// Returns a 200 OK response with the given message.
#[must_use]
pub fn ok_response(message: &str) -> Value {
    message_response(200, message)
}

/// Returns a 403 Forbidden response with the given message.
#[must_use]
pub fn forbidden(message: &str) -> Value {
    message_response(403, message)
}

/// Returns the subscription-verification success response.
#[must_use]
pub fn challenge_response(challenge: u64) -> Value {
    json!({
        "statusCode": 200,
        "body": challenge,
        "isBase64Encoded": false
    })
}
