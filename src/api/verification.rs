//! Webhook subscription verification (`GET` with `hub.*` query parameters).

use serde_json::{Map, Value};
use tracing::{info, warn};

use super::helpers::{
    ERR_INVALID_CHALLENGE, ERR_NO_QUERY, ERR_WRONG_MODE, ERR_WRONG_TOKEN, challenge_response,
    forbidden,
};

pub const SUBSCRIBE_MODE: &str = "subscribe";

/// Why a verification request was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerificationError {
    NoQueryParameters,
    WrongMode,
    WrongToken,
    InvalidChallenge,
}

impl VerificationError {
    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            VerificationError::NoQueryParameters => ERR_NO_QUERY,
            VerificationError::WrongMode => ERR_WRONG_MODE,
            VerificationError::WrongToken => ERR_WRONG_TOKEN,
            VerificationError::InvalidChallenge => ERR_INVALID_CHALLENGE,
        }
    }
}

/// Validates `hub.mode` and `hub.verify_token`, returning the numeric
/// `hub.challenge` to echo back. Challenges must fit in a `u64`; Graph sends
/// ten-digit values.
///
/// # Errors
///
/// Returns the first check that failed, in the order: parameters present,
/// mode, token, challenge.
pub fn verify_subscription(
    params: Option<&Map<String, Value>>,
    verify_token: &str,
) -> Result<u64, VerificationError> {
    let params = params.ok_or(VerificationError::NoQueryParameters)?;

    let mode = params.get("hub.mode").and_then(Value::as_str);
    if mode != Some(SUBSCRIBE_MODE) {
        return Err(VerificationError::WrongMode);
    }

    let token = params.get("hub.verify_token").and_then(Value::as_str);
    if token != Some(verify_token) {
        return Err(VerificationError::WrongToken);
    }

    params
        .get("hub.challenge")
        .and_then(Value::as_str)
        .and_then(|c| c.trim().parse::<u64>().ok())
        .ok_or(VerificationError::InvalidChallenge)
}

/// Builds the Lambda response for a verification request.
pub fn handle_verification(params: Option<&Map<String, Value>>, verify_token: &str) -> Value {
    match verify_subscription(params, verify_token) {
        Ok(challenge) => {
            info!("Webhook subscription verified");
            challenge_response(challenge)
        }
        Err(e) => {
            warn!(reason = ?e, "Webhook verification refused");
            forbidden(e.message())
        }
    }
}
