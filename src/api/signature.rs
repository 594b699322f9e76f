use hmac::{Hmac, Mac};
use sha2::Sha256;
use tracing::error;

pub const SIGNATURE_HEADER: &str = "x-hub-signature-256";
pub const SIGNATURE_PREFIX: &str = "sha256=";

/// Checks an `X-Hub-Signature-256` header against the raw request body.
///
/// The body must be the bytes exactly as received; re-serialized JSON will not
/// match. Comparison is constant-time.
pub fn verify_webhook_signature(body: &[u8], signature: Option<&str>, app_secret: &str) -> bool {
    let Some(signature) = signature else {
        error!("Missing X-Hub-Signature-256 header");
        return false;
    };

    let received_hex = signature.strip_prefix(SIGNATURE_PREFIX).unwrap_or(signature);
    let Ok(received) = hex::decode(received_hex.trim()) else {
        error!("X-Hub-Signature-256 is not valid hex");
        return false;
    };

    let mut mac = match Hmac::<Sha256>::new_from_slice(app_secret.as_bytes()) {
        Ok(mac) => mac,
        Err(e) => {
            error!("Failed to create HMAC: {}", e);
            return false;
        }
    };
    mac.update(body);

    if mac.verify_slice(&received).is_ok() {
        true
    } else {
        error!(
            "Signature verification failed. Received: '{}', body length: {}",
            signature,
            body.len()
        );
        false
    }
}

/// Returns the header value the platform would send for `body`.
pub fn compute_signature(body: &[u8], app_secret: &str) -> String {
    let mut mac = match Hmac::<Sha256>::new_from_slice(app_secret.as_bytes()) {
        Ok(mac) => mac,
        Err(e) => {
            error!("Failed to create HMAC: {}", e);
            return String::new();
        }
    };
    mac.update(body);
    format!(
        "{SIGNATURE_PREFIX}{}",
        hex::encode(mac.finalize().into_bytes())
    )
}
