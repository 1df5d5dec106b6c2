//! Zoom webhook signature verification.
//!
//! Zoom signs every delivery with HMAC-SHA256 over `v0:<timestamp>:<body>` and
//! sends `v0=<hex digest>` in the `x-zm-signature` header. The URL validation
//! handshake uses the same key to hash the `plainToken` it sends.
//! Reference: https://developers.zoom.us/docs/api/webhooks/#verify-webhook-events

use hmac::digest::InvalidLength;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use tracing::warn;

type HmacSha256 = Hmac<Sha256>;

/// Version tag used in both the signed message and the signature header.
pub const SIGNATURE_VERSION: &str = "v0";

/// Lowercase hex HMAC-SHA256 of `message` under `secret`.
pub fn hmac_hex(secret: &str, message: &[u8]) -> Result<String, InvalidLength> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())?;
    mac.update(message);
    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// `encryptedToken` for the URL validation handshake.
pub fn encrypt_plain_token(secret: &str, plain_token: &str) -> Result<String, InvalidLength> {
    hmac_hex(secret, plain_token.as_bytes())
}

/// Canonical signed message: `v0:<timestamp>:<payload>`.
pub fn signing_message(timestamp: &str, payload: &str) -> String {
    format!("{SIGNATURE_VERSION}:{timestamp}:{payload}")
}

/// Expected `x-zm-signature` value: `v0=<hex>`.
pub fn expected_signature(
    secret: &str,
    timestamp: &str,
    payload: &str,
) -> Result<String, InvalidLength> {
    let digest = hmac_hex(secret, signing_message(timestamp, payload).as_bytes())?;
    Ok(format!("{SIGNATURE_VERSION}={digest}"))
}

/// Verify a Zoom webhook signature.
///
/// # Arguments
///
/// * `secret` - The Zoom webhook secret token
/// * `timestamp` - The `x-zm-request-timestamp` header value
/// * `payload` - The body string the sender signed
/// * `signature` - The `x-zm-signature` header value
///
/// # Returns
///
/// `true` if the signature matches, `false` otherwise.
pub fn verify_signature(secret: &str, timestamp: &str, payload: &str, signature: &str) -> bool {
    if secret.is_empty() || timestamp.is_empty() || signature.is_empty() {
        warn!(
            has_secret = !secret.is_empty(),
            has_timestamp = !timestamp.is_empty(),
            has_signature = !signature.is_empty(),
            "zoom_signature_missing_fields"
        );
        return false;
    }

    let expected = match expected_signature(secret, timestamp, payload) {
        Ok(sig) => sig,
        Err(_) => {
            warn!("zoom_signature_invalid_key");
            return false;
        }
    };

    let valid = constant_time_compare(&expected, signature);

    if !valid {
        warn!(
            expected_length = expected.len(),
            actual_length = signature.len(),
            has_version_prefix = signature.starts_with("v0="),
            "zoom_signature_mismatch"
        );
    }

    valid
}

/// Constant-time string comparison to prevent timing attacks.
fn constant_time_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result = 0u8;
    for (x, y) in a.bytes().zip(b.bytes()) {
        result |= x ^ y;
    }
    result == 0
}
