//! Inbound Zoom webhook types.
//!
//! Covers what arrives on the wire: the two signature headers, the JSON event
//! body, and the handshake answer Zoom expects for `endpoint.url_validation`.

pub mod signature;

use bytes::Bytes;
use serde::Serialize;
use serde_json::Value;

use crate::error::{RelayError, Result};

pub use signature::{encrypt_plain_token, expected_signature, verify_signature};

/// Header carrying the request timestamp that is part of the signed message.
pub const TIMESTAMP_HEADER: &str = "x-zm-request-timestamp";

/// Header carrying `v0=<hex>`.
pub const SIGNATURE_HEADER: &str = "x-zm-signature";

/// Event type of the endpoint ownership handshake.
pub const URL_VALIDATION_EVENT: &str = "endpoint.url_validation";

/// One webhook call as seen by the relay, independent of the HTTP framework.
#[derive(Debug, Clone)]
pub struct InboundRequest {
    /// `x-zm-request-timestamp`, if present and non-empty
    pub timestamp: Option<String>,
    /// `x-zm-signature`, if present and non-empty
    pub signature: Option<String>,
    /// Body bytes exactly as received
    pub body: Bytes,
    /// Address of the caller, used as the HEC `host`
    pub source_ip: String,
}

impl InboundRequest {
    /// Both signature headers, or `MalformedRequest` if either is missing.
    pub fn signature_headers(&self) -> Result<(&str, &str)> {
        match (self.timestamp.as_deref(), self.signature.as_deref()) {
            (Some(ts), Some(sig)) if !ts.is_empty() && !sig.is_empty() => Ok((ts, sig)),
            (ts, sig) => Err(RelayError::MalformedRequest(format!(
                "missing headers (timestamp: {}, signature: {})",
                ts.is_some_and(|v| !v.is_empty()),
                sig.is_some_and(|v| !v.is_empty()),
            ))),
        }
    }
}

/// Parsed webhook body.
///
/// The whole document is kept as a `Value` so it can be nested verbatim in the
/// HEC event and re-serialized with the sender's key order.
#[derive(Debug, Clone)]
pub struct ZoomEvent {
    body: Value,
    event: String,
}

impl ZoomEvent {
    /// Parse a body. It must be a JSON object with a string `event` field.
    pub fn parse(raw: &[u8]) -> Result<Self> {
        let body: Value = serde_json::from_slice(raw)
            .map_err(|e| RelayError::MalformedRequest(format!("invalid JSON body: {e}")))?;

        let event = body
            .as_object()
            .ok_or_else(|| RelayError::MalformedRequest("body is not a JSON object".into()))?
            .get("event")
            .and_then(Value::as_str)
            .ok_or_else(|| RelayError::MalformedRequest("body has no string `event`".into()))?
            .to_string();

        Ok(Self { body, event })
    }

    pub fn event_type(&self) -> &str {
        &self.event
    }

    pub fn is_url_validation(&self) -> bool {
        self.event == URL_VALIDATION_EVENT
    }

    /// `payload.plainToken` of a handshake request.
    pub fn plain_token(&self) -> Option<&str> {
        self.body
            .get("payload")
            .and_then(|p| p.get("plainToken"))
            .and_then(Value::as_str)
    }

    /// `event_ts`, passed to HEC untouched.
    pub fn event_ts(&self) -> Option<&Value> {
        self.body.get("event_ts")
    }

    pub fn into_body(self) -> Value {
        self.body
    }

    /// Compact JSON of the parsed body with the original key order.
    pub fn reserialize(&self) -> std::result::Result<String, serde_json::Error> {
        serde_json::to_string(&self.body)
    }
}

/// Handshake answer for `endpoint.url_validation`.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ChallengeResponse {
    pub plain_token: String,
    pub encrypted_token: String,
}
