//! Per-request relay flow.
//!
//! ```text
//! Received → HeaderCheck → ConfigResolved → ChallengeResponse
//!                                         → SignatureCheck → Forward
//! ```
//!
//! Every path ends in exactly one response. Nothing is retried.

use axum::{
    body::Body,
    http::{header::CONTENT_TYPE, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use bytes::Bytes;
use tracing::{error, info, warn};

use crate::config::SignedPayload;
use crate::error::{RelayError, Result};
use crate::hec::{event_endpoint, HecError, HecEvent, HecRequest, HecResponse};
use crate::secrets::{resolve_bundle, SecretBundle};
use crate::web::AppState;
use crate::zoom::{
    encrypt_plain_token, verify_signature, ChallengeResponse, InboundRequest, ZoomEvent,
};

/// Successful outcome of a webhook call.
#[derive(Debug, Clone)]
pub struct RelayResponse {
    pub status: StatusCode,
    pub content_type: Option<String>,
    pub body: Bytes,
}

impl RelayResponse {
    fn challenge(answer: &ChallengeResponse) -> Result<Self> {
        let body = serde_json::to_vec(answer).map_err(|e| {
            RelayError::Internal(format!("challenge response serialization: {e}"))
        })?;
        Ok(Self {
            status: StatusCode::OK,
            content_type: Some("application/json".to_string()),
            body: Bytes::from(body),
        })
    }

    fn from_hec(response: HecResponse) -> Result<Self> {
        let status = StatusCode::from_u16(response.status).map_err(|e| {
            HecError::Transport(format!("invalid status {}: {e}", response.status))
        })?;

        Ok(Self {
            status,
            content_type: response.content_type,
            body: response.body,
        })
    }
}

impl IntoResponse for RelayResponse {
    fn into_response(self) -> Response {
        let mut response = Response::new(Body::from(self.body));
        *response.status_mut() = self.status;

        if let Some(value) = self
            .content_type
            .as_deref()
            .and_then(|ct| HeaderValue::from_str(ct).ok())
        {
            response.headers_mut().insert(CONTENT_TYPE, value);
        }

        response
    }
}

/// Handle one webhook call end to end.
pub async fn handle_webhook(state: &AppState, request: InboundRequest) -> Result<RelayResponse> {
    let (timestamp, signature) = request.signature_headers()?;
    let event = ZoomEvent::parse(&request.body)?;

    info!(
        event_type = %event.event_type(),
        source_ip = %request.source_ip,
        body_length = request.body.len(),
        "zoom_webhook_received"
    );

    let secrets = resolve_bundle(
        state.secrets.as_ref(),
        &state.config.parameter_names,
        state.config.secret_store_timeout(),
    )
    .await?;

    if event.is_url_validation() {
        return answer_challenge(&secrets, &event);
    }

    let payload = match state.config.signed_payload {
        SignedPayload::Reserialized => event.reserialize().map_err(|e| {
            RelayError::MalformedRequest(format!("body cannot be re-serialized: {e}"))
        })?,
        SignedPayload::Raw => std::str::from_utf8(&request.body)
            .map_err(|e| RelayError::MalformedRequest(format!("body is not UTF-8: {e}")))?
            .to_string(),
    };

    if !verify_signature(&secrets.signing_secret, timestamp, &payload, signature) {
        warn!(
            event_type = %event.event_type(),
            source_ip = %request.source_ip,
            "zoom_signature_invalid"
        );
        return Err(RelayError::SignatureInvalid);
    }

    forward_event(state, &secrets, &request.source_ip, event).await
}

fn answer_challenge(secrets: &SecretBundle, event: &ZoomEvent) -> Result<RelayResponse> {
    let plain_token = event.plain_token().ok_or_else(|| {
        RelayError::MalformedRequest("url validation without payload.plainToken".into())
    })?;

    let encrypted_token = encrypt_plain_token(&secrets.signing_secret, plain_token)
        .map_err(|e| RelayError::ConfigUnavailable(format!("unusable signing secret: {e}")))?;

    info!(plain_token_length = plain_token.len(), "zoom_url_validation_answered");

    RelayResponse::challenge(&ChallengeResponse {
        plain_token: plain_token.to_string(),
        encrypted_token,
    })
}

async fn forward_event(
    state: &AppState,
    secrets: &SecretBundle,
    source_ip: &str,
    event: ZoomEvent,
) -> Result<RelayResponse> {
    let url = event_endpoint(&secrets.hec_url, &secrets.hec_port)
        .map_err(|e| RelayError::ConfigUnavailable(e.to_string()))?;

    let event_type = event.event_type().to_string();
    let hec_event = HecEvent::new(
        event.event_ts().cloned(),
        source_ip.to_string(),
        &state.config.hec_source_prefix,
        &event_type,
        secrets.hec_index.clone(),
        event.into_body(),
    );

    let request = HecRequest::new(url, &secrets.hec_token, &hec_event).map_err(HecError::from)?;
    let response = state.forwarder.forward(request).await?;

    if !response.is_success() {
        error!(
            event_type = %event_type,
            status_code = response.status,
            body = %String::from_utf8_lossy(&response.body),
            "hec_forward_rejected"
        );
        return Err(HecError::Rejected {
            status: response.status,
        }
        .into());
    }

    info!(
        event_type = %event_type,
        status_code = response.status,
        "hec_forward_complete"
    );

    RelayResponse::from_hec(response)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_challenge_response_body() {
        let response = RelayResponse::challenge(&ChallengeResponse {
            plain_token: "qgg8vlvZRS6UYooatFL8Aw".to_string(),
            encrypted_token: "e".to_string(),
        })
        .unwrap();

        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.content_type.as_deref(), Some("application/json"));
        assert_eq!(
            &response.body[..],
            br#"{"plainToken":"qgg8vlvZRS6UYooatFL8Aw","encryptedToken":"e"}"#
        );
    }

    #[test]
    fn test_from_hec_keeps_accepted_answer() {
        let response = RelayResponse::from_hec(HecResponse {
            status: 202,
            content_type: Some("application/json".to_string()),
            body: Bytes::from_static(br#"{"text":"Success","code":0}"#),
        })
        .unwrap();

        assert_eq!(response.status, StatusCode::ACCEPTED);
        assert_eq!(&response.body[..], br#"{"text":"Success","code":0}"#);
    }
}
