//! Webhook endpoint handlers.
//!
//! The handlers only translate between axum and the relay:
//! 1. Lift headers, body and caller address into an `InboundRequest`
//! 2. Run the relay flow
//! 3. Turn the outcome into an HTTP response
//!
//! All verification and forwarding happens in `crate::relay`.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{ConnectInfo, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::{error, warn};

use crate::config::SecretStoreKind;
use crate::hec::{EventForwarder, HecClient, HecError};
use crate::relay;
use crate::secrets::{EnvSecretStore, FileSecretStore, SecretStore};
use crate::zoom::{InboundRequest, SIGNATURE_HEADER, TIMESTAMP_HEADER};
use crate::Config;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub secrets: Arc<dyn SecretStore>,
    pub forwarder: Arc<dyn EventForwarder>,
}

impl AppState {
    pub fn new(
        config: Config,
        secrets: Arc<dyn SecretStore>,
        forwarder: Arc<dyn EventForwarder>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            secrets,
            forwarder,
        }
    }

    /// Build the configured secret store backend and a HEC client.
    pub fn from_config(config: Config) -> Result<Self, HecError> {
        let secrets: Arc<dyn SecretStore> = match &config.secret_store {
            SecretStoreKind::Env => Arc::new(EnvSecretStore::new()),
            SecretStoreKind::File(path) => Arc::new(FileSecretStore::new(path.clone())),
        };
        let forwarder = Arc::new(HecClient::new(config.hec_request_timeout())?);

        Ok(Self::new(config, secrets, forwarder))
    }
}

// =============================================================================
// Health Check
// =============================================================================

/// Health check response.
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Health check endpoint.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

// =============================================================================
// Zoom Webhook
// =============================================================================

/// Zoom webhook endpoint.
///
/// Answers the URL validation handshake directly; every other event is
/// verified and relayed to HEC, and the collector's answer is passed back.
pub async fn zoom_webhook(
    State(state): State<AppState>,
    connect_info: Option<ConnectInfo<SocketAddr>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let request = InboundRequest {
        timestamp: header_value(&headers, TIMESTAMP_HEADER),
        signature: header_value(&headers, SIGNATURE_HEADER),
        source_ip: source_ip(
            &headers,
            connect_info.map(|ConnectInfo(addr)| addr),
            state.config.trust_forwarded_for,
        ),
        body,
    };

    match relay::handle_webhook(&state, request).await {
        Ok(response) => response.into_response(),
        Err(e) => {
            if e.status() == StatusCode::INTERNAL_SERVER_ERROR {
                error!(error = %e, "zoom_webhook_failed");
            } else {
                warn!(error = %e, status_code = e.status().as_u16(), "zoom_webhook_rejected");
            }
            e.into_response()
        }
    }
}

/// Non-empty header value as a string.
fn header_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Caller address used as the HEC `host`.
///
/// With `trust_forwarded_for` the first `X-Forwarded-For` entry wins, which
/// is what a load balancer in front of the relay reports as the client.
fn source_ip(headers: &HeaderMap, peer: Option<SocketAddr>, trust_forwarded_for: bool) -> String {
    if trust_forwarded_for {
        let forwarded = headers
            .get("x-forwarded-for")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .map(str::trim)
            .filter(|v| !v.is_empty());

        if let Some(ip) = forwarded {
            return ip.to_string();
        }
    }

    peer.map(|addr| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_header_value() {
        let mut headers = HeaderMap::new();
        headers.insert(TIMESTAMP_HEADER, HeaderValue::from_static("1700000000"));
        headers.insert(SIGNATURE_HEADER, HeaderValue::from_static(""));

        assert_eq!(header_value(&headers, TIMESTAMP_HEADER).as_deref(), Some("1700000000"));
        assert_eq!(header_value(&headers, SIGNATURE_HEADER), None);
        assert_eq!(header_value(&headers, "x-other"), None);
    }

    #[test]
    fn test_header_value_not_visible_ascii() {
        let mut headers = HeaderMap::new();
        headers.insert(SIGNATURE_HEADER, HeaderValue::from_bytes(b"\xff").unwrap());

        assert_eq!(header_value(&headers, SIGNATURE_HEADER), None);
    }

    #[test]
    fn test_source_ip_from_peer() {
        let peer: SocketAddr = "198.51.100.4:51234".parse().unwrap();
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", HeaderValue::from_static("203.0.113.9"));

        assert_eq!(source_ip(&headers, Some(peer), false), "198.51.100.4");
        assert_eq!(source_ip(&HeaderMap::new(), None, false), "unknown");
    }

    #[test]
    fn test_source_ip_trusts_forwarded_for() {
        let peer: SocketAddr = "10.0.0.2:443".parse().unwrap();
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-forwarded-for",
            HeaderValue::from_static("203.0.113.9, 10.0.0.1"),
        );

        assert_eq!(source_ip(&headers, Some(peer), true), "203.0.113.9");
        assert_eq!(source_ip(&HeaderMap::new(), Some(peer), true), "10.0.0.2");
    }
}
