//! reqwest-backed collector client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::Client;
use tracing::{info, warn};

use super::{EventForwarder, HecError, HecRequest, HecResponse};

/// Pooled HTTP client for the collector. Cheap to clone.
#[derive(Clone)]
pub struct HecClient {
    client: Client,
}

impl HecClient {
    /// Build a client whose requests are bounded by `timeout`.
    pub fn new(timeout: Duration) -> Result<Self, HecError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("zoom-hec-relay/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl EventForwarder for HecClient {
    async fn forward(&self, request: HecRequest) -> Result<HecResponse, HecError> {
        let body_length = request.body.len();

        let response = self
            .client
            .post(request.url.clone())
            .header(AUTHORIZATION, request.authorization)
            .header(CONTENT_TYPE, "application/json")
            .body(request.body)
            .send()
            .await
            .map_err(|e| {
                warn!(url = %request.url, error = %e, timeout = e.is_timeout(), "hec_request_failed");
                HecError::from(e)
            })?;

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let body = response.bytes().await.map_err(|e| {
            warn!(url = %request.url, status_code = status, error = %e, "hec_response_read_failed");
            HecError::from(e)
        })?;

        info!(
            url = %request.url,
            status_code = status,
            request_length = body_length,
            response_length = body.len(),
            "hec_response"
        );

        Ok(HecResponse {
            status,
            content_type,
            body,
        })
    }
}
