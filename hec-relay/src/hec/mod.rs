//! Splunk HTTP Event Collector forwarding.
//!
//! This module provides:
//! - The `/services/collector/event` payload (`HecEvent`)
//! - HTTPS normalization of the configured collector URL
//! - The `EventForwarder` seam and its reqwest implementation (`HecClient`)
//!
//! ```text
//! ZoomEvent + SecretBundle → HecEvent → HecRequest → EventForwarder → HecResponse
//! ```

pub mod client;
pub mod endpoint;
pub mod types;

use async_trait::async_trait;
use thiserror::Error;

pub use client::HecClient;
pub use endpoint::{event_endpoint, normalize_base_url, EVENT_ENDPOINT_PATH};
pub use types::{HecEvent, HecRequest, HecResponse, SOURCETYPE};

#[derive(Debug, Error)]
pub enum HecError {
    #[error("HEC request timed out")]
    Timeout,

    #[error("HEC transport error: {0}")]
    Transport(String),

    #[error("HEC rejected event with HTTP {status}")]
    Rejected { status: u16 },

    #[error("failed to serialize HEC event: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("invalid HEC endpoint {url}: {reason}")]
    InvalidEndpoint { url: String, reason: String },
}

impl From<reqwest::Error> for HecError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            HecError::Timeout
        } else {
            HecError::Transport(err.to_string())
        }
    }
}

/// Delivers one prepared request to the collector.
///
/// Any HTTP answer, whatever its status, is `Ok`; only failures to get an
/// answer are errors. Callers decide what a non-2xx answer means.
#[async_trait]
pub trait EventForwarder: Send + Sync {
    async fn forward(&self, request: HecRequest) -> Result<HecResponse, HecError>;
}
