//! Zoom → Splunk HEC webhook relay.
//!
//! Receives signed Zoom webhook deliveries, answers the endpoint URL
//! validation handshake, verifies `x-zm-signature` on every other event and
//! forwards it to a Splunk HTTP Event Collector.
//!
//! ## Architecture
//!
//! ```text
//! Zoom → web (axum) → relay → secrets (per request) → hec → Splunk
//! ```
//!
//! The relay is stateless: secrets are fetched on every request and nothing
//! is queued, retried or stored.

pub mod config;
pub mod error;
pub mod hec;
pub mod relay;
pub mod secrets;
pub mod web;
pub mod zoom;

// Re-export commonly used types
pub use config::{Config, SecretStoreKind, SignedPayload};
pub use error::RelayError;
pub use hec::{EventForwarder, HecClient, HecEvent};
pub use relay::{handle_webhook, RelayResponse};
pub use secrets::{ParameterNames, SecretBundle, SecretStore};
pub use web::{router, AppState};
pub use zoom::{InboundRequest, ZoomEvent};
