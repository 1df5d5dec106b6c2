//! Error taxonomy for the relay handler.
//!
//! Every failure a request can hit maps to exactly one HTTP status and one
//! generic message. The detail carried by each variant is for logs only and
//! never reaches the caller.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::hec::HecError;
use crate::secrets::SecretStoreError;

/// Result type alias for relay operations.
pub type Result<T> = std::result::Result<T, RelayError>;

#[derive(Debug, Error)]
pub enum RelayError {
    /// Missing headers or an unusable body.
    #[error("malformed request: {0}")]
    MalformedRequest(String),

    /// The secret bundle could not be fully resolved or is unusable.
    #[error("configuration unavailable: {0}")]
    ConfigUnavailable(String),

    /// The `x-zm-signature` header did not match the computed signature.
    #[error("signature mismatch")]
    SignatureInvalid,

    /// The HEC endpoint could not be reached or did not accept the event.
    #[error("forwarding failed: {0}")]
    ForwardingFailure(#[from] HecError),

    /// A relay-side fault unrelated to the caller, the secrets or HEC.
    #[error("internal error: {0}")]
    Internal(String),
}

impl RelayError {
    pub fn status(&self) -> StatusCode {
        match self {
            RelayError::MalformedRequest(_) => StatusCode::BAD_REQUEST,
            RelayError::SignatureInvalid => StatusCode::FORBIDDEN,
            RelayError::ConfigUnavailable(_)
            | RelayError::ForwardingFailure(_)
            | RelayError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The only text a caller ever sees.
    pub fn public_message(&self) -> &'static str {
        match self {
            RelayError::MalformedRequest(_) => "Bad Request",
            RelayError::SignatureInvalid => "Forbidden",
            RelayError::ConfigUnavailable(_)
            | RelayError::ForwardingFailure(_)
            | RelayError::Internal(_) => "Internal Server Error",
        }
    }
}

impl From<SecretStoreError> for RelayError {
    fn from(err: SecretStoreError) -> Self {
        RelayError::ConfigUnavailable(err.to_string())
    }
}

/// Body of every relay-generated error response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub message: &'static str,
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        (
            self.status(),
            Json(ErrorBody {
                message: self.public_message(),
            }),
        )
            .into_response()
    }
}
