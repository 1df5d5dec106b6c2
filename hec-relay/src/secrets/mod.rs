//! Per-request secret resolution.
//!
//! The relay holds no secrets of its own. On every webhook it asks a
//! [`SecretStore`] for five named parameters in one batched call and turns the
//! answer into a [`SecretBundle`]. Nothing is cached between requests.
//!
//! ```text
//! ParameterNames → SecretStore::get_parameters() → resolve_bundle() → SecretBundle
//! ```

pub mod env;
pub mod file;
pub mod memory;

use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tracing::{error, info};

pub use env::EnvSecretStore;
pub use file::FileSecretStore;
pub use memory::MemorySecretStore;

#[derive(Debug, Error)]
pub enum SecretStoreError {
    #[error("parameters not found: {}", .0.join(", "))]
    Missing(Vec<String>),

    #[error("parameters resolved empty: {}", .0.join(", "))]
    Empty(Vec<String>),

    #[error("failed to read secrets file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid secrets file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("secret store did not answer within {0:?}")]
    Timeout(Duration),
}

/// Batched key-value lookup. Implementations decrypt values before returning.
#[async_trait]
pub trait SecretStore: Send + Sync {
    /// Fetch every name in one call. The returned map may omit unknown names;
    /// completeness is checked by [`resolve_bundle`].
    async fn get_parameters(
        &self,
        names: &[&str],
    ) -> Result<HashMap<String, String>, SecretStoreError>;
}

/// Names of the five parameters the relay needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterNames {
    pub secret_token: String,
    pub hec_url: String,
    pub hec_port: String,
    pub hec_token: String,
    pub hec_index: String,
}

impl Default for ParameterNames {
    fn default() -> Self {
        Self {
            secret_token: "/zoom/secret_token".to_string(),
            hec_url: "/splunk/hec_url".to_string(),
            hec_port: "/splunk/hec_port".to_string(),
            hec_token: "/splunk/hec_token".to_string(),
            hec_index: "/splunk/hec_index".to_string(),
        }
    }
}

impl ParameterNames {
    pub fn as_slice(&self) -> [&str; 5] {
        [
            &self.secret_token,
            &self.hec_url,
            &self.hec_port,
            &self.hec_token,
            &self.hec_index,
        ]
    }
}

/// Fully resolved secrets for one request.
#[derive(Clone)]
pub struct SecretBundle {
    pub signing_secret: String,
    pub hec_url: String,
    pub hec_port: String,
    pub hec_token: String,
    pub hec_index: String,
}

impl fmt::Debug for SecretBundle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretBundle")
            .field("signing_secret", &"<redacted>")
            .field("hec_url", &self.hec_url)
            .field("hec_port", &self.hec_port)
            .field("hec_token", &"<redacted>")
            .field("hec_index", &self.hec_index)
            .finish()
    }
}

impl SecretBundle {
    /// Build a bundle from a fetched map. All five names must be present and
    /// non-empty.
    pub fn from_parameters(
        names: &ParameterNames,
        mut params: HashMap<String, String>,
    ) -> Result<Self, SecretStoreError> {
        let missing: Vec<String> = names
            .as_slice()
            .iter()
            .filter(|name| !params.contains_key(**name))
            .map(|name| name.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(SecretStoreError::Missing(missing));
        }

        let empty: Vec<String> = names
            .as_slice()
            .iter()
            .filter(|name| params.get(**name).map_or(true, |v| v.trim().is_empty()))
            .map(|name| name.to_string())
            .collect();
        if !empty.is_empty() {
            return Err(SecretStoreError::Empty(empty));
        }

        let mut take = |name: &str| params.remove(name).unwrap_or_default();

        Ok(Self {
            signing_secret: take(names.secret_token.as_str()),
            hec_url: take(names.hec_url.as_str()).trim().to_string(),
            hec_port: take(names.hec_port.as_str()).trim().to_string(),
            hec_token: take(names.hec_token.as_str()),
            hec_index: take(names.hec_index.as_str()),
        })
    }
}

/// Fetch and validate the secret bundle, bounded by `timeout`.
pub async fn resolve_bundle(
    store: &dyn SecretStore,
    names: &ParameterNames,
    timeout: Duration,
) -> Result<SecretBundle, SecretStoreError> {
    let batch = names.as_slice();

    let params = match tokio::time::timeout(timeout, store.get_parameters(&batch)).await {
        Ok(Ok(params)) => params,
        Ok(Err(e)) => {
            error!(error = %e, "secret_store_fetch_failed");
            return Err(e);
        }
        Err(_) => {
            error!(timeout_ms = timeout.as_millis() as u64, "secret_store_fetch_timeout");
            return Err(SecretStoreError::Timeout(timeout));
        }
    };

    let bundle = SecretBundle::from_parameters(names, params).map_err(|e| {
        error!(error = %e, "secret_bundle_incomplete");
        e
    })?;

    info!(
        hec_url = %bundle.hec_url,
        hec_port = %bundle.hec_port,
        hec_index = %bundle.hec_index,
        "secret_bundle_resolved"
    );

    Ok(bundle)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_params() -> HashMap<String, String> {
        HashMap::from([
            ("/zoom/secret_token".to_string(), "secret".to_string()),
            ("/splunk/hec_url".to_string(), " splunk.example.com ".to_string()),
            ("/splunk/hec_port".to_string(), "8088".to_string()),
            ("/splunk/hec_token".to_string(), "hec-token".to_string()),
            ("/splunk/hec_index".to_string(), "zoom".to_string()),
        ])
    }

    #[test]
    fn test_bundle_from_full_parameters() {
        let bundle =
            SecretBundle::from_parameters(&ParameterNames::default(), full_params()).unwrap();
        assert_eq!(bundle.signing_secret, "secret");
        assert_eq!(bundle.hec_url, "splunk.example.com");
        assert_eq!(bundle.hec_port, "8088");
        assert_eq!(bundle.hec_token, "hec-token");
        assert_eq!(bundle.hec_index, "zoom");
    }

    #[test]
    fn test_bundle_missing_parameter() {
        let mut params = full_params();
        params.remove("/splunk/hec_token");

        let err = SecretBundle::from_parameters(&ParameterNames::default(), params).unwrap_err();
        match err {
            SecretStoreError::Missing(names) => assert_eq!(names, vec!["/splunk/hec_token"]),
            other => panic!("Expected Missing, got {other:?}"),
        }
    }

    #[test]
    fn test_bundle_empty_parameter() {
        let mut params = full_params();
        params.insert("/zoom/secret_token".to_string(), "  ".to_string());

        let err = SecretBundle::from_parameters(&ParameterNames::default(), params).unwrap_err();
        assert!(matches!(err, SecretStoreError::Empty(_)));
    }

    #[test]
    fn test_bundle_debug_redacts_secrets() {
        let bundle =
            SecretBundle::from_parameters(&ParameterNames::default(), full_params()).unwrap();
        let debug = format!("{bundle:?}");
        assert!(!debug.contains("hec-token"));
        assert!(!debug.contains("\"secret\""));
        assert!(debug.contains("splunk.example.com"));
    }

    struct SlowStore;

    #[async_trait]
    impl SecretStore for SlowStore {
        async fn get_parameters(
            &self,
            _names: &[&str],
        ) -> Result<HashMap<String, String>, SecretStoreError> {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(HashMap::new())
        }
    }

    #[tokio::test]
    async fn test_resolve_bundle_timeout() {
        let err = resolve_bundle(&SlowStore, &ParameterNames::default(), Duration::from_millis(20))
            .await
            .unwrap_err();
        assert!(matches!(err, SecretStoreError::Timeout(_)));
    }

    #[tokio::test]
    async fn test_resolve_bundle_from_memory_store() {
        let store = MemorySecretStore::new(full_params());
        let bundle = resolve_bundle(&store, &ParameterNames::default(), Duration::from_secs(1))
            .await
            .unwrap();
        assert_eq!(bundle.hec_index, "zoom");
    }
}
