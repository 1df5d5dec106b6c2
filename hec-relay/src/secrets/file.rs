//! Secret store backed by a JSON file.
//!
//! The file holds a flat object of parameter name to value. It is re-read on
//! every call so rotated secrets take effect without a restart.

use std::collections::HashMap;
use std::path::PathBuf;

use async_trait::async_trait;

use super::{SecretStore, SecretStoreError};

#[derive(Debug, Clone)]
pub struct FileSecretStore {
    path: PathBuf,
}

impl FileSecretStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl SecretStore for FileSecretStore {
    async fn get_parameters(
        &self,
        names: &[&str],
    ) -> Result<HashMap<String, String>, SecretStoreError> {
        let raw = tokio::fs::read(&self.path)
            .await
            .map_err(|source| SecretStoreError::Io {
                path: self.path.clone(),
                source,
            })?;

        let mut all: HashMap<String, String> =
            serde_json::from_slice(&raw).map_err(|source| SecretStoreError::Parse {
                path: self.path.clone(),
                source,
            })?;

        let mut found = HashMap::with_capacity(names.len());
        let mut missing = Vec::new();
        for name in names {
            match all.remove(*name) {
                Some(value) => {
                    found.insert(name.to_string(), value);
                }
                None => missing.push(name.to_string()),
            }
        }

        if !missing.is_empty() {
            return Err(SecretStoreError::Missing(missing));
        }

        Ok(found)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn test_reads_requested_names_only() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"/zoom/secret_token": "s3cret", "/splunk/hec_url": "splunk.local", "/other": "x"}}"#
        )
        .unwrap();

        let store = FileSecretStore::new(file.path());
        let params = store
            .get_parameters(&["/zoom/secret_token", "/splunk/hec_url"])
            .await
            .unwrap();

        assert_eq!(params.len(), 2);
        assert_eq!(params["/zoom/secret_token"], "s3cret");
        assert_eq!(params["/splunk/hec_url"], "splunk.local");
    }

    #[tokio::test]
    async fn test_missing_file() {
        let store = FileSecretStore::new("/nonexistent/hec-relay/secrets.json");
        let err = store.get_parameters(&["/zoom/secret_token"]).await.unwrap_err();
        assert!(matches!(err, SecretStoreError::Io { .. }));
    }

    #[tokio::test]
    async fn test_invalid_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();

        let store = FileSecretStore::new(file.path());
        let err = store.get_parameters(&["/zoom/secret_token"]).await.unwrap_err();
        assert!(matches!(err, SecretStoreError::Parse { .. }));
    }

    #[tokio::test]
    async fn test_missing_name() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"/zoom/secret_token": "s3cret"}}"#).unwrap();

        let store = FileSecretStore::new(file.path());
        let err = store
            .get_parameters(&["/zoom/secret_token", "/splunk/hec_port"])
            .await
            .unwrap_err();
        assert!(matches!(err, SecretStoreError::Missing(ref n) if n == &vec!["/splunk/hec_port".to_string()]));
    }
}
