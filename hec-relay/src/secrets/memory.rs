//! In-memory secret store for embedding and tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use super::{SecretStore, SecretStoreError};

/// Fixed map of secrets. Counts how many times it was queried.
#[derive(Debug, Default)]
pub struct MemorySecretStore {
    values: HashMap<String, String>,
    fetches: AtomicUsize,
}

impl MemorySecretStore {
    pub fn new(values: HashMap<String, String>) -> Self {
        Self {
            values,
            fetches: AtomicUsize::new(0),
        }
    }

    /// Number of `get_parameters` calls served so far.
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SecretStore for MemorySecretStore {
    async fn get_parameters(
        &self,
        names: &[&str],
    ) -> Result<HashMap<String, String>, SecretStoreError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);

        Ok(names
            .iter()
            .filter_map(|name| {
                self.values
                    .get(*name)
                    .map(|value| (name.to_string(), value.clone()))
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_counts_fetches() {
        let store = MemorySecretStore::new(HashMap::from([(
            "/zoom/secret_token".to_string(),
            "abc".to_string(),
        )]));
        assert_eq!(store.fetch_count(), 0);

        let params = store
            .get_parameters(&["/zoom/secret_token", "/unknown"])
            .await
            .unwrap();

        assert_eq!(store.fetch_count(), 1);
        assert_eq!(params.len(), 1);
        assert_eq!(params["/zoom/secret_token"], "abc");
    }
}
