//! Secret store backed by environment variables.
//!
//! A parameter name maps to a variable by dropping the leading `/`, turning
//! `/`, `-` and `.` into `_` and upper-casing, so `/zoom/secret_token` is read
//! from `ZOOM_SECRET_TOKEN`. Variables are read on every call.

use std::collections::HashMap;
use std::env;

use async_trait::async_trait;

use super::{SecretStore, SecretStoreError};

#[derive(Debug, Clone, Default)]
pub struct EnvSecretStore;

impl EnvSecretStore {
    pub fn new() -> Self {
        Self
    }
}

/// Environment variable holding the given parameter.
pub fn env_var_name(parameter: &str) -> String {
    parameter
        .trim_start_matches('/')
        .chars()
        .map(|c| match c {
            '/' | '-' | '.' => '_',
            other => other.to_ascii_uppercase(),
        })
        .collect()
}

#[async_trait]
impl SecretStore for EnvSecretStore {
    async fn get_parameters(
        &self,
        names: &[&str],
    ) -> Result<HashMap<String, String>, SecretStoreError> {
        let mut found = HashMap::with_capacity(names.len());
        let mut missing = Vec::new();

        for name in names {
            match env::var(env_var_name(name)) {
                Ok(value) => {
                    found.insert(name.to_string(), value);
                }
                Err(_) => missing.push(name.to_string()),
            }
        }

        if !missing.is_empty() {
            return Err(SecretStoreError::Missing(missing));
        }

        Ok(found)
    }
}
