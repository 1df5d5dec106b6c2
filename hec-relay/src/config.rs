//! Configuration module for environment variable parsing.
//!
//! Only process-level settings live here. The five secrets used to verify and
//! forward webhooks are fetched from the secret store on every request and are
//! never part of `Config`.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use tracing::warn;

use crate::secrets::ParameterNames;

/// Which backend resolves the per-request secrets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SecretStoreKind {
    /// Secrets read from environment variables derived from the parameter names.
    Env,
    /// Secrets read from a JSON object on disk.
    File(PathBuf),
}

/// What the `v0` signature is computed over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignedPayload {
    /// The parsed body serialized back to compact JSON, sender key order kept.
    Reserialized,
    /// The body bytes exactly as received.
    Raw,
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Port for the web server to listen on
    pub port: u16,

    /// Secret store backend
    pub secret_store: SecretStoreKind,

    /// Names of the five parameters fetched per request
    pub parameter_names: ParameterNames,

    /// Upper bound on a single secret store fetch in milliseconds
    pub secret_store_timeout_ms: u64,

    /// HEC request timeout in milliseconds
    pub hec_request_timeout_ms: u64,

    /// Prefix of the HEC `source` field, followed by `:<event type>`
    pub hec_source_prefix: String,

    /// Payload used when computing the expected signature
    pub signed_payload: SignedPayload,

    /// Take the caller address from `X-Forwarded-For` instead of the peer address
    pub trust_forwarded_for: bool,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Config {
            port: parse_positive("PORT", 8080),

            secret_store: parse_secret_store(),

            parameter_names: ParameterNames {
                secret_token: param_name("ZOOM_SECRET_TOKEN_PARAM", "/zoom/secret_token"),
                hec_url: param_name("SPLUNK_HEC_URL_PARAM", "/splunk/hec_url"),
                hec_port: param_name("SPLUNK_HEC_PORT_PARAM", "/splunk/hec_port"),
                hec_token: param_name("SPLUNK_HEC_TOKEN_PARAM", "/splunk/hec_token"),
                hec_index: param_name("SPLUNK_HEC_INDEX_PARAM", "/splunk/hec_index"),
            },

            secret_store_timeout_ms: parse_positive("SECRET_STORE_TIMEOUT_MS", 3000),

            hec_request_timeout_ms: parse_positive("HEC_REQUEST_TIMEOUT_MS", 8000),

            hec_source_prefix: env::var("HEC_SOURCE_PREFIX")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| "aws:api:gw:zoom".to_string()),

            signed_payload: parse_signed_payload("ZOOM_SIGNED_PAYLOAD"),

            trust_forwarded_for: parse_bool("TRUST_FORWARDED_FOR", false),
        }
    }

    pub fn secret_store_timeout(&self) -> Duration {
        Duration::from_millis(self.secret_store_timeout_ms)
    }

    pub fn hec_request_timeout(&self) -> Duration {
        Duration::from_millis(self.hec_request_timeout_ms)
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            port: 8080,
            secret_store: SecretStoreKind::Env,
            parameter_names: ParameterNames::default(),
            secret_store_timeout_ms: 3000,
            hec_request_timeout_ms: 8000,
            hec_source_prefix: "aws:api:gw:zoom".to_string(),
            signed_payload: SignedPayload::Reserialized,
            trust_forwarded_for: false,
        }
    }
}

fn param_name(var: &str, default: &str) -> String {
    env::var(var)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn parse_secret_store() -> SecretStoreKind {
    let kind = env::var("SECRET_STORE").unwrap_or_else(|_| "env".to_string());

    match kind.trim().to_lowercase().as_str() {
        "env" => SecretStoreKind::Env,
        "file" => SecretStoreKind::File(PathBuf::from(
            env::var("SECRETS_FILE").unwrap_or_else(|_| "secrets.json".to_string()),
        )),
        other => {
            warn!(env_var = "SECRET_STORE", value = %other, "Unknown secret store, using env");
            SecretStoreKind::Env
        }
    }
}

fn parse_signed_payload(name: &str) -> SignedPayload {
    let raw = match env::var(name) {
        Ok(v) => v,
        Err(_) => return SignedPayload::Reserialized,
    };

    match raw.trim().to_lowercase().as_str() {
        "reserialized" => SignedPayload::Reserialized,
        "raw" => SignedPayload::Raw,
        _ => {
            warn!(env_var = name, value = %raw, "Invalid signed payload mode, using default");
            SignedPayload::Reserialized
        }
    }
}

/// Parse a non-zero number. Zero would disable a timeout or pick a random port.
fn parse_positive<T>(name: &str, default: T) -> T
where
    T: FromStr + Default + PartialEq,
{
    let raw = match env::var(name) {
        Ok(v) => v,
        Err(_) => return default,
    };

    match raw.trim().parse::<T>() {
        Ok(value) if value != T::default() => value,
        _ => {
            warn!(env_var = name, value = %raw, "Invalid or zero value, using default");
            default
        }
    }
}

/// Parse a boolean flag such as "true", "1", "yes".
fn parse_bool(name: &str, default: bool) -> bool {
    let raw = match env::var(name) {
        Ok(v) => v,
        Err(_) => return default,
    };

    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => true,
        "0" | "false" | "no" | "off" => false,
        _ => {
            warn!(env_var = name, value = %raw, "Invalid boolean, using default");
            default
        }
    }
}
