//! Collector URL composition.

use url::Url;

use super::HecError;

/// Path of the JSON event endpoint.
pub const EVENT_ENDPOINT_PATH: &str = "services/collector/event";

/// Force `https://` on the configured collector base URL.
///
/// `http://h` becomes `https://h`, a bare `h` becomes `https://h`, and an
/// `https://` URL is left alone. Scheme matching ignores case.
pub fn normalize_base_url(raw: &str) -> String {
    let raw = raw.trim();

    if starts_with_ignore_case(raw, "http://") {
        return format!("https://{}", &raw["http://".len()..]);
    }
    if starts_with_ignore_case(raw, "https://") {
        return raw.to_string();
    }
    format!("https://{raw}")
}

/// `<normalized base>:<port>/services/collector/event`, parsed.
pub fn event_endpoint(base_url: &str, port: &str) -> Result<Url, HecError> {
    let base = normalize_base_url(base_url);
    let composed = format!(
        "{}:{}/{}",
        base.trim_end_matches('/'),
        port.trim(),
        EVENT_ENDPOINT_PATH
    );

    let url = Url::parse(&composed).map_err(|e| HecError::InvalidEndpoint {
        url: composed.clone(),
        reason: e.to_string(),
    })?;

    if url.scheme() != "https" || url.host_str().map_or(true, str::is_empty) {
        return Err(HecError::InvalidEndpoint {
            url: composed,
            reason: "expected an https URL with a host".to_string(),
        });
    }

    Ok(url)
}

fn starts_with_ignore_case(value: &str, prefix: &str) -> bool {
    value
        .get(..prefix.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
}
