//! HEC wire types.

use bytes::Bytes;
use serde::Serialize;
use serde_json::Value;
use url::Url;

/// `sourcetype` stamped on every forwarded event.
pub const SOURCETYPE: &str = "zoom:webhook";

/// Body of a `/services/collector/event` request.
#[derive(Debug, Clone, Serialize)]
pub struct HecEvent {
    /// Zoom `event_ts`; HEC uses receipt time when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<Value>,
    /// Address of the webhook caller
    pub host: String,
    /// `<prefix>:<zoom event type>`
    pub source: String,
    pub sourcetype: &'static str,
    pub index: String,
    /// The Zoom body, nested verbatim
    pub event: Value,
}

impl HecEvent {
    pub fn new(
        time: Option<Value>,
        host: String,
        source_prefix: &str,
        event_type: &str,
        index: String,
        event: Value,
    ) -> Self {
        Self {
            time,
            host,
            source: format!("{source_prefix}:{event_type}"),
            sourcetype: SOURCETYPE,
            index,
            event,
        }
    }
}

/// A fully prepared POST to the collector.
#[derive(Debug, Clone)]
pub struct HecRequest {
    pub url: Url,
    /// Complete `Authorization` header value, `Splunk <token>`
    pub authorization: String,
    pub body: Vec<u8>,
}

impl HecRequest {
    pub fn new(url: Url, token: &str, event: &HecEvent) -> Result<Self, serde_json::Error> {
        Ok(Self {
            url,
            authorization: format!("Splunk {token}"),
            body: serde_json::to_vec(event)?,
        })
    }
}

/// What the collector answered.
#[derive(Debug, Clone)]
pub struct HecResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Bytes,
}

impl HecResponse {
    /// Whether the collector accepted the event (any 2xx).
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_hec_event_shape() {
        let body = json!({"event": "meeting.started", "event_ts": 1700000000000u64});
        let event = HecEvent::new(
            Some(json!(1700000000000u64)),
            "203.0.113.7".to_string(),
            "aws:api:gw:zoom",
            "meeting.started",
            "zoom".to_string(),
            body.clone(),
        );

        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["time"], json!(1700000000000u64));
        assert_eq!(value["host"], "203.0.113.7");
        assert_eq!(value["source"], "aws:api:gw:zoom:meeting.started");
        assert_eq!(value["sourcetype"], "zoom:webhook");
        assert_eq!(value["index"], "zoom");
        assert_eq!(value["event"], body);
    }

    #[test]
    fn test_hec_event_without_time() {
        let event = HecEvent::new(
            None,
            "h".to_string(),
            "p",
            "e",
            "i".to_string(),
            json!({"event": "e"}),
        );
        let value = serde_json::to_value(&event).unwrap();
        assert!(value.get("time").is_none());
    }

    #[test]
    fn test_hec_request_authorization() {
        let url = Url::parse("https://splunk.example.com:8088/services/collector/event").unwrap();
        let event = HecEvent::new(None, "h".into(), "p", "e", "i".into(), json!({}));
        let request = HecRequest::new(url, "abc-123", &event).unwrap();

        assert_eq!(request.authorization, "Splunk abc-123");
        let parsed: Value = serde_json::from_slice(&request.body).unwrap();
        assert_eq!(parsed["sourcetype"], "zoom:webhook");
    }

    #[test]
    fn test_hec_response_is_success() {
        let response = |status| HecResponse {
            status,
            content_type: None,
            body: Bytes::new(),
        };

        assert!(response(200).is_success());
        assert!(response(202).is_success());
        assert!(!response(199).is_success());
        assert!(!response(300).is_success());
        assert!(!response(401).is_success());
        assert!(!response(503).is_success());
    }
}
