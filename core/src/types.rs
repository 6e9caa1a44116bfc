//! JSON shapes exchanged with callers.

use serde::Serialize;
use serde_json::Value;

/// Recognized fields of a POST body: `{ "url", "body"?, "apiKey"? }`.
///
/// Read leniently from an arbitrary JSON value: a field that is missing, not
/// a string, or empty counts as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProxyPayload {
    pub url: Option<String>,
    pub body: Option<String>,
    pub api_key: Option<String>,
}

impl ProxyPayload {
    pub fn from_value(value: &Value) -> Self {
        Self {
            url: string_field(value, "url"),
            body: string_field(value, "body"),
            api_key: string_field(value, "apiKey"),
        }
    }
}

fn string_field(value: &Value, key: &str) -> Option<String> {
    value
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
}

/// `{"error": "..."}` reply body.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn to_vec(&self) -> Vec<u8> {
        // A struct of one String field always serializes.
        serde_json::to_vec(self).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn payload_reads_all_fields() {
        let payload = ProxyPayload::from_value(&json!({
            "url": "https://places.googleapis.com/v1/places:searchText",
            "body": "{}",
            "apiKey": "K"
        }));
        assert_eq!(
            payload.url.as_deref(),
            Some("https://places.googleapis.com/v1/places:searchText")
        );
        assert_eq!(payload.body.as_deref(), Some("{}"));
        assert_eq!(payload.api_key.as_deref(), Some("K"));
    }

    #[test]
    fn payload_ignores_empty_and_non_string_fields() {
        let payload = ProxyPayload::from_value(&json!({
            "url": 42,
            "body": "",
            "apiKey": null
        }));
        assert_eq!(payload, ProxyPayload::default());
    }

    #[test]
    fn payload_from_non_object_is_empty() {
        assert_eq!(ProxyPayload::from_value(&json!("text")), ProxyPayload::default());
        assert_eq!(ProxyPayload::from_value(&json!([1, 2])), ProxyPayload::default());
    }

    #[test]
    fn error_body_is_compact_json() {
        let body = ErrorBody {
            error: "Missing url".to_string(),
        };
        assert_eq!(body.to_vec(), br#"{"error":"Missing url"}"#.to_vec());
    }
}
