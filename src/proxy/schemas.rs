// Wire types for the proxy and admin endpoints

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Inbound payload of the /proxy endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct ProxyRequest {
    /// Target URL; falls back to the configured default upstream when absent
    #[serde(default)]
    pub url: Option<String>,

    /// HTTP method (normalized to uppercase before dispatch)
    #[serde(default = "default_method")]
    pub method: String,

    #[serde(default)]
    pub headers: Option<HashMap<String, String>>,

    #[serde(default)]
    pub params: Option<Map<String, Value>>,

    /// Request body (any JSON type)
    #[serde(default)]
    pub payload: Option<Value>,

    #[serde(default)]
    pub cookies: Option<HashMap<String, String>>,

    /// Outbound timeout in seconds; falls back to the configured default and
    /// is clamped to the configured maximum
    #[serde(default)]
    pub timeout: Option<f64>,

    /// Verify upstream TLS certificates
    #[serde(default)]
    pub verify_ssl: bool,
}

fn default_method() -> String {
    "GET".to_string()
}

/// Response of the admin reload endpoint
#[derive(Debug, Serialize)]
pub struct ReloadResponse {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub languages_loaded: Option<usize>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn minimal_request_gets_defaults() {
        let req: ProxyRequest =
            serde_json::from_value(json!({ "url": "http://example.com/data" })).unwrap();
        assert_eq!(req.method, "GET");
        assert!(req.timeout.is_none());
        assert!(!req.verify_ssl);
        assert!(req.headers.is_none());
        assert!(req.payload.is_none());
    }

    #[test]
    fn full_request_deserializes() {
        let req: ProxyRequest = serde_json::from_value(json!({
            "url": "https://api.example.com/items",
            "method": "post",
            "headers": { "X-Trace": "abc" },
            "params": { "lang": "fr" },
            "payload": { "query": "test" },
            "cookies": { "session": "s1" },
            "timeout": 5.0,
            "verify_ssl": true
        }))
        .unwrap();
        assert_eq!(req.method, "post");
        assert_eq!(req.timeout, Some(5.0));
        assert!(req.verify_ssl);
        assert_eq!(
            req.params.unwrap().get("lang"),
            Some(&Value::String("fr".to_string()))
        );
    }
}
