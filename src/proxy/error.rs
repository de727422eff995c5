// Proxy error kinds and their HTTP mapping

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde_json::json;
use thiserror::Error;

/// Failure kinds surfaced by the forwarding pipeline.
///
/// Transport faults, upstream HTTP errors, deadline expiry, and response
/// processing failures each map to their own outbound status so callers can
/// tell the proxy's problems apart from the upstream's.
#[derive(Debug, Error)]
pub enum ProxyError {
    /// Connection, DNS, or other transport-level fault reaching the upstream.
    #[error("Upstream unreachable: {0}")]
    UpstreamUnreachable(String),

    /// Upstream answered with a non-success status.
    #[error("Upstream error: {status} - {excerpt}")]
    UpstreamHttp {
        status: StatusCode,
        excerpt: String,
    },

    /// The outbound deadline elapsed before the upstream answered.
    #[error("Request timeout after {0} seconds")]
    Timeout(f64),

    /// Upstream declared JSON but the body failed to parse.
    #[error("Failed to parse JSON response from upstream")]
    ResponseParse(#[source] serde_json::Error),

    /// The inbound request could not be turned into an outbound one.
    #[error("{0}")]
    BadRequest(String),
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let (status, detail) = match self {
            ProxyError::UpstreamUnreachable(msg) => (
                StatusCode::BAD_GATEWAY,
                format!("Upstream unreachable: {}", msg),
            ),
            ProxyError::UpstreamHttp { status, excerpt } => (
                status,
                format!("Upstream error: {} - {}", status.as_u16(), excerpt),
            ),
            ProxyError::Timeout(secs) => (
                StatusCode::GATEWAY_TIMEOUT,
                format!("Request timeout after {} seconds", secs),
            ),
            ProxyError::ResponseParse(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to parse JSON response from upstream".to_string(),
            ),
            ProxyError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
        };

        (status, Json(json!({ "detail": detail }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upstream_http_error_keeps_status() {
        let err = ProxyError::UpstreamHttp {
            status: StatusCode::NOT_FOUND,
            excerpt: "missing".to_string(),
        };
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn timeout_maps_to_504() {
        let response = ProxyError::Timeout(20.0).into_response();
        assert_eq!(response.status(), StatusCode::GATEWAY_TIMEOUT);
    }

    #[test]
    fn unreachable_maps_to_502() {
        let response =
            ProxyError::UpstreamUnreachable("connection refused".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }
}
