// Outbound request assembly
// URL augmentation, header shaping, cookie folding, and auth injection

use std::collections::HashMap;
use std::time::Duration;

use axum::http::header::{AUTHORIZATION, COOKIE};
use axum::http::{HeaderMap, HeaderName, HeaderValue, Method};
use serde_json::{Map, Value};
use tracing::warn;
use url::Url;

use crate::proxy::config::ProxyConfig;
use crate::proxy::error::ProxyError;
use crate::proxy::schemas::ProxyRequest;

/// Header carrying the configured secret towards the upstream.
const LOGIN_TOKEN_HEADER: &str = "login-token";

/// Everything the forwarder needs for one dispatch. Immutable per request.
#[derive(Debug)]
pub struct OutboundRequest {
    pub method: Method,
    pub url: String,
    pub headers: HeaderMap,
    pub body: Option<Value>,
    pub timeout: Duration,
    pub verify_ssl: bool,
}

/// Assemble the outbound request from the inbound payload and configuration.
pub fn build_outbound(
    req: &ProxyRequest,
    config: &ProxyConfig,
) -> Result<OutboundRequest, ProxyError> {
    let method_name = req.method.trim().to_uppercase();
    let method = Method::from_bytes(method_name.as_bytes())
        .map_err(|_| ProxyError::BadRequest(format!("Invalid HTTP method: {}", req.method)))?;

    let base = req
        .url
        .as_deref()
        .or(config.default_proxy_url.as_deref())
        .ok_or_else(|| {
            ProxyError::BadRequest(
                "No target URL provided and no default upstream configured".to_string(),
            )
        })?;

    let url = build_target_url(base, req.params.as_ref(), req.payload.as_ref())?;
    let headers = build_headers(req.headers.as_ref(), req.cookies.as_ref(), &config.login_token);

    // Payload is dropped for methods without body semantics.
    let body = if matches!(method, Method::GET | Method::HEAD | Method::OPTIONS) {
        None
    } else {
        req.payload.clone()
    };

    let timeout = clamp_timeout(
        req.timeout.unwrap_or(config.default_timeout),
        config.max_timeout,
    );

    Ok(OutboundRequest {
        method,
        url,
        headers,
        body,
        timeout: Duration::from_secs_f64(timeout),
        verify_ssl: req.verify_ssl,
    })
}

/// Augment the target URL with a `schema` value (query params take priority
/// over the payload) and with the whole params map packed into one
/// compact-JSON `params` query value.
fn build_target_url(
    base: &str,
    params: Option<&Map<String, Value>>,
    payload: Option<&Value>,
) -> Result<String, ProxyError> {
    let mut url =
        Url::parse(base).map_err(|e| ProxyError::BadRequest(format!("Invalid target URL: {}", e)))?;

    let schema = params
        .and_then(|p| p.get("schema"))
        .or_else(|| payload.and_then(|body| body.get("schema")));
    if let Some(schema) = schema {
        url.query_pairs_mut()
            .append_pair("schema", &query_value(schema));
    }

    if let Some(params) = params {
        if !params.is_empty() {
            let packed = serde_json::to_string(params)
                .map_err(|e| ProxyError::BadRequest(format!("Unserializable query params: {}", e)))?;
            url.query_pairs_mut().append_pair("params", &packed);
        }
    }

    Ok(url.into())
}

fn query_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Copy inbound headers, fold cookies into a single Cookie header, and
/// inject the configured secret unless the caller already authorizes itself.
fn build_headers(
    headers: Option<&HashMap<String, String>>,
    cookies: Option<&HashMap<String, String>>,
    login_token: &str,
) -> HeaderMap {
    let mut map = HeaderMap::new();

    if let Some(headers) = headers {
        for (name, value) in headers {
            match (
                HeaderName::try_from(name.as_str()),
                HeaderValue::from_str(value),
            ) {
                (Ok(name), Ok(value)) => {
                    map.insert(name, value);
                }
                _ => warn!("Dropping invalid header: {}", name),
            }
        }
    }

    if let Some(cookies) = cookies {
        if !cookies.is_empty() {
            let joined = cookies
                .iter()
                .map(|(k, v)| format!("{}={}", k, v))
                .collect::<Vec<_>>()
                .join("; ");
            match HeaderValue::from_str(&joined) {
                Ok(value) => {
                    map.insert(COOKIE, value);
                }
                Err(_) => warn!("Dropping invalid cookie values"),
            }
        }
    }

    if login_token.is_empty() {
        warn!("No login token configured; forwarding without the login-token header");
    } else if !map.contains_key(AUTHORIZATION) {
        // The presence check is on Authorization, the injected header is
        // login-token. Kept asymmetric for upstream compatibility.
        match HeaderValue::from_str(login_token) {
            Ok(value) => {
                map.insert(HeaderName::from_static(LOGIN_TOKEN_HEADER), value);
            }
            Err(_) => warn!("Configured login token is not a valid header value"),
        }
    }

    map
}

fn clamp_timeout(requested: f64, max_timeout: f64) -> f64 {
    requested.min(max_timeout).max(1.0)
}
