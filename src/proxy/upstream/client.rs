// Upstream forwarding client
// Thin reqwest wrapper with per-request deadlines and error-kind mapping

use reqwest::{Client, Response};
use std::time::Duration;
use tracing::{error, info};

use crate::proxy::error::ProxyError;
use crate::proxy::upstream::request::OutboundRequest;

/// Upper bound of the upstream error excerpt carried back to callers.
const ERROR_EXCERPT_CHARS: usize = 200;

/// Shared HTTP client pair: one verifying TLS certificates, one not.
/// Verification is a per-request flag, so both pools stay warm.
pub struct UpstreamClient {
    verified: Client,
    insecure: Client,
}

impl UpstreamClient {
    pub fn new() -> Result<Self, String> {
        let verified = Self::builder().build().map_err(|e| e.to_string())?;
        let insecure = Self::builder()
            .danger_accept_invalid_certs(true)
            .build()
            .map_err(|e| e.to_string())?;

        Ok(Self { verified, insecure })
    }

    fn builder() -> reqwest::ClientBuilder {
        // No global timeout: the caller owns the per-request deadline.
        Client::builder()
            .connect_timeout(Duration::from_secs(20))
            .pool_max_idle_per_host(16)
            .pool_idle_timeout(Duration::from_secs(90))
            .tcp_keepalive(Duration::from_secs(60))
    }

    /// Dispatch an outbound request. The deadline bounds the whole call,
    /// connection setup included; exceeding it is a timeout, every other
    /// transport fault is "upstream unreachable", and 4xx/5xx statuses come
    /// back as upstream HTTP errors with a body excerpt.
    pub async fn dispatch(&self, request: OutboundRequest) -> Result<Response, ProxyError> {
        let OutboundRequest {
            method,
            url,
            headers,
            body,
            timeout,
            verify_ssl,
        } = request;

        let client = if verify_ssl { &self.verified } else { &self.insecure };

        let mut builder = client.request(method, url).headers(headers).timeout(timeout);
        if let Some(body) = &body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                error!("Request to upstream timed out after {:?}", timeout);
                ProxyError::Timeout(timeout.as_secs_f64())
            } else {
                error!("Request error: {}", e);
                ProxyError::UpstreamUnreachable(e.to_string())
            }
        })?;

        let status = response.status();
        if status.is_client_error() || status.is_server_error() {
            error!("Upstream HTTP error: {}", status.as_u16());
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| format!("HTTP {}", status.as_u16()));
            let excerpt: String = body.chars().take(ERROR_EXCERPT_CHARS).collect();
            return Err(ProxyError::UpstreamHttp { status, excerpt });
        }

        info!("Upstream response: {}", status.as_u16());
        Ok(response)
    }
}
