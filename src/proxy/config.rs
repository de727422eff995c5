use serde::{Deserialize, Serialize};

/// Proxy service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProxyConfig {
    /// Allow LAN access
    /// - false: loopback only (default)
    /// - true: bind 0.0.0.0
    #[serde(default)]
    pub allow_lan_access: bool,

    /// Listen port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Fixed upstream target used when a request carries no URL of its own
    #[serde(default)]
    pub default_proxy_url: Option<String>,

    /// Default outbound timeout (seconds)
    #[serde(default = "default_timeout")]
    pub default_timeout: f64,

    /// Upper bound for per-request timeouts (seconds)
    #[serde(default = "default_max_timeout")]
    pub max_timeout: f64,

    /// Secret injected as the login-token header on outbound requests
    #[serde(default)]
    pub login_token: String,

    /// Translation cache TTL (seconds)
    #[serde(default = "default_cache_ttl")]
    pub cache_ttl_seconds: u64,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            allow_lan_access: false,
            port: default_port(),
            default_proxy_url: None,
            default_timeout: default_timeout(),
            max_timeout: default_max_timeout(),
            login_token: String::new(),
            cache_ttl_seconds: default_cache_ttl(),
        }
    }
}

fn default_port() -> u16 {
    8001
}

fn default_timeout() -> f64 {
    20.0
}

fn default_max_timeout() -> f64 {
    300.0
}

fn default_cache_ttl() -> u64 {
    300
}

impl ProxyConfig {
    /// Actual bind address for the listener
    pub fn get_bind_address(&self) -> &str {
        if self.allow_lan_access {
            "0.0.0.0"
        } else {
            "127.0.0.1"
        }
    }
}
