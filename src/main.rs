use std::sync::Arc;
use std::time::Duration;

use translation_proxy::modules;
use translation_proxy::proxy;

#[tokio::main]
async fn main() -> Result<(), String> {
    modules::logger::init_logger();

    let mut config = match modules::config::load_config() {
        Ok(cfg) => cfg,
        Err(err) => {
            tracing::warn!("failed to load config: {}. using defaults", err);
            let cfg = proxy::ProxyConfig::default();
            let _ = modules::config::save_config(&cfg);
            cfg
        }
    };

    if let Ok(value) = std::env::var("TRANSLATION_PROXY_ALLOW_LAN") {
        let enabled = matches!(value.as_str(), "1" | "true" | "yes" | "on");
        if enabled {
            config.allow_lan_access = true;
        }
    }

    if let Ok(token) = std::env::var("TRANSLATION_PROXY_LOGIN_TOKEN") {
        if !token.is_empty() {
            config.login_token = token;
        }
    }

    let bind_address = if let Ok(addr) = std::env::var("TRANSLATION_PROXY_BIND") {
        if addr != "127.0.0.1" && addr != "localhost" {
            config.allow_lan_access = true;
        }
        addr
    } else {
        config.get_bind_address().to_string()
    };

    if config.login_token.is_empty() {
        tracing::warn!(
            "no login token configured; outbound requests will not carry the login-token header"
        );
    }

    let db_path = modules::storage::get_db_path()?;
    let store = Arc::new(proxy::translator::SqliteRuleStore::new(db_path));
    store
        .init_db()
        .map_err(|e| format!("failed to initialize translation store: {}", e))?;

    let cache = Arc::new(proxy::translator::TranslationCache::new(
        store,
        Duration::from_secs(config.cache_ttl_seconds),
    ));

    match cache.reload().await {
        Ok(summary) => {
            tracing::info!("loaded {} languages at startup", summary.languages_loaded)
        }
        Err(err) => tracing::warn!(
            "translation store unavailable at startup: {}. starting with an empty cache",
            err
        ),
    }

    let upstream = Arc::new(
        proxy::upstream::UpstreamClient::new()
            .map_err(|e| format!("failed to create upstream client: {}", e))?,
    );

    let port = config.port;
    let (server, handle) =
        proxy::AxumServer::start(bind_address.clone(), port, Arc::new(config), cache, upstream)
            .await
            .map_err(|e| format!("failed to start proxy server: {}", e))?;

    tracing::info!(
        "translation-proxy listening on http://{}:{}",
        bind_address,
        port
    );

    tokio::signal::ctrl_c()
        .await
        .map_err(|e| format!("failed to listen for shutdown signal: {}", e))?;

    tracing::info!("shutdown requested, stopping server...");
    server.stop();
    let _ = handle.await;

    Ok(())
}
