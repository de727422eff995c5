// Admin handlers
// Manual translation reload and language listing, straight into the cache

use axum::extract::State;
use axum::response::{IntoResponse, Json};
use serde_json::json;
use tracing::{error, info};

use crate::proxy::schemas::ReloadResponse;
use crate::proxy::server::AppState;

/// Manually reload translations from the backing store.
///
/// A store failure keeps the previous snapshot serving; the response then
/// reports the retained language count alongside the error.
pub async fn reload_translations(State(state): State<AppState>) -> impl IntoResponse {
    info!("Translation reload requested via admin endpoint");

    match state.cache.reload().await {
        Ok(summary) => Json(ReloadResponse {
            status: "success".to_string(),
            message: Some(format!("Loaded {} languages", summary.languages_loaded)),
            languages_loaded: Some(summary.languages_loaded),
        }),
        Err(e) => {
            error!("Failed to reload translations: {}", e);
            let retained = state.cache.language_count().await;
            Json(ReloadResponse {
                status: "error".to_string(),
                message: Some(e.to_string()),
                languages_loaded: Some(retained),
            })
        }
    }
}

/// List the currently known language codes.
pub async fn list_languages(State(state): State<AppState>) -> impl IntoResponse {
    let languages = state.cache.languages().await;
    Json(json!({
        "status": "success",
        "count": languages.len(),
        "languages": languages,
    }))
}

/// Health check handler
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "service": "translation-proxy",
    }))
}
