// Proxy handler
// Inbound pipeline: resolve language, build the outbound request, dispatch,
// translate the response

use axum::extract::{Json, State};
use axum::response::{IntoResponse, Response};
use serde_json::Value;
use tracing::{debug, error, info, warn};

use crate::proxy::common::language::resolve_language;
use crate::proxy::error::ProxyError;
use crate::proxy::schemas::ProxyRequest;
use crate::proxy::server::AppState;
use crate::proxy::translator::{JsonTranslator, TranslationCache};
use crate::proxy::upstream::build_outbound;

/// Body of a proxied response: translated JSON or verbatim text.
pub(crate) enum ProxyPayload {
    Json(Value),
    Text(String),
}

/// Dynamic proxy endpoint with automatic JSON translation.
///
/// The upstream's status is mirrored on success; failures map to the error
/// kinds in [`ProxyError`].
pub async fn handle_proxy(
    State(state): State<AppState>,
    Json(req): Json<ProxyRequest>,
) -> Result<Response, ProxyError> {
    let language = resolve_language(req.params.as_ref(), req.payload.as_ref());

    let outbound = build_outbound(&req, &state.config)?;

    info!("Proxying {} request to: {}", outbound.method, outbound.url);
    if let Some(language) = &language {
        info!("Translation language detected: {}", language);
    }

    let response = state.upstream.dispatch(outbound).await?;

    let status = response.status();
    let content_type = response
        .headers()
        .get(axum::http::header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_string();
    let body = response
        .text()
        .await
        .map_err(|e| ProxyError::UpstreamUnreachable(e.to_string()))?;

    let payload = process_response(&content_type, body, language.as_deref(), &state.cache).await?;

    Ok(match payload {
        ProxyPayload::Json(value) => (status, Json(value)).into_response(),
        ProxyPayload::Text(text) => (status, text).into_response(),
    })
}

/// Decide pass-through vs parse-and-rewrite for an upstream body.
pub(crate) async fn process_response(
    content_type: &str,
    body: String,
    language: Option<&str>,
    cache: &TranslationCache,
) -> Result<ProxyPayload, ProxyError> {
    debug!("Response content-type: {}", content_type);

    if !content_type.contains("application/json") {
        info!("Non-JSON response, returning raw text");
        return Ok(ProxyPayload::Text(body));
    }

    let mut data: Value = serde_json::from_str(&body).map_err(|e| {
        error!("Failed to parse JSON response: {}", e);
        ProxyError::ResponseParse(e)
    })?;

    if let Some(language) = language {
        let rules = cache.get(language).await;
        if rules.is_empty() {
            warn!("No translations available for language: {}", language);
        } else {
            info!(
                "Applying {} translation rules for language: {}",
                rules.len(),
                language
            );
            data = JsonTranslator::new(&rules).translate(data);
            info!("Translation completed successfully");
        }
    }

    Ok(ProxyPayload::Json(data))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proxy::translator::store::{LanguageRuleSet, RuleStore, StoreError};
    use async_trait::async_trait;
    use serde_json::json;
    use std::collections::HashMap;
    use std::sync::Arc;
    use std::time::Duration;

    struct StaticStore {
        languages: HashMap<String, LanguageRuleSet>,
    }

    #[async_trait]
    impl RuleStore for StaticStore {
        async fn fetch_all(&self) -> Result<HashMap<String, LanguageRuleSet>, StoreError> {
            Ok(self.languages.clone())
        }
    }

    fn cache_with(languages: HashMap<String, LanguageRuleSet>) -> TranslationCache {
        TranslationCache::new(Arc::new(StaticStore { languages }), Duration::from_secs(60))
    }

    fn french_rules() -> HashMap<String, LanguageRuleSet> {
        let mut rules = LanguageRuleSet::new();
        rules.insert("title".to_string(), json!("Titre"));
        HashMap::from([("fr".to_string(), rules)])
    }

    #[tokio::test]
    async fn non_json_content_passes_through() {
        let cache = cache_with(french_rules());
        let payload = process_response(
            "text/plain; charset=utf-8",
            "hello {not json}".to_string(),
            Some("fr"),
            &cache,
        )
        .await
        .unwrap();

        match payload {
            ProxyPayload::Text(text) => assert_eq!(text, "hello {not json}"),
            ProxyPayload::Json(_) => panic!("expected raw text"),
        }
    }

    #[tokio::test]
    async fn json_body_is_rewritten_for_language() {
        let cache = cache_with(french_rules());
        let payload = process_response(
            "application/json",
            r#"{"title":"anything","other":1}"#.to_string(),
            Some("fr"),
            &cache,
        )
        .await
        .unwrap();

        match payload {
            ProxyPayload::Json(value) => {
                assert_eq!(value, json!({ "title": "Titre", "other": 1 }))
            }
            ProxyPayload::Text(_) => panic!("expected JSON"),
        }
    }

    #[tokio::test]
    async fn missing_language_skips_translation() {
        let cache = cache_with(french_rules());
        let payload = process_response(
            "application/json",
            r#"{"title":"anything"}"#.to_string(),
            None,
            &cache,
        )
        .await
        .unwrap();

        match payload {
            ProxyPayload::Json(value) => assert_eq!(value, json!({ "title": "anything" })),
            ProxyPayload::Text(_) => panic!("expected JSON"),
        }
    }

    #[tokio::test]
    async fn unknown_language_passes_value_through() {
        let cache = cache_with(french_rules());
        let payload = process_response(
            "application/json",
            r#"{"title":"anything"}"#.to_string(),
            Some("xx"),
            &cache,
        )
        .await
        .unwrap();

        match payload {
            ProxyPayload::Json(value) => assert_eq!(value, json!({ "title": "anything" })),
            ProxyPayload::Text(_) => panic!("expected JSON"),
        }
    }

    #[tokio::test]
    async fn declared_json_that_fails_to_parse_is_an_error() {
        let cache = cache_with(french_rules());
        let result = process_response(
            "application/json",
            "definitely not json".to_string(),
            Some("fr"),
            &cache,
        )
        .await;

        assert!(matches!(result, Err(ProxyError::ResponseParse(_))));
    }
}
