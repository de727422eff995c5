// Language resolution
// Pulls a language code out of query params or the request payload

use serde_json::{Map, Value};
use tracing::debug;

/// Keys probed for a language code, highest priority first.
const LANGUAGE_KEYS: [&str; 4] = ["language", "lang", "locale", "languageId"];

/// Extract a language code from query params (priority) or the payload.
///
/// Each source is scanned for the first string value among the known keys;
/// the winner is trimmed and lowercased. Non-object payloads yield nothing.
pub fn resolve_language(
    params: Option<&Map<String, Value>>,
    payload: Option<&Value>,
) -> Option<String> {
    if let Some(params) = params {
        if let Some(code) = first_language_value(params) {
            debug!("Extracted language from params: {}", code);
            return Some(code);
        }
    }

    if let Some(Value::Object(payload)) = payload {
        if let Some(code) = first_language_value(payload) {
            debug!("Extracted language from payload: {}", code);
            return Some(code);
        }
    }

    debug!("No language found in params or payload");
    None
}

fn first_language_value(source: &Map<String, Value>) -> Option<String> {
    LANGUAGE_KEYS.iter().find_map(|key| {
        let value = source.get(*key)?.as_str()?;
        let normalized = value.trim().to_lowercase();
        if normalized.is_empty() {
            None
        } else {
            Some(normalized)
        }
    })
}
