// Translation rule store boundary
// One document per language, each a JSON object mapping dot-paths to
// replacement specs. The cache only ever bulk-fetches.

use std::collections::HashMap;
use std::path::PathBuf;

use async_trait::async_trait;
use indexmap::IndexMap;
use rusqlite::Connection;
use serde_json::Value;
use thiserror::Error;
use tracing::warn;

/// Ordered rule document for one language: path -> replacement spec.
/// Insertion order is the application order, so the map must preserve it.
pub type LanguageRuleSet = IndexMap<String, Value>;

/// Connectivity failure against the backing store.
#[derive(Debug, Clone, Error)]
#[error("translation store unavailable: {0}")]
pub struct StoreError(pub String);

/// Backing store for per-language rule documents.
#[async_trait]
pub trait RuleStore: Send + Sync {
    /// Fetch every language document. Connectivity problems must fail loudly
    /// so the cache can keep serving its previous snapshot.
    async fn fetch_all(&self) -> Result<HashMap<String, LanguageRuleSet>, StoreError>;
}

/// SQLite-backed rule store.
pub struct SqliteRuleStore {
    db_path: PathBuf,
}

impl SqliteRuleStore {
    pub fn new(db_path: PathBuf) -> Self {
        Self { db_path }
    }

    /// Create the translations table if missing.
    pub fn init_db(&self) -> Result<(), StoreError> {
        let conn = Connection::open(&self.db_path).map_err(|e| StoreError(e.to_string()))?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS translations (
                language_id TEXT PRIMARY KEY,
                rules TEXT NOT NULL
            )",
            [],
        )
        .map_err(|e| StoreError(e.to_string()))?;

        Ok(())
    }
}

#[async_trait]
impl RuleStore for SqliteRuleStore {
    async fn fetch_all(&self) -> Result<HashMap<String, LanguageRuleSet>, StoreError> {
        let db_path = self.db_path.clone();

        // rusqlite is synchronous; keep it off the async workers.
        tokio::task::spawn_blocking(move || {
            let conn = Connection::open(&db_path).map_err(|e| StoreError(e.to_string()))?;

            let mut stmt = conn
                .prepare("SELECT language_id, rules FROM translations")
                .map_err(|e| StoreError(e.to_string()))?;
            let rows = stmt
                .query_map([], |row| {
                    Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
                })
                .map_err(|e| StoreError(e.to_string()))?;

            let mut languages = HashMap::new();
            for row in rows {
                let (language_id, rules_json) = row.map_err(|e| StoreError(e.to_string()))?;
                if rules_json.trim().is_empty() {
                    languages.insert(language_id, LanguageRuleSet::new());
                    continue;
                }
                match serde_json::from_str::<LanguageRuleSet>(&rules_json) {
                    Ok(rules) => {
                        languages.insert(language_id, rules);
                    }
                    Err(e) => {
                        // One bad document must not poison the snapshot.
                        warn!("Skipping malformed rule document for {}: {}", language_id, e);
                    }
                }
            }

            Ok(languages)
        })
        .await
        .map_err(|e| StoreError(e.to_string()))?
    }
}
