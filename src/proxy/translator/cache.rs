// Translation rule cache
// TTL-refreshed snapshot of every language's rule document. The snapshot is
// replaced wholesale under a write lock; readers never observe a partial
// refresh, and a failed refresh keeps the previous snapshot serving.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::proxy::translator::store::{LanguageRuleSet, RuleStore, StoreError};

/// Outcome of a successful manual reload.
#[derive(Debug)]
pub struct ReloadSummary {
    pub languages_loaded: usize,
    pub languages: Vec<String>,
}

#[derive(Default)]
struct Snapshot {
    languages: HashMap<String, LanguageRuleSet>,
    loaded_at: Option<Instant>,
}

/// Per-process cache over the rule store.
///
/// Lazily populated on first access, refreshed when the TTL elapses or on an
/// explicit [`reload`](Self::reload). Staleness-triggered refresh failures
/// are logged and swallowed; reload failures surface to the caller. Either
/// way the previous snapshot is retained.
pub struct TranslationCache {
    store: Arc<dyn RuleStore>,
    ttl: Duration,
    snapshot: RwLock<Snapshot>,
}

impl TranslationCache {
    pub fn new(store: Arc<dyn RuleStore>, ttl: Duration) -> Self {
        Self {
            store,
            ttl,
            snapshot: RwLock::new(Snapshot::default()),
        }
    }

    /// Trimmed, lowercased form of a language code; the cache key space.
    pub fn normalize_code(code: &str) -> String {
        code.trim().to_lowercase()
    }

    /// Rule set for a language, refreshing first when stale. An unknown
    /// language and a language with no rules both yield an empty set.
    pub async fn get(&self, language: &str) -> LanguageRuleSet {
        self.ensure_fresh().await;

        let code = Self::normalize_code(language);
        let snapshot = self.snapshot.read().await;
        let rules = snapshot.languages.get(&code).cloned().unwrap_or_default();

        if rules.is_empty() {
            warn!("No translations found for language: {}", code);
        } else {
            debug!("Found {} translation rules for: {}", rules.len(), code);
        }

        rules
    }

    /// Sorted list of currently known language codes.
    pub async fn languages(&self) -> Vec<String> {
        self.ensure_fresh().await;

        let snapshot = self.snapshot.read().await;
        let mut languages: Vec<String> = snapshot.languages.keys().cloned().collect();
        languages.sort();
        languages
    }

    /// Number of languages in the current snapshot, without refreshing.
    pub async fn language_count(&self) -> usize {
        self.snapshot.read().await.languages.len()
    }

    /// Unconditionally re-fetch from the store, ignoring the TTL. On failure
    /// the previous snapshot is kept and the error is returned.
    pub async fn reload(&self) -> Result<ReloadSummary, StoreError> {
        info!("Manual translation reload triggered");
        self.refresh().await?;

        let snapshot = self.snapshot.read().await;
        let mut languages: Vec<String> = snapshot.languages.keys().cloned().collect();
        languages.sort();
        Ok(ReloadSummary {
            languages_loaded: languages.len(),
            languages,
        })
    }

    async fn ensure_fresh(&self) {
        let stale = {
            let snapshot = self.snapshot.read().await;
            match snapshot.loaded_at {
                Some(loaded_at) => {
                    snapshot.languages.is_empty() || loaded_at.elapsed() > self.ttl
                }
                None => true,
            }
        };

        if !stale {
            return;
        }

        if let Err(e) = self.refresh().await {
            warn!("Failed to refresh translations, serving stale data: {}", e);
        }
    }

    async fn refresh(&self) -> Result<(), StoreError> {
        let loaded = self.store.fetch_all().await?;
        let languages: HashMap<String, LanguageRuleSet> = loaded
            .into_iter()
            .map(|(code, rules)| (Self::normalize_code(&code), rules))
            .collect();

        info!("Loaded {} languages from translation store", languages.len());

        let mut snapshot = self.snapshot.write().await;
        snapshot.languages = languages;
        snapshot.loaded_at = Some(Instant::now());
        Ok(())
    }
}
