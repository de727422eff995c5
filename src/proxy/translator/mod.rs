// Translation subsystem: rewrite engine, rule cache, and store boundary

pub mod cache;
pub mod engine;
pub mod store;

pub use cache::{ReloadSummary, TranslationCache};
pub use engine::{JsonTranslator, TranslationRule};
pub use store::{LanguageRuleSet, RuleStore, SqliteRuleStore, StoreError};
