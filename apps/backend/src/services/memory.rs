//! In-memory stores used for local development and tests.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use swiftspeak_core::{select_due, DueItem, Lang, Phrase, ReviewState};
use tokio::sync::RwLock;

use super::catalog;
use super::store::{PhraseStore, ProgressStore, ReviewStep, StoreError};

type ProgressKey = (String, String);

/// Phrase catalog and learner progress held in process memory.
#[derive(Default)]
pub struct MemoryStore {
    phrases: RwLock<BTreeMap<String, Phrase>>,
    progress: RwLock<HashMap<ProgressKey, ReviewState>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store preloaded with `phrases`. Invalid phrases are skipped.
    pub fn with_phrases(phrases: Vec<Phrase>) -> Self {
        let phrases = phrases
            .into_iter()
            .filter(|p| match p.validate() {
                Ok(()) => true,
                Err(e) => {
                    tracing::warn!("Skipping fixture phrase: {}", e);
                    false
                }
            })
            .map(|p| (p.id.clone(), p))
            .collect();

        Self {
            phrases: RwLock::new(phrases),
            progress: RwLock::new(HashMap::new()),
        }
    }

    /// Store preloaded with the built-in catalog.
    pub fn seeded() -> Self {
        Self::with_phrases(catalog::phrases())
    }
}

#[async_trait]
impl PhraseStore for MemoryStore {
    async fn get(&self, item_id: &str) -> Result<Option<Phrase>, StoreError> {
        Ok(self.phrases.read().await.get(item_id).cloned())
    }

    async fn by_topic(&self, lang: Lang, topic: &str, limit: usize) -> Result<Vec<Phrase>, StoreError> {
        let phrases = self.phrases.read().await;
        Ok(phrases
            .values()
            .filter(|p| p.lang == lang && p.topic == topic)
            .take(limit)
            .cloned()
            .collect())
    }

    async fn upsert_many(&self, phrases: &[Phrase]) -> Result<usize, StoreError> {
        for phrase in phrases {
            phrase.validate()?;
        }

        let mut stored = self.phrases.write().await;
        for phrase in phrases {
            stored.insert(phrase.id.clone(), phrase.clone());
        }
        Ok(phrases.len())
    }
}

#[async_trait]
impl ProgressStore for MemoryStore {
    async fn apply(
        &self,
        user_id: &str,
        phrase: &Phrase,
        now: DateTime<Utc>,
        step: ReviewStep,
    ) -> Result<ReviewState, StoreError> {
        let mut progress = self.progress.write().await;
        let key = (user_id.to_string(), phrase.id.clone());

        let current = progress
            .get(&key)
            .cloned()
            .unwrap_or_else(|| ReviewState::new_for(phrase, now));

        let next = step(current)?;
        next.validate()?;
        progress.insert(key, next.clone());

        Ok(next)
    }

    async fn get(&self, user_id: &str, item_id: &str) -> Result<Option<ReviewState>, StoreError> {
        let progress = self.progress.read().await;
        Ok(progress
            .get(&(user_id.to_string(), item_id.to_string()))
            .cloned())
    }

    async fn due(
        &self,
        user_id: &str,
        lang: Lang,
        now: DateTime<Utc>,
        limit: usize,
    ) -> Result<Vec<DueItem>, StoreError> {
        let progress = self.progress.read().await;
        let entries = progress
            .iter()
            .filter(|((user, _), _)| user == user_id)
            .map(|((_, item), state)| (item.as_str(), state));

        Ok(select_due(entries, lang, now, limit))
    }
}
