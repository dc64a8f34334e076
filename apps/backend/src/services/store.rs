//! Persistence interfaces for phrases and learner progress.
//!
//! Handlers only see these traits. `Database` (PostgreSQL) and
//! `MemoryStore` are the two implementations, selected by configuration.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use swiftspeak_core::{CoreError, DueItem, Lang, Phrase, ReviewState};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error(transparent)]
    Core(#[from] CoreError),
}

/// One grading step applied to a learner's current state.
pub type ReviewStep = Box<dyn FnOnce(ReviewState) -> swiftspeak_core::Result<ReviewState> + Send>;

/// Read access to the phrase catalog, plus seeding.
#[async_trait]
pub trait PhraseStore: Send + Sync {
    async fn get(&self, item_id: &str) -> Result<Option<Phrase>, StoreError>;

    /// Phrases in `lang` tagged with `topic`, ordered by id.
    async fn by_topic(&self, lang: Lang, topic: &str, limit: usize) -> Result<Vec<Phrase>, StoreError>;

    /// Insert or replace phrases. Returns the number written.
    async fn upsert_many(&self, phrases: &[Phrase]) -> Result<usize, StoreError>;
}

/// Per-learner review state keyed by `(user_id, item_id)`.
#[async_trait]
pub trait ProgressStore: Send + Sync {
    /// Load the learner's state for `phrase` (creating the default state if
    /// none exists), run `step` on it, and persist the result.
    ///
    /// Load, step and write happen atomically per key, so concurrent grading
    /// of the same item cannot lose an update.
    async fn apply(
        &self,
        user_id: &str,
        phrase: &Phrase,
        now: DateTime<Utc>,
        step: ReviewStep,
    ) -> Result<ReviewState, StoreError>;

    async fn get(&self, user_id: &str, item_id: &str) -> Result<Option<ReviewState>, StoreError>;

    /// Items due at `now` in `lang`, oldest first.
    async fn due(
        &self,
        user_id: &str,
        lang: Lang,
        now: DateTime<Utc>,
        limit: usize,
    ) -> Result<Vec<DueItem>, StoreError>;
}
