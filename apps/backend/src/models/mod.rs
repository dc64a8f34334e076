//! Database rows and API types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

// Re-export shared types from swiftspeak-core
pub use swiftspeak_core::selection::DueItem;
pub use swiftspeak_core::types::{Grade, Lang, Phrase, ReviewState};
use swiftspeak_core::CoreError;

// === Database Entity Types ===

/// Phrase stored in PostgreSQL
#[derive(Debug, Clone, FromRow)]
pub struct DbPhrase {
    pub id: String,
    pub lang: String,
    pub topic: String,
    pub text_native: String,
    pub gloss_en: String,
    pub voice: String,
}

impl TryFrom<DbPhrase> for Phrase {
    type Error = CoreError;

    fn try_from(row: DbPhrase) -> Result<Self, Self::Error> {
        let lang = Lang::parse(&row.lang).ok_or_else(|| {
            CoreError::malformed("phrase", format!("{} has unknown lang {:?}", row.id, row.lang))
        })?;
        let phrase = Phrase {
            id: row.id,
            lang,
            topic: row.topic,
            text_native: row.text_native,
            gloss_en: row.gloss_en,
            voice: row.voice,
        };
        phrase.validate()?;
        Ok(phrase)
    }
}

/// Learner progress row in PostgreSQL
#[derive(Debug, Clone, FromRow)]
pub struct DbProgress {
    pub user_id: String,
    pub item_id: String,
    pub ease: f64,
    pub interval_days: i32,
    pub due_at: DateTime<Utc>,
    pub lang: String,
    pub text_native: String,
    pub gloss_en: String,
    pub last_reviewed: Option<DateTime<Utc>>,
}

impl DbProgress {
    /// Create from a core ReviewState
    pub fn from_core_state(user_id: &str, item_id: &str, state: &ReviewState) -> Self {
        Self {
            user_id: user_id.to_string(),
            item_id: item_id.to_string(),
            ease: state.ease,
            interval_days: i32::try_from(state.interval_days).unwrap_or(i32::MAX),
            due_at: state.due_at,
            lang: state.lang.as_str().to_string(),
            text_native: state.text_native.clone(),
            gloss_en: state.gloss_en.clone(),
            last_reviewed: state.last_reviewed,
        }
    }

    /// Convert to a validated core ReviewState
    pub fn to_core_state(&self) -> Result<ReviewState, CoreError> {
        let lang = Lang::parse(&self.lang).ok_or_else(|| {
            CoreError::malformed(
                "review state",
                format!("{}/{} has unknown lang {:?}", self.user_id, self.item_id, self.lang),
            )
        })?;
        let interval_days = u32::try_from(self.interval_days).map_err(|_| {
            CoreError::malformed(
                "review state",
                format!(
                    "{}/{} has negative interval {}",
                    self.user_id, self.item_id, self.interval_days
                ),
            )
        })?;

        let state = ReviewState {
            ease: self.ease,
            interval_days,
            due_at: self.due_at,
            lang,
            text_native: self.text_native.clone(),
            gloss_en: self.gloss_en.clone(),
            last_reviewed: self.last_reviewed,
        };
        state.validate()?;
        Ok(state)
    }

    /// Convert to a due-queue entry
    pub fn to_due_item(&self) -> Result<DueItem, CoreError> {
        Ok(DueItem {
            id: self.item_id.clone(),
            state: self.to_core_state()?,
        })
    }
}

// === API Request/Response Types ===

fn default_topic() -> String {
    "greetings".to_string()
}

fn default_level() -> String {
    "A1".to_string()
}

fn default_review_limit() -> usize {
    10
}

// Session types
#[derive(Debug, Serialize, Deserialize)]
pub struct StartSessionRequest {
    #[serde(default)]
    pub lang: Lang,
    #[serde(default = "default_topic")]
    pub topic: String,
    /// Accepted for client compatibility; not used for selection yet.
    #[serde(default = "default_level")]
    pub level: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionItem {
    #[serde(flatten)]
    pub phrase: Phrase,
    pub audio_url: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartSessionResponse {
    pub session_id: String,
    pub items: Vec<SessionItem>,
}

// Attempt types
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextAttemptRequest {
    pub item_id: String,
    pub user_id: String,
    pub answer_text: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AttemptResponse {
    pub id: String,
    pub score: f64,
    pub hint: String,
    pub transcription: String,
}

// Review types
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GradeRequest {
    pub user_id: String,
    pub item_id: String,
    pub grade: i64,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GradeResponse {
    pub next_due_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NextReviewsQuery {
    pub user_id: String,
    #[serde(default)]
    pub lang: Lang,
    #[serde(default = "default_review_limit")]
    pub limit: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct NextReviewsResponse {
    pub items: Vec<DueItem>,
}

// Admin types
#[derive(Debug, Serialize, Deserialize)]
pub struct SeedResponse {
    pub status: String,
    pub count: usize,
}
