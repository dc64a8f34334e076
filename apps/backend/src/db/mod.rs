//! PostgreSQL database operations

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::error::Result;
use crate::models::*;
use crate::services::store::{PhraseStore, ProgressStore, ReviewStep, StoreError};

const PROGRESS_COLUMNS: &str =
    "user_id, item_id, ease, interval_days, due_at, lang, text_native, gloss_en, last_reviewed";

/// Database wrapper with connection pool
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Connect to PostgreSQL and create connection pool
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await?;

        Ok(Self { pool })
    }

    /// Run database migrations
    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }

    /// Get the connection pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

fn sql_limit(limit: usize) -> i64 {
    i64::try_from(limit).unwrap_or(i64::MAX)
}

// === Phrase Repository ===

#[async_trait]
impl PhraseStore for Database {
    async fn get(&self, item_id: &str) -> std::result::Result<Option<Phrase>, StoreError> {
        let row = sqlx::query_as::<_, DbPhrase>(
            "SELECT id, lang, topic, text_native, gloss_en, voice FROM phrases WHERE id = $1",
        )
        .bind(item_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Phrase::try_from).transpose()?)
    }

    async fn by_topic(
        &self,
        lang: Lang,
        topic: &str,
        limit: usize,
    ) -> std::result::Result<Vec<Phrase>, StoreError> {
        let rows = sqlx::query_as::<_, DbPhrase>(
            r#"
            SELECT id, lang, topic, text_native, gloss_en, voice
            FROM phrases
            WHERE lang = $1 AND topic = $2
            ORDER BY id
            LIMIT $3
            "#,
        )
        .bind(lang.as_str())
        .bind(topic)
        .bind(sql_limit(limit))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(Phrase::try_from)
            .collect::<std::result::Result<_, _>>()?)
    }

    async fn upsert_many(&self, phrases: &[Phrase]) -> std::result::Result<usize, StoreError> {
        for phrase in phrases {
            phrase.validate()?;
        }

        let mut tx = self.pool.begin().await?;
        for phrase in phrases {
            sqlx::query(
                r#"
                INSERT INTO phrases (id, lang, topic, text_native, gloss_en, voice)
                VALUES ($1, $2, $3, $4, $5, $6)
                ON CONFLICT (id) DO UPDATE SET
                    lang = EXCLUDED.lang,
                    topic = EXCLUDED.topic,
                    text_native = EXCLUDED.text_native,
                    gloss_en = EXCLUDED.gloss_en,
                    voice = EXCLUDED.voice
                "#,
            )
            .bind(&phrase.id)
            .bind(phrase.lang.as_str())
            .bind(&phrase.topic)
            .bind(&phrase.text_native)
            .bind(&phrase.gloss_en)
            .bind(&phrase.voice)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;

        Ok(phrases.len())
    }
}

// === Progress Repository ===

#[async_trait]
impl ProgressStore for Database {
    async fn apply(
        &self,
        user_id: &str,
        phrase: &Phrase,
        now: DateTime<Utc>,
        step: ReviewStep,
    ) -> std::result::Result<ReviewState, StoreError> {
        let mut tx = self.pool.begin().await?;

        let initial = DbProgress::from_core_state(user_id, &phrase.id, &ReviewState::new_for(phrase, now));
        sqlx::query(&format!(
            "INSERT INTO user_progress ({}) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
             ON CONFLICT (user_id, item_id) DO NOTHING",
            PROGRESS_COLUMNS
        ))
        .bind(&initial.user_id)
        .bind(&initial.item_id)
        .bind(initial.ease)
        .bind(initial.interval_days)
        .bind(initial.due_at)
        .bind(&initial.lang)
        .bind(&initial.text_native)
        .bind(&initial.gloss_en)
        .bind(initial.last_reviewed)
        .execute(&mut *tx)
        .await?;

        // Row lock held until commit serializes concurrent grading of this item.
        let row = sqlx::query_as::<_, DbProgress>(&format!(
            "SELECT {} FROM user_progress WHERE user_id = $1 AND item_id = $2 FOR UPDATE",
            PROGRESS_COLUMNS
        ))
        .bind(user_id)
        .bind(&phrase.id)
        .fetch_one(&mut *tx)
        .await?;

        let next = step(row.to_core_state()?)?;
        next.validate()?;

        let updated = DbProgress::from_core_state(user_id, &phrase.id, &next);
        sqlx::query(
            r#"
            UPDATE user_progress
            SET ease = $3, interval_days = $4, due_at = $5, lang = $6,
                text_native = $7, gloss_en = $8, last_reviewed = $9
            WHERE user_id = $1 AND item_id = $2
            "#,
        )
        .bind(&updated.user_id)
        .bind(&updated.item_id)
        .bind(updated.ease)
        .bind(updated.interval_days)
        .bind(updated.due_at)
        .bind(&updated.lang)
        .bind(&updated.text_native)
        .bind(&updated.gloss_en)
        .bind(updated.last_reviewed)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(next)
    }

    async fn get(
        &self,
        user_id: &str,
        item_id: &str,
    ) -> std::result::Result<Option<ReviewState>, StoreError> {
        let row = sqlx::query_as::<_, DbProgress>(&format!(
            "SELECT {} FROM user_progress WHERE user_id = $1 AND item_id = $2",
            PROGRESS_COLUMNS
        ))
        .bind(user_id)
        .bind(item_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| r.to_core_state()).transpose()?)
    }

    async fn due(
        &self,
        user_id: &str,
        lang: Lang,
        now: DateTime<Utc>,
        limit: usize,
    ) -> std::result::Result<Vec<DueItem>, StoreError> {
        let rows = sqlx::query_as::<_, DbProgress>(&format!(
            "SELECT {} FROM user_progress \
             WHERE user_id = $1 AND lang = $2 AND due_at <= $3 \
             ORDER BY due_at, item_id \
             LIMIT $4",
            PROGRESS_COLUMNS
        ))
        .bind(user_id)
        .bind(lang.as_str())
        .bind(now)
        .bind(sql_limit(limit))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .iter()
            .map(DbProgress::to_due_item)
            .collect::<std::result::Result<_, _>>()?)
    }
}
