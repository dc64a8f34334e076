//! Session endpoints

use axum::{extract::State, Json};
use futures::future::join_all;
use uuid::Uuid;

use crate::error::Result;
use crate::models::*;
use crate::services::fallback::with_fallback;
use crate::AppState;

const FALLBACK_TOPIC: &str = "greetings";

/// POST /api/session/start
///
/// Unknown or empty topics fall back to greetings. A store failure degrades
/// to an empty session rather than an error.
pub async fn start(
    State(state): State<AppState>,
    Json(payload): Json<StartSessionRequest>,
) -> Result<Json<StartSessionResponse>> {
    let limit = state.config.session_size;

    let phrases = match load_phrases(&state, payload.lang, &payload.topic, limit).await {
        Ok(phrases) => phrases,
        Err(e) => {
            tracing::error!(lang = %payload.lang, topic = %payload.topic, error = %e, "failed to load session phrases");
            Vec::new()
        }
    };

    let audio_timeout = state.config.audio_timeout;
    let items = join_all(phrases.into_iter().map(|phrase| {
        let audio = state.audio.clone();
        async move {
            let audio_url =
                with_fallback("audio", audio_timeout, audio.audio_url(&phrase), None).await;
            SessionItem { phrase, audio_url }
        }
    }))
    .await;

    tracing::info!(lang = %payload.lang, topic = %payload.topic, items = items.len(), "session started");

    Ok(Json(StartSessionResponse {
        session_id: format!("sess_{}", Uuid::new_v4().simple()),
        items,
    }))
}

async fn load_phrases(
    state: &AppState,
    lang: Lang,
    topic: &str,
    limit: usize,
) -> std::result::Result<Vec<Phrase>, crate::services::store::StoreError> {
    let phrases = state.phrases.by_topic(lang, topic, limit).await?;
    if !phrases.is_empty() || topic == FALLBACK_TOPIC {
        return Ok(phrases);
    }
    state.phrases.by_topic(lang, FALLBACK_TOPIC, limit).await
}
