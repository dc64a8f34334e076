//! Attempt grading: score, hint, and schedule update.

use chrono::Utc;
use swiftspeak_core::{evaluate, Phrase, ReviewState};
use uuid::Uuid;

use super::fallback::with_fallback;
use super::hints::hint_for;
use super::store::ReviewStep;
use crate::error::{ApiError, Result};
use crate::models::AttemptResponse;
use crate::AppState;

pub const UNHEARD_HINT: &str = "We couldn't hear that clearly. Please try again.";

fn attempt_id() -> String {
    format!("attempt_{}", Uuid::new_v4().simple())
}

async fn find_phrase(state: &AppState, item_id: &str) -> Result<Phrase> {
    state
        .phrases
        .get(item_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Item not found".to_string()))
}

/// Grade a typed answer.
pub async fn grade_text(
    state: &AppState,
    item_id: &str,
    user_id: &str,
    answer: &str,
) -> Result<AttemptResponse> {
    let max = state.config.max_answer_chars;
    if answer.chars().nth(max).is_some() {
        return Err(ApiError::BadRequest(format!(
            "answerText is longer than {} characters",
            max
        )));
    }

    let phrase = find_phrase(state, item_id).await?;
    grade_against(state, &phrase, user_id, answer).await
}

/// Grade a recorded answer.
///
/// When transcription fails or times out the learner gets a retry prompt
/// and their schedule is left alone.
pub async fn grade_audio(
    state: &AppState,
    item_id: &str,
    user_id: &str,
    audio: Vec<u8>,
    content_type: Option<&str>,
) -> Result<AttemptResponse> {
    let phrase = find_phrase(state, item_id).await?;

    let transcription = with_fallback(
        "transcriber",
        state.config.transcribe_timeout,
        async {
            state
                .transcriber
                .transcribe(audio, content_type)
                .await
                .map(Some)
        },
        None,
    )
    .await;

    match transcription {
        Some(text) => grade_against(state, &phrase, user_id, &text).await,
        None => Ok(AttemptResponse {
            id: attempt_id(),
            score: 0.0,
            hint: UNHEARD_HINT.to_string(),
            transcription: String::new(),
        }),
    }
}

/// Score `answer` against `phrase`, then generate a hint and advance the
/// learner's schedule concurrently.
pub async fn grade_against(
    state: &AppState,
    phrase: &Phrase,
    user_id: &str,
    answer: &str,
) -> Result<AttemptResponse> {
    let result = evaluate(&phrase.text_native, answer)?;
    let now = Utc::now();

    let scheduler = state.scheduler.clone();
    let grade = result.grade;
    let step: ReviewStep = Box::new(move |current: ReviewState| {
        Ok(scheduler.advance_graded(&current, grade, now))
    });

    let (hint, progress) = tokio::join!(
        hint_for(
            state.hints.as_ref(),
            &result.reference_normalized,
            &result.candidate_normalized,
            result.score,
            state.config.hint_timeout,
        ),
        state.progress.apply(user_id, phrase, now, step),
    );

    match progress {
        Ok(next) => tracing::debug!(
            user_id,
            item_id = %phrase.id,
            grade = grade.value(),
            interval_days = next.interval_days,
            "schedule advanced"
        ),
        Err(e) => tracing::error!(
            user_id,
            item_id = %phrase.id,
            error = %e,
            "failed to record attempt progress"
        ),
    }

    Ok(AttemptResponse {
        id: attempt_id(),
        score: result.score,
        hint,
        transcription: result.candidate_normalized,
    })
}
