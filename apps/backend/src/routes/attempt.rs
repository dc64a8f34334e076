//! Attempt endpoints

use axum::{
    extract::{Multipart, State},
    Json,
};

use crate::error::{ApiError, Result};
use crate::models::*;
use crate::services::grading;
use crate::AppState;

/// POST /api/attempt/text
pub async fn text(
    State(state): State<AppState>,
    Json(payload): Json<TextAttemptRequest>,
) -> Result<Json<AttemptResponse>> {
    let response = grading::grade_text(
        &state,
        &payload.item_id,
        &payload.user_id,
        &payload.answer_text,
    )
    .await?;

    Ok(Json(response))
}

/// Fields of an audio attempt upload.
#[derive(Debug, Default)]
struct AudioAttempt {
    item_id: Option<String>,
    user_id: Option<String>,
    audio: Option<Vec<u8>>,
    content_type: Option<String>,
}

impl AudioAttempt {
    async fn read(mut multipart: Multipart) -> Result<Self> {
        let mut attempt = Self::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| ApiError::BadRequest(e.to_string()))?
        {
            let name = field.name().unwrap_or_default().to_string();
            match name.as_str() {
                "audio_file" => {
                    attempt.content_type = field.content_type().map(str::to_string);
                    let bytes = field
                        .bytes()
                        .await
                        .map_err(|e| ApiError::BadRequest(e.to_string()))?;
                    attempt.audio = Some(bytes.to_vec());
                }
                "itemId" => {
                    attempt.item_id = Some(
                        field
                            .text()
                            .await
                            .map_err(|e| ApiError::BadRequest(e.to_string()))?,
                    );
                }
                "userId" => {
                    attempt.user_id = Some(
                        field
                            .text()
                            .await
                            .map_err(|e| ApiError::BadRequest(e.to_string()))?,
                    );
                }
                other => tracing::debug!(field = other, "ignoring multipart field"),
            }
        }

        Ok(attempt)
    }
}

fn required(value: Option<String>, name: &str) -> Result<String> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| ApiError::BadRequest(format!("missing field {}", name)))
}

/// POST /api/attempt
pub async fn audio(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<AttemptResponse>> {
    let attempt = AudioAttempt::read(multipart).await?;

    let item_id = required(attempt.item_id, "itemId")?;
    let user_id = required(attempt.user_id, "userId")?;
    let audio = attempt
        .audio
        .filter(|bytes| !bytes.is_empty())
        .ok_or_else(|| ApiError::BadRequest("missing field audio_file".to_string()))?;

    let response = grading::grade_audio(
        &state,
        &item_id,
        &user_id,
        audio,
        attempt.content_type.as_deref(),
    )
    .await?;

    Ok(Json(response))
}
