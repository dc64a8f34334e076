//! Review endpoints

use axum::{
    extract::{Query, State},
    Json,
};
use chrono::Utc;

use crate::error::{ApiError, Result};
use crate::models::*;
use crate::services::store::ReviewStep;
use crate::AppState;

const MAX_REVIEW_LIMIT: usize = 100;

/// POST /api/review/grade
pub async fn grade(
    State(state): State<AppState>,
    Json(payload): Json<GradeRequest>,
) -> Result<Json<GradeResponse>> {
    let grade = Grade::new(payload.grade)?;

    let phrase = state
        .phrases
        .get(&payload.item_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Item not found".to_string()))?;

    let now = Utc::now();
    let scheduler = state.scheduler.clone();
    let step: ReviewStep = Box::new(move |current: ReviewState| {
        Ok(scheduler.advance_graded(&current, grade, now))
    });

    let next = state
        .progress
        .apply(&payload.user_id, &phrase, now, step)
        .await?;

    tracing::info!(
        user_id = %payload.user_id,
        item_id = %payload.item_id,
        grade = grade.value(),
        interval_days = next.interval_days,
        "review graded"
    );

    Ok(Json(GradeResponse {
        next_due_at: next.due_at,
    }))
}

/// GET /api/review/next
pub async fn next(
    State(state): State<AppState>,
    Query(query): Query<NextReviewsQuery>,
) -> Result<Json<NextReviewsResponse>> {
    if query.user_id.trim().is_empty() {
        return Err(ApiError::BadRequest("userId is required".to_string()));
    }

    let limit = query.limit.min(MAX_REVIEW_LIMIT);
    let items = state
        .progress
        .due(&query.user_id, query.lang, Utc::now(), limit)
        .await?;

    Ok(Json(NextReviewsResponse { items }))
}
