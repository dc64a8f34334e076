//! Admin endpoints

use axum::{extract::State, Json};

use crate::error::Result;
use crate::models::*;
use crate::services::catalog;
use crate::AppState;

/// POST /api/admin/seed
///
/// Upserts the built-in phrase catalog. Safe to call repeatedly.
pub async fn seed(State(state): State<AppState>) -> Result<Json<SeedResponse>> {
    let phrases = catalog::phrases();
    let count = state.phrases.upsert_many(&phrases).await?;

    tracing::info!(count, "seeded phrase catalog");

    Ok(Json(SeedResponse {
        status: "seeded".to_string(),
        count,
    }))
}
