//! Request bodies and helpers shared by the API tests.

use chrono::{DateTime, Duration, Utc};
use serde_json::json;

use swiftspeak_backend::models::ReviewState;
use swiftspeak_backend::services::store::ReviewStep;

pub const USER: &str = "learner-1";

pub fn audio_url(item_id: &str) -> String {
    format!("https://cdn.test/audio/{}.mp3", item_id)
}

pub fn start_session_request(lang: &str, topic: &str) -> serde_json::Value {
    json!({ "lang": lang, "topic": topic, "level": "A1" })
}

pub fn text_attempt_request(item_id: &str, answer: &str) -> serde_json::Value {
    json!({ "itemId": item_id, "userId": USER, "answerText": answer })
}

pub fn grade_request(item_id: &str, grade: i64) -> serde_json::Value {
    json!({ "userId": USER, "itemId": item_id, "grade": grade })
}

/// Store step that makes the item due `days_ago` days before `now`.
pub fn overdue_by(days_ago: i64, now: DateTime<Utc>) -> ReviewStep {
    Box::new(move |mut state: ReviewState| {
        state.interval_days = 1;
        state.due_at = now - Duration::days(days_ago);
        Ok(state)
    })
}
