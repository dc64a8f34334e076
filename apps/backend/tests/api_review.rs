//! Review API tests.

mod common;

use axum::http::StatusCode;
use axum_test::TestServer;
use chrono::{DateTime, Duration, Utc};
use pretty_assertions::assert_eq;

use common::fixtures::{self, USER};
use common::TestContext;

async fn make_overdue(ctx: &TestContext, item_id: &str, days_ago: i64) {
    let phrase = ctx.state.phrases.get(item_id).await.unwrap().unwrap();
    let now = Utc::now();
    ctx.state
        .progress
        .apply(USER, &phrase, now, fixtures::overdue_by(days_ago, now))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_grade_schedules_next_review() {
    let ctx = TestContext::new();
    let server = TestServer::new(ctx.router()).unwrap();
    let before = Utc::now();

    let response = server
        .post("/api/review/grade")
        .json(&fixtures::grade_request("en_4", 5))
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    let next_due: DateTime<Utc> = body["nextDueAt"].as_str().unwrap().parse().unwrap();

    assert!(next_due >= before + Duration::days(1));
    assert!(next_due <= Utc::now() + Duration::days(1));

    let state = ctx.state.progress.get(USER, "en_4").await.unwrap().unwrap();
    assert_eq!(state.ease, 2.6);
    assert_eq!(state.interval_days, 1);
}

#[tokio::test]
async fn test_repeated_grades_bootstrap_intervals() {
    let ctx = TestContext::new();
    let server = TestServer::new(ctx.router()).unwrap();

    for _ in 0..3 {
        server
            .post("/api/review/grade")
            .json(&fixtures::grade_request("ig_3", 5))
            .await
            .assert_status_ok();
    }

    let state = ctx.state.progress.get(USER, "ig_3").await.unwrap().unwrap();
    assert_eq!(state.interval_days, 8);
    assert_eq!(state.ease, 2.8);
}

#[tokio::test]
async fn test_long_streak_of_perfect_grades_stays_bounded() {
    let ctx = TestContext::new();
    let server = TestServer::new(ctx.router()).unwrap();

    for _ in 0..40 {
        server
            .post("/api/review/grade")
            .json(&fixtures::grade_request("ha_3", 5))
            .await
            .assert_status_ok();
    }

    let state = ctx.state.progress.get(USER, "ha_3").await.unwrap().unwrap();
    assert_eq!(state.interval_days, 36500);
    assert!(state.due_at <= Utc::now() + Duration::days(36500));
}

#[tokio::test]
async fn test_failed_grade_resets_interval() {
    let ctx = TestContext::new();
    let server = TestServer::new(ctx.router()).unwrap();

    for grade in [5, 5, 1] {
        server
            .post("/api/review/grade")
            .json(&fixtures::grade_request("en_5", grade))
            .await
            .assert_status_ok();
    }

    let state = ctx.state.progress.get(USER, "en_5").await.unwrap().unwrap();
    assert_eq!(state.interval_days, 1);
    assert_eq!(state.ease, 2.5);
}

#[tokio::test]
async fn test_grade_out_of_range_is_rejected() {
    let ctx = TestContext::new();
    let server = TestServer::new(ctx.router()).unwrap();

    for grade in [-1, 6, 42] {
        let response = server
            .post("/api/review/grade")
            .json(&fixtures::grade_request("en_1", grade))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: serde_json::Value = response.json();
        assert_eq!(body["error"], "invalid_grade");
    }

    assert!(ctx.state.progress.get(USER, "en_1").await.unwrap().is_none());
}

#[tokio::test]
async fn test_grade_unknown_item() {
    let ctx = TestContext::new();
    let server = TestServer::new(ctx.router()).unwrap();

    let response = server
        .post("/api/review/grade")
        .json(&fixtures::grade_request("missing", 3))
        .await;

    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_next_returns_due_items_oldest_first() {
    let ctx = TestContext::new();
    let server = TestServer::new(ctx.router()).unwrap();

    make_overdue(&ctx, "en_2", 1).await;
    make_overdue(&ctx, "en_6", 3).await;
    make_overdue(&ctx, "yo_2", 5).await;
    // Graded just now, so due tomorrow.
    server
        .post("/api/review/grade")
        .json(&fixtures::grade_request("en_1", 4))
        .await
        .assert_status_ok();

    let response = server
        .get("/api/review/next")
        .add_query_param("userId", USER)
        .add_query_param("lang", "en")
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    let items = body["items"].as_array().unwrap();

    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["id"], "en_6");
    assert_eq!(items[1]["id"], "en_2");
    assert_eq!(items[0]["ease"], 2.5);
    assert_eq!(items[0]["intervalDays"], 1);
    assert_eq!(items[0]["text_native"], "I need to see a doctor");
}

#[tokio::test]
async fn test_next_respects_limit_and_user() {
    let ctx = TestContext::new();
    let server = TestServer::new(ctx.router()).unwrap();

    make_overdue(&ctx, "ha_1", 2).await;
    make_overdue(&ctx, "ha_2", 1).await;

    let limited: serde_json::Value = server
        .get("/api/review/next")
        .add_query_param("userId", USER)
        .add_query_param("lang", "ha")
        .add_query_param("limit", 1)
        .await
        .json();
    assert_eq!(limited["items"].as_array().unwrap().len(), 1);
    assert_eq!(limited["items"][0]["id"], "ha_1");

    let other_user: serde_json::Value = server
        .get("/api/review/next")
        .add_query_param("userId", "someone-else")
        .add_query_param("lang", "ha")
        .await
        .json();
    assert_eq!(other_user["items"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_next_requires_user() {
    let ctx = TestContext::new();
    let server = TestServer::new(ctx.router()).unwrap();

    let response = server
        .get("/api/review/next")
        .add_query_param("lang", "en")
        .expect_failure()
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}
