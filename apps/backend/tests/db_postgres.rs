//! PostgreSQL store tests.
//!
//! These tests require a running PostgreSQL database.
//! Set DATABASE_URL before running with `--ignored`.

use chrono::{Duration, Utc};
use pretty_assertions::assert_eq;
use uuid::Uuid;

use swiftspeak_backend::db::Database;
use swiftspeak_backend::models::{Grade, Lang, ReviewState};
use swiftspeak_backend::services::catalog;
use swiftspeak_backend::services::store::{PhraseStore, ProgressStore};
use swiftspeak_core::Sm2;

async fn connect() -> Database {
    dotenvy::dotenv().ok();

    let database_url =
        std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for database tests");
    let db = Database::connect(&database_url)
        .await
        .expect("Failed to connect to test database");
    db.run_migrations().await.expect("Failed to run migrations");
    db
}

async fn cleanup_user(db: &Database, user_id: &str) {
    let _ = sqlx::query("DELETE FROM user_progress WHERE user_id = $1")
        .bind(user_id)
        .execute(db.pool())
        .await;
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_seed_and_lookup() {
    let db = connect().await;

    let written = PhraseStore::upsert_many(&db, &catalog::phrases()).await.unwrap();
    assert_eq!(written, 27);

    let phrase = PhraseStore::get(&db, "yo_1").await.unwrap().unwrap();
    assert_eq!(phrase.lang, Lang::Yo);
    assert_eq!(phrase.text_native, "Ẹ káàrọ̀");

    let greetings = db.by_topic(Lang::Ig, "greetings", 10).await.unwrap();
    let ids: Vec<_> = greetings.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec!["ig_1", "ig_2", "ig_4"]);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_apply_and_due() {
    let db = connect().await;
    db.upsert_many(&catalog::phrases()).await.unwrap();
    let user_id = format!("test-{}", Uuid::new_v4());
    let phrase = PhraseStore::get(&db, "en_3").await.unwrap().unwrap();
    let now = Utc::now();
    let sm2 = Sm2::default();

    let first = db
        .apply(
            &user_id,
            &phrase,
            now,
            Box::new(move |s: ReviewState| Ok(sm2.advance_graded(&s, Grade::PASS, now))),
        )
        .await
        .unwrap();
    assert_eq!(first.interval_days, 1);

    let stored = ProgressStore::get(&db, &user_id, "en_3").await.unwrap().unwrap();
    assert_eq!(stored.interval_days, 1);
    assert_eq!(stored.ease, 2.5);

    assert!(db.due(&user_id, Lang::En, now, 10).await.unwrap().is_empty());
    let later = db
        .due(&user_id, Lang::En, now + Duration::days(2), 10)
        .await
        .unwrap();
    assert_eq!(later.len(), 1);
    assert_eq!(later[0].id, "en_3");

    cleanup_user(&db, &user_id).await;
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_failed_step_rolls_back() {
    let db = connect().await;
    db.upsert_many(&catalog::phrases()).await.unwrap();
    let user_id = format!("test-{}", Uuid::new_v4());
    let phrase = PhraseStore::get(&db, "en_1").await.unwrap().unwrap();

    let result = db
        .apply(
            &user_id,
            &phrase,
            Utc::now(),
            Box::new(|_s: ReviewState| Err(swiftspeak_core::CoreError::InvalidGrade { grade: 9 })),
        )
        .await;

    assert!(result.is_err());
    assert!(ProgressStore::get(&db, &user_id, "en_1").await.unwrap().is_none());
}
