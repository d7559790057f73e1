use chrono::{DateTime, Duration, Utc};
use sqlx::postgres::PgPoolOptions;
use std::env;
use std::time::{SystemTime, UNIX_EPOCH};

use interview_backend::models::interview::{InterviewStatus, InterviewType};
use interview_backend::services::interview_service::{
    InterviewService, NewInterview, OverridePolicy, ScheduleOutcome,
};

/// These tests drive the real service against Postgres and only run
/// when DATABASE_URL is set.
async fn setup_test_db() -> Option<sqlx::PgPool> {
    dotenvy::dotenv().ok();
    let database_url = env::var("DATABASE_URL").ok()?;
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .expect("Failed to create test pool");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    Some(pool)
}

/// Fresh employer per test so calendars never collide across runs.
fn unique_employer_id() -> i64 {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock before epoch")
        .as_nanos();
    (nanos as i64) & 0x7fff_ffff_ffff_ffff
}

fn booking(employer_id: i64, scheduled_at: DateTime<Utc>) -> NewInterview {
    NewInterview {
        application_id: 1,
        employer_id,
        candidate_id: 2,
        job_id: 3,
        scheduled_at,
        duration_minutes: 60,
        interview_type: InterviewType::Video,
        location: None,
        notes: None,
    }
}

#[tokio::test]
async fn cancel_is_idempotent() {
    let Some(pool) = setup_test_db().await else {
        return;
    };
    let service = InterviewService::new(pool);
    let employer_id = unique_employer_id();
    let start = Utc::now() + Duration::days(30);

    let outcome = service
        .schedule(booking(employer_id, start), OverridePolicy::default())
        .await
        .expect("schedule");
    let ScheduleOutcome::Booked(interview) = outcome else {
        panic!("expected a booking on an empty calendar");
    };

    let first = service
        .cancel(interview.id, Some("candidate withdrew".into()))
        .await
        .expect("first cancel");
    assert_eq!(first.status, InterviewStatus::Cancelled);
    assert_eq!(first.notes.as_deref(), Some("candidate withdrew"));

    // Cancelling again succeeds and simply overwrites the reason.
    let second = service
        .cancel(interview.id, Some("cancelled twice".into()))
        .await
        .expect("second cancel");
    assert_eq!(second.status, InterviewStatus::Cancelled);
    assert_eq!(second.notes.as_deref(), Some("cancelled twice"));

    // A reason-less repeat keeps the previous notes.
    let third = service.cancel(interview.id, None).await.expect("third cancel");
    assert_eq!(third.status, InterviewStatus::Cancelled);
    assert_eq!(third.notes.as_deref(), Some("cancelled twice"));
}

#[tokio::test]
async fn cancelled_interview_cannot_be_moved() {
    let Some(pool) = setup_test_db().await else {
        return;
    };
    let service = InterviewService::new(pool);
    let employer_id = unique_employer_id();
    let start = Utc::now() + Duration::days(30);

    let outcome = service
        .schedule(booking(employer_id, start), OverridePolicy::default())
        .await
        .expect("schedule");
    let ScheduleOutcome::Booked(interview) = outcome else {
        panic!("expected a booking on an empty calendar");
    };

    service
        .cancel(interview.id, Some("position filled".into()))
        .await
        .expect("cancel");

    let moved = service
        .reschedule(
            interview.id,
            start + Duration::days(1),
            None,
            OverridePolicy::default(),
        )
        .await;
    assert!(moved.is_err(), "reschedule of a cancelled interview must fail");

    // The record kept its original time and stayed cancelled.
    let current = service.get(interview.id).await.expect("fetch");
    assert_eq!(current.status, InterviewStatus::Cancelled);
    assert_eq!(current.scheduled_at, interview.scheduled_at);
    assert!(!current.was_rescheduled);
}
