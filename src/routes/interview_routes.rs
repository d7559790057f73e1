use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::dto::interview_dto::{
    CancelInterviewPayload, CancelResponse, ConflictCheckQuery, ConflictLogQuery,
    EmployerInterviewsQuery, RescheduleInterviewPayload, ScheduleInterviewPayload,
    ScheduleResponse, SlotSuggestionQuery,
};
use crate::error::Result;
use crate::scheduling::slots::SlotSearch;
use crate::services::interview_service::{NewInterview, OverridePolicy, ScheduleOutcome};
use crate::AppState;

pub async fn check_conflicts(
    State(state): State<AppState>,
    Query(query): Query<ConflictCheckQuery>,
) -> Result<impl axum::response::IntoResponse> {
    query.validate()?;
    let report = state
        .interview_service
        .check_conflicts(
            query.employer_id,
            query.scheduled_at,
            query.duration_minutes,
            query.exclude_interview_id,
        )
        .await?;
    Ok(Json(report))
}

pub async fn suggest_slots(
    State(state): State<AppState>,
    Query(query): Query<SlotSuggestionQuery>,
) -> Result<impl axum::response::IntoResponse> {
    query.validate()?;
    if query.working_hours_end <= query.working_hours_start {
        return Err(crate::error::Error::BadRequest(
            "working_hours_end must be after working_hours_start".into(),
        ));
    }

    let params = SlotSearch {
        duration_minutes: i64::from(query.duration_minutes),
        count: query.count,
        working_hours_start: query.working_hours_start,
        working_hours_end: query.working_hours_end,
        max_days: crate::config::get_config().slot_search_max_days,
    };
    let suggestions = state
        .interview_service
        .suggest_slots(query.employer_id, query.preferred_date, params)
        .await?;
    Ok(Json(suggestions))
}

pub async fn schedule_interview(
    State(state): State<AppState>,
    Json(payload): Json<ScheduleInterviewPayload>,
) -> Result<impl axum::response::IntoResponse> {
    payload.validate()?;

    let policy = OverridePolicy {
        force_schedule: payload.force_schedule,
        allow_back_to_back: payload.allow_back_to_back,
    };
    let new = NewInterview {
        application_id: payload.application_id,
        employer_id: payload.employer_id,
        candidate_id: payload.candidate_id,
        job_id: payload.job_id,
        scheduled_at: payload.scheduled_at,
        duration_minutes: payload.duration_minutes,
        interview_type: payload.interview_type,
        location: payload.location,
        notes: payload.notes,
    };

    match state.interview_service.schedule(new, policy).await? {
        ScheduleOutcome::Booked(interview) => {
            spawn_booking_side_effects(&state, "interview_scheduled", interview.clone());
            Ok((
                StatusCode::CREATED,
                Json(ScheduleResponse::booked(interview)),
            ))
        }
        ScheduleOutcome::Conflict { conflicts, kind } => Ok((
            StatusCode::OK,
            Json(ScheduleResponse::conflict(conflicts, kind)),
        )),
    }
}

pub async fn reschedule_interview(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<RescheduleInterviewPayload>,
) -> Result<impl axum::response::IntoResponse> {
    payload.validate()?;

    let policy = OverridePolicy {
        force_schedule: payload.force_schedule,
        allow_back_to_back: payload.allow_back_to_back,
    };
    let outcome = state
        .interview_service
        .reschedule(
            id,
            payload.new_scheduled_at,
            payload.new_duration_minutes,
            policy,
        )
        .await?;

    match outcome {
        ScheduleOutcome::Booked(interview) => {
            spawn_booking_side_effects(&state, "interview_rescheduled", interview.clone());
            Ok(Json(ScheduleResponse::booked(interview)))
        }
        ScheduleOutcome::Conflict { conflicts, kind } => {
            Ok(Json(ScheduleResponse::conflict(conflicts, kind)))
        }
    }
}

pub async fn cancel_interview(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<CancelInterviewPayload>,
) -> Result<impl axum::response::IntoResponse> {
    let interview = state.interview_service.cancel(id, payload.reason).await?;

    let calendar = state.calendar_service.clone();
    tokio::spawn(async move {
        if let Err(e) = calendar.sync_cancellation(&interview).await {
            tracing::warn!(interview_id = interview.id, error = ?e, "calendar sync failed");
        }
    });

    Ok(Json(CancelResponse {
        success: true,
        message: format!("Interview {} cancelled", id),
    }))
}

pub async fn complete_interview(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl axum::response::IntoResponse> {
    let interview = state.interview_service.complete(id).await?;
    Ok(Json(interview))
}

pub async fn get_interview(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl axum::response::IntoResponse> {
    let interview = state.interview_service.get(id).await?;
    Ok(Json(interview))
}

pub async fn list_employer_interviews(
    State(state): State<AppState>,
    Path(employer_id): Path<i64>,
    Query(query): Query<EmployerInterviewsQuery>,
) -> Result<impl axum::response::IntoResponse> {
    let interviews = state
        .interview_service
        .list_by_employer(
            employer_id,
            query.status,
            query.from,
            query.to,
            query.candidate_id,
        )
        .await?;
    Ok(Json(interviews))
}

pub async fn list_employer_conflict_logs(
    State(state): State<AppState>,
    Path(employer_id): Path<i64>,
    Query(query): Query<ConflictLogQuery>,
) -> Result<impl axum::response::IntoResponse> {
    let logs = state
        .interview_service
        .list_conflict_logs(employer_id, query.resolved)
        .await?;
    Ok(Json(logs))
}

pub async fn list_candidate_interviews(
    State(state): State<AppState>,
    Path(candidate_id): Path<i64>,
) -> Result<impl axum::response::IntoResponse> {
    let interviews = state
        .interview_service
        .list_by_candidate(candidate_id)
        .await?;
    Ok(Json(interviews))
}

/// Notification and calendar sync run after the booking is committed;
/// either failing leaves the booking in place.
fn spawn_booking_side_effects(
    state: &AppState,
    event: &'static str,
    interview: crate::models::interview::Interview,
) {
    let notification = state.notification_service.clone();
    let calendar = state.calendar_service.clone();
    tokio::spawn(async move {
        if let Err(e) = notification.notify_booking(event, &interview).await {
            tracing::warn!(interview_id = interview.id, error = ?e, "booking notification failed");
        }
        if let Err(e) = calendar.sync_booking(&interview).await {
            tracing::warn!(interview_id = interview.id, error = ?e, "calendar sync failed");
        }
    });
}
