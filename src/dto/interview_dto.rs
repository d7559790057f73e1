use crate::models::interview::{Interview, InterviewStatus, InterviewType};
use crate::scheduling::conflict::ConflictKind;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

fn default_duration() -> i32 {
    60
}

fn default_count() -> usize {
    5
}

fn default_hours_start() -> u32 {
    9
}

fn default_hours_end() -> u32 {
    17
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ScheduleInterviewPayload {
    pub application_id: i64,
    pub employer_id: i64,
    pub candidate_id: i64,
    pub job_id: i64,
    pub scheduled_at: DateTime<Utc>,
    #[serde(default = "default_duration")]
    #[validate(range(min = 15, max = 480, message = "Duration must be 15-480 minutes"))]
    pub duration_minutes: i32,
    pub interview_type: InterviewType,
    #[validate(length(min = 1))]
    pub location: Option<String>,
    pub notes: Option<String>,
    #[serde(default)]
    pub force_schedule: bool,
    #[serde(default)]
    pub allow_back_to_back: bool,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RescheduleInterviewPayload {
    pub new_scheduled_at: DateTime<Utc>,
    #[validate(range(min = 15, max = 480, message = "Duration must be 15-480 minutes"))]
    pub new_duration_minutes: Option<i32>,
    #[serde(default)]
    pub force_schedule: bool,
    #[serde(default)]
    pub allow_back_to_back: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CancelInterviewPayload {
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ConflictCheckQuery {
    pub employer_id: i64,
    pub scheduled_at: DateTime<Utc>,
    #[serde(default = "default_duration")]
    #[validate(range(min = 15, max = 480, message = "Duration must be 15-480 minutes"))]
    pub duration_minutes: i32,
    pub exclude_interview_id: Option<i64>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SlotSuggestionQuery {
    pub employer_id: i64,
    pub preferred_date: NaiveDate,
    #[serde(default = "default_duration")]
    #[validate(range(min = 15, max = 480, message = "Duration must be 15-480 minutes"))]
    pub duration_minutes: i32,
    #[serde(default = "default_count")]
    #[validate(range(min = 1, max = 20, message = "Count must be 1-20"))]
    pub count: usize,
    #[serde(default = "default_hours_start")]
    #[validate(range(max = 23))]
    pub working_hours_start: u32,
    #[serde(default = "default_hours_end")]
    #[validate(range(min = 1, max = 24))]
    pub working_hours_end: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EmployerInterviewsQuery {
    pub status: Option<InterviewStatus>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
    pub candidate_id: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConflictLogQuery {
    pub resolved: Option<bool>,
}

#[derive(Debug, Serialize)]
pub struct ScheduleResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interview: Option<Interview>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conflicts: Option<Vec<Interview>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conflict_type: Option<ConflictKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ScheduleResponse {
    pub fn booked(interview: Interview) -> Self {
        Self {
            success: true,
            interview: Some(interview),
            conflicts: None,
            conflict_type: None,
            message: None,
        }
    }

    pub fn conflict(conflicts: Vec<Interview>, kind: ConflictKind) -> Self {
        let message = match kind {
            ConflictKind::Overlapping => {
                "The requested time overlaps existing interviews".to_string()
            }
            ConflictKind::BackToBack => {
                "The requested time leaves no gap before or after an existing interview"
                    .to_string()
            }
        };
        Self {
            success: false,
            interview: None,
            conflicts: Some(conflicts),
            conflict_type: Some(kind),
            message: Some(message),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CancelResponse {
    pub success: bool,
    pub message: String,
}
