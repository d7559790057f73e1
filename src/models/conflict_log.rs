use crate::scheduling::conflict::ConflictKind;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Audit record for a scheduling attempt that collided with existing
/// interviews. Written on detection, even when the caller overrides the
/// conflict afterwards. The scheduler never resolves these.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ConflictLog {
    pub id: i64,
    pub employer_id: i64,
    pub conflict_date: NaiveDate,
    pub interview_ids: Vec<i64>,
    pub conflict_type: ConflictKind,
    pub resolved: bool,
    pub created_at: Option<DateTime<Utc>>,
}
