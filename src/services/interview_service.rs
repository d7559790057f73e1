use crate::error::{Error, Result};
use crate::models::conflict_log::ConflictLog;
use crate::models::interview::{Interview, InterviewStatus, InterviewType};
use crate::scheduling::conflict::{detect_conflicts, ConflictKind, ConflictReport};
use crate::scheduling::slots::{suggest_slots, SlotSearch, SlotSuggestions};
use crate::scheduling::window::{TimeWindow, CONFLICT_BUFFER_MINUTES};
use chrono::{DateTime, Days, NaiveDate, NaiveTime, Utc};
use sqlx::{PgPool, Postgres, Transaction};

const INTERVIEW_COLUMNS: &str = "id, employer_id, candidate_id, job_id, application_id, \
     scheduled_at, duration_minutes, interview_type, status, was_rescheduled, \
     location, notes, created_at, updated_at";

/// Outcome of a schedule or reschedule attempt. A conflict is a normal
/// negative result, not an error; callers surface the colliding
/// interviews so the UI can offer alternatives.
#[derive(Debug)]
pub enum ScheduleOutcome {
    Booked(Interview),
    Conflict {
        conflicts: Vec<Interview>,
        kind: ConflictKind,
    },
}

pub struct NewInterview {
    pub application_id: i64,
    pub employer_id: i64,
    pub candidate_id: i64,
    pub job_id: i64,
    pub scheduled_at: DateTime<Utc>,
    pub duration_minutes: i32,
    pub interview_type: InterviewType,
    pub location: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct OverridePolicy {
    /// Bypass conflict checking entirely.
    pub force_schedule: bool,
    /// Accept buffer-only collisions; true overlaps still block.
    pub allow_back_to_back: bool,
}

impl OverridePolicy {
    fn permits(&self, kind: ConflictKind) -> bool {
        self.force_schedule || (self.allow_back_to_back && kind == ConflictKind::BackToBack)
    }
}

#[derive(Clone)]
pub struct InterviewService {
    pool: PgPool,
}

impl InterviewService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Read-only conflict probe for a candidate window.
    pub async fn check_conflicts(
        &self,
        employer_id: i64,
        scheduled_at: DateTime<Utc>,
        duration_minutes: i32,
        exclude_interview_id: Option<i64>,
    ) -> Result<ConflictReport> {
        let window = TimeWindow::from_start(scheduled_at, i64::from(duration_minutes));
        let booked = self
            .fetch_scheduled_in_range(employer_id, window.padded(CONFLICT_BUFFER_MINUTES))
            .await?;
        Ok(detect_conflicts(window, &booked, exclude_interview_id))
    }

    /// Conflict-free slot proposals from `preferred_date`, spilling into
    /// following days up to the configured horizon.
    pub async fn suggest_slots(
        &self,
        employer_id: i64,
        preferred_date: NaiveDate,
        params: SlotSearch,
    ) -> Result<SlotSuggestions> {
        let horizon_start = preferred_date.and_time(NaiveTime::MIN).and_utc();
        let horizon_end = preferred_date
            .checked_add_days(Days::new(u64::from(params.max_days)))
            .unwrap_or(preferred_date)
            .and_time(NaiveTime::MIN)
            .and_utc();
        let booked = self
            .fetch_scheduled_in_range(
                employer_id,
                TimeWindow::new(horizon_start, horizon_end).padded(CONFLICT_BUFFER_MINUTES),
            )
            .await?;
        Ok(suggest_slots(preferred_date, Utc::now(), &booked, &params))
    }

    /// Books an interview. Conflict check and insert run in one
    /// transaction under an advisory lock keyed by the employer, so two
    /// concurrent bookings for the same employer cannot both pass the
    /// check and double-book.
    pub async fn schedule(
        &self,
        new: NewInterview,
        policy: OverridePolicy,
    ) -> Result<ScheduleOutcome> {
        let mut tx = self.pool.begin().await?;
        lock_employer(&mut tx, new.employer_id).await?;

        let window =
            TimeWindow::from_start(new.scheduled_at, i64::from(new.duration_minutes));
        let report = self
            .conflicts_in_tx(&mut tx, new.employer_id, window, None)
            .await?;

        if let Some(kind) = report.conflict_type {
            self.log_conflict(&mut tx, new.employer_id, window, &report)
                .await?;
            if !policy.permits(kind) {
                // Commit so the audit entry survives the rejection.
                tx.commit().await?;
                return Ok(ScheduleOutcome::Conflict {
                    conflicts: report.conflicts,
                    kind,
                });
            }
            tracing::info!(
                employer_id = new.employer_id,
                ?kind,
                "booking over a detected conflict (override)"
            );
        }

        let interview = sqlx::query_as::<_, Interview>(&format!(
            "INSERT INTO interviews (application_id, employer_id, candidate_id, job_id, \
                 scheduled_at, duration_minutes, interview_type, status, location, notes) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) \
             RETURNING {INTERVIEW_COLUMNS}"
        ))
        .bind(new.application_id)
        .bind(new.employer_id)
        .bind(new.candidate_id)
        .bind(new.job_id)
        .bind(new.scheduled_at)
        .bind(new.duration_minutes)
        .bind(new.interview_type)
        .bind(InterviewStatus::Scheduled)
        .bind(new.location)
        .bind(new.notes)
        .fetch_one(&mut *tx)
        .await?;
        tx.commit().await?;

        tracing::info!(
            interview_id = interview.id,
            employer_id = interview.employer_id,
            scheduled_at = %interview.scheduled_at,
            "interview scheduled"
        );
        Ok(ScheduleOutcome::Booked(interview))
    }

    /// Moves an existing booking. The interview's own slot is excluded
    /// from the conflict check; the record keeps status `scheduled` and
    /// gains `was_rescheduled = true`.
    pub async fn reschedule(
        &self,
        interview_id: i64,
        new_scheduled_at: DateTime<Utc>,
        new_duration_minutes: Option<i32>,
        policy: OverridePolicy,
    ) -> Result<ScheduleOutcome> {
        let current = self.get(interview_id).await?;
        if current.status != InterviewStatus::Scheduled {
            return Err(Error::BadRequest(format!(
                "Only scheduled interviews can be rescheduled (interview {} is {:?})",
                interview_id, current.status
            )));
        }
        let duration = new_duration_minutes.unwrap_or(current.duration_minutes);

        let mut tx = self.pool.begin().await?;
        lock_employer(&mut tx, current.employer_id).await?;

        let window = TimeWindow::from_start(new_scheduled_at, i64::from(duration));
        let report = self
            .conflicts_in_tx(&mut tx, current.employer_id, window, Some(interview_id))
            .await?;

        if let Some(kind) = report.conflict_type {
            self.log_conflict(&mut tx, current.employer_id, window, &report)
                .await?;
            if !policy.permits(kind) {
                tx.commit().await?;
                return Ok(ScheduleOutcome::Conflict {
                    conflicts: report.conflicts,
                    kind,
                });
            }
        }

        // Re-checked inside the transaction: the precheck above ran
        // before the lock, so a concurrent cancel/complete may have
        // landed in between. Zero rows here means the interview is no
        // longer an active booking.
        let interview = sqlx::query_as::<_, Interview>(&format!(
            "UPDATE interviews \
             SET scheduled_at = $1, duration_minutes = $2, was_rescheduled = TRUE, \
                 updated_at = NOW() \
             WHERE id = $3 AND status = $4 \
             RETURNING {INTERVIEW_COLUMNS}"
        ))
        .bind(new_scheduled_at)
        .bind(duration)
        .bind(interview_id)
        .bind(InterviewStatus::Scheduled)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| {
            Error::BadRequest(format!(
                "Interview {} is no longer scheduled and cannot be rescheduled",
                interview_id
            ))
        })?;
        tx.commit().await?;

        tracing::info!(
            interview_id,
            scheduled_at = %interview.scheduled_at,
            "interview rescheduled"
        );
        Ok(ScheduleOutcome::Booked(interview))
    }

    /// Idempotent: cancelling an already cancelled interview succeeds
    /// and overwrites the stored reason again.
    pub async fn cancel(&self, interview_id: i64, reason: Option<String>) -> Result<Interview> {
        let interview = sqlx::query_as::<_, Interview>(&format!(
            "UPDATE interviews \
             SET status = $1, notes = COALESCE($2, notes), updated_at = NOW() \
             WHERE id = $3 \
             RETURNING {INTERVIEW_COLUMNS}"
        ))
        .bind(InterviewStatus::Cancelled)
        .bind(reason)
        .bind(interview_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| Error::NotFound(format!("Interview {} not found", interview_id)))?;

        tracing::info!(interview_id, "interview cancelled");
        Ok(interview)
    }

    pub async fn complete(&self, interview_id: i64) -> Result<Interview> {
        let current = self.get(interview_id).await?;
        match current.status {
            InterviewStatus::Completed => Ok(current),
            InterviewStatus::Cancelled => Err(Error::BadRequest(format!(
                "Interview {} is cancelled and cannot be completed",
                interview_id
            ))),
            InterviewStatus::Scheduled => {
                let interview = sqlx::query_as::<_, Interview>(&format!(
                    "UPDATE interviews SET status = $1, updated_at = NOW() \
                     WHERE id = $2 RETURNING {INTERVIEW_COLUMNS}"
                ))
                .bind(InterviewStatus::Completed)
                .bind(interview_id)
                .fetch_one(&self.pool)
                .await?;
                Ok(interview)
            }
        }
    }

    pub async fn get(&self, interview_id: i64) -> Result<Interview> {
        sqlx::query_as::<_, Interview>(&format!(
            "SELECT {INTERVIEW_COLUMNS} FROM interviews WHERE id = $1"
        ))
        .bind(interview_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| Error::NotFound(format!("Interview {} not found", interview_id)))
    }

    pub async fn list_by_employer(
        &self,
        employer_id: i64,
        status: Option<InterviewStatus>,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
        candidate_id: Option<i64>,
    ) -> Result<Vec<Interview>> {
        let interviews = sqlx::query_as::<_, Interview>(&format!(
            "SELECT {INTERVIEW_COLUMNS} FROM interviews \
             WHERE employer_id = $1 \
               AND ($2::interview_status IS NULL OR status = $2) \
               AND ($3::timestamptz IS NULL OR scheduled_at >= $3) \
               AND ($4::timestamptz IS NULL OR scheduled_at < $4) \
               AND ($5::bigint IS NULL OR candidate_id = $5) \
             ORDER BY scheduled_at"
        ))
        .bind(employer_id)
        .bind(status)
        .bind(from)
        .bind(to)
        .bind(candidate_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(interviews)
    }

    pub async fn list_by_candidate(&self, candidate_id: i64) -> Result<Vec<Interview>> {
        let interviews = sqlx::query_as::<_, Interview>(&format!(
            "SELECT {INTERVIEW_COLUMNS} FROM interviews \
             WHERE candidate_id = $1 ORDER BY scheduled_at"
        ))
        .bind(candidate_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(interviews)
    }

    pub async fn list_conflict_logs(
        &self,
        employer_id: i64,
        resolved: Option<bool>,
    ) -> Result<Vec<ConflictLog>> {
        let logs = sqlx::query_as::<_, ConflictLog>(
            "SELECT id, employer_id, conflict_date, interview_ids, conflict_type, \
                    resolved, created_at \
             FROM conflict_logs \
             WHERE employer_id = $1 AND ($2::boolean IS NULL OR resolved = $2) \
             ORDER BY created_at DESC",
        )
        .bind(employer_id)
        .bind(resolved)
        .fetch_all(&self.pool)
        .await?;
        Ok(logs)
    }

    /// Scheduled interviews whose windows intersect `range`, oldest
    /// first. The range is expected to be pre-padded by the caller.
    async fn fetch_scheduled_in_range(
        &self,
        employer_id: i64,
        range: TimeWindow,
    ) -> Result<Vec<Interview>> {
        let interviews = sqlx::query_as::<_, Interview>(&format!(
            "SELECT {INTERVIEW_COLUMNS} FROM interviews \
             WHERE employer_id = $1 AND status = 'scheduled' \
               AND scheduled_at < $2 \
               AND scheduled_at + make_interval(mins => duration_minutes) > $3 \
             ORDER BY scheduled_at"
        ))
        .bind(employer_id)
        .bind(range.end)
        .bind(range.start)
        .fetch_all(&self.pool)
        .await?;
        Ok(interviews)
    }

    async fn conflicts_in_tx(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        employer_id: i64,
        window: TimeWindow,
        exclude_id: Option<i64>,
    ) -> Result<ConflictReport> {
        let padded = window.padded(CONFLICT_BUFFER_MINUTES);
        let booked = sqlx::query_as::<_, Interview>(&format!(
            "SELECT {INTERVIEW_COLUMNS} FROM interviews \
             WHERE employer_id = $1 AND status = 'scheduled' \
               AND scheduled_at < $2 \
               AND scheduled_at + make_interval(mins => duration_minutes) > $3 \
             ORDER BY scheduled_at"
        ))
        .bind(employer_id)
        .bind(padded.end)
        .bind(padded.start)
        .fetch_all(&mut **tx)
        .await?;
        Ok(detect_conflicts(window, &booked, exclude_id))
    }

    async fn log_conflict(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        employer_id: i64,
        attempted: TimeWindow,
        report: &ConflictReport,
    ) -> Result<()> {
        let Some(kind) = report.conflict_type else {
            return Ok(());
        };
        let conflict_date = attempted.start.date_naive();
        let ids: Vec<i64> = report.conflicts.iter().map(|i| i.id).collect();
        sqlx::query(
            "INSERT INTO conflict_logs (employer_id, conflict_date, interview_ids, conflict_type) \
             VALUES ($1, $2, $3, $4)",
        )
        .bind(employer_id)
        .bind(conflict_date)
        .bind(ids)
        .bind(kind)
        .execute(&mut **tx)
        .await?;
        Ok(())
    }
}

/// Transaction-scoped advisory lock serializing bookings per employer.
async fn lock_employer(tx: &mut Transaction<'_, Postgres>, employer_id: i64) -> Result<()> {
    sqlx::query("SELECT pg_advisory_xact_lock($1)")
        .bind(employer_id)
        .execute(&mut **tx)
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_policy_blocks_both_conflict_kinds() {
        let policy = OverridePolicy::default();
        assert!(!policy.permits(ConflictKind::Overlapping));
        assert!(!policy.permits(ConflictKind::BackToBack));
    }

    #[test]
    fn allow_back_to_back_clears_buffer_conflicts_only() {
        let policy = OverridePolicy {
            force_schedule: false,
            allow_back_to_back: true,
        };
        assert!(policy.permits(ConflictKind::BackToBack));
        assert!(!policy.permits(ConflictKind::Overlapping));
    }

    #[test]
    fn force_schedule_clears_any_conflict() {
        let policy = OverridePolicy {
            force_schedule: true,
            allow_back_to_back: false,
        };
        assert!(policy.permits(ConflictKind::Overlapping));
        assert!(policy.permits(ConflictKind::BackToBack));
    }

    #[test]
    fn both_flags_together_still_clear_everything() {
        let policy = OverridePolicy {
            force_schedule: true,
            allow_back_to_back: true,
        };
        assert!(policy.permits(ConflictKind::Overlapping));
        assert!(policy.permits(ConflictKind::BackToBack));
    }
}
