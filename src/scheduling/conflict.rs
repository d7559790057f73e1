use crate::models::interview::{Interview, InterviewStatus};
use crate::scheduling::window::{TimeWindow, CONFLICT_BUFFER_MINUTES};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "conflict_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ConflictKind {
    /// The un-padded windows themselves intersect.
    Overlapping,
    /// Collision only inside the 15-minute buffer zone.
    BackToBack,
}

#[derive(Debug, Clone, Serialize)]
pub struct ConflictReport {
    pub has_conflict: bool,
    pub conflicts: Vec<Interview>,
    pub conflict_type: Option<ConflictKind>,
}

impl ConflictReport {
    pub fn clear() -> Self {
        Self {
            has_conflict: false,
            conflicts: Vec::new(),
            conflict_type: None,
        }
    }
}

/// Collides a candidate window against an employer's booked interviews.
///
/// Only interviews with status `scheduled` are considered. A booked
/// interview conflicts when its own window intersects the candidate
/// window padded by [`CONFLICT_BUFFER_MINUTES`] on each side. If any
/// conflicting interview's un-padded window intersects the un-padded
/// candidate window the report is classified `overlapping`, otherwise
/// `back_to_back`.
///
/// `exclude_id` drops one interview from consideration so a reschedule
/// does not collide with its own current booking.
pub fn detect_conflicts(
    window: TimeWindow,
    booked: &[Interview],
    exclude_id: Option<i64>,
) -> ConflictReport {
    let padded = window.padded(CONFLICT_BUFFER_MINUTES);

    let mut conflicts = Vec::new();
    let mut any_overlap = false;
    for interview in booked {
        if interview.status != InterviewStatus::Scheduled {
            continue;
        }
        if exclude_id == Some(interview.id) {
            continue;
        }
        let theirs = interview.window();
        if theirs.intersects(&padded) {
            if theirs.intersects(&window) {
                any_overlap = true;
            }
            conflicts.push(interview.clone());
        }
    }

    if conflicts.is_empty() {
        return ConflictReport::clear();
    }

    ConflictReport {
        has_conflict: true,
        conflicts,
        conflict_type: Some(if any_overlap {
            ConflictKind::Overlapping
        } else {
            ConflictKind::BackToBack
        }),
    }
}
