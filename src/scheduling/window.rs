use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Minutes of padding applied on both sides of a candidate window when
/// searching for collisions. Keeps bookings from landing back to back
/// with no gap.
pub const CONFLICT_BUFFER_MINUTES: i64 = 15;

/// Half-open interval `[start, end)` on the UTC timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeWindow {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    pub fn from_start(start: DateTime<Utc>, duration_minutes: i64) -> Self {
        Self {
            start,
            end: start + Duration::minutes(duration_minutes),
        }
    }

    /// The same window widened by `minutes` on each side.
    pub fn padded(&self, minutes: i64) -> Self {
        Self {
            start: self.start - Duration::minutes(minutes),
            end: self.end + Duration::minutes(minutes),
        }
    }

    /// Strict interval intersection: windows that merely touch at an
    /// endpoint do not intersect, so a gap of exactly the buffer length
    /// counts as free.
    pub fn intersects(&self, other: &Self) -> bool {
        self.start < other.end && other.start < self.end
    }
}
