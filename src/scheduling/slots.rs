use crate::models::interview::Interview;
use crate::scheduling::conflict::detect_conflicts;
use crate::scheduling::window::TimeWindow;
use chrono::{DateTime, Days, Duration, NaiveDate, NaiveTime, Utc};
use serde::Serialize;

/// Candidate slot starts are aligned to this grid within working hours.
pub const SLOT_GRID_MINUTES: i64 = 30;

#[derive(Debug, Clone)]
pub struct SlotSearch {
    pub duration_minutes: i64,
    pub count: usize,
    /// Working-hours envelope, whole hours on the UTC clock.
    pub working_hours_start: u32,
    pub working_hours_end: u32,
    /// Hard cap on day spillover. The search never looks further than
    /// this many days from the preferred date.
    pub max_days: u32,
}

impl Default for SlotSearch {
    fn default() -> Self {
        Self {
            duration_minutes: 60,
            count: 5,
            working_hours_start: 9,
            working_hours_end: 17,
            max_days: 14,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SlotSuggestions {
    pub slots: Vec<TimeWindow>,
    /// True when the day horizon ran out before the quota was met, so
    /// callers can distinguish "few free slots" from a short search.
    pub horizon_exhausted: bool,
}

/// Enumerates conflict-free slots of the requested duration, walking a
/// 30-minute grid inside working hours from `preferred_date` onwards and
/// spilling into following days until the quota or the day cap is hit.
///
/// Slots starting before `now` are skipped; the clock is a parameter so
/// the enumeration itself never reads system time.
pub fn suggest_slots(
    preferred_date: NaiveDate,
    now: DateTime<Utc>,
    booked: &[Interview],
    params: &SlotSearch,
) -> SlotSuggestions {
    let mut slots = Vec::new();
    let duration = Duration::minutes(params.duration_minutes);

    for day_offset in 0..params.max_days {
        let Some(day) = preferred_date.checked_add_days(Days::new(u64::from(day_offset))) else {
            break;
        };
        let midnight = day.and_time(NaiveTime::MIN).and_utc();
        let open = midnight + Duration::hours(i64::from(params.working_hours_start));
        let close = midnight + Duration::hours(i64::from(params.working_hours_end));

        let mut start = open;
        while start + duration <= close {
            let slot = TimeWindow::from_start(start, params.duration_minutes);
            if slot.start >= now && !detect_conflicts(slot, booked, None).has_conflict {
                slots.push(slot);
                if slots.len() >= params.count {
                    return SlotSuggestions {
                        slots,
                        horizon_exhausted: false,
                    };
                }
            }
            start = start + Duration::minutes(SLOT_GRID_MINUTES);
        }
    }

    SlotSuggestions {
        slots,
        horizon_exhausted: true,
    }
}
