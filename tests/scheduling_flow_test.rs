use chrono::{DateTime, NaiveDate, TimeZone, Utc};

use interview_backend::models::interview::{Interview, InterviewStatus, InterviewType};
use interview_backend::scheduling::conflict::{detect_conflicts, ConflictKind};
use interview_backend::scheduling::slots::{suggest_slots, SlotSearch};
use interview_backend::scheduling::window::TimeWindow;

fn day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 9, 7).unwrap()
}

fn at(hour: u32, min: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 9, 7, hour, min, 0).unwrap()
}

fn interview(id: i64, employer_id: i64, start: DateTime<Utc>, duration: i32) -> Interview {
    Interview {
        id,
        employer_id,
        candidate_id: 100 + id,
        job_id: 200,
        application_id: 300 + id,
        scheduled_at: start,
        duration_minutes: duration,
        interview_type: InterviewType::Video,
        status: InterviewStatus::Scheduled,
        was_rescheduled: false,
        location: None,
        notes: None,
        created_at: None,
        updated_at: None,
    }
}

#[test]
fn gap_inside_buffer_reports_back_to_back() {
    // Booked 10:00-11:00, probing 11:10-12:00: ten-minute gap, inside
    // the fifteen-minute buffer.
    let calendar = [interview(1, 7, at(10, 0), 60)];
    let report = detect_conflicts(TimeWindow::new(at(11, 10), at(12, 0)), &calendar, None);

    assert!(report.has_conflict);
    assert_eq!(report.conflicts.len(), 1);
    assert_eq!(report.conflicts[0].id, 1);
    assert_eq!(report.conflict_type, Some(ConflictKind::BackToBack));
}

#[test]
fn gap_outside_buffer_is_free() {
    let calendar = [interview(1, 7, at(10, 0), 60)];
    let report = detect_conflicts(TimeWindow::new(at(11, 20), at(12, 0)), &calendar, None);

    assert!(!report.has_conflict);
    assert!(report.conflicts.is_empty());
    assert_eq!(report.conflict_type, None);
}

#[test]
fn morning_pair_pushes_first_suggestion_to_eleven_thirty() {
    // 09:00-10:00 and 10:00-11:00 booked. The earliest grid start whose
    // buffered window clears 11:00 is 11:30.
    let calendar = [
        interview(1, 7, at(9, 0), 60),
        interview(2, 7, at(10, 0), 60),
    ];
    let params = SlotSearch {
        count: 3,
        ..SlotSearch::default()
    };
    let result = suggest_slots(day(), at(0, 0), &calendar, &params);

    let starts: Vec<_> = result.slots.iter().map(|s| s.start).collect();
    assert_eq!(starts, vec![at(11, 30), at(12, 0), at(12, 30)]);
    assert!(!result.horizon_exhausted);

    // Every proposal must independently pass the conflict check.
    for slot in &result.slots {
        assert!(!detect_conflicts(*slot, &calendar, None).has_conflict);
    }
}

#[test]
fn reschedule_collision_with_other_interview_is_reported() {
    // Moving interview 1 onto interview 2's slot: 2 must come back as
    // the conflict even though 1 is excluded.
    let calendar = [
        interview(1, 7, at(9, 0), 60),
        interview(2, 7, at(14, 0), 60),
    ];
    let report = detect_conflicts(
        TimeWindow::new(at(14, 0), at(15, 0)),
        &calendar,
        Some(1),
    );

    assert!(report.has_conflict);
    assert_eq!(report.conflicts.len(), 1);
    assert_eq!(report.conflicts[0].id, 2);
    assert_eq!(report.conflict_type, Some(ConflictKind::Overlapping));
}

#[test]
fn reschedule_over_own_slot_succeeds() {
    // New window only collides with the interview's own current slot.
    let calendar = [interview(1, 7, at(9, 0), 60)];
    let report = detect_conflicts(
        TimeWindow::new(at(9, 30), at(10, 30)),
        &calendar,
        Some(1),
    );

    assert!(!report.has_conflict);
}

#[test]
fn fully_booked_horizon_returns_shortfall_explicitly() {
    let calendar = [
        interview(1, 7, at(9, 0), 8 * 60),
        interview(2, 7, Utc.with_ymd_and_hms(2026, 9, 8, 9, 0, 0).unwrap(), 8 * 60),
    ];
    let params = SlotSearch {
        count: 4,
        max_days: 2,
        ..SlotSearch::default()
    };
    let result = suggest_slots(day(), at(0, 0), &calendar, &params);

    assert!(result.slots.len() < 4);
    assert!(result.horizon_exhausted);
}

#[test]
fn other_employers_calendars_do_not_interfere() {
    // The service only feeds one employer's rows into detection; the
    // detector itself treats whatever it is given as that calendar.
    let calendar = [interview(1, 7, at(10, 0), 60)];
    let probe = TimeWindow::new(at(10, 0), at(11, 0));
    assert!(detect_conflicts(probe, &calendar, None).has_conflict);
    assert!(!detect_conflicts(probe, &[], None).has_conflict);
}
