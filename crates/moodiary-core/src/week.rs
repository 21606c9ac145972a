//! Week-window helpers for weekly statistics.
//!
//! The whole crate uses one week convention: ISO weeks starting Monday at
//! 00:00:00 UTC. Both the store's in-memory filters and the repository's
//! weekly-summary query bucket through these helpers, so a timestamp lands
//! in exactly one week window.

use chrono::{DateTime, Datelike, Days, Utc};

/// Number of days in a week window.
pub const DAYS_PER_WEEK: u64 = 7;

/// The half-open millisecond window `[start, end)` of the week containing `date`.
///
/// `start` is Monday 00:00:00 UTC of that week; `end` is exactly seven days
/// later. A timestamp equal to `start` is inside the window, a timestamp equal
/// to `end` belongs to the next week.
#[must_use]
pub fn week_bounds(date: DateTime<Utc>) -> (i64, i64) {
    let days_into_week = u64::from(date.weekday().num_days_from_monday());
    let monday = date
        .date_naive()
        .checked_sub_days(Days::new(days_into_week))
        .expect("week start is within the representable date range");
    let start = monday
        .and_hms_opt(0, 0, 0)
        .expect("midnight is a valid time")
        .and_utc();
    let end = start
        .checked_add_days(Days::new(DAYS_PER_WEEK))
        .expect("week end is within the representable date range");

    (start.timestamp_millis(), end.timestamp_millis())
}

/// Whether a millisecond timestamp falls in the week containing `date`.
#[must_use]
pub fn contains(date: DateTime<Utc>, timestamp_ms: i64) -> bool {
    let (start, end) = week_bounds(date);
    (start..end).contains(&timestamp_ms)
}
