//! # Slot Generator
//!
//! Produces the bookable 30-minute windows for a range of calendar days.
//! Every day in the range, inclusive, gets the windows between opening
//! (09:00 UTC) and closing (17:00 UTC), so a single day yields 16 windows.
//!
//! Generation is deterministic: the same range always yields the same set of
//! windows, which lets callers persist them lazily and skip pairs that
//! already exist.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};

use crate::models::slot::SlotWindow;

/// First bookable hour of the day (UTC).
pub const OPENING_HOUR: u32 = 9;
/// Hour at which the last window of the day ends (UTC).
pub const CLOSING_HOUR: u32 = 17;
/// Length of every slot.
pub const SLOT_MINUTES: i64 = 30;

/// Generates every slot window for the days `from..=to`.
///
/// Returns an empty vector when `from` is after `to`. Windows are ordered by
/// start time.
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use clinic_core::slot_generator::generate_slots;
///
/// let day = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
/// assert_eq!(generate_slots(day, day).len(), 16);
/// ```
pub fn generate_slots(from: NaiveDate, to: NaiveDate) -> Vec<SlotWindow> {
    let step = Duration::minutes(SLOT_MINUTES);
    let mut windows = Vec::new();

    for day in from.iter_days().take_while(|day| *day <= to) {
        let (opening, closing) = opening_hours(day);
        let mut start_at = opening;
        while start_at + step <= closing {
            windows.push(SlotWindow {
                start_at,
                end_at: start_at + step,
            });
            start_at += step;
        }
    }

    windows
}

/// Returns the UTC instants bounding a range of whole days: midnight at the
/// start of `from` and the last second of `to`.
pub fn day_bounds(from: NaiveDate, to: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
    let start = from.and_time(NaiveTime::MIN).and_utc();
    let end = to
        .and_hms_opt(23, 59, 59)
        .map(|end| end.and_utc())
        .unwrap_or(start);
    (start, end)
}

fn opening_hours(day: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
    let at = |hour: u32| {
        day.and_time(NaiveTime::MIN).and_utc() + Duration::hours(i64::from(hour))
    };
    (at(OPENING_HOUR), at(CLOSING_HOUR))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn day_bounds_cover_whole_days() {
        let from = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let to = NaiveDate::from_ymd_opt(2024, 3, 2).unwrap();
        let (start, end) = day_bounds(from, to);
        assert_eq!(start.to_rfc3339(), "2024-03-01T00:00:00+00:00");
        assert_eq!(end.to_rfc3339(), "2024-03-02T23:59:59+00:00");
    }
}
