//! Calendar domain logic for the schedule console.
//!
//! Everything here is a pure computation over the already-normalized
//! in-memory schedule list: day membership, the month grid, the 24-hour
//! timeline buckets, and month navigation. The UI only handles presentation.

use std::collections::HashMap;

use chrono::{DateTime, Datelike, Local, Months, NaiveDate, Timelike};

use crate::CanonicalSchedule;

/// Hour marks rendered by the 24-hour timeline strip, 06:00 through 18:00.
pub const TIMELINE_SLOT_HOURS: [u32; 13] = [6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 16, 17, 18];

/// Direction for month navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonthDirection {
    Previous,
    Next,
}

/// All schedules whose calendar day equals `day`.
///
/// Membership is (year, month, day) equality in the viewer's local calendar,
/// never instant or UTC equality: a departure at 23:50 and one at 00:10 the
/// next day sit 20 minutes apart but on different days. Plain filtering; the
/// grid issues up to 42 of these per rendered month.
pub fn schedules_on_day(
    schedules: &[CanonicalSchedule],
    day: NaiveDate,
) -> Vec<&CanonicalSchedule> {
    schedules
        .iter()
        .filter(|schedule| schedule.calendar_date == day)
        .collect()
}

pub fn has_schedules_on_day(schedules: &[CanonicalSchedule], day: NaiveDate) -> bool {
    !schedules_on_day(schedules, day).is_empty()
}

/// Month grid for a 7-column calendar: leading `None` placeholders for the
/// weekdays before the 1st (Sunday-indexed), then one entry per day of the
/// month. No trailing padding. Invalid `(year, month)` yields an empty grid.
pub fn month_grid(year: i32, month: u32) -> Vec<Option<NaiveDate>> {
    let first = match NaiveDate::from_ymd_opt(year, month, 1) {
        Some(date) => date,
        None => return Vec::new(),
    };

    let leading = first.weekday().num_days_from_sunday() as usize;
    let days = days_in_month(year, month);

    let mut grid: Vec<Option<NaiveDate>> = Vec::with_capacity(leading + days as usize);
    grid.extend(std::iter::repeat(None).take(leading));
    for day in 1..=days {
        grid.push(NaiveDate::from_ymd_opt(year, month, day));
    }
    grid
}

/// Number of days in a month.
pub fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        2 => {
            if is_leap_year(year) {
                29
            } else {
                28
            }
        }
        4 | 6 | 9 | 11 => 30,
        _ => 31,
    }
}

pub fn is_leap_year(year: i32) -> bool {
    year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
}

/// Move exactly one calendar month, preserving the day-of-month where it
/// exists and clamping to the last valid day otherwise (Jan 31 -> Feb 28).
/// Out-of-range arithmetic is a no-op, not an error.
pub fn shift_month(current: NaiveDate, direction: MonthDirection) -> NaiveDate {
    let shifted = match direction {
        MonthDirection::Previous => current.checked_sub_months(Months::new(1)),
        MonthDirection::Next => current.checked_add_months(Months::new(1)),
    };
    shifted.unwrap_or(current)
}

/// Group a day's schedules into fixed hourly slots for the timeline strip.
///
/// A schedule joins the bucket whose hour equals its local departure hour;
/// minutes are ignored, so a 10:45 departure sits in the 10:00 slot.
/// Departures outside every slot hour appear in no bucket. Every slot hour is
/// keyed even when empty so the strip renders all of them.
pub fn bucketize<'a>(
    day_schedules: &[&'a CanonicalSchedule],
    slot_hours: &[u32],
) -> HashMap<u32, Vec<&'a CanonicalSchedule>> {
    let mut buckets: HashMap<u32, Vec<&'a CanonicalSchedule>> =
        slot_hours.iter().map(|&hour| (hour, Vec::new())).collect();

    for schedule in day_schedules {
        if let Some(bucket) = buckets.get_mut(&schedule.departure.hour()) {
            bucket.push(schedule);
        }
    }
    buckets
}

/// Display ordering for the selected-day panel: departure ascending.
pub fn sorted_by_departure<'a>(
    schedules: &[&'a CanonicalSchedule],
) -> Vec<&'a CanonicalSchedule> {
    let mut sorted = schedules.to_vec();
    sorted.sort_by_key(|schedule| schedule.departure);
    sorted
}

/// Human-readable name for a month number.
pub fn month_name(month: u32) -> &'static str {
    match month {
        1 => "January",
        2 => "February",
        3 => "March",
        4 => "April",
        5 => "May",
        6 => "June",
        7 => "July",
        8 => "August",
        9 => "September",
        10 => "October",
        11 => "November",
        12 => "December",
        _ => "Invalid Month",
    }
}

/// 12-hour clock display, e.g. "09:00 AM".
pub fn format_time_12h(instant: DateTime<Local>) -> String {
    instant.format("%I:%M %p").to_string()
}

/// Trip length between two instants, e.g. "1h 30m".
pub fn format_duration(departure: DateTime<Local>, arrival: DateTime<Local>) -> String {
    let minutes = (arrival - departure).num_minutes().max(0);
    format!("{}h {}m", minutes / 60, minutes % 60)
}

/// Long date display, e.g. "October 5, 2025".
pub fn format_date_long(date: NaiveDate) -> String {
    format!("{} {}, {}", month_name(date.month()), date.day(), date.year())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::parse_instant;
    use crate::ScheduleStatus;

    fn test_schedule(id: &str, departure: &str, arrival: &str) -> CanonicalSchedule {
        let departure = parse_instant(departure).unwrap();
        let arrival = parse_instant(arrival).unwrap();
        CanonicalSchedule {
            id: id.to_string(),
            calendar_date: departure.date_naive(),
            departure,
            arrival,
            route_label: "Campus Loop".to_string(),
            bus_label: "UEM-01".to_string(),
            status: ScheduleStatus::Scheduled,
            passenger_count: 0,
        }
    }

    fn day(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn test_schedules_on_day_matches_local_day_not_instant() {
        // 20 minutes apart across midnight: different calendar days.
        let late = test_schedule("late", "2025-03-10T23:50:00", "2025-03-11T00:30:00");
        let early = test_schedule("early", "2025-03-11T00:10:00", "2025-03-11T01:00:00");
        let set = vec![late, early];

        let march_10 = schedules_on_day(&set, day(2025, 3, 10));
        let march_11 = schedules_on_day(&set, day(2025, 3, 11));
        assert_eq!(march_10.len(), 1);
        assert_eq!(march_10[0].id, "late");
        assert_eq!(march_11.len(), 1);
        assert_eq!(march_11[0].id, "early");
    }

    #[test]
    fn test_schedules_on_day_same_day_different_hours() {
        let morning = test_schedule("m", "2025-10-05T08:00:00", "2025-10-05T09:00:00");
        let evening = test_schedule("e", "2025-10-05T17:00:00", "2025-10-05T18:15:00");
        let set = vec![evening, morning];

        let found = schedules_on_day(&set, day(2025, 10, 5));
        assert_eq!(found.len(), 2);
        assert!(has_schedules_on_day(&set, day(2025, 10, 5)));
        assert!(!has_schedules_on_day(&set, day(2025, 10, 6)));

        let sorted = sorted_by_departure(&found);
        assert_eq!(sorted[0].id, "m");
        assert_eq!(sorted[1].id, "e");
    }

    #[test]
    fn test_month_grid_february_non_leap() {
        let grid = month_grid(2025, 2);
        // Feb 1, 2025 is a Saturday: six leading blanks.
        assert_eq!(grid.iter().take_while(|cell| cell.is_none()).count(), 6);
        assert_eq!(grid.iter().filter(|cell| cell.is_some()).count(), 28);
        assert_eq!(grid.len(), 34);
        assert_eq!(grid[6], Some(day(2025, 2, 1)));
        assert_eq!(grid.last().copied().flatten(), Some(day(2025, 2, 28)));
    }

    #[test]
    fn test_month_grid_february_leap() {
        let grid = month_grid(2024, 2);
        assert_eq!(grid.iter().filter(|cell| cell.is_some()).count(), 29);
        assert_eq!(grid.last().copied().flatten(), Some(day(2024, 2, 29)));
    }

    #[test]
    fn test_month_grid_invalid_month_is_empty() {
        assert!(month_grid(2025, 0).is_empty());
        assert!(month_grid(2025, 13).is_empty());
    }

    #[test]
    fn test_days_in_month() {
        assert_eq!(days_in_month(2025, 1), 31);
        assert_eq!(days_in_month(2025, 4), 30);
        assert_eq!(days_in_month(2025, 2), 28);
        assert_eq!(days_in_month(2024, 2), 29);
    }

    #[test]
    fn test_is_leap_year() {
        assert!(!is_leap_year(2025));
        assert!(is_leap_year(2024));
        assert!(!is_leap_year(1900));
        assert!(is_leap_year(2000));
    }

    #[test]
    fn test_shift_month_clamps_day_of_month() {
        assert_eq!(
            shift_month(day(2025, 1, 31), MonthDirection::Next),
            day(2025, 2, 28)
        );
        assert_eq!(
            shift_month(day(2025, 3, 31), MonthDirection::Previous),
            day(2025, 2, 28)
        );
        assert_eq!(
            shift_month(day(2025, 6, 15), MonthDirection::Next),
            day(2025, 7, 15)
        );
    }

    #[test]
    fn test_shift_month_year_rollover() {
        assert_eq!(
            shift_month(day(2025, 12, 10), MonthDirection::Next),
            day(2026, 1, 10)
        );
        assert_eq!(
            shift_month(day(2025, 1, 10), MonthDirection::Previous),
            day(2024, 12, 10)
        );
    }

    #[test]
    fn test_bucketize_places_by_departure_hour() {
        let schedule = test_schedule("s", "2025-10-05T14:37:00", "2025-10-05T15:30:00");
        let set = vec![&schedule];

        let buckets = bucketize(&set, &TIMELINE_SLOT_HOURS);
        assert_eq!(buckets[&14].len(), 1);
        assert_eq!(buckets[&14][0].id, "s");
        for hour in TIMELINE_SLOT_HOURS.iter().filter(|&&hour| hour != 14) {
            assert!(buckets[hour].is_empty(), "hour {hour} should be empty");
        }
    }

    #[test]
    fn test_bucketize_drops_out_of_range_departures() {
        let before_dawn = test_schedule("n", "2025-10-05T04:15:00", "2025-10-05T05:00:00");
        let evening = test_schedule("e", "2025-10-05T21:05:00", "2025-10-05T22:00:00");
        let set = vec![&before_dawn, &evening];

        let buckets = bucketize(&set, &TIMELINE_SLOT_HOURS);
        assert_eq!(buckets.len(), TIMELINE_SLOT_HOURS.len());
        assert!(buckets.values().all(|slot| slot.is_empty()));
    }

    #[test]
    fn test_bucketize_keeps_multiple_per_slot() {
        let first = test_schedule("a", "2025-10-05T10:05:00", "2025-10-05T11:00:00");
        let second = test_schedule("b", "2025-10-05T10:45:00", "2025-10-05T12:00:00");
        let set = vec![&first, &second];

        let buckets = bucketize(&set, &TIMELINE_SLOT_HOURS);
        assert_eq!(buckets[&10].len(), 2);
        assert!(buckets[&11].is_empty());
    }

    #[test]
    fn test_month_name() {
        assert_eq!(month_name(1), "January");
        assert_eq!(month_name(6), "June");
        assert_eq!(month_name(12), "December");
        assert_eq!(month_name(13), "Invalid Month");
    }

    #[test]
    fn test_format_time_12h() {
        let morning = parse_instant("2025-10-05T09:05:00").unwrap();
        let evening = parse_instant("2025-10-05T17:30:00").unwrap();
        assert_eq!(format_time_12h(morning), "09:05 AM");
        assert_eq!(format_time_12h(evening), "05:30 PM");
    }

    #[test]
    fn test_format_duration() {
        let departure = parse_instant("2025-10-05T09:00:00").unwrap();
        let arrival = parse_instant("2025-10-05T10:30:00").unwrap();
        assert_eq!(format_duration(departure, arrival), "1h 30m");
        assert_eq!(format_duration(departure, departure), "0h 0m");
    }

    #[test]
    fn test_format_date_long() {
        assert_eq!(format_date_long(day(2025, 10, 5)), "October 5, 2025");
    }
}
