//! Schedule normalization.
//!
//! The backend's schedule listing is loosely shaped: route and bus may arrive
//! as bare strings or as populated objects, and timestamps come in whatever
//! format the importing script used. This module turns that into the
//! canonical in-memory representation the calendar renders from, admitting
//! each record all-or-nothing and reporting what it dropped.

use chrono::{DateTime, Local, LocalResult, NaiveDate, NaiveDateTime, TimeZone};
use serde_json::Value;

use crate::{
    BusRef, CanonicalSchedule, RawScheduleRecord, RouteRef, ScheduleStatus, UNKNOWN_LABEL,
};

/// Why a raw record was excluded from the canonical set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// Null, non-object, or a field with a structurally impossible type.
    Malformed,
    /// `departureTime` or `arrivalTime` absent or empty.
    MissingTimes,
    BadDepartureTime,
    BadArrivalTime,
    /// Explicit `date` field present but unparseable.
    BadDate,
    /// Same-instant or inverted-order schedules are invalid.
    ArrivalNotAfterDeparture,
}

/// Per-batch diagnostics. Rejections carry the input index so a caller can
/// correlate them with the raw payload.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizeReport {
    pub accepted: usize,
    pub rejected: usize,
    pub rejections: Vec<(usize, RejectReason)>,
}

/// Result of normalizing one fetched batch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizeOutcome {
    pub schedules: Vec<CanonicalSchedule>,
    pub report: NormalizeReport,
}

/// Validate and normalize a batch of raw schedule records.
///
/// Rejection is per-record and silent: the output holds whatever subset
/// validated, in input order, down to an empty set when everything was
/// invalid. Callers decide whether an empty result from a non-empty input is
/// worth surfacing.
pub fn normalize(raw: &[Value]) -> NormalizeOutcome {
    let mut schedules = Vec::with_capacity(raw.len());
    let mut report = NormalizeReport::default();

    for (index, value) in raw.iter().enumerate() {
        match normalize_record(index, value) {
            Ok(schedule) => {
                report.accepted += 1;
                schedules.push(schedule);
            }
            Err(reason) => {
                report.rejected += 1;
                report.rejections.push((index, reason));
            }
        }
    }

    NormalizeOutcome { schedules, report }
}

fn normalize_record(index: usize, value: &Value) -> Result<CanonicalSchedule, RejectReason> {
    if !value.is_object() {
        return Err(RejectReason::Malformed);
    }
    let record: RawScheduleRecord =
        serde_json::from_value(value.clone()).map_err(|_| RejectReason::Malformed)?;

    let departure_raw = record
        .departure_time
        .as_deref()
        .filter(|raw| !raw.is_empty())
        .ok_or(RejectReason::MissingTimes)?;
    let arrival_raw = record
        .arrival_time
        .as_deref()
        .filter(|raw| !raw.is_empty())
        .ok_or(RejectReason::MissingTimes)?;

    let departure = parse_instant(departure_raw).ok_or(RejectReason::BadDepartureTime)?;
    let arrival = parse_instant(arrival_raw).ok_or(RejectReason::BadArrivalTime)?;

    let calendar_date =
        resolve_calendar_date(record.date.as_deref(), departure).ok_or(RejectReason::BadDate)?;

    if arrival <= departure {
        return Err(RejectReason::ArrivalNotAfterDeparture);
    }

    let id = record
        .id
        .clone()
        .filter(|id| !id.is_empty())
        .unwrap_or_else(|| format!("temp-{index}"));

    Ok(CanonicalSchedule {
        id,
        calendar_date,
        departure,
        arrival,
        route_label: resolve_route_label(&record),
        bus_label: resolve_bus_label(&record),
        status: ScheduleStatus::from_raw(record.status.as_deref()),
        passenger_count: coerce_passenger_count(record.passenger_count.as_ref()),
    })
}

/// Parse a backend timestamp into a local instant.
///
/// Accepts RFC 3339 (offset honored, converted to local), naive date-times
/// read as local wall-clock, and bare `YYYY-MM-DD` dates read as local
/// midnight. Total: anything else is `None`, never a panic.
pub fn parse_instant(raw: &str) -> Option<DateTime<Local>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(parsed.with_timezone(&Local));
    }

    const NAIVE_FORMATS: [&str; 4] = [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M",
    ];
    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, format) {
            return local_from_naive(naive);
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return local_from_naive(date.and_hms_opt(0, 0, 0)?);
    }

    None
}

fn local_from_naive(naive: NaiveDateTime) -> Option<DateTime<Local>> {
    match Local.from_local_datetime(&naive) {
        LocalResult::Single(instant) => Some(instant),
        // DST fold: both instants show the same wall-clock day and hour.
        LocalResult::Ambiguous(earliest, _) => Some(earliest),
        LocalResult::None => None,
    }
}

/// An explicit `date` field wins but must parse; without one the local
/// calendar-day components of the departure instant are used.
fn resolve_calendar_date(
    explicit: Option<&str>,
    departure: DateTime<Local>,
) -> Option<NaiveDate> {
    match explicit.filter(|raw| !raw.is_empty()) {
        Some(raw) => parse_instant(raw).map(|instant| instant.date_naive()),
        None => Some(departure.date_naive()),
    }
}

fn resolve_route_label(record: &RawScheduleRecord) -> String {
    let fallback = || {
        record
            .route_id
            .clone()
            .filter(|id| !id.is_empty())
            .unwrap_or_else(|| UNKNOWN_LABEL.to_string())
    };
    match &record.route {
        Some(RouteRef::Flat(name)) if !name.is_empty() => name.clone(),
        Some(RouteRef::Nested(info)) => info
            .name
            .clone()
            .filter(|name| !name.is_empty())
            .unwrap_or_else(fallback),
        _ => fallback(),
    }
}

fn resolve_bus_label(record: &RawScheduleRecord) -> String {
    let fallback = || {
        record
            .bus_id
            .clone()
            .filter(|id| !id.is_empty())
            .unwrap_or_else(|| UNKNOWN_LABEL.to_string())
    };
    match &record.bus {
        Some(BusRef::Flat(number)) if !number.is_empty() => number.clone(),
        Some(BusRef::Nested(info)) => info
            .bus_number
            .clone()
            .filter(|number| !number.is_empty())
            .unwrap_or_else(fallback),
        _ => fallback(),
    }
}

fn coerce_passenger_count(value: Option<&Value>) -> u32 {
    match value.and_then(Value::as_f64) {
        Some(count) if count > 0.0 => count as u32,
        _ => 0,
    }
}
