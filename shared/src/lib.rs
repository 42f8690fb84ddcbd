use std::fmt;

use chrono::{DateTime, Local, NaiveDate};
use serde::{Deserialize, Serialize};

pub mod calendar;
pub mod normalize;

pub use normalize::{normalize, NormalizeOutcome, NormalizeReport, RejectReason};

/// Label used when neither a nested reference nor a flat id yields a display
/// name for a route or bus.
pub const UNKNOWN_LABEL: &str = "Unknown";

/// Schedule record as the backend returns it. Nothing about the shape is
/// guaranteed: every field is optional, route/bus may be a bare string or a
/// populated object, and `passengerCount` may be any JSON value. The
/// normalizer is the only consumer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawScheduleRecord {
    #[serde(alias = "_id")]
    pub id: Option<String>,
    pub date: Option<String>,
    pub departure_time: Option<String>,
    pub arrival_time: Option<String>,
    pub route: Option<RouteRef>,
    pub route_id: Option<String>,
    pub bus: Option<BusRef>,
    pub bus_id: Option<String>,
    pub status: Option<String>,
    pub passenger_count: Option<serde_json::Value>,
    pub created_at: Option<String>,
}

/// Route reference as it appears on the wire: either a bare id/name string or
/// a nested object from a populated join.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RouteRef {
    Nested(RouteInfo),
    Flat(String),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RouteInfo {
    pub id: Option<String>,
    pub name: Option<String>,
}

/// Bus reference, same string-or-object duality as [`RouteRef`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BusRef {
    Nested(BusInfo),
    Flat(String),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BusInfo {
    pub id: Option<String>,
    pub bus_number: Option<String>,
}

/// Response envelope of `GET /schedule`. The records are kept as raw JSON
/// values so that one malformed element cannot fail deserialization of the
/// whole page; the normalizer deals with each record individually.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleListResponse {
    pub schedules: Vec<serde_json::Value>,
    pub total: u64,
    pub page: u64,
    pub pages: u64,
}

/// Optional filters for `GET /schedule`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScheduleQuery {
    pub route_id: Option<String>,
    pub bus_id: Option<String>,
    pub date: Option<String>,
    pub status: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl ScheduleQuery {
    /// Render the filters as a URL query string, empty when none are set.
    pub fn to_query_string(&self) -> String {
        let mut params: Vec<String> = Vec::new();
        if let Some(route_id) = &self.route_id {
            params.push(format!("routeId={}", route_id));
        }
        if let Some(bus_id) = &self.bus_id {
            params.push(format!("busId={}", bus_id));
        }
        if let Some(date) = &self.date {
            params.push(format!("date={}", date));
        }
        if let Some(status) = &self.status {
            params.push(format!("status={}", status));
        }
        if let Some(page) = self.page {
            params.push(format!("page={}", page));
        }
        if let Some(limit) = self.limit {
            params.push(format!("limit={}", limit));
        }
        if params.is_empty() {
            String::new()
        } else {
            format!("?{}", params.join("&"))
        }
    }
}

/// Body of `POST /schedule`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateScheduleRequest {
    pub route_id: String,
    pub bus_id: String,
    pub date: String,
    pub departure_time: String,
    pub arrival_time: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frequency: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

/// Schedule lifecycle status. The backend sends free-form strings;
/// unrecognized values are preserved in `Other` so the UI can still show them
/// (with a neutral badge style) instead of dropping the record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScheduleStatus {
    Scheduled,
    InProgress,
    Completed,
    Cancelled,
    Delayed,
    Active,
    Other(String),
}

impl ScheduleStatus {
    /// Missing or empty input defaults to `Scheduled`.
    pub fn from_raw(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            None | Some("") => ScheduleStatus::Scheduled,
            Some("scheduled") => ScheduleStatus::Scheduled,
            Some("in-progress") => ScheduleStatus::InProgress,
            Some("completed") => ScheduleStatus::Completed,
            Some("cancelled") => ScheduleStatus::Cancelled,
            Some("delayed") => ScheduleStatus::Delayed,
            Some("active") => ScheduleStatus::Active,
            Some(other) => ScheduleStatus::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            ScheduleStatus::Scheduled => "scheduled",
            ScheduleStatus::InProgress => "in-progress",
            ScheduleStatus::Completed => "completed",
            ScheduleStatus::Cancelled => "cancelled",
            ScheduleStatus::Delayed => "delayed",
            ScheduleStatus::Active => "active",
            ScheduleStatus::Other(other) => other,
        }
    }

    /// Human-readable form with the first letter capitalized, e.g.
    /// "In-progress".
    pub fn label(&self) -> String {
        let raw = self.as_str();
        let mut chars = raw.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
            None => String::new(),
        }
    }
}

impl fmt::Display for ScheduleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validated, normalized schedule as held in view state. Only the normalizer
/// constructs these; both time fields are guaranteed valid with
/// `arrival > departure`, and `calendar_date` is the local day used for
/// calendar placement.
#[derive(Debug, Clone, PartialEq)]
pub struct CanonicalSchedule {
    pub id: String,
    pub calendar_date: NaiveDate,
    pub departure: DateTime<Local>,
    pub arrival: DateTime<Local>,
    pub route_label: String,
    pub bus_label: String,
    pub status: ScheduleStatus,
    pub passenger_count: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_from_raw_known_values() {
        assert_eq!(ScheduleStatus::from_raw(Some("scheduled")), ScheduleStatus::Scheduled);
        assert_eq!(ScheduleStatus::from_raw(Some("in-progress")), ScheduleStatus::InProgress);
        assert_eq!(ScheduleStatus::from_raw(Some("completed")), ScheduleStatus::Completed);
        assert_eq!(ScheduleStatus::from_raw(Some("cancelled")), ScheduleStatus::Cancelled);
        assert_eq!(ScheduleStatus::from_raw(Some("delayed")), ScheduleStatus::Delayed);
        assert_eq!(ScheduleStatus::from_raw(Some("active")), ScheduleStatus::Active);
    }

    #[test]
    fn test_status_defaults_to_scheduled() {
        assert_eq!(ScheduleStatus::from_raw(None), ScheduleStatus::Scheduled);
        assert_eq!(ScheduleStatus::from_raw(Some("")), ScheduleStatus::Scheduled);
        assert_eq!(ScheduleStatus::from_raw(Some("  ")), ScheduleStatus::Scheduled);
    }

    #[test]
    fn test_status_preserves_unrecognized_values() {
        let status = ScheduleStatus::from_raw(Some("rescheduled"));
        assert_eq!(status, ScheduleStatus::Other("rescheduled".to_string()));
        assert_eq!(status.as_str(), "rescheduled");
    }

    #[test]
    fn test_status_label_capitalizes() {
        assert_eq!(ScheduleStatus::Scheduled.label(), "Scheduled");
        assert_eq!(ScheduleStatus::InProgress.label(), "In-progress");
        assert_eq!(ScheduleStatus::Other("odd".to_string()).label(), "Odd");
    }

    #[test]
    fn test_route_ref_deserializes_flat_and_nested() {
        let flat: RouteRef = serde_json::from_value(serde_json::json!("Campus Loop")).unwrap();
        assert_eq!(flat, RouteRef::Flat("Campus Loop".to_string()));

        let nested: RouteRef =
            serde_json::from_value(serde_json::json!({"id": "r1", "name": "Campus Loop"})).unwrap();
        match nested {
            RouteRef::Nested(info) => assert_eq!(info.name.as_deref(), Some("Campus Loop")),
            RouteRef::Flat(_) => panic!("expected nested route"),
        }
    }

    #[test]
    fn test_raw_record_accepts_mongo_style_id() {
        let record: RawScheduleRecord =
            serde_json::from_value(serde_json::json!({"_id": "abc123"})).unwrap();
        assert_eq!(record.id.as_deref(), Some("abc123"));
    }

    #[test]
    fn test_raw_record_tolerates_unknown_fields() {
        let record: RawScheduleRecord = serde_json::from_value(serde_json::json!({
            "id": "s1",
            "delay": 5,
            "actualDepartureTime": "2025-10-05T09:12:00",
        }))
        .unwrap();
        assert_eq!(record.id.as_deref(), Some("s1"));
    }

    #[test]
    fn test_query_string_empty_without_filters() {
        assert_eq!(ScheduleQuery::default().to_query_string(), "");
    }

    #[test]
    fn test_query_string_joins_filters() {
        let query = ScheduleQuery {
            route_id: Some("r1".to_string()),
            status: Some("scheduled".to_string()),
            limit: Some(50),
            ..ScheduleQuery::default()
        };
        assert_eq!(query.to_query_string(), "?routeId=r1&status=scheduled&limit=50");
    }

    #[test]
    fn test_create_request_skips_absent_optionals() {
        let request = CreateScheduleRequest {
            route_id: "r1".to_string(),
            bus_id: "b1".to_string(),
            date: "2025-10-05".to_string(),
            departure_time: "2025-10-05T09:00:00".to_string(),
            arrival_time: "2025-10-05T10:30:00".to_string(),
            frequency: None,
            status: None,
        };
        let value = serde_json::to_value(&request).unwrap();
        let object = value.as_object().unwrap();
        assert!(object.contains_key("routeId"));
        assert!(object.contains_key("departureTime"));
        assert!(!object.contains_key("frequency"));
        assert!(!object.contains_key("status"));
    }
}
