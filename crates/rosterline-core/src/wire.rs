//! Wire boundary: payload shapes, normalization, and the persistence seam.
//!
//! Backend responses are sometimes a bare JSON array and sometimes a wrapped
//! object; this module is the single place that branches on shape. Every
//! stored pattern runs through the validator here, so a corrupt record
//! degrades to an empty pattern for that assignment — reported, never
//! silently swallowed, and never able to block resolution for other staff.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::PersistenceError;
use crate::events::ScheduleEvent;
use crate::model::{BookedEvent, RecurringAssignment, Weekday, WeeklyPattern};
use crate::validate::{validate_pattern, RawInterval, RawPattern};

/// Minutes an event is assumed to take when the wire carries neither
/// `endTime` nor `estimatedMinutes`.
const FALLBACK_EVENT_MINUTES: i64 = 30;

/// One interval on the wire, `"HH:MM"` strings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WireInterval {
    pub start: String,
    pub end: String,
}

/// One weekday's shifts on the wire. Days absent from the array have no
/// shifts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WireDayShifts {
    pub day: String,
    pub shifts: Vec<WireInterval>,
}

/// A recurring assignment as transmitted to and from the backing store.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireAssignment {
    pub id: String,
    pub staff_id: String,
    /// ISO calendar date `YYYY-MM-DD`.
    pub week_start: String,
    #[serde(default)]
    pub pattern: Vec<WireDayShifts>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// A booked event as produced by the appointment collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireEvent {
    pub id: String,
    pub staff_id: String,
    #[serde(default)]
    pub label: Option<String>,
    /// ISO-8601 timestamp.
    pub scheduled_time: String,
    #[serde(default)]
    pub end_time: Option<String>,
    #[serde(default)]
    pub estimated_minutes: Option<i64>,
}

/// The interface the external persistence collaborator must expose. All
/// failures propagate as [`PersistenceError`]; the core restores local
/// state and surfaces them rather than crashing.
pub trait ScheduleRepository {
    fn list(&self, staff_id: &str) -> Result<Vec<WireAssignment>, PersistenceError>;
    fn create(&mut self, payload: &WireAssignment) -> Result<WireAssignment, PersistenceError>;
    fn update(
        &mut self,
        id: &str,
        payload: &WireAssignment,
    ) -> Result<WireAssignment, PersistenceError>;
    fn delete(&mut self, id: &str) -> Result<(), PersistenceError>;
}

/// Accept both a bare array and the wrapped-object response shapes seen in
/// the wild. Everything downstream only ever sees the array.
fn unwrap_collection(value: &Value) -> &[Value] {
    if let Some(array) = value.as_array() {
        return array;
    }
    for key in ["data", "items", "content"] {
        if let Some(array) = value.get(key).and_then(Value::as_array) {
            return array;
        }
    }
    &[]
}

fn record_id(raw: &Value) -> String {
    raw.get("id")
        .and_then(Value::as_str)
        .unwrap_or("<unknown>")
        .to_string()
}

/// Convert a wire pattern into the validator's input shape. Unknown day
/// names fail the whole pattern so the record degrades rather than losing
/// days silently.
fn raw_pattern(days: &[WireDayShifts]) -> Result<RawPattern, String> {
    let mut raw = RawPattern::new();
    for entry in days {
        let weekday = Weekday::from_wire(&entry.day)
            .ok_or_else(|| format!("unknown day name '{}'", entry.day))?;
        raw.entry(weekday).or_insert_with(Vec::new).extend(
            entry.shifts.iter().map(|s| RawInterval {
                start: s.start.clone(),
                end: s.end.clone(),
            }),
        );
    }
    Ok(raw)
}

/// Normalize a loaded assignment collection into typed records.
///
/// One bad record never drops the batch: an unreadable envelope or
/// unparseable anchor date skips that record, and a pattern failing
/// validation keeps the assignment with an empty pattern. Every degradation
/// is reported as a [`ScheduleEvent`].
pub fn normalize_assignments(
    value: &Value,
    now: DateTime<Utc>,
) -> (Vec<RecurringAssignment>, Vec<ScheduleEvent>) {
    let mut assignments = Vec::new();
    let mut reports = Vec::new();

    for raw in unwrap_collection(value) {
        let wire: WireAssignment = match serde_json::from_value(raw.clone()) {
            Ok(wire) => wire,
            Err(err) => {
                reports.push(ScheduleEvent::MalformedPattern {
                    assignment_id: record_id(raw),
                    reason: format!("unreadable record: {err}"),
                    at: now,
                });
                continue;
            }
        };

        let anchor = match NaiveDate::parse_from_str(&wire.week_start, "%Y-%m-%d") {
            Ok(date) => date,
            Err(err) => {
                reports.push(ScheduleEvent::MalformedPattern {
                    assignment_id: wire.id.clone(),
                    reason: format!("bad weekStart '{}': {err}", wire.week_start),
                    at: now,
                });
                continue;
            }
        };

        let pattern = match raw_pattern(&wire.pattern).and_then(|raw| {
            validate_pattern(&raw).map_err(|e| e.to_string())
        }) {
            Ok(pattern) => pattern,
            Err(reason) => {
                reports.push(ScheduleEvent::MalformedPattern {
                    assignment_id: wire.id.clone(),
                    reason,
                    at: now,
                });
                WeeklyPattern::empty()
            }
        };

        let mut assignment = RecurringAssignment::new(wire.staff_id, anchor, pattern);
        assignment.id = wire.id;
        assignment.service_id = wire.service_id;
        assignment.branch_id = wire.branch_id;
        assignment.notes = wire.notes;
        assignments.push(assignment);
    }

    (assignments, reports)
}

/// Normalize a loaded event collection. Events with no `endTime` get their
/// duration from `estimatedMinutes`, falling back to a visible default;
/// unreadable records are skipped and reported.
pub fn normalize_events(value: &Value, now: DateTime<Utc>) -> (Vec<BookedEvent>, Vec<ScheduleEvent>) {
    let mut events = Vec::new();
    let mut reports = Vec::new();

    for raw in unwrap_collection(value) {
        let wire: WireEvent = match serde_json::from_value(raw.clone()) {
            Ok(wire) => wire,
            Err(err) => {
                reports.push(ScheduleEvent::MalformedEvent {
                    event_id: record_id(raw),
                    reason: format!("unreadable record: {err}"),
                    at: now,
                });
                continue;
            }
        };

        let start_at = match parse_timestamp(&wire.scheduled_time) {
            Ok(ts) => ts,
            Err(reason) => {
                reports.push(ScheduleEvent::MalformedEvent {
                    event_id: wire.id.clone(),
                    reason,
                    at: now,
                });
                continue;
            }
        };

        let end_at = match &wire.end_time {
            Some(raw_end) => match parse_timestamp(raw_end) {
                Ok(ts) => ts,
                Err(reason) => {
                    reports.push(ScheduleEvent::MalformedEvent {
                        event_id: wire.id.clone(),
                        reason,
                        at: now,
                    });
                    continue;
                }
            },
            None => {
                let minutes = wire.estimated_minutes.unwrap_or(FALLBACK_EVENT_MINUTES);
                start_at + chrono::Duration::minutes(minutes.max(1))
            }
        };

        if end_at <= start_at {
            reports.push(ScheduleEvent::MalformedEvent {
                event_id: wire.id.clone(),
                reason: "event ends at or before it starts".to_string(),
                at: now,
            });
            continue;
        }

        events.push(BookedEvent {
            id: wire.id,
            staff_id: wire.staff_id,
            start_at,
            end_at,
            label: wire.label.unwrap_or_default(),
        });
    }

    (events, reports)
}

fn parse_timestamp(s: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(s)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|err| format!("bad timestamp '{s}': {err}"))
}

/// Serialize a validated pattern for create/update payloads. Only weekdays
/// with shifts appear, matching the load shape.
pub fn pattern_to_wire(pattern: &WeeklyPattern) -> Vec<WireDayShifts> {
    pattern
        .iter()
        .filter(|(_, shifts)| !shifts.is_empty())
        .map(|(weekday, shifts)| WireDayShifts {
            day: weekday.as_str().to_string(),
            shifts: shifts
                .iter()
                .map(|s| WireInterval {
                    start: format_minute(s.start),
                    end: format_minute(s.end),
                })
                .collect(),
        })
        .collect()
}

/// Build the wire payload for one assignment.
pub fn assignment_to_wire(assignment: &RecurringAssignment) -> WireAssignment {
    WireAssignment {
        id: assignment.id.clone(),
        staff_id: assignment.staff_id.clone(),
        week_start: assignment.anchor_date.format("%Y-%m-%d").to_string(),
        pattern: pattern_to_wire(&assignment.pattern),
        service_id: assignment.service_id.clone(),
        branch_id: assignment.branch_id.clone(),
        notes: assignment.notes.clone(),
    }
}

fn format_minute(m: crate::model::MinuteOfDay) -> String {
    format!("{:02}:{:02}", m / 60, m % 60)
}
