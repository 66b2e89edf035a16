//! Composition of one day's ordered timeline from resolved shifts and
//! booked events.
//!
//! Two modes, chosen by whether any validated shifts exist for the date:
//! assigned mode renders shifts verbatim next to bookings (overlaps kept,
//! rendered stacked — a booking outside any shift is a visible anomaly, not
//! an error), inferred mode tiles the whole day around the bookings with
//! synthesized work blocks. Pure functions; safe to call on every render.

use chrono::{NaiveDate, Timelike};

use crate::model::{BookedEvent, MinuteOfDay, ShiftInterval};
use crate::timeline::TimelineSegment;

/// Project a booked event onto `date` as a `[start, end)` minute range
/// clamped to `[day_start, day_end]`. Events that started on an earlier day
/// run from `day_start`; events ending on a later day run to `day_end`.
/// Returns `None` when the event does not touch the window.
fn project_event(
    event: &BookedEvent,
    date: NaiveDate,
    day_start: MinuteOfDay,
    day_end: MinuteOfDay,
) -> Option<(MinuteOfDay, MinuteOfDay)> {
    let minute_of = |dt: chrono::DateTime<chrono::Utc>| -> MinuteOfDay {
        (dt.hour() * 60 + dt.minute()) as MinuteOfDay
    };

    let start_date = event.start_at.date_naive();
    let end_date = event.end_at.date_naive();
    if start_date > date || end_date < date {
        return None;
    }

    let raw_start = if start_date < date { day_start } else { minute_of(event.start_at) };
    let raw_end = if end_date > date { day_end } else { minute_of(event.end_at) };

    let start = raw_start.clamp(day_start, day_end);
    let end = raw_end.clamp(day_start, day_end);
    (start < end).then_some((start, end))
}

/// Compose the day timeline for `date`.
///
/// `shifts` are the validated intervals WindowResolver produced for the
/// date's weekday (possibly empty); `events` are the same staff member's
/// bookings for the same date. With shifts present every shift becomes a
/// `Work`/`Assigned` segment and every booking a `Booked` segment, sorted by
/// start with overlaps retained. With no shifts the bookings are tiled into
/// `[day_start, day_end)` with `Work`/`Inferred` filler so the output covers
/// the window with no gaps and no overlaps.
pub fn compose(
    shifts: &[ShiftInterval],
    events: &[BookedEvent],
    date: NaiveDate,
    day_start: MinuteOfDay,
    day_end: MinuteOfDay,
) -> Vec<TimelineSegment> {
    if shifts.is_empty() {
        compose_inferred(events, date, day_start, day_end)
    } else {
        compose_assigned(shifts, events, date, day_start, day_end)
    }
}

fn compose_assigned(
    shifts: &[ShiftInterval],
    events: &[BookedEvent],
    date: NaiveDate,
    day_start: MinuteOfDay,
    day_end: MinuteOfDay,
) -> Vec<TimelineSegment> {
    let mut segments = Vec::with_capacity(shifts.len() + events.len());

    for shift in shifts {
        let start = shift.start.clamp(day_start, day_end);
        let end = shift.end.clamp(day_start, day_end);
        if start < end {
            segments.push(TimelineSegment::work_assigned(start, end));
        }
    }

    for event in events {
        if let Some((start, end)) = project_event(event, date, day_start, day_end) {
            segments.push(TimelineSegment::booked(start, end, event.label.clone()));
        }
    }

    segments.sort_by_key(|s| (s.start, s.end));
    segments
}

fn compose_inferred(
    events: &[BookedEvent],
    date: NaiveDate,
    day_start: MinuteOfDay,
    day_end: MinuteOfDay,
) -> Vec<TimelineSegment> {
    let mut projected: Vec<(MinuteOfDay, MinuteOfDay, &BookedEvent)> = events
        .iter()
        .filter_map(|e| project_event(e, date, day_start, day_end).map(|(s, t)| (s, t, e)))
        .collect();
    projected.sort_by_key(|(start, end, _)| (*start, *end));

    let mut segments = Vec::with_capacity(projected.len() * 2 + 1);
    let mut cursor = day_start;

    for (start, end, event) in projected {
        // Swallowed by an earlier, longer booking
        if end <= cursor {
            continue;
        }
        if start > cursor {
            segments.push(TimelineSegment::work_inferred(cursor, start));
        }
        // Trim the front of an overlapping booking so the tiling stays exact
        let booked_start = start.max(cursor);
        segments.push(TimelineSegment::booked(booked_start, end, event.label.clone()));
        cursor = end;
    }

    if cursor < day_end {
        segments.push(TimelineSegment::work_inferred(cursor, day_end));
    }
    segments
}
