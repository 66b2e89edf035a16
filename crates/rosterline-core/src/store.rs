//! Read-oriented in-memory cache of assignments and booked events.
//!
//! The external load collaborator delivers whole snapshots; the store
//! replaces its contents wholesale and indexes them per staff member. A
//! failed load keeps the previous snapshot (stale but available) and raises
//! an error flag the host can surface.

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, Utc};

use crate::events::ScheduleEvent;
use crate::model::{BookedEvent, MinuteOfDay, RecurringAssignment};
use crate::resolve::{resolve, ResolvedWindow};
use crate::timeline::{compose, TimelineSegment};

/// One load's worth of data, as normalized at the wire boundary.
#[derive(Debug, Clone, Default)]
pub struct ScheduleSnapshot {
    pub assignments: Vec<RecurringAssignment>,
    pub events: Vec<BookedEvent>,
}

/// In-memory schedule index for one session.
#[derive(Debug, Default)]
pub struct ScheduleStore {
    assignments: HashMap<String, Vec<RecurringAssignment>>,
    events: HashMap<String, Vec<BookedEvent>>,
    last_loaded_at: Option<DateTime<Utc>>,
    load_failed: bool,
}

impl ScheduleStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the store's contents with a fresh snapshot. Assignment lists
    /// are sorted by anchor and event lists by start time, so queries are
    /// deterministic regardless of wire order.
    pub fn apply_snapshot(&mut self, snapshot: ScheduleSnapshot, now: DateTime<Utc>) -> ScheduleEvent {
        let assignment_count = snapshot.assignments.len();
        let event_count = snapshot.events.len();

        self.assignments.clear();
        for assignment in snapshot.assignments {
            self.assignments
                .entry(assignment.staff_id.clone())
                .or_default()
                .push(assignment);
        }
        for list in self.assignments.values_mut() {
            list.sort_by_key(|a| a.anchor_date);
        }

        self.events.clear();
        for event in snapshot.events {
            self.events
                .entry(event.staff_id.clone())
                .or_default()
                .push(event);
        }
        for list in self.events.values_mut() {
            list.sort_by_key(|e| e.start_at);
        }

        self.last_loaded_at = Some(now);
        self.load_failed = false;

        ScheduleEvent::SnapshotLoaded {
            assignments: assignment_count,
            events: event_count,
            at: now,
        }
    }

    /// Record a failed load. The previous snapshot stays queryable.
    pub fn mark_load_failed(&mut self, reason: impl Into<String>, now: DateTime<Utc>) -> ScheduleEvent {
        self.load_failed = true;
        ScheduleEvent::SnapshotLoadFailed {
            reason: reason.into(),
            at: now,
        }
    }

    pub fn load_failed(&self) -> bool {
        self.load_failed
    }

    pub fn last_loaded_at(&self) -> Option<DateTime<Utc>> {
        self.last_loaded_at
    }

    /// All recurring assignments for one staff member, sorted by anchor.
    pub fn assignments_for(&self, staff_id: &str) -> &[RecurringAssignment] {
        self.assignments
            .get(staff_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Booked events for one staff member on one UTC calendar date, sorted
    /// by start time.
    pub fn events_for(&self, staff_id: &str, date: NaiveDate) -> Vec<BookedEvent> {
        self.events
            .get(staff_id)
            .map(|list| list.iter().filter(|e| e.date() == date).cloned().collect())
            .unwrap_or_default()
    }

    /// Resolve the assignment window in effect for `staff_id` on `date`
    /// against the current snapshot.
    pub fn resolve_for(&self, staff_id: &str, date: NaiveDate) -> Option<ResolvedWindow> {
        resolve(self.assignments_for(staff_id), staff_id, date)
    }

    /// Full day timeline for one staff member: resolve, look up the
    /// weekday's shifts, and compose them with the date's bookings. Falls
    /// back to inferred mode when nothing resolves.
    pub fn day_timeline(
        &self,
        staff_id: &str,
        date: NaiveDate,
        day_start: MinuteOfDay,
        day_end: MinuteOfDay,
    ) -> Vec<TimelineSegment> {
        let window = self.resolve_for(staff_id, date);
        let shifts = window
            .as_ref()
            .map(|w| w.shifts_for(date).to_vec())
            .unwrap_or_default();
        let events = self.events_for(staff_id, date);
        compose(&shifts, &events, date, day_start, day_end)
    }

    /// Incorporate a created or updated assignment (the record returned by
    /// the persistence collaborator).
    pub fn upsert_assignment(&mut self, assignment: RecurringAssignment) {
        let list = self
            .assignments
            .entry(assignment.staff_id.clone())
            .or_default();
        list.retain(|a| a.id != assignment.id);
        list.push(assignment);
        list.sort_by_key(|a| a.anchor_date);
    }

    /// Remove an assignment from the local view (optimistic delete).
    /// Returns the removed record so it can be restored on undo or commit
    /// failure.
    pub fn remove_assignment(&mut self, id: &str) -> Option<RecurringAssignment> {
        for list in self.assignments.values_mut() {
            if let Some(pos) = list.iter().position(|a| a.id == id) {
                return Some(list.remove(pos));
            }
        }
        None
    }

    /// Put a previously removed assignment back.
    pub fn restore_assignment(&mut self, assignment: RecurringAssignment) {
        self.upsert_assignment(assignment);
    }
}
