//! End-to-end flow over the public API: wire load, snapshot, resolution,
//! day composition, and optimistic delete against a repository.

use chrono::{Duration, NaiveDate, TimeZone, Utc};
use serde_json::json;

use rosterline_core::{
    normalize_assignments, normalize_events, DeferredDeleteCoordinator, PersistenceError,
    Provenance, ScheduleRepository, ScheduleSnapshot, ScheduleStore, SegmentKind, WireAssignment,
};

/// Test double for the external persistence collaborator.
#[derive(Default)]
struct RecordingRepository {
    deleted: Vec<String>,
    fail_next_delete: bool,
}

impl ScheduleRepository for RecordingRepository {
    fn list(&self, _staff_id: &str) -> Result<Vec<WireAssignment>, PersistenceError> {
        Ok(Vec::new())
    }

    fn create(&mut self, payload: &WireAssignment) -> Result<WireAssignment, PersistenceError> {
        Ok(payload.clone())
    }

    fn update(
        &mut self,
        _id: &str,
        payload: &WireAssignment,
    ) -> Result<WireAssignment, PersistenceError> {
        Ok(payload.clone())
    }

    fn delete(&mut self, id: &str) -> Result<(), PersistenceError> {
        if self.fail_next_delete {
            self.fail_next_delete = false;
            return Err(PersistenceError::Request("gateway timeout".into()));
        }
        self.deleted.push(id.to_string());
        Ok(())
    }
}

fn loaded_store() -> ScheduleStore {
    let assignments_payload = json!({
        "data": [
            {
                "id": "a1",
                "staffId": "s1",
                "weekStart": "2025-01-06",
                "pattern": [
                    {"day": "MONDAY", "shifts": [{"start": "09:00", "end": "17:00"}]},
                    {"day": "TUESDAY", "shifts": [{"start": "09:00", "end": "13:00"}]}
                ]
            },
            {
                "id": "a2",
                "staffId": "s1",
                "weekStart": "2025-01-20",
                "pattern": [
                    {"day": "MONDAY", "shifts": [{"start": "12:00", "end": "20:00"}]}
                ]
            }
        ]
    });
    let events_payload = json!([
        {
            "id": "e1",
            "staffId": "s1",
            "label": "consultation",
            "scheduledTime": "2025-01-06T10:00:00Z",
            "endTime": "2025-01-06T10:45:00Z"
        },
        {
            "id": "e2",
            "staffId": "s1",
            "label": "walk-in",
            "scheduledTime": "2025-02-05T14:00:00Z",
            "estimatedMinutes": 30
        }
    ]);

    let now = Utc.with_ymd_and_hms(2025, 1, 6, 8, 0, 0).unwrap();
    let (assignments, reports) = normalize_assignments(&assignments_payload, now);
    assert!(reports.is_empty());
    let (events, reports) = normalize_events(&events_payload, now);
    assert!(reports.is_empty());

    let mut store = ScheduleStore::new();
    store.apply_snapshot(ScheduleSnapshot { assignments, events }, now);
    store
}

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

#[test]
fn resolves_and_composes_through_the_store() {
    let store = loaded_store();

    // Week of Jan 6: a1 in effect, superseded from Jan 20
    let window = store.resolve_for("s1", d(2025, 1, 7)).unwrap();
    assert_eq!(window.assignment.id, "a1");
    assert_eq!(window.active_until, d(2025, 1, 19));

    let segments = store.day_timeline("s1", d(2025, 1, 6), 480, 1200);
    // Shift plus the booked consultation, both assigned-mode
    assert_eq!(segments.len(), 2);
    assert!(segments.iter().any(|s| s.kind == SegmentKind::Booked));
    assert!(segments.iter().all(|s| s.provenance == Provenance::Assigned));

    // February: a2's window lapsed with January, so the walk-in renders on
    // an inferred-mode day
    assert!(store.resolve_for("s1", d(2025, 2, 5)).is_none());
    let segments = store.day_timeline("s1", d(2025, 2, 5), 480, 1200);
    assert!(segments
        .iter()
        .any(|s| s.kind == SegmentKind::Work && s.provenance == Provenance::Inferred));
    let booked = segments.iter().find(|s| s.kind == SegmentKind::Booked).unwrap();
    assert_eq!(booked.label.as_deref(), Some("walk-in"));
}

#[test]
fn optimistic_delete_commits_to_the_repository() {
    let mut store = loaded_store();
    let mut coordinator = DeferredDeleteCoordinator::new();
    let mut repo = RecordingRepository::default();
    let now = Utc.with_ymd_and_hms(2025, 1, 6, 12, 0, 0).unwrap();

    let removed = store.remove_assignment("a2").unwrap();
    coordinator.request_delete(removed, now);

    // Gone from the local view immediately: a1's window now runs to month end
    let window = store.resolve_for("s1", d(2025, 1, 7)).unwrap();
    assert_eq!(window.active_until, d(2025, 1, 31));

    // Undo window still open: nothing reaches the repository
    let outcomes = coordinator.tick(now + Duration::seconds(5), |a| repo.delete(&a.id));
    assert!(outcomes.is_empty());
    assert!(repo.deleted.is_empty());

    let outcomes = coordinator.tick(now + Duration::seconds(9), |a| repo.delete(&a.id));
    assert_eq!(outcomes.len(), 1);
    assert_eq!(repo.deleted, vec!["a2".to_string()]);
}

#[test]
fn undo_restores_the_local_view() {
    let mut store = loaded_store();
    let mut coordinator = DeferredDeleteCoordinator::new();
    let now = Utc.with_ymd_and_hms(2025, 1, 6, 12, 0, 0).unwrap();

    let removed = store.remove_assignment("a2").unwrap();
    coordinator.request_delete(removed, now);

    let restored = coordinator.undo("a2", now + Duration::seconds(3)).unwrap();
    store.restore_assignment(restored);

    let window = store.resolve_for("s1", d(2025, 1, 20)).unwrap();
    assert_eq!(window.assignment.id, "a2");
}

#[test]
fn failed_commit_restores_the_local_view() {
    let mut store = loaded_store();
    let mut coordinator = DeferredDeleteCoordinator::new();
    let mut repo = RecordingRepository {
        fail_next_delete: true,
        ..Default::default()
    };
    let now = Utc.with_ymd_and_hms(2025, 1, 6, 12, 0, 0).unwrap();

    let removed = store.remove_assignment("a2").unwrap();
    coordinator.request_delete(removed, now);

    let outcomes = coordinator.tick(now + Duration::seconds(9), |a| repo.delete(&a.id));
    for outcome in outcomes {
        if let rosterline_core::CommitOutcome::Failed { assignment, .. } = outcome {
            store.restore_assignment(assignment);
        }
    }

    assert!(repo.deleted.is_empty());
    assert!(store.resolve_for("s1", d(2025, 1, 20)).is_some());
}
