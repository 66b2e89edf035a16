//! Optimistic delete with an undo window.
//!
//! An assignment delete is removed from the local view immediately and only
//! reaches the persistence collaborator once its undo deadline passes. No
//! background thread: deadlines are wall-clock timestamps compared against a
//! caller-supplied `now` on every `tick`, so the host's event loop drives
//! commits and tests control time exactly.
//!
//! ## State per id
//!
//! ```text
//! PendingDelete -> Committed  (deadline passed, or flush)
//!               -> Restored   (undo before the deadline)
//! ```
//!
//! `undo` after commit is an idempotent no-op. Commit failure hands the
//! assignment back to the caller for local restoration. Any number of
//! deletes may be pending at once, each with its own deadline.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Duration, Utc};

use crate::error::PersistenceError;
use crate::events::ScheduleEvent;
use crate::model::RecurringAssignment;

/// Default undo window.
pub const DEFAULT_UNDO_WINDOW_SECS: i64 = 8;

#[derive(Debug, Clone)]
struct PendingDelete {
    assignment: RecurringAssignment,
    deadline: DateTime<Utc>,
}

/// Result of one attempted commit during `tick` or `flush`.
#[derive(Debug)]
pub enum CommitOutcome {
    /// The delete reached the persistence collaborator.
    Committed { id: String },
    /// The persistence collaborator failed; the assignment is handed back
    /// so the caller can restore it in the local view.
    Failed {
        assignment: RecurringAssignment,
        error: PersistenceError,
    },
}

/// Coordinator for optimistic deletes over one collection. One instance per
/// collection; concurrent pending deletes are tracked by id.
#[derive(Debug)]
pub struct DeferredDeleteCoordinator {
    undo_window: Duration,
    pending: HashMap<String, PendingDelete>,
    committed: HashSet<String>,
    events: Vec<ScheduleEvent>,
}

impl Default for DeferredDeleteCoordinator {
    fn default() -> Self {
        Self::new()
    }
}

impl DeferredDeleteCoordinator {
    pub fn new() -> Self {
        Self::with_undo_window(Duration::seconds(DEFAULT_UNDO_WINDOW_SECS))
    }

    pub fn with_undo_window(window: Duration) -> Self {
        Self {
            undo_window: window,
            pending: HashMap::new(),
            committed: HashSet::new(),
            events: Vec::new(),
        }
    }

    pub fn undo_window(&self) -> Duration {
        self.undo_window
    }

    /// Begin an optimistic delete. The caller removes the assignment from
    /// its local view first (e.g. `ScheduleStore::remove_assignment`) and
    /// parks the record here; the undo deadline is returned.
    pub fn request_delete(
        &mut self,
        assignment: RecurringAssignment,
        now: DateTime<Utc>,
    ) -> DateTime<Utc> {
        let deadline = now + self.undo_window;
        self.events.push(ScheduleEvent::DeleteRequested {
            id: assignment.id.clone(),
            deadline,
            at: now,
        });
        self.pending.insert(
            assignment.id.clone(),
            PendingDelete {
                assignment,
                deadline,
            },
        );
        deadline
    }

    /// Undo a pending delete. Returns the parked assignment for restoration
    /// when the delete was still pending; `None` (no-op) when the id was
    /// already committed, never requested, or already undone. No persistence
    /// call is ever issued for an undone delete.
    pub fn undo(&mut self, id: &str, now: DateTime<Utc>) -> Option<RecurringAssignment> {
        let entry = self.pending.remove(id)?;
        self.events.push(ScheduleEvent::DeleteUndone {
            id: id.to_string(),
            at: now,
        });
        Some(entry.assignment)
    }

    pub fn is_pending(&self, id: &str) -> bool {
        self.pending.contains_key(id)
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Commit every pending delete whose deadline has passed. `commit` is
    /// the real delete mutation against the persistence collaborator; its
    /// failures surface as [`CommitOutcome::Failed`] with the assignment
    /// returned for local restoration.
    pub fn tick<F>(&mut self, now: DateTime<Utc>, commit: F) -> Vec<CommitOutcome>
    where
        F: FnMut(&RecurringAssignment) -> Result<(), PersistenceError>,
    {
        self.commit_where(now, |entry| entry.deadline <= now, commit)
    }

    /// Commit every pending delete regardless of deadline. Called when the
    /// hosting view closes without an undo.
    pub fn flush<F>(&mut self, now: DateTime<Utc>, commit: F) -> Vec<CommitOutcome>
    where
        F: FnMut(&RecurringAssignment) -> Result<(), PersistenceError>,
    {
        self.commit_where(now, |_| true, commit)
    }

    fn commit_where<P, F>(&mut self, now: DateTime<Utc>, ready: P, mut commit: F) -> Vec<CommitOutcome>
    where
        P: Fn(&PendingDelete) -> bool,
        F: FnMut(&RecurringAssignment) -> Result<(), PersistenceError>,
    {
        let mut due: Vec<String> = self
            .pending
            .iter()
            .filter(|(_, entry)| ready(entry))
            .map(|(id, _)| id.clone())
            .collect();
        // Deterministic commit order despite the hash map
        due.sort_by_key(|id| (self.pending[id].deadline, id.clone()));

        let mut outcomes = Vec::with_capacity(due.len());
        for id in due {
            let Some(entry) = self.pending.remove(&id) else {
                continue;
            };
            match commit(&entry.assignment) {
                Ok(()) => {
                    self.committed.insert(id.clone());
                    self.events.push(ScheduleEvent::DeleteCommitted {
                        id: id.clone(),
                        at: now,
                    });
                    outcomes.push(CommitOutcome::Committed { id });
                }
                Err(error) => {
                    self.events.push(ScheduleEvent::DeleteCommitFailed {
                        id: id.clone(),
                        reason: error.to_string(),
                        at: now,
                    });
                    outcomes.push(CommitOutcome::Failed {
                        assignment: entry.assignment,
                        error,
                    });
                }
            }
        }
        outcomes
    }

    /// Drain buffered lifecycle events for the host to surface.
    pub fn drain_events(&mut self) -> Vec<ScheduleEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::WeeklyPattern;
    use chrono::TimeZone;

    fn assignment(id: &str) -> RecurringAssignment {
        let mut a = RecurringAssignment::new(
            "s1",
            chrono::NaiveDate::from_ymd_opt(2025, 1, 6).unwrap(),
            WeeklyPattern::empty(),
        );
        a.id = id.to_string();
        a
    }

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 6, 12, 0, 0).unwrap()
    }

    #[test]
    fn undo_before_deadline_restores_without_persistence() {
        let mut coordinator = DeferredDeleteCoordinator::new();
        let now = t0();
        coordinator.request_delete(assignment("7"), now);

        let restored = coordinator.undo("7", now + Duration::seconds(3));
        assert_eq!(restored.unwrap().id, "7");
        assert!(!coordinator.is_pending("7"));

        // No commit may fire later, even well past the deadline
        let outcomes = coordinator.tick(now + Duration::seconds(60), |_| {
            panic!("no persistence call expected after undo")
        });
        assert!(outcomes.is_empty());
    }

    #[test]
    fn undo_after_commit_is_a_no_op() {
        let mut coordinator = DeferredDeleteCoordinator::new();
        let now = t0();
        coordinator.request_delete(assignment("7"), now);

        let outcomes = coordinator.tick(now + Duration::seconds(9), |_| Ok(()));
        assert!(matches!(&outcomes[..], [CommitOutcome::Committed { id }] if id == "7"));

        assert!(coordinator.undo("7", now + Duration::seconds(10)).is_none());
        // Idempotent: asking again changes nothing
        assert!(coordinator.undo("7", now + Duration::seconds(11)).is_none());
    }

    #[test]
    fn tick_before_deadline_commits_nothing() {
        let mut coordinator = DeferredDeleteCoordinator::new();
        let now = t0();
        coordinator.request_delete(assignment("7"), now);

        let outcomes = coordinator.tick(now + Duration::seconds(7), |_| Ok(()));
        assert!(outcomes.is_empty());
        assert!(coordinator.is_pending("7"));
    }

    #[test]
    fn commit_failure_hands_assignment_back() {
        let mut coordinator = DeferredDeleteCoordinator::new();
        let now = t0();
        coordinator.request_delete(assignment("7"), now);

        let outcomes = coordinator.tick(now + Duration::seconds(9), |_| {
            Err(PersistenceError::Request("connection reset".into()))
        });
        match &outcomes[..] {
            [CommitOutcome::Failed { assignment, .. }] => assert_eq!(assignment.id, "7"),
            other => panic!("unexpected outcomes: {other:?}"),
        }
        // Not committed: but also no longer pending; the caller restored it
        assert!(!coordinator.is_pending("7"));
    }

    #[test]
    fn independent_timers_per_id() {
        let mut coordinator = DeferredDeleteCoordinator::new();
        let now = t0();
        coordinator.request_delete(assignment("a"), now);
        coordinator.request_delete(assignment("b"), now + Duration::seconds(5));

        let outcomes = coordinator.tick(now + Duration::seconds(9), |_| Ok(()));
        assert_eq!(outcomes.len(), 1);
        assert!(coordinator.is_pending("b"));

        let outcomes = coordinator.tick(now + Duration::seconds(14), |_| Ok(()));
        assert_eq!(outcomes.len(), 1);
        assert_eq!(coordinator.pending_count(), 0);
    }

    #[test]
    fn flush_commits_pending_regardless_of_deadline() {
        let mut coordinator = DeferredDeleteCoordinator::new();
        let now = t0();
        coordinator.request_delete(assignment("a"), now);
        coordinator.request_delete(assignment("b"), now);

        let outcomes = coordinator.flush(now + Duration::seconds(1), |_| Ok(()));
        assert_eq!(outcomes.len(), 2);
        assert_eq!(coordinator.pending_count(), 0);
    }

    #[test]
    fn lifecycle_events_are_buffered_in_order() {
        let mut coordinator = DeferredDeleteCoordinator::new();
        let now = t0();
        coordinator.request_delete(assignment("a"), now);
        coordinator.undo("a", now + Duration::seconds(1));
        coordinator.request_delete(assignment("b"), now + Duration::seconds(2));
        coordinator.tick(now + Duration::seconds(30), |_| Ok(()));

        let events = coordinator.drain_events();
        let kinds: Vec<&str> = events
            .iter()
            .map(|e| match e {
                ScheduleEvent::DeleteRequested { .. } => "requested",
                ScheduleEvent::DeleteUndone { .. } => "undone",
                ScheduleEvent::DeleteCommitted { .. } => "committed",
                ScheduleEvent::DeleteCommitFailed { .. } => "failed",
                _ => "other",
            })
            .collect();
        assert_eq!(kinds, vec!["requested", "undone", "requested", "committed"]);
        assert!(coordinator.drain_events().is_empty());
    }
}
