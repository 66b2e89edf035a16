//! Observability events for state changes in the scheduling core.
//!
//! The host polls or drains these to drive toasts, warnings, and data-quality
//! reporting; the core never renders anything itself.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ScheduleEvent {
    /// A fresh snapshot replaced the store's contents.
    SnapshotLoaded {
        assignments: usize,
        events: usize,
        at: DateTime<Utc>,
    },
    /// A load failed; the previous snapshot stays in place.
    SnapshotLoadFailed {
        reason: String,
        at: DateTime<Utc>,
    },
    /// An assignment was optimistically removed; undo is open until
    /// `deadline`.
    DeleteRequested {
        id: String,
        deadline: DateTime<Utc>,
        at: DateTime<Utc>,
    },
    /// The operator undid a pending delete before its deadline.
    DeleteUndone {
        id: String,
        at: DateTime<Utc>,
    },
    /// A pending delete reached the persistence collaborator.
    DeleteCommitted {
        id: String,
        at: DateTime<Utc>,
    },
    /// The persistence collaborator refused a delete; the assignment was
    /// restored locally.
    DeleteCommitFailed {
        id: String,
        reason: String,
        at: DateTime<Utc>,
    },
    /// A stored pattern failed validation on load and was degraded to an
    /// empty pattern for that assignment.
    MalformedPattern {
        assignment_id: String,
        reason: String,
        at: DateTime<Utc>,
    },
    /// A booked-event record could not be read off the wire and was
    /// skipped.
    MalformedEvent {
        event_id: String,
        reason: String,
        at: DateTime<Utc>,
    },
}
