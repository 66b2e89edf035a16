//! Error types for rosterline-core.
//!
//! Everything here is local-recoverable: validation failures reject an edit
//! and keep prior state, persistence failures keep the in-memory snapshot
//! intact for retry. Nothing in this taxonomy should be fatal to the host.

use thiserror::Error;

use crate::model::Weekday;

/// Rejections produced by the shift validator before any mutation reaches
/// the store. Each variant names the offending weekday so the host can point
/// the operator at the exact row.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// An interval's start or end is not strict zero-padded 24-hour `HH:MM`.
    #[error("malformed HH:MM time on {0:?}")]
    BadFormat(Weekday),

    /// An interval ends at or before it starts.
    #[error("interval ends at or before it starts on {0:?}")]
    InvertedInterval(Weekday),

    /// Two intervals on the same weekday overlap.
    #[error("overlapping intervals on {0:?}")]
    Overlap(Weekday),

    /// No weekday carries any interval.
    #[error("pattern has no shifts on any weekday")]
    Empty,
}

impl ValidationError {
    /// The weekday the rejection points at, if the rule is weekday-scoped.
    pub fn weekday(&self) -> Option<Weekday> {
        match self {
            Self::BadFormat(d) | Self::InvertedInterval(d) | Self::Overlap(d) => Some(*d),
            Self::Empty => None,
        }
    }
}

/// Failure reported by the external persistence collaborator during
/// create/update/delete. The core never retries on its own; it restores
/// local state and surfaces the failure.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PersistenceError {
    /// The request never completed (network/storage outage).
    #[error("persistence request failed: {0}")]
    Request(String),

    /// The backend completed the request and refused it.
    #[error("backend rejected '{id}': {reason}")]
    Rejected { id: String, reason: String },
}

/// Crate-level error for callers that want a single type.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("persistence error: {0}")]
    Persistence(#[from] PersistenceError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for CoreError.
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
