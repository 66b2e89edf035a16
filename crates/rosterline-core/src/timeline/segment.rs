//! Day-timeline segment types.

use serde::{Deserialize, Serialize};

use crate::model::MinuteOfDay;

/// What a segment represents on the day track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SegmentKind {
    Work,
    Booked,
    Gap,
}

impl SegmentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Work => "work",
            Self::Booked => "booked",
            Self::Gap => "gap",
        }
    }
}

/// Whether a segment comes from a validated recurring assignment or was
/// synthesized to fill the day around appointments when no assignment
/// applies. Inferred segments are a rendering artifact and are never
/// written back to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provenance {
    Assigned,
    Inferred,
}

/// One contiguous, typed piece of a single day's timeline. Recomputed per
/// render; never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineSegment {
    pub kind: SegmentKind,
    pub start: MinuteOfDay,
    pub end: MinuteOfDay,
    pub label: Option<String>,
    pub provenance: Provenance,
}

impl TimelineSegment {
    pub fn work_assigned(start: MinuteOfDay, end: MinuteOfDay) -> Self {
        Self {
            kind: SegmentKind::Work,
            start,
            end,
            label: None,
            provenance: Provenance::Assigned,
        }
    }

    pub fn work_inferred(start: MinuteOfDay, end: MinuteOfDay) -> Self {
        Self {
            kind: SegmentKind::Work,
            start,
            end,
            label: None,
            provenance: Provenance::Inferred,
        }
    }

    pub fn booked(start: MinuteOfDay, end: MinuteOfDay, label: impl Into<String>) -> Self {
        Self {
            kind: SegmentKind::Booked,
            start,
            end,
            label: Some(label.into()),
            provenance: Provenance::Assigned,
        }
    }

    pub fn duration_minutes(&self) -> u16 {
        self.end.saturating_sub(self.start)
    }
}
