//! Day-timeline composition and proportional rendering support.
//!
//! This module provides:
//! - Typed timeline segments with assigned/inferred provenance
//! - Merge of resolved shifts and booked events into one ordered day view
//! - Percent-track mapping for proportional rendering

mod compose;
mod segment;
mod track;

pub use compose::compose;
pub use segment::{Provenance, SegmentKind, TimelineSegment};
pub use track::Track;
