//! # Rosterline Core Library
//!
//! Core business logic for resolving recurring weekly staff schedules and
//! composing single-day timelines. The surrounding screens (assignment
//! calendar, daily timeline widget, assignment editor) are thin hosts over
//! this library; persistence and HTTP live behind the
//! [`ScheduleRepository`] seam.
//!
//! ## Architecture
//!
//! - **Validator**: strict `HH:MM` weekly-pattern validation gating every
//!   write, and run defensively over loaded data
//! - **Resolver**: pure "which assignment is in effect on this date"
//!   computation with supersession and month-end expiry
//! - **Timeline**: merge of resolved shifts and booked events into ordered
//!   segments, plus percent-track mapping for proportional rendering
//! - **Store**: per-staff in-memory snapshot index, replaced wholesale on
//!   reload, stale-but-available on failure
//! - **Deferred delete**: optimistic delete with an undo window, driven by
//!   caller ticks rather than background threads
//!
//! The resolver and composer are pure, synchronous functions: calling them
//! on every render is always safe, and they only ever observe the snapshot
//! the store holds at call time.

pub mod deferred;
pub mod error;
pub mod events;
pub mod model;
pub mod resolve;
pub mod store;
pub mod timeline;
pub mod validate;
pub mod wire;

pub use deferred::{CommitOutcome, DeferredDeleteCoordinator};
pub use error::{CoreError, PersistenceError, Result, ValidationError};
pub use events::ScheduleEvent;
pub use model::{
    week_start_of, BookedEvent, MinuteOfDay, RecurringAssignment, ShiftInterval, StaffMember,
    Weekday, WeeklyPattern, MINUTES_PER_DAY,
};
pub use resolve::{month_end, resolve, ResolvedWindow};
pub use store::{ScheduleSnapshot, ScheduleStore};
pub use timeline::{compose, Provenance, SegmentKind, TimelineSegment, Track};
pub use validate::{validate_pattern, RawInterval, RawPattern};
pub use wire::{
    assignment_to_wire, normalize_assignments, normalize_events, pattern_to_wire,
    ScheduleRepository, WireAssignment, WireDayShifts, WireEvent, WireInterval,
};
