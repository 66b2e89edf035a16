//! Value types for staff members, recurring assignments, and booked events.
//!
//! These are the inputs to the resolver and composer. Weekly patterns are
//! only constructed through the validator, so the sorted/non-overlapping
//! interval invariant holds everywhere downstream.

use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Minutes since midnight, `0..=1440`.
pub type MinuteOfDay = u16;

/// End of day in minutes (`24:00`).
pub const MINUTES_PER_DAY: MinuteOfDay = 1440;

/// Day of the week, wire-serialized as `"MONDAY"`..`"SUNDAY"`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Weekday {
    pub const ALL: [Weekday; 7] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
        Weekday::Sunday,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Monday => "MONDAY",
            Self::Tuesday => "TUESDAY",
            Self::Wednesday => "WEDNESDAY",
            Self::Thursday => "THURSDAY",
            Self::Friday => "FRIDAY",
            Self::Saturday => "SATURDAY",
            Self::Sunday => "SUNDAY",
        }
    }

    /// Parse a wire day name. Returns `None` for anything that is not an
    /// exact uppercase English day name.
    pub fn from_wire(s: &str) -> Option<Self> {
        Weekday::ALL.iter().copied().find(|d| d.as_str() == s)
    }

    pub fn for_date(date: NaiveDate) -> Self {
        Weekday::ALL[date.weekday().num_days_from_monday() as usize]
    }
}

impl From<chrono::Weekday> for Weekday {
    fn from(wd: chrono::Weekday) -> Self {
        Weekday::ALL[wd.num_days_from_monday() as usize]
    }
}

/// One contiguous working interval within a day, `start < end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftInterval {
    pub start: MinuteOfDay,
    pub end: MinuteOfDay,
}

impl ShiftInterval {
    pub fn duration_minutes(&self) -> u16 {
        self.end - self.start
    }
}

/// Per-weekday lists of shift intervals, sorted by start and pairwise
/// non-overlapping within each weekday.
///
/// Constructed by [`validate_pattern`](crate::validate::validate_pattern);
/// a `WeeklyPattern` in hand is always normalized.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklyPattern {
    days: BTreeMap<Weekday, Vec<ShiftInterval>>,
}

impl WeeklyPattern {
    /// A pattern with no shifts on any day. Used for the degraded
    /// malformed-stored-pattern path; never produced by validation.
    pub fn empty() -> Self {
        Self::default()
    }

    pub(crate) fn from_validated(days: BTreeMap<Weekday, Vec<ShiftInterval>>) -> Self {
        Self { days }
    }

    /// Intervals for one weekday, sorted by start. Empty for days off.
    pub fn shifts_on(&self, weekday: Weekday) -> &[ShiftInterval] {
        self.days.get(&weekday).map(Vec::as_slice).unwrap_or(&[])
    }

    /// True when no weekday carries any interval.
    pub fn is_empty(&self) -> bool {
        self.days.values().all(Vec::is_empty)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Weekday, &[ShiftInterval])> {
        self.days.iter().map(|(d, v)| (*d, v.as_slice()))
    }

    /// Total scheduled minutes per week.
    pub fn weekly_minutes(&self) -> u32 {
        self.days
            .values()
            .flatten()
            .map(|i| i.duration_minutes() as u32)
            .sum()
    }
}

/// A staff member known to the external directory. Identity is immutable;
/// this core only reads it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaffMember {
    pub id: String,
    pub name: String,
    pub active: bool,
}

/// A recurring weekly schedule, anchored to the Monday of the week it takes
/// effect from. A later anchor for the same staff member supersedes an
/// earlier one; absent supersession the pattern expires with the anchor's
/// calendar month (see [`resolve`](crate::resolve::resolve)).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecurringAssignment {
    pub id: String,
    pub staff_id: String,
    /// Always a Monday; normalized at construction.
    pub anchor_date: NaiveDate,
    pub pattern: WeeklyPattern,
    pub service_id: Option<String>,
    pub branch_id: Option<String>,
    pub notes: Option<String>,
}

impl RecurringAssignment {
    /// Create a new assignment with a generated id. `anchor` may be any day
    /// of the target week; it is snapped to that week's Monday.
    pub fn new(staff_id: impl Into<String>, anchor: NaiveDate, pattern: WeeklyPattern) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            staff_id: staff_id.into(),
            anchor_date: week_start_of(anchor),
            pattern,
            service_id: None,
            branch_id: None,
            notes: None,
        }
    }

    /// The Monday identifying this assignment's first effective week.
    pub fn week_start(&self) -> NaiveDate {
        self.anchor_date
    }
}

/// Snap a date to the Monday of its week.
pub fn week_start_of(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_monday() as i64)
}

/// A booked appointment produced by the external appointment subsystem.
/// Read-only to this core.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookedEvent {
    pub id: String,
    pub staff_id: String,
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
    pub label: String,
}

impl BookedEvent {
    pub fn duration_minutes(&self) -> i64 {
        (self.end_at - self.start_at).num_minutes()
    }

    /// The UTC calendar date this event starts on.
    pub fn date(&self) -> NaiveDate {
        self.start_at.date_naive()
    }
}
