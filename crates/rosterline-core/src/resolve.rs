//! Resolution of "which recurring assignment is in effect on this date".
//!
//! Assignments are month-scoped unless explicitly replaced sooner: the most
//! recent anchor not exceeding the query date wins, its window is cut short
//! by the next anchor (supersession) or by the end of the anchor's calendar
//! month, whichever comes first. A date past the window with nothing
//! superseding it is a scheduling gap, not an error.

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::model::{RecurringAssignment, ShiftInterval, Weekday};

/// The window during which one specific assignment is the schedule in
/// effect. Derived on demand, never stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolvedWindow {
    pub assignment: RecurringAssignment,
    pub active_from: NaiveDate,
    /// Inclusive.
    pub active_until: NaiveDate,
}

impl ResolvedWindow {
    /// Validated shift intervals for `date`'s weekday. Empty for days off
    /// and for assignments degraded to an empty pattern on load.
    pub fn shifts_for(&self, date: NaiveDate) -> &[ShiftInterval] {
        self.assignment.pattern.shifts_on(Weekday::for_date(date))
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.active_from <= date && date <= self.active_until
    }
}

/// Last calendar day of `date`'s month.
pub fn month_end(date: NaiveDate) -> NaiveDate {
    let (next_year, next_month) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };
    // First of the month always exists
    NaiveDate::from_ymd_opt(next_year, next_month, 1).unwrap() - Duration::days(1)
}

/// Resolve which of `assignments` applies to `staff_id` on `date`.
///
/// Deterministic and pure: the same inputs always yield the same window.
/// Returns `None` when no anchor precedes `date`, or when the winning
/// assignment's window has lapsed without a successor (spec'd as an
/// informational "no schedule configured" state for callers).
pub fn resolve(
    assignments: &[RecurringAssignment],
    staff_id: &str,
    date: NaiveDate,
) -> Option<ResolvedWindow> {
    let candidates: Vec<&RecurringAssignment> = assignments
        .iter()
        .filter(|a| a.staff_id == staff_id && a.anchor_date <= date)
        .collect();

    let chosen = candidates.iter().copied().max_by_key(|a| a.anchor_date)?;

    let natural_end = month_end(chosen.anchor_date);
    let superseded_end = assignments
        .iter()
        .filter(|a| a.staff_id == staff_id && a.anchor_date > chosen.anchor_date)
        .map(|a| a.anchor_date)
        .min()
        .map(|next_anchor| next_anchor - Duration::days(1));

    let active_until = match superseded_end {
        Some(cut) => natural_end.min(cut),
        None => natural_end,
    };

    if date > active_until {
        return None;
    }

    Some(ResolvedWindow {
        assignment: chosen.clone(),
        active_from: chosen.anchor_date,
        active_until,
    })
}
