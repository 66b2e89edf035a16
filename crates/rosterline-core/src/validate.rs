//! Weekly-pattern validation and normalization.
//!
//! Gates every write into the schedule store, and runs defensively over raw
//! wire data on load so a corrupt stored pattern degrades to "no shifts"
//! instead of crashing the resolver. Pure functions; no side effects.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::model::{MinuteOfDay, ShiftInterval, Weekday, WeeklyPattern, MINUTES_PER_DAY};

/// One unvalidated interval as entered by an operator or read off the wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawInterval {
    pub start: String,
    pub end: String,
}

/// Unvalidated per-weekday intervals. Days absent from the map have no
/// shifts.
pub type RawPattern = BTreeMap<Weekday, Vec<RawInterval>>;

/// Parse a strict zero-padded 24-hour `HH:MM` string into minutes since
/// midnight. `"24:00"` is accepted as the exclusive end-of-day bound; any
/// other out-of-range, unpadded, or non-numeric text is rejected.
pub fn parse_minute(s: &str) -> Option<MinuteOfDay> {
    let b = s.as_bytes();
    if b.len() != 5 || b[2] != b':' {
        return None;
    }
    if !b[0].is_ascii_digit()
        || !b[1].is_ascii_digit()
        || !b[3].is_ascii_digit()
        || !b[4].is_ascii_digit()
    {
        return None;
    }
    let hh = (b[0] - b'0') as u16 * 10 + (b[1] - b'0') as u16;
    let mm = (b[3] - b'0') as u16 * 10 + (b[4] - b'0') as u16;
    match (hh, mm) {
        (24, 0) => Some(MINUTES_PER_DAY),
        (0..=23, 0..=59) => Some(hh * 60 + mm),
        _ => None,
    }
}

/// Validate and normalize a raw weekly pattern.
///
/// Rules, checked in order per weekday:
/// - every `start`/`end` parses as strict `HH:MM`, else
///   [`ValidationError::BadFormat`];
/// - every interval has `start < end`, else
///   [`ValidationError::InvertedInterval`];
/// - after sorting by start, no interval begins before the previous one
///   ends, else [`ValidationError::Overlap`].
///
/// A pattern with zero intervals across all weekdays is rejected as
/// [`ValidationError::Empty`]. On success the returned pattern carries each
/// weekday's intervals sorted by start.
pub fn validate_pattern(raw: &RawPattern) -> Result<WeeklyPattern, ValidationError> {
    let mut days: BTreeMap<Weekday, Vec<ShiftInterval>> = BTreeMap::new();
    let mut total = 0usize;

    for (&weekday, intervals) in raw {
        if intervals.is_empty() {
            continue;
        }
        let mut parsed = Vec::with_capacity(intervals.len());
        for raw_interval in intervals {
            let start = parse_minute(&raw_interval.start)
                .ok_or(ValidationError::BadFormat(weekday))?;
            let end = parse_minute(&raw_interval.end)
                .ok_or(ValidationError::BadFormat(weekday))?;
            if start >= end {
                return Err(ValidationError::InvertedInterval(weekday));
            }
            parsed.push(ShiftInterval { start, end });
        }
        parsed.sort_by_key(|i| i.start);
        for pair in parsed.windows(2) {
            if pair[1].start < pair[0].end {
                return Err(ValidationError::Overlap(weekday));
            }
        }
        total += parsed.len();
        days.insert(weekday, parsed);
    }

    if total == 0 {
        return Err(ValidationError::Empty);
    }
    Ok(WeeklyPattern::from_validated(days))
}
