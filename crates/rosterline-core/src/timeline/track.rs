//! Proportional position mapping for rendering a day track.

use serde::{Deserialize, Serialize};

use crate::model::MinuteOfDay;
use crate::timeline::TimelineSegment;

/// Maps minutes-of-day onto a 0..100 percent track. Positions are clamped
/// so segments never visually overflow regardless of clamping order.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Track {
    pub day_start: MinuteOfDay,
    pub day_end: MinuteOfDay,
}

impl Track {
    /// `day_start` must be strictly less than `day_end`.
    pub fn new(day_start: MinuteOfDay, day_end: MinuteOfDay) -> Self {
        debug_assert!(day_start < day_end);
        Self { day_start, day_end }
    }

    /// Position of `t` on the track as a percentage, clamped to `0..=100`.
    pub fn to_percent(&self, t: MinuteOfDay) -> f64 {
        let span = (self.day_end - self.day_start) as f64;
        let offset = t as f64 - self.day_start as f64;
        (offset / span * 100.0).clamp(0.0, 100.0)
    }

    /// Width of `[start, end)` as a percentage, additionally clamped so
    /// `left + width` never exceeds 100.
    pub fn width_percent(&self, start: MinuteOfDay, end: MinuteOfDay) -> f64 {
        let left = self.to_percent(start);
        let right = self.to_percent(end);
        (right - left).clamp(0.0, 100.0 - left)
    }

    /// `(left, width)` percentages for one segment.
    pub fn place(&self, segment: &TimelineSegment) -> (f64, f64) {
        (
            self.to_percent(segment.start),
            self.width_percent(segment.start, segment.end),
        )
    }
}
