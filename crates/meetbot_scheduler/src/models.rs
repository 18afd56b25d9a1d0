// --- File: crates/meetbot_scheduler/src/models.rs ---
use chrono::{DateTime, TimeZone};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

/// A half-open busy range `[start, end)`, always with `start < end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interval {
    pub start: DateTime<Tz>,
    pub end: DateTime<Tz>,
}

impl Interval {
    /// Returns `None` unless `start < end`.
    pub fn new(start: DateTime<Tz>, end: DateTime<Tz>) -> Option<Self> {
        (start < end).then_some(Self { start, end })
    }

    /// `[a,b)` and `[c,d)` overlap iff `max(a,c) < min(b,d)`; touching is not overlapping.
    pub fn overlaps(&self, start: DateTime<Tz>, end: DateTime<Tz>) -> bool {
        self.start.max(start) < self.end.min(end)
    }
}

/// Outer bound of a slot search, expressed in the scheduler's zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchWindow {
    pub start: DateTime<Tz>,
    pub end: DateTime<Tz>,
}

impl SearchWindow {
    pub fn new<T: TimeZone>(start: DateTime<T>, end: DateTime<T>, time_zone: Tz) -> Self {
        Self {
            start: start.with_timezone(&time_zone),
            end: end.with_timezone(&time_zone),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }
}

/// Why no start instant was returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotFoundReason {
    NoAttendees,
    /// Zero, negative, or too large to represent.
    InvalidDuration,
    /// `window_start >= window_end`.
    EmptyWindow,
    /// Every candidate in the window was busy or outside working hours.
    Exhausted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchOutcome {
    Found(DateTime<Tz>),
    NotFound(NotFoundReason),
}

impl SearchOutcome {
    /// The start instant, if any.
    pub fn start(&self) -> Option<DateTime<Tz>> {
        match self {
            SearchOutcome::Found(start) => Some(*start),
            SearchOutcome::NotFound(_) => None,
        }
    }
}
