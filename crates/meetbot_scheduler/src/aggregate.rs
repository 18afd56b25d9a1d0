//! Union of many attendees' busy time.
//!
//! Sorts every busy period by start and sweeps once, folding each period into the
//! previous one when it starts strictly before that one ends.

use crate::error::SchedulerError;
use crate::models::Interval;
use chrono::DateTime;
use chrono_tz::Tz;
use meetbot_common::FreeBusyMap;
use tracing::{debug, warn};

/// Parses, flattens and merges the busy intervals of all attendees into `time_zone`.
///
/// An unparsable timestamp fails the whole aggregation: dropping it would report
/// the attendee as free. Intervals with `end <= start` carry no busy time and are skipped.
pub fn merge_busy_intervals(
    busy: &FreeBusyMap,
    time_zone: Tz,
) -> Result<Vec<Interval>, SchedulerError> {
    let mut intervals = Vec::new();

    for (attendee, periods) in busy {
        for period in periods {
            let start = parse_instant(&period.start, time_zone)?;
            let end = parse_instant(&period.end, time_zone)?;
            match Interval::new(start, end) {
                Some(interval) => intervals.push(interval),
                None => warn!(
                    "Skipping empty busy period for {}: {} - {}",
                    attendee, period.start, period.end
                ),
            }
        }
    }

    let merged = merge_intervals(intervals);
    debug!("Merged busy set has {} intervals", merged.len());
    Ok(merged)
}

/// Sorts and merges intervals. Touching intervals (`end == next.start`) stay separate.
pub fn merge_intervals(mut intervals: Vec<Interval>) -> Vec<Interval> {
    intervals.sort_by_key(|interval| (interval.start, interval.end));

    let mut merged: Vec<Interval> = Vec::with_capacity(intervals.len());
    for interval in intervals {
        if let Some(last) = merged.last_mut() {
            if interval.start < last.end {
                last.end = last.end.max(interval.end);
                continue;
            }
        }
        merged.push(interval);
    }
    merged
}

fn parse_instant(value: &str, time_zone: Tz) -> Result<DateTime<Tz>, SchedulerError> {
    DateTime::parse_from_rfc3339(value)
        .map(|instant| instant.with_timezone(&time_zone))
        .map_err(|e| SchedulerError::InvalidBusyInterval(format!("'{}': {}", value, e)))
}
