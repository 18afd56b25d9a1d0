//! First-fit search for a free slot.

use crate::models::{Interval, SearchWindow};
use crate::policy::WorkingHoursPolicy;
use chrono::{DateTime, Duration};
use chrono_tz::Tz;
use tracing::debug;

/// Earliest start in `window` where `duration` fits the working band and overlaps no busy interval.
///
/// Candidates start at `window.start` and advance by `policy.granularity` through free or
/// off-hours time. A candidate that overlaps a busy interval jumps straight to that
/// interval's end, so returned starts may be off the granularity grid.
pub fn find_first_free_slot(
    merged_busy: &[Interval],
    duration: Duration,
    window: &SearchWindow,
    policy: &WorkingHoursPolicy,
) -> Option<DateTime<Tz>> {
    if duration <= Duration::zero() || policy.granularity <= Duration::zero() || window.is_empty()
    {
        return None;
    }

    let time_zone = policy.time_zone;
    let window_end = window.end.with_timezone(&time_zone);
    let mut candidate = window.start.with_timezone(&time_zone);

    'search: loop {
        let proposed_end = candidate.checked_add_signed(duration)?;
        if proposed_end > window_end {
            debug!("No slot of {} min before {}", duration.num_minutes(), window_end);
            return None;
        }

        if !policy.admits(&candidate, &proposed_end) {
            candidate = candidate.checked_add_signed(policy.granularity)?;
            continue;
        }

        for busy in merged_busy {
            if busy.overlaps(candidate, proposed_end) {
                debug!(
                    "Candidate {} overlaps busy {} - {}, jumping to its end",
                    candidate, busy.start, busy.end
                );
                // overlap implies busy.end > candidate
                candidate = busy.end.with_timezone(&time_zone);
                continue 'search;
            }
        }

        return Some(candidate);
    }
}
