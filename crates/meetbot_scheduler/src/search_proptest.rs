#[cfg(test)]
mod tests {
    use crate::aggregate::merge_intervals;
    use crate::models::{Interval, SearchWindow};
    use crate::policy::WorkingHoursPolicy;
    use crate::search::find_first_free_slot;
    use chrono::{DateTime, Duration, TimeZone};
    use chrono_tz::Asia::Kolkata;
    use chrono_tz::Tz;
    use proptest::prelude::*;

    // Two days starting Monday 2025-05-05 00:00 local
    const SPAN_MINUTES: i64 = 2 * 24 * 60;

    fn base() -> DateTime<Tz> {
        Kolkata.with_ymd_and_hms(2025, 5, 5, 0, 0, 0).unwrap()
    }

    fn minute(offset: i64) -> DateTime<Tz> {
        base() + Duration::minutes(offset)
    }

    fn to_intervals(raw: &[(i64, i64)]) -> Vec<Interval> {
        raw.iter()
            .filter_map(|&(start, len)| Interval::new(minute(start), minute(start + len)))
            .collect()
    }

    fn covered(intervals: &[Interval], at: DateTime<Tz>) -> bool {
        intervals.iter().any(|i| i.start <= at && at < i.end)
    }

    fn busy_strategy() -> impl Strategy<Value = Vec<(i64, i64)>> {
        prop::collection::vec((0..SPAN_MINUTES, 1..240i64), 0..12)
    }

    proptest! {
        // Merged output is sorted, non-overlapping and covers exactly the input instants
        #[test]
        fn test_merge_is_sorted_disjoint_and_union_preserving(raw in busy_strategy()) {
            let inputs = to_intervals(&raw);
            let merged = merge_intervals(inputs.clone());

            for pair in merged.windows(2) {
                prop_assert!(pair[0].start <= pair[1].start);
                prop_assert!(pair[0].end <= pair[1].start,
                    "merged intervals overlap: {:?}", pair);
            }
            for offset in (0..SPAN_MINUTES + 240).step_by(5) {
                let at = minute(offset);
                prop_assert_eq!(covered(&inputs, at), covered(&merged, at));
            }
        }

        // A returned slot never intersects any input busy interval
        #[test]
        fn test_no_false_positive(
            raw in busy_strategy(),
            window_start in 0..SPAN_MINUTES,
            window_len in 0..SPAN_MINUTES,
            duration in 5..180i64,
        ) {
            let inputs = to_intervals(&raw);
            let merged = merge_intervals(inputs.clone());
            let window = SearchWindow::new(minute(window_start), minute(window_start + window_len), Kolkata);
            let duration = Duration::minutes(duration);

            if let Some(start) = find_first_free_slot(&merged, duration, &window, &WorkingHoursPolicy::default()) {
                let end = start + duration;
                for busy in &inputs {
                    prop_assert!(!busy.overlaps(start, end),
                        "slot {} - {} overlaps busy {:?}", start, end, busy);
                }
            }
        }

        // Never before the window start, never past the window end, always inside the band
        #[test]
        fn test_slot_respects_window_and_working_hours(
            raw in busy_strategy(),
            window_start in 0..SPAN_MINUTES,
            window_len in 0..SPAN_MINUTES,
            duration in 5..180i64,
        ) {
            let merged = merge_intervals(to_intervals(&raw));
            let window = SearchWindow::new(minute(window_start), minute(window_start + window_len), Kolkata);
            let duration = Duration::minutes(duration);
            let policy = WorkingHoursPolicy::default();

            if let Some(start) = find_first_free_slot(&merged, duration, &window, &policy) {
                prop_assert!(start >= window.start);
                prop_assert!(start + duration <= window.end);
                prop_assert!(policy.admits(&start, &(start + duration)));
            }
        }

        // With no busy time, the answer is the first grid point inside the band
        #[test]
        fn test_free_calendar_returns_first_admissible_grid_point(
            window_start in 0..SPAN_MINUTES,
            duration in 5..180i64,
        ) {
            let window = SearchWindow::new(minute(window_start), minute(SPAN_MINUTES), Kolkata);
            let duration = Duration::minutes(duration);
            let policy = WorkingHoursPolicy::default();

            let expected = (0..)
                .map(|step| window.start + policy.granularity * step)
                .take_while(|start| *start + duration <= window.end)
                .find(|start| policy.admits(start, &(*start + duration)));

            prop_assert_eq!(find_first_free_slot(&[], duration, &window, &policy), expected);
        }
    }
}
