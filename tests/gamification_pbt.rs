use chrono::{Datelike, Duration, TimeZone, Utc, Weekday};
use proptest::prelude::*;

use academia_backend_rust::gamification::penalty::calculate_penalties;
use academia_backend_rust::gamification::policy::LEVELS;
use academia_backend_rust::gamification::week::week_window;

proptest! {
    #[test]
    fn window_is_always_sunday_through_saturday(
        secs in 0i64..4_000_000_000,
        week_offset in -520i64..520,
    ) {
        let now = Utc.timestamp_opt(secs, 0).unwrap();
        let (start, end) = week_window(now, week_offset);

        prop_assert_eq!(start.weekday(), Weekday::Sun);
        prop_assert_eq!(start.time(), chrono::NaiveTime::MIN);
        prop_assert_eq!(end - start, Duration::days(7) - Duration::milliseconds(1));
    }

    #[test]
    fn zero_offset_window_contains_now(secs in 0i64..4_000_000_000) {
        let now = Utc.timestamp_opt(secs, 0).unwrap();
        let (start, end) = week_window(now, 0);

        prop_assert!(start <= now);
        prop_assert!(now <= end);
    }

    #[test]
    fn offset_shifts_by_whole_weeks(
        secs in 0i64..4_000_000_000,
        week_offset in -520i64..520,
    ) {
        let now = Utc.timestamp_opt(secs, 0).unwrap();
        let (base_start, _) = week_window(now, 0);
        let (start, _) = week_window(now, week_offset);

        prop_assert_eq!(start - base_start, Duration::weeks(week_offset));
    }

    #[test]
    fn penalty_never_exceeds_the_balance(
        points in 0i64..100_000,
        days_ago in -30i64..2_000,
    ) {
        let now = Utc.with_ymd_and_hms(2023, 11, 29, 12, 0, 0).unwrap();
        let penalty = calculate_penalties(points, Some(now - Duration::days(days_ago)), now);

        prop_assert!(penalty <= 0);
        prop_assert!(penalty >= -points);
    }

    #[test]
    fn recent_visits_are_never_penalized(
        points in 0i64..100_000,
        days_ago in 0i64..14,
    ) {
        let now = Utc.with_ymd_and_hms(2023, 11, 29, 12, 0, 0).unwrap();
        prop_assert_eq!(
            calculate_penalties(points, Some(now - Duration::days(days_ago)), now),
            0
        );
    }

    #[test]
    fn tier_points_are_monotonic_in_frequency(count in 0i64..20) {
        for policy in &LEVELS {
            let at_count = policy.points_for_frequency(count);
            let at_next = policy.points_for_frequency(count + 1);
            prop_assert!(at_next >= at_count);
        }
    }
}
