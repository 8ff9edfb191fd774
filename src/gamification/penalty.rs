use chrono::{DateTime, Utc};

const GRACE_DAYS: i64 = 14;
const FULL_RESET_DAYS: i64 = 56;
const POINTS_PER_MISSED_WEEK: i64 = 10;

/// Absence decay as a function of whole days since the last visit. Eight
/// weeks away wipes the balance; two weeks or more costs 10 points per
/// missed week, clamped so the balance never goes negative. No visit history
/// means nothing to penalize. The result is always <= 0.
pub fn calculate_penalties(
    points: i64,
    last_visit: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> i64 {
    let Some(last_visit) = last_visit else {
        return 0;
    };

    let days_since_last_visit = (now - last_visit).num_days();

    if days_since_last_visit >= FULL_RESET_DAYS {
        return -points;
    }

    if days_since_last_visit >= GRACE_DAYS {
        let weeks_missed = days_since_last_visit / 7;
        return (-POINTS_PER_MISSED_WEEK * weeks_missed).max(-points);
    }

    0
}
