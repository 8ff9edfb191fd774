use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

use crate::models::Validation;
use crate::store::GymStore;

use super::medal::check_for_medal;
use super::penalty::calculate_penalties;
use super::policy::policy_for;
use super::validity::is_valid_check_in;
use super::week::week_window;

/// Minimum validated check-ins for a week to extend the streak.
pub const STREAK_MIN_VALID_CHECK_INS: i64 = 3;

#[derive(Debug, Error)]
pub enum GamificationError {
    #[error("user not found")]
    UserNotFound,
    #[error("no level policy for level {0}")]
    UnknownLevel(u8),
}

/// Outcome of evaluating one user for one calendar week. Computed, returned,
/// never stored; persisting the point/streak/medal changes is the caller's
/// job, and only for the current week.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyDecision {
    pub week_start: DateTime<Utc>,
    pub week_end: DateTime<Utc>,
    pub check_ins_count: i64,
    pub valid_check_ins_count: i64,
    pub points_earned: i64,
    pub penalties: i64,
    pub net_points_change: i64,
    pub medal_earned: Option<String>,
    pub consecutive_weeks: i64,
}

/// Scores one calendar week for a user: counts trainer-validated check-ins,
/// awards tiered frequency points, advances or resets the streak candidate,
/// checks medal eligibility against that candidate, and applies absence
/// decay when (and only when) the current week is being evaluated.
///
/// Pure over the store snapshot and `now`: identical inputs produce an
/// identical decision, and nothing is mutated here.
pub fn evaluate_week(
    store: &dyn GymStore,
    user_id: &str,
    week_offset: i64,
    now: DateTime<Utc>,
) -> Result<WeeklyDecision, GamificationError> {
    let user = store
        .find_user_by_id(user_id)
        .ok_or(GamificationError::UserNotFound)?;
    let policy = policy_for(user.level).ok_or(GamificationError::UnknownLevel(user.level))?;

    let (week_start, week_end) = week_window(now, week_offset);
    let check_ins = store.check_ins_in_range(&user.id, week_start, week_end);
    let validations = store.validations_in_range(&user.id, week_start, week_end);

    // At most one validation per check-in; if duplicates ever slipped in,
    // the last written one wins.
    let mut validation_by_check_in: HashMap<&str, &Validation> = HashMap::new();
    for validation in &validations {
        validation_by_check_in.insert(validation.check_in_id.as_str(), validation);
    }

    let valid_check_ins_count = check_ins
        .iter()
        .filter(|check_in| {
            is_valid_check_in(
                check_in,
                validation_by_check_in.get(check_in.id.as_str()).copied(),
                policy,
            )
        })
        .count() as i64;

    let points_earned = policy.points_for_frequency(valid_check_ins_count);

    // Candidate streak value: reported and used for the medal check, but
    // persisted only by the caller (current week only).
    let consecutive_weeks = if valid_check_ins_count >= STREAK_MIN_VALID_CHECK_INS {
        user.consecutive_weeks + 1
    } else {
        0
    };

    let medal_earned =
        check_for_medal(policy, &user.medals, consecutive_weeks).map(str::to_string);

    // Offsets are read-only simulations of other weeks; decay only belongs
    // to the present one.
    let penalties = if week_offset == 0 {
        calculate_penalties(user.points, user.last_visit, now)
    } else {
        0
    };

    Ok(WeeklyDecision {
        week_start,
        week_end,
        check_ins_count: check_ins.len() as i64,
        valid_check_ins_count,
        points_earned,
        penalties,
        net_points_change: points_earned + penalties,
        medal_earned,
        consecutive_weeks,
    })
}
