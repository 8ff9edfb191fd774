use crate::models::{CheckIn, Validation};

use super::policy::LevelPolicy;

/// A check-in counts toward the week iff a trainer validation exists, the
/// trainer confirmed it, and the session lasted at least the level's minimum.
/// Missing validations and still-open sessions (duration 0) are normal false
/// cases, never errors.
pub fn is_valid_check_in(
    check_in: &CheckIn,
    validation: Option<&Validation>,
    policy: &LevelPolicy,
) -> bool {
    let Some(validation) = validation else {
        return false;
    };
    if !validation.trainer_validated {
        return false;
    }

    check_in.duration_minutes >= policy.min_duration_minutes
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::gamification::policy::policy_for;

    fn check_in(duration_minutes: i64) -> CheckIn {
        let now = Utc::now();
        CheckIn {
            id: "c1".to_string(),
            user_id: "u1".to_string(),
            check_in_time: now,
            check_out_time: (duration_minutes > 0).then_some(now),
            duration_minutes,
        }
    }

    fn validation(trainer_validated: bool) -> Validation {
        Validation {
            id: "v1".to_string(),
            check_in_id: "c1".to_string(),
            user_id: "u1".to_string(),
            trainer_validated,
            date: Utc::now(),
        }
    }

    #[test]
    fn test_missing_validation_is_invalid() {
        let policy = policy_for(1).unwrap();
        assert!(!is_valid_check_in(&check_in(90), None, policy));
    }

    #[test]
    fn test_rejected_validation_is_invalid() {
        let policy = policy_for(1).unwrap();
        assert!(!is_valid_check_in(&check_in(90), Some(&validation(false)), policy));
    }

    #[test]
    fn test_short_session_is_invalid_even_when_validated() {
        let policy = policy_for(1).unwrap();
        assert!(!is_valid_check_in(&check_in(29), Some(&validation(true)), policy));
    }

    #[test]
    fn test_open_session_is_invalid() {
        let policy = policy_for(1).unwrap();
        assert!(!is_valid_check_in(&check_in(0), Some(&validation(true)), policy));
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let policy = policy_for(1).unwrap();
        assert!(is_valid_check_in(&check_in(30), Some(&validation(true)), policy));
    }

    #[test]
    fn test_higher_level_raises_the_bar() {
        let policy = policy_for(3).unwrap();
        assert!(!is_valid_check_in(&check_in(60), Some(&validation(true)), policy));
        assert!(is_valid_check_in(&check_in(90), Some(&validation(true)), policy));
    }
}
