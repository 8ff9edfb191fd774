use super::policy::LevelPolicy;

/// Streak-threshold medal check. One medal per level, never re-awarded: the
/// name only comes back when the streak meets the requirement and the user
/// does not already hold it.
pub fn check_for_medal(
    policy: &LevelPolicy,
    medals_held: &[String],
    consecutive_weeks: i64,
) -> Option<&'static str> {
    if medals_held.iter().any(|medal| medal == policy.medal.name) {
        return None;
    }

    (consecutive_weeks >= policy.medal.weeks_required).then_some(policy.medal.name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gamification::policy::policy_for;

    #[test]
    fn test_awarded_at_threshold() {
        let policy = policy_for(1).unwrap();
        assert_eq!(check_for_medal(policy, &[], 5), Some("PRIMEIRO PASSO"));
        assert_eq!(check_for_medal(policy, &[], 9), Some("PRIMEIRO PASSO"));
    }

    #[test]
    fn test_not_awarded_below_threshold() {
        let policy = policy_for(1).unwrap();
        assert_eq!(check_for_medal(policy, &[], 4), None);
        assert_eq!(check_for_medal(policy, &[], 0), None);
    }

    #[test]
    fn test_never_reawarded() {
        let policy = policy_for(1).unwrap();
        let held = vec!["PRIMEIRO PASSO".to_string()];
        assert_eq!(check_for_medal(policy, &held, 5), None);
        // Same inputs again: still nothing.
        assert_eq!(check_for_medal(policy, &held, 50), None);
    }

    #[test]
    fn test_other_levels_medal_does_not_block() {
        let policy = policy_for(2).unwrap();
        let held = vec!["PRIMEIRO PASSO".to_string()];
        assert_eq!(check_for_medal(policy, &held, 10), Some("SEGUNDO PASSO"));
    }
}
