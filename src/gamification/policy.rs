use serde::Serialize;

/// Points awarded per weekly-frequency tier.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FrequencyPoints {
    pub three_times_week: i64,
    pub five_times_week: i64,
    pub seven_times_week: i64,
}

/// One-shot award unlocked by a consecutive-week streak.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MedalRule {
    pub name: &'static str,
    pub weeks_required: i64,
}

/// Static per-level configuration. Immutable for the process lifetime.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelPolicy {
    pub level: u8,
    pub name: &'static str,
    pub min_duration_minutes: i64,
    pub points: FrequencyPoints,
    pub medal: MedalRule,
}

pub const LEVELS: [LevelPolicy; 3] = [
    LevelPolicy {
        level: 1,
        name: "Nível 1",
        min_duration_minutes: 30,
        points: FrequencyPoints {
            three_times_week: 10,
            five_times_week: 20,
            seven_times_week: 40,
        },
        medal: MedalRule {
            name: "PRIMEIRO PASSO",
            weeks_required: 5,
        },
    },
    LevelPolicy {
        level: 2,
        name: "Nível 2",
        min_duration_minutes: 60,
        points: FrequencyPoints {
            three_times_week: 20,
            five_times_week: 30,
            seven_times_week: 50,
        },
        medal: MedalRule {
            name: "SEGUNDO PASSO",
            weeks_required: 10,
        },
    },
    LevelPolicy {
        level: 3,
        name: "Nível 3",
        min_duration_minutes: 90,
        points: FrequencyPoints {
            three_times_week: 30,
            five_times_week: 40,
            seven_times_week: 50,
        },
        medal: MedalRule {
            name: "TERCEIRO PASSO",
            weeks_required: 15,
        },
    },
];

pub fn policy_for(level: u8) -> Option<&'static LevelPolicy> {
    LEVELS.iter().find(|policy| policy.level == level)
}

impl LevelPolicy {
    /// Tier selection in strict descending order; lower bounds are inclusive.
    pub fn points_for_frequency(&self, valid_check_ins: i64) -> i64 {
        if valid_check_ins >= 7 {
            self.points.seven_times_week
        } else if valid_check_ins >= 5 {
            self.points.five_times_week
        } else if valid_check_ins >= 3 {
            self.points.three_times_week
        } else {
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_lookup() {
        assert_eq!(policy_for(1).map(|p| p.min_duration_minutes), Some(30));
        assert_eq!(policy_for(3).map(|p| p.medal.weeks_required), Some(15));
        assert!(policy_for(0).is_none());
        assert!(policy_for(4).is_none());
    }

    #[test]
    fn test_tier_boundaries_level_one() {
        let policy = policy_for(1).unwrap();
        assert_eq!(policy.points_for_frequency(0), 0);
        assert_eq!(policy.points_for_frequency(2), 0);
        assert_eq!(policy.points_for_frequency(3), 10);
        assert_eq!(policy.points_for_frequency(4), 10);
        assert_eq!(policy.points_for_frequency(5), 20);
        assert_eq!(policy.points_for_frequency(6), 20);
        assert_eq!(policy.points_for_frequency(7), 40);
        assert_eq!(policy.points_for_frequency(12), 40);
    }
}
