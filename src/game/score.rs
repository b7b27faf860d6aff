use super::tier::DifficultyProfile;

/// Score for a session snapshot: the base score minus the attempt and time
/// penalties, rounded half-to-even and floored at zero.
pub fn score(profile: &DifficultyProfile, attempts: u32, elapsed_seconds: f64) -> u32 {
    let raw = f64::from(profile.base_score)
        - f64::from(attempts) * profile.attempt_penalty
        - elapsed_seconds.max(0.0) * profile.time_penalty;
    let rounded = raw.round_ties_even();
    if rounded <= 0.0 {
        0
    } else {
        rounded.min(f64::from(profile.base_score)) as u32
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::game::tier::{ALL_TIERS, Tier};

    #[test]
    fn easy_after_three_attempts_and_ten_seconds() {
        assert_eq!(score(&Tier::Easy.profile(), 3, 10.0), 975);
    }

    #[test]
    fn fresh_session_scores_the_base() {
        for tier in ALL_TIERS {
            let profile = tier.profile();
            assert_eq!(score(&profile, 0, 0.0), profile.base_score);
        }
    }

    #[test]
    fn fractional_penalties_round_half_to_even() {
        let medium = Tier::Medium.profile();
        // 2000 - 4 - 0.7 * 15 = 1985.5
        assert_eq!(score(&medium, 1, 15.0), 1986);
        // 3000 - 0.3 * 5 = 2998.5
        assert_eq!(score(&Tier::Hard.profile(), 0, 5.0), 2998);
    }

    #[test]
    fn score_bottoms_out_at_zero() {
        assert_eq!(score(&Tier::Easy.profile(), 500, 10_000.0), 0);
    }

    proptest! {
        #[test]
        fn more_attempts_never_raise_the_score(
            tier_index in 0u8..3,
            attempts in 0u32..2000,
            elapsed in 0.0f64..5000.0,
        ) {
            let profile = Tier::try_from(tier_index).unwrap().profile();
            prop_assert!(score(&profile, attempts + 1, elapsed) <= score(&profile, attempts, elapsed));
        }

        #[test]
        fn more_time_never_raises_the_score(
            tier_index in 0u8..3,
            attempts in 0u32..2000,
            elapsed in 0.0f64..5000.0,
            delta in 0.0f64..100.0,
        ) {
            let profile = Tier::try_from(tier_index).unwrap().profile();
            prop_assert!(score(&profile, attempts, elapsed + delta) <= score(&profile, attempts, elapsed));
        }
    }
}
