//! Proactive messaging
//!
//! Decides whether the persona texts first when a session opens after a long
//! silence. There is no scheduler; the caller asks once per session.

use chrono::{DateTime, Utc};
use sakhi_core::random::{pick, RandomSource};
use sakhi_core::{AvailabilityWindow, UserProfile};

/// Chance of texting first once the idle threshold is met
pub const PROACTIVE_PROBABILITY: f64 = 0.5;

/// Openers used when generation fails
const OPENERS: &[&str] = &[
    "oye, forgot about me or what?",
    "hellooo, where did you disappear",
    "random but i was just thinking about you",
    "so are we not talking today?",
];

/// Whether the persona should reach out to this user now
pub fn should_reach_out(
    profile: Option<&UserProfile>,
    window: Option<&AvailabilityWindow>,
    idle_hours: i64,
    now: DateTime<Utc>,
    rng: &mut dyn RandomSource,
) -> bool {
    let Some(profile) = profile else {
        return false;
    };
    if window.is_some() || profile.message_count == 0 {
        return false;
    }
    if profile.hours_since_last(now) < idle_hours {
        return false;
    }
    rng.chance(PROACTIVE_PROBABILITY)
}

/// Opener for when the model is unreachable
pub fn fallback_opener(rng: &mut dyn RandomSource) -> String {
    pick(rng, OPENERS)
        .copied()
        .unwrap_or("hey you")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use sakhi_core::testing::utc;
    use sakhi_core::{ExcuseCategory, ScriptedRandom};

    fn profile_idle(hours: i64, now: DateTime<Utc>) -> UserProfile {
        let mut profile = UserProfile::new("u1", now - Duration::days(5));
        profile.record_message(false, now - Duration::hours(hours));
        profile
    }

    #[test]
    fn test_requires_idle_threshold() {
        let now = utc(2026, 10, 16, 9, 0);
        let mut rng = ScriptedRandom::new().with_chances([true, true]);

        assert!(!should_reach_out(Some(&profile_idle(5, now)), None, 6, now, &mut rng));
        assert_eq!(rng.chance_draws(), 0);
        assert!(should_reach_out(Some(&profile_idle(6, now)), None, 6, now, &mut rng));
    }

    #[test]
    fn test_never_for_unknown_or_away() {
        let now = utc(2026, 10, 16, 9, 0);
        let mut rng = ScriptedRandom::new().with_chances([true]);
        assert!(!should_reach_out(None, None, 6, now, &mut rng));

        let window = AvailabilityWindow::open("u1", ExcuseCategory::Work, "in a meeting", now, 10);
        assert!(!should_reach_out(Some(&profile_idle(48, now)), Some(&window), 6, now, &mut rng));
        assert_eq!(rng.chance_draws(), 0);
    }

    #[test]
    fn test_coin_flip_can_decline() {
        let now = utc(2026, 10, 16, 9, 0);
        let mut rng = ScriptedRandom::new().with_chances([false]);
        assert!(!should_reach_out(Some(&profile_idle(24, now)), None, 6, now, &mut rng));
        assert_eq!(rng.chance_draws(), 1);
    }
}
