//! Mood Evaluator
//!
//! A Markov-style random walk over the fixed mood set, plus the intimacy
//! ratchet. Distress always forces the supportive mood without consuming a
//! random draw.

use sakhi_core::random::{pick, RandomSource};
use sakhi_core::{Emotion, Mood, INTIMACY_MAX, INTIMACY_MIN};

/// Chance per turn of leaving the current mood
pub const MOOD_SHIFT_PROBABILITY: f64 = 0.25;

/// Messages longer than this (in chars) deepen intimacy
pub const LONG_MESSAGE_CHARS: usize = 80;

/// Moods a brand-new user can meet the persona in
pub const INITIAL_MOODS: [Mood; 7] = [
    Mood::Playful,
    Mood::Clingy,
    Mood::Sarcastic,
    Mood::Chatty,
    Mood::Mysterious,
    Mood::Poetic,
    Mood::Chill,
];

/// Where each mood may drift next
pub fn transitions(mood: Mood) -> &'static [Mood] {
    match mood {
        Mood::Playful => &[Mood::Chatty, Mood::Sarcastic, Mood::Clingy, Mood::Chill],
        Mood::Clingy => &[Mood::Playful, Mood::Poetic, Mood::Mysterious],
        Mood::Sarcastic => &[Mood::Playful, Mood::Chill, Mood::Mysterious],
        Mood::Chatty => &[Mood::Playful, Mood::Clingy, Mood::Chill],
        Mood::Mysterious => &[Mood::Poetic, Mood::Chill, Mood::Sarcastic],
        Mood::Poetic => &[Mood::Mysterious, Mood::Clingy, Mood::Chill],
        Mood::Chill => &[Mood::Playful, Mood::Sarcastic, Mood::Chatty, Mood::Mysterious],
        Mood::Supportive => &[Mood::Chill, Mood::Playful, Mood::Clingy],
    }
}

/// Mood for a user we have never talked to
pub fn initial_mood(rng: &mut dyn RandomSource) -> Mood {
    pick(rng, &INITIAL_MOODS).copied().unwrap_or(Mood::Chill)
}

/// Next mood given the user's emotion
pub fn next_mood(current: Mood, emotion: Emotion, rng: &mut dyn RandomSource) -> Mood {
    if emotion.is_distress() {
        return Mood::Supportive;
    }
    if !rng.chance(MOOD_SHIFT_PROBABILITY) {
        return current;
    }
    pick(rng, transitions(current)).copied().unwrap_or(current)
}

/// Next intimacy level; never decreases, saturates at the maximum
pub fn next_intimacy(current: u8, message: &str, emotion: Emotion) -> u8 {
    let current = current.clamp(INTIMACY_MIN, INTIMACY_MAX);
    if message.chars().count() > LONG_MESSAGE_CHARS || emotion.is_high_affinity() {
        (current + 1).min(INTIMACY_MAX)
    } else {
        current
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sakhi_core::{ScriptedRandom, StdRandom};

    #[test]
    fn test_distress_forces_supportive_without_draw() {
        let mut rng = ScriptedRandom::new().with_chances([true]);
        for emotion in [Emotion::Sad, Emotion::Angry, Emotion::Frustrated, Emotion::Stressed] {
            assert_eq!(next_mood(Mood::Playful, emotion, &mut rng), Mood::Supportive);
        }
        assert_eq!(rng.chance_draws(), 0);
    }

    #[test]
    fn test_keeps_mood_when_no_shift() {
        let mut rng = ScriptedRandom::new().with_chances([false]);
        assert_eq!(next_mood(Mood::Poetic, Emotion::Happy, &mut rng), Mood::Poetic);
        assert_eq!(rng.chance_draws(), 1);
    }

    #[test]
    fn test_shift_picks_from_transition_list() {
        let mut rng = ScriptedRandom::new().with_chances([true]).with_indices([2]);
        assert_eq!(next_mood(Mood::Playful, Emotion::Neutral, &mut rng), Mood::Clingy);
    }

    #[test]
    fn test_walk_stays_in_mood_set() {
        let mut rng = StdRandom::seeded(42);
        let mut mood = initial_mood(&mut rng);
        for i in 0..500 {
            let emotion = Emotion::ALL[i % Emotion::ALL.len()];
            mood = next_mood(mood, emotion, &mut rng);
            assert!(Mood::ALL.contains(&mood));
        }
    }

    #[test]
    fn test_transitions_never_self_loop() {
        for mood in Mood::ALL {
            assert!(!transitions(mood).contains(&mood));
            assert!(!transitions(mood).is_empty());
        }
    }

    #[test]
    fn test_intimacy_rules() {
        let long = "a".repeat(LONG_MESSAGE_CHARS + 1);
        let exact = "a".repeat(LONG_MESSAGE_CHARS);
        assert_eq!(next_intimacy(3, &long, Emotion::Neutral), 4);
        assert_eq!(next_intimacy(3, &exact, Emotion::Neutral), 3);
        assert_eq!(next_intimacy(3, "hi", Emotion::Romantic), 4);
        assert_eq!(next_intimacy(3, "hi", Emotion::Sad), 3);
        assert_eq!(next_intimacy(INTIMACY_MAX, &long, Emotion::Happy), INTIMACY_MAX);
    }

    #[test]
    fn test_intimacy_non_decreasing() {
        let mut level = INTIMACY_MIN;
        for i in 0..40 {
            let emotion = Emotion::ALL[i % Emotion::ALL.len()];
            let next = next_intimacy(level, "short", emotion);
            assert!(next >= level);
            assert!((INTIMACY_MIN..=INTIMACY_MAX).contains(&next));
            level = next;
        }
    }
}
