//! Persona mood and intimacy state

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lowest intimacy level
pub const INTIMACY_MIN: u8 = 1;
/// Highest intimacy level
pub const INTIMACY_MAX: u8 = 10;
/// Mood history entries kept per user
pub const MOOD_HISTORY_CAP: usize = 20;

/// The persona's current emotional presentation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mood {
    /// Teasing and light
    Playful,
    /// Clingy but trying to act cool
    Clingy,
    /// Lowkey sarcastic and savage
    Sarcastic,
    /// Super chatty and oversharing
    Chatty,
    /// Detached and mysterious
    Mysterious,
    /// Randomly deep and poetic
    Poetic,
    /// Chill and nonchalant
    Chill,
    /// Soft and caring, used when the user is hurting
    Supportive,
}

impl Mood {
    /// The fixed mood set
    pub const ALL: [Mood; 8] = [
        Mood::Playful,
        Mood::Clingy,
        Mood::Sarcastic,
        Mood::Chatty,
        Mood::Mysterious,
        Mood::Poetic,
        Mood::Chill,
        Mood::Supportive,
    ];

    /// Lowercase label
    pub fn as_str(&self) -> &'static str {
        match self {
            Mood::Playful => "playful",
            Mood::Clingy => "clingy",
            Mood::Sarcastic => "sarcastic",
            Mood::Chatty => "chatty",
            Mood::Mysterious => "mysterious",
            Mood::Poetic => "poetic",
            Mood::Chill => "chill",
            Mood::Supportive => "supportive",
        }
    }

    /// Phrase interpolated into the persona prompt
    pub fn description(&self) -> &'static str {
        match self {
            Mood::Playful => "playful and teasing",
            Mood::Clingy => "clingy but trying to act cool",
            Mood::Sarcastic => "lowkey sarcastic and savage",
            Mood::Chatty => "super chatty and oversharing",
            Mood::Mysterious => "detached and mysterious",
            Mood::Poetic => "randomly deep and poetic",
            Mood::Chill => "chill and nonchalant",
            Mood::Supportive => "soft, caring and fully there for him",
        }
    }
}

impl std::fmt::Display for Mood {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-user persona state, owned by the engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonalityState {
    /// Owning user
    pub user_id: String,

    /// Current mood
    pub mood: Mood,

    /// Moods entered, oldest first
    pub mood_history: Vec<Mood>,

    /// Relationship depth proxy
    pub intimacy: u8,

    /// Last update time
    pub updated_at: DateTime<Utc>,
}

impl PersonalityState {
    /// Create a fresh state starting in `mood`
    pub fn new(user_id: impl Into<String>, mood: Mood, now: DateTime<Utc>) -> Self {
        Self {
            user_id: user_id.into(),
            mood,
            mood_history: vec![mood],
            intimacy: INTIMACY_MIN,
            updated_at: now,
        }
    }

    /// Switch mood, recording the change in the capped history
    pub fn set_mood(&mut self, mood: Mood, now: DateTime<Utc>) {
        if mood != self.mood {
            self.mood = mood;
            self.mood_history.push(mood);
            if self.mood_history.len() > MOOD_HISTORY_CAP {
                let excess = self.mood_history.len() - MOOD_HISTORY_CAP;
                self.mood_history.drain(..excess);
            }
        }
        self.updated_at = now;
    }

    /// Raise intimacy by one, saturating at the maximum
    pub fn raise_intimacy(&mut self) {
        self.intimacy = (self.intimacy.saturating_add(1)).clamp(INTIMACY_MIN, INTIMACY_MAX);
    }

    /// Explicit reset back to the minimum
    pub fn reset_intimacy(&mut self) {
        self.intimacy = INTIMACY_MIN;
    }

    /// Repair values read from an external store
    pub fn normalized(mut self) -> Self {
        self.intimacy = self.intimacy.clamp(INTIMACY_MIN, INTIMACY_MAX);
        if self.mood_history.len() > MOOD_HISTORY_CAP {
            let excess = self.mood_history.len() - MOOD_HISTORY_CAP;
            self.mood_history.drain(..excess);
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intimacy_saturates() {
        let mut state = PersonalityState::new("u1", Mood::Chill, Utc::now());
        for _ in 0..30 {
            state.raise_intimacy();
        }
        assert_eq!(state.intimacy, INTIMACY_MAX);
        state.reset_intimacy();
        assert_eq!(state.intimacy, INTIMACY_MIN);
    }

    #[test]
    fn test_mood_history_capped() {
        let now = Utc::now();
        let mut state = PersonalityState::new("u1", Mood::Chill, now);
        for i in 0..50 {
            let mood = Mood::ALL[i % Mood::ALL.len()];
            state.set_mood(mood, now);
        }
        assert!(state.mood_history.len() <= MOOD_HISTORY_CAP);
        assert_eq!(state.mood_history.last().copied(), Some(state.mood));
    }

    #[test]
    fn test_same_mood_not_recorded_twice() {
        let now = Utc::now();
        let mut state = PersonalityState::new("u1", Mood::Poetic, now);
        state.set_mood(Mood::Poetic, now);
        assert_eq!(state.mood_history, vec![Mood::Poetic]);
    }

    #[test]
    fn test_normalized_clamps_intimacy() {
        let mut state = PersonalityState::new("u1", Mood::Chill, Utc::now());
        state.intimacy = 0;
        assert_eq!(state.clone().normalized().intimacy, INTIMACY_MIN);
        state.intimacy = 42;
        assert_eq!(state.normalized().intimacy, INTIMACY_MAX);
    }
}
