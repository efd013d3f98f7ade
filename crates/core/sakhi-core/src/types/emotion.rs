//! Emotion and topic tags derived from user messages

use serde::{Deserialize, Serialize};

/// Emotion tag classified from a user message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Emotion {
    /// Under pressure
    Stressed,
    /// Down, hurt or lonely
    Sad,
    /// Angry at someone or something
    Angry,
    /// Annoyed or fed up
    Frustrated,
    /// Low on energy
    Tired,
    /// Affectionate towards the persona
    Romantic,
    /// Hyped about something
    Excited,
    /// Generally pleased
    Happy,
    /// Nothing going on
    Bored,
    /// No signal
    #[default]
    Neutral,
}

impl Emotion {
    /// Every tag, in classifier order
    pub const ALL: [Emotion; 10] = [
        Emotion::Stressed,
        Emotion::Sad,
        Emotion::Angry,
        Emotion::Frustrated,
        Emotion::Tired,
        Emotion::Romantic,
        Emotion::Excited,
        Emotion::Happy,
        Emotion::Bored,
        Emotion::Neutral,
    ];

    /// Lowercase label
    pub fn as_str(&self) -> &'static str {
        match self {
            Emotion::Stressed => "stressed",
            Emotion::Sad => "sad",
            Emotion::Angry => "angry",
            Emotion::Frustrated => "frustrated",
            Emotion::Tired => "tired",
            Emotion::Romantic => "romantic",
            Emotion::Excited => "excited",
            Emotion::Happy => "happy",
            Emotion::Bored => "bored",
            Emotion::Neutral => "neutral",
        }
    }

    /// Distress forces the supportive mood
    pub fn is_distress(&self) -> bool {
        matches!(
            self,
            Emotion::Sad | Emotion::Angry | Emotion::Frustrated | Emotion::Stressed
        )
    }

    /// Emotions that deepen intimacy
    pub fn is_high_affinity(&self) -> bool {
        matches!(self, Emotion::Romantic | Emotion::Happy | Emotion::Excited)
    }

    /// Whether the turn counts towards the emotional-conversation counter
    pub fn is_emotional(&self) -> bool {
        self.is_distress() || matches!(self, Emotion::Romantic)
    }
}

impl std::fmt::Display for Emotion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Topic tag extracted from a user message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Topic {
    /// Job, office, boss
    Work,
    /// College, exams
    Study,
    /// Parents, siblings
    Family,
    /// Friends and hangouts
    Friends,
    /// Food and eating out
    Food,
    /// Films and shows
    Movies,
    /// Songs and artists
    Music,
    /// Trips
    Travel,
    /// Feeling unwell
    Health,
    /// The two of us
    Relationship,
}

impl Topic {
    /// Lowercase label
    pub fn as_str(&self) -> &'static str {
        match self {
            Topic::Work => "work",
            Topic::Study => "study",
            Topic::Family => "family",
            Topic::Friends => "friends",
            Topic::Food => "food",
            Topic::Movies => "movies",
            Topic::Music => "music",
            Topic::Travel => "travel",
            Topic::Health => "health",
            Topic::Relationship => "relationship",
        }
    }
}

impl std::fmt::Display for Topic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
