//! Emotion Evaluator
//!
//! Keyword classification of inbound messages: emotion tag, topics, a name
//! the user volunteers, and whether the message is a bare acknowledgement.

use once_cell::sync::Lazy;
use regex::Regex;
use sakhi_core::utils::capitalize;
use sakhi_core::{Emotion, Topic};

/// Per-emotion keyword lists, checked in order; the first hit wins.
static EMOTION_KEYWORDS: &[(Emotion, &[&str])] = &[
    (
        Emotion::Stressed,
        &[
            "stress", "deadline", "pressure", "tension", "anxious", "anxiety",
            "overwhelmed", "panic", "so much work",
        ],
    ),
    (
        Emotion::Sad,
        &[
            "sad", "lonely", "crying", "depressed", "heartbroken", "feel low",
            "feeling low", "hurt", "upset",
        ],
    ),
    (
        Emotion::Angry,
        &["angry", "furious", "pissed", "i hate", "gussa", "mad at"],
    ),
    (
        Emotion::Frustrated,
        &[
            "frustrat", "annoyed", "annoying", "irritat", "fed up", "sick of", "nothing works",
            "wtf",
        ],
    ),
    (
        Emotion::Tired,
        &["tired", "exhausted", "sleepy", "drained", "no energy", "thak gaya", "thaka"],
    ),
    (
        Emotion::Romantic,
        &[
            "love you", "miss you", "cute", "babe", "baby", "kiss", "a date",
            "crush", "jaan", "hug",
        ],
    ),
    (
        Emotion::Excited,
        &[
            "excited", "can't wait", "cant wait", "omg", "yay", "guess what",
            "finally",
        ],
    ),
    (
        Emotion::Happy,
        &[
            "happy", "great day", "good news", "awesome", "amazing", "glad",
            "good mood",
        ],
    ),
    (
        Emotion::Bored,
        &["bored", "boring", "nothing to do", "timepass"],
    ),
];

/// Topic keyword lists in table order
static TOPIC_KEYWORDS: &[(Topic, &[&str])] = &[
    (
        Topic::Work,
        &["work", "office", "boss", "meeting", "job", "deadline", "client", "manager"],
    ),
    (
        Topic::Study,
        &["exam", "college", "study", "studies", "assignment", "semester", "lecture"],
    ),
    (
        Topic::Family,
        &[
            "mummy", "papa", "my mom", "my dad", "family", "brother", "sister",
            "parents",
        ],
    ),
    (
        Topic::Friends,
        &["friends", "my friend", "bestie", "gang", "party"],
    ),
    (
        Topic::Food,
        &[
            "food", "eating", "hungry", "dinner", "lunch", "breakfast", "biryani",
            "chai", "pizza",
        ],
    ),
    (
        Topic::Movies,
        &["movie", "film", "netflix", "series", "bollywood", "web show"],
    ),
    (
        Topic::Music,
        &["song", "music", "playlist", "concert", "singer"],
    ),
    (
        Topic::Travel,
        &["trip", "travel", "vacation", "flight", "goa", "holiday"],
    ),
    (
        Topic::Health,
        &[
            "fever", "headache", "feeling sick", "doctor", "medicine", "cough",
            "unwell",
        ],
    ),
    (
        Topic::Relationship,
        &["relationship", "girlfriend", "love you", "miss you", "a date", "us two"],
    ),
];

/// Patterns that introduce a name; the first capture is the name
static NAME_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)\bmy name is\s+([a-z]{2,20})\b",
        r"(?i)\bmy name's\s+([a-z]{2,20})\b",
        r"(?i)\bcall me\s+([a-z]{2,20})\b",
        r"(?i)\bmera naam\s+([a-z]{2,20})\b",
        r"(?i)\bthis is\s+([a-z]{2,20})\s+here\b",
        r"(?i)\bi am\s+([a-z]{2,20}),?\s+by the way\b",
        r"(?i)\bi'm\s+([a-z]{2,20}),?\s+btw\b",
    ]
    .iter()
    .filter_map(|pattern| match Regex::new(pattern) {
        Ok(re) => Some(re),
        Err(e) => {
            tracing::error!(pattern, error = %e, "invalid name pattern");
            None
        }
    })
    .collect()
});

/// Words that follow "call me" and friends but are not names
const NOT_NAMES: &[&str] = &[
    "back", "later", "baby", "babe", "maybe", "now", "please", "tomorrow", "tonight",
    "crazy", "not", "so", "very", "just", "here", "there",
];

/// Words that make up a bare acknowledgement
const ACK_WORDS: &[&str] = &[
    "ok", "okay", "okk", "okie", "k", "kk", "cool", "fine", "sure", "np", "alright",
    "hmm", "hm", "acha", "accha", "achha", "haan", "han", "ya", "yeah", "yep", "yes",
    "oh", "ohh", "understood", "right", "totally",
];

/// Multi-word acknowledgements; their words don't count on their own
const ACK_PHRASES: &[&[&str]] = &[
    &["theek", "hai"],
    &["thik", "hai"],
    &["no", "problem"],
    &["no", "worries"],
    &["got", "it"],
    &["take", "your", "time"],
    &["sounds", "good"],
    &["all", "good"],
    &["of", "course"],
    &["all", "the", "best"],
];

/// Longest message still treated as an acknowledgement
const ACK_MAX_WORDS: usize = 6;

/// Classify the emotion of a message
pub fn classify_emotion(text: &str) -> Emotion {
    let lower = text.to_lowercase();
    EMOTION_KEYWORDS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| lower.contains(k)))
        .map(|(emotion, _)| *emotion)
        .unwrap_or(Emotion::Neutral)
}

/// Every topic mentioned, in table order
pub fn extract_topics(text: &str) -> Vec<Topic> {
    let lower = text.to_lowercase();
    TOPIC_KEYWORDS
        .iter()
        .filter(|(_, keywords)| keywords.iter().any(|k| lower.contains(k)))
        .map(|(topic, _)| *topic)
        .collect()
}

/// A name the user introduces themselves with, capitalised
pub fn extract_name(text: &str) -> Option<String> {
    NAME_PATTERNS
        .iter()
        .filter_map(|re| re.captures(text))
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().to_lowercase())
        .find(|candidate| !NOT_NAMES.contains(&candidate.as_str()))
        .map(|name| capitalize(&name))
}

/// Short message made only of agreement words ("okay cool", "np take your time")
pub fn is_acknowledgement(text: &str) -> bool {
    let lower = text.to_lowercase();
    let words: Vec<&str> = lower
        .split(|c: char| !(c.is_alphanumeric() || c == '\''))
        .filter(|w| !w.is_empty())
        .collect();

    if words.is_empty() || words.len() > ACK_MAX_WORDS {
        return false;
    }

    let mut rest = words.as_slice();
    while let Some(first) = rest.first() {
        if let Some(phrase) = ACK_PHRASES.iter().find(|phrase| rest.starts_with(phrase)) {
            rest = &rest[phrase.len()..];
        } else if ACK_WORDS.contains(first) {
            rest = &rest[1..];
        } else {
            return false;
        }
    }
    true
}

/// Everything the classifier extracts from one message
#[derive(Debug, Clone, PartialEq)]
pub struct MessageAnalysis {
    /// Emotion tag
    pub emotion: Emotion,
    /// Topics mentioned
    pub topics: Vec<Topic>,
    /// Volunteered name
    pub name: Option<String>,
    /// Bare acknowledgement
    pub acknowledgement: bool,
}

/// Evaluator that analyses each inbound message
pub struct EmotionEvaluator;

impl EmotionEvaluator {
    /// Create a new evaluator
    pub fn new() -> Self {
        Self
    }

    /// Run every classifier over `text`
    pub fn analyze(&self, text: &str) -> MessageAnalysis {
        let analysis = MessageAnalysis {
            emotion: classify_emotion(text),
            topics: extract_topics(text),
            name: extract_name(text),
            acknowledgement: is_acknowledgement(text),
        };

        tracing::debug!(
            emotion = %analysis.emotion,
            topics = ?analysis.topics,
            acknowledgement = analysis.acknowledgement,
            "EmotionEvaluator: classified message"
        );

        analysis
    }
}

impl Default for EmotionEvaluator {
    fn default() -> Self {
        Self::new()
    }
}
