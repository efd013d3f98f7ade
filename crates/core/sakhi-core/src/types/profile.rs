//! User profile and relationship stage

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Ordered classification of how close the persona is to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationshipStage {
    /// Just met
    Stranger,
    /// Talked a few times
    Acquaintance,
    /// Comfortable
    Friend,
    /// Shares feelings
    CloseFriend,
    /// Together
    Partner,
}

impl RelationshipStage {
    /// Derive the stage from interaction counters
    pub fn from_counters(message_count: u64, emotional_count: u64) -> Self {
        match (message_count, emotional_count) {
            (0..=9, _) => RelationshipStage::Stranger,
            (10..=49, _) => RelationshipStage::Acquaintance,
            (m, e) if m < 150 || e < 10 => RelationshipStage::Friend,
            (m, e) if m < 400 || e < 40 => RelationshipStage::CloseFriend,
            _ => RelationshipStage::Partner,
        }
    }

    /// Lowercase label
    pub fn as_str(&self) -> &'static str {
        match self {
            RelationshipStage::Stranger => "stranger",
            RelationshipStage::Acquaintance => "acquaintance",
            RelationshipStage::Friend => "friend",
            RelationshipStage::CloseFriend => "close_friend",
            RelationshipStage::Partner => "partner",
        }
    }

    /// Tone guidance for the prompt
    pub fn tone(&self) -> &'static str {
        match self {
            RelationshipStage::Stranger => {
                "You just started talking. Be curious but guarded, don't get too personal yet."
            }
            RelationshipStage::Acquaintance => {
                "You've chatted a few times. You're warming up and tease him a little."
            }
            RelationshipStage::Friend => {
                "You're comfortable with him. Casual, honest, some inside jokes."
            }
            RelationshipStage::CloseFriend => {
                "You're really close. You share feelings and notice when something is off."
            }
            RelationshipStage::Partner => {
                "You're basically together. Affectionate, possessive in a cute way, deeply familiar."
            }
        }
    }
}

impl std::fmt::Display for RelationshipStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Persisted user profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Opaque user identifier
    pub user_id: String,

    /// Name the user told us, if any
    pub display_name: Option<String>,

    /// Messages received from this user
    pub message_count: u64,

    /// Messages classified as emotional
    pub emotional_count: u64,

    /// Derived from the counters
    pub relationship_stage: RelationshipStage,

    /// First contact
    pub created_at: DateTime<Utc>,

    /// Last message received
    pub last_interaction: DateTime<Utc>,
}

impl UserProfile {
    /// Create a profile on first contact
    pub fn new(user_id: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            user_id: user_id.into(),
            display_name: None,
            message_count: 0,
            emotional_count: 0,
            relationship_stage: RelationshipStage::Stranger,
            created_at: now,
            last_interaction: now,
        }
    }

    /// Count one inbound message and re-derive the stage
    pub fn record_message(&mut self, emotional: bool, now: DateTime<Utc>) {
        self.message_count += 1;
        if emotional {
            self.emotional_count += 1;
        }
        self.relationship_stage =
            RelationshipStage::from_counters(self.message_count, self.emotional_count);
        self.last_interaction = now;
    }

    /// Whole days since first contact
    pub fn days_known(&self, now: DateTime<Utc>) -> i64 {
        now.signed_duration_since(self.created_at).num_days().max(0)
    }

    /// Whole hours since the last message
    pub fn hours_since_last(&self, now: DateTime<Utc>) -> i64 {
        now.signed_duration_since(self.last_interaction)
            .num_hours()
            .max(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_stage_ladder_is_ordered() {
        assert!(RelationshipStage::Stranger < RelationshipStage::Acquaintance);
        assert!(RelationshipStage::CloseFriend < RelationshipStage::Partner);
    }

    #[test]
    fn test_stage_from_counters() {
        assert_eq!(RelationshipStage::from_counters(0, 0), RelationshipStage::Stranger);
        assert_eq!(RelationshipStage::from_counters(25, 0), RelationshipStage::Acquaintance);
        assert_eq!(RelationshipStage::from_counters(500, 5), RelationshipStage::Friend);
        assert_eq!(RelationshipStage::from_counters(200, 20), RelationshipStage::CloseFriend);
        assert_eq!(RelationshipStage::from_counters(500, 50), RelationshipStage::Partner);
    }

    #[test]
    fn test_record_message_updates_counters() {
        let start = Utc::now();
        let mut profile = UserProfile::new("u1", start);
        for _ in 0..10 {
            profile.record_message(true, start + Duration::minutes(5));
        }
        assert_eq!(profile.message_count, 10);
        assert_eq!(profile.emotional_count, 10);
        assert_eq!(profile.relationship_stage, RelationshipStage::Acquaintance);
        assert_eq!(profile.last_interaction, start + Duration::minutes(5));
    }

    #[test]
    fn test_elapsed_helpers_never_negative() {
        let now = Utc::now();
        let profile = UserProfile::new("u1", now + Duration::hours(2));
        assert_eq!(profile.hours_since_last(now), 0);
        assert_eq!(profile.days_known(now), 0);
    }
}
