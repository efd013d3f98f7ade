//! Conversation turns

use super::{Emotion, Mood};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// How a turn's reply was produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnKind {
    /// Normal generated reply
    Reply,
    /// Generation failed and an in-character fallback was used
    Fallback,
    /// The availability gate fired
    Unavailable,
    /// Reminder while unavailable
    Reminder,
    /// Acknowledged while unavailable, nothing sent
    Silent,
    /// First reply after an availability window
    Returned,
    /// Persona texted first
    Proactive,
}

impl TurnKind {
    /// Lowercase label
    pub fn as_str(&self) -> &'static str {
        match self {
            TurnKind::Reply => "reply",
            TurnKind::Fallback => "fallback",
            TurnKind::Unavailable => "unavailable",
            TurnKind::Reminder => "reminder",
            TurnKind::Silent => "silent",
            TurnKind::Returned => "returned",
            TurnKind::Proactive => "proactive",
        }
    }
}

/// One user message plus the reply. Immutable once stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationTurn {
    /// Turn identifier
    pub id: Uuid,

    /// Owning user
    pub user_id: String,

    /// What the user sent (empty for proactive turns)
    pub user_message: String,

    /// What the persona sent (empty for silent turns)
    pub reply: String,

    /// Classified user emotion
    pub emotion: Emotion,

    /// Persona mood when replying
    pub mood: Mood,

    /// Free-form context blob
    pub context: serde_json::Value,

    /// When the turn happened
    pub created_at: DateTime<Utc>,
}

impl ConversationTurn {
    /// Create a new turn
    pub fn new(
        user_id: impl Into<String>,
        user_message: impl Into<String>,
        reply: impl Into<String>,
        emotion: Emotion,
        mood: Mood,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id: user_id.into(),
            user_message: user_message.into(),
            reply: reply.into(),
            emotion,
            mood,
            context: serde_json::Value::Null,
            created_at,
        }
    }

    /// Attach the context blob
    pub fn with_context(mut self, context: serde_json::Value) -> Self {
        self.context = context;
        self
    }
}
