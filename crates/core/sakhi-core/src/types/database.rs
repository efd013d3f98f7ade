//! Persistence backend seam

use super::{AvailabilityWindow, ConversationTurn, PersonalityState, UserProfile};
use crate::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Per-user, per-day turn counter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyInteraction {
    /// Owning user
    pub user_id: String,
    /// Local calendar date
    pub date: NaiveDate,
    /// Turns recorded that day
    pub turn_count: u32,
}

/// Record collections keyed by user identifier.
///
/// Writes are last-write-wins; a user's turns are strictly sequential so there
/// is never more than one writer per identifier.
#[async_trait]
pub trait CompanionStore: Send + Sync {
    /// Backend name, used in logs
    fn name(&self) -> &str;

    /// Load a profile
    async fn get_profile(&self, user_id: &str) -> Result<Option<UserProfile>>;

    /// Insert or replace a profile
    async fn upsert_profile(&self, profile: &UserProfile) -> Result<()>;

    /// Remove every record belonging to a user
    async fn delete_user(&self, user_id: &str) -> Result<()>;

    /// Load personality state
    async fn get_personality(&self, user_id: &str) -> Result<Option<PersonalityState>>;

    /// Insert or replace personality state
    async fn upsert_personality(&self, state: &PersonalityState) -> Result<()>;

    /// Append a turn
    async fn insert_turn(&self, turn: &ConversationTurn) -> Result<()>;

    /// The most recent `limit` turns, returned oldest first
    async fn recent_turns(&self, user_id: &str, limit: usize) -> Result<Vec<ConversationTurn>>;

    /// Load the active availability window
    async fn get_availability(&self, user_id: &str) -> Result<Option<AvailabilityWindow>>;

    /// Store the availability window, replacing any existing one
    async fn put_availability(&self, window: &AvailabilityWindow) -> Result<()>;

    /// Remove the availability window
    async fn clear_availability(&self, user_id: &str) -> Result<()>;

    /// Count one turn on `date` and return the updated aggregate
    async fn record_daily_interaction(
        &self,
        user_id: &str,
        date: NaiveDate,
    ) -> Result<DailyInteraction>;
}
