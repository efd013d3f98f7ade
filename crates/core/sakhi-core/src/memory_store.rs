//! In-process companion store
//!
//! Used when no hosted database is reachable and as the reference
//! implementation in tests.

use crate::types::*;
use crate::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::HashMap;
use tokio::sync::RwLock;

#[derive(Default)]
struct Tables {
    profiles: HashMap<String, UserProfile>,
    personalities: HashMap<String, PersonalityState>,
    turns: HashMap<String, Vec<ConversationTurn>>,
    availability: HashMap<String, AvailabilityWindow>,
    daily: HashMap<(String, NaiveDate), u32>,
}

/// HashMap-backed [`CompanionStore`]
#[derive(Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl InMemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored turns for a user
    pub async fn turn_count(&self, user_id: &str) -> usize {
        self.tables
            .read()
            .await
            .turns
            .get(user_id)
            .map(Vec::len)
            .unwrap_or(0)
    }
}

#[async_trait]
impl CompanionStore for InMemoryStore {
    fn name(&self) -> &str {
        "memory"
    }

    async fn get_profile(&self, user_id: &str) -> Result<Option<UserProfile>> {
        Ok(self.tables.read().await.profiles.get(user_id).cloned())
    }

    async fn upsert_profile(&self, profile: &UserProfile) -> Result<()> {
        self.tables
            .write()
            .await
            .profiles
            .insert(profile.user_id.clone(), profile.clone());
        Ok(())
    }

    async fn delete_user(&self, user_id: &str) -> Result<()> {
        let mut tables = self.tables.write().await;
        tables.profiles.remove(user_id);
        tables.personalities.remove(user_id);
        tables.turns.remove(user_id);
        tables.availability.remove(user_id);
        tables.daily.retain(|(uid, _), _| uid != user_id);
        Ok(())
    }

    async fn get_personality(&self, user_id: &str) -> Result<Option<PersonalityState>> {
        Ok(self.tables.read().await.personalities.get(user_id).cloned())
    }

    async fn upsert_personality(&self, state: &PersonalityState) -> Result<()> {
        self.tables
            .write()
            .await
            .personalities
            .insert(state.user_id.clone(), state.clone());
        Ok(())
    }

    async fn insert_turn(&self, turn: &ConversationTurn) -> Result<()> {
        self.tables
            .write()
            .await
            .turns
            .entry(turn.user_id.clone())
            .or_default()
            .push(turn.clone());
        Ok(())
    }

    async fn recent_turns(&self, user_id: &str, limit: usize) -> Result<Vec<ConversationTurn>> {
        let tables = self.tables.read().await;
        let Some(turns) = tables.turns.get(user_id) else {
            return Ok(Vec::new());
        };
        let mut turns = turns.clone();
        turns.sort_by_key(|t| t.created_at);
        let skip = turns.len().saturating_sub(limit);
        Ok(turns.into_iter().skip(skip).collect())
    }

    async fn get_availability(&self, user_id: &str) -> Result<Option<AvailabilityWindow>> {
        Ok(self.tables.read().await.availability.get(user_id).cloned())
    }

    async fn put_availability(&self, window: &AvailabilityWindow) -> Result<()> {
        self.tables
            .write()
            .await
            .availability
            .insert(window.user_id.clone(), window.clone());
        Ok(())
    }

    async fn clear_availability(&self, user_id: &str) -> Result<()> {
        self.tables.write().await.availability.remove(user_id);
        Ok(())
    }

    async fn record_daily_interaction(
        &self,
        user_id: &str,
        date: NaiveDate,
    ) -> Result<DailyInteraction> {
        let mut tables = self.tables.write().await;
        let count = tables
            .daily
            .entry((user_id.to_string(), date))
            .or_insert(0);
        *count += 1;
        Ok(DailyInteraction {
            user_id: user_id.to_string(),
            date,
            turn_count: *count,
        })
    }
}
