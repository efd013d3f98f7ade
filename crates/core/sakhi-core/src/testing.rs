//! Test doubles for the generation and persistence seams

use crate::types::*;
use crate::{Result, SakhiError};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use std::collections::VecDeque;
use std::sync::Mutex;

/// Generator that replays scripted outcomes and records every prompt
pub struct ScriptedGenerator {
    responses: Mutex<VecDeque<Result<String>>>,
    repeat: Option<String>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedGenerator {
    /// Replay `responses` in order, then fail
    pub fn new(responses: impl IntoIterator<Item = Result<String>>) -> Self {
        Self {
            responses: Mutex::new(responses.into_iter().collect()),
            repeat: None,
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Always answer `text`
    pub fn always(text: impl Into<String>) -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
            repeat: Some(text.into()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Every prompt received so far
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Number of generate calls
    pub fn calls(&self) -> usize {
        self.prompts.lock().unwrap_or_else(|e| e.into_inner()).len()
    }
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn generate(&self, prompt: &str) -> Result<String> {
        self.prompts
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(prompt.to_string());
        let next = self
            .responses
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .pop_front();
        match (next, &self.repeat) {
            (Some(outcome), _) => outcome,
            (None, Some(text)) => Ok(text.clone()),
            (None, None) => Err(SakhiError::model("script exhausted")),
        }
    }
}

/// Store whose every call fails, for exercising degradation paths
#[derive(Debug, Default, Clone, Copy)]
pub struct FailingStore;

impl FailingStore {
    fn fail<T>() -> Result<T> {
        Err(SakhiError::database("store unavailable"))
    }
}

#[async_trait]
impl CompanionStore for FailingStore {
    fn name(&self) -> &str {
        "failing"
    }

    async fn get_profile(&self, _user_id: &str) -> Result<Option<UserProfile>> {
        Self::fail()
    }

    async fn upsert_profile(&self, _profile: &UserProfile) -> Result<()> {
        Self::fail()
    }

    async fn delete_user(&self, _user_id: &str) -> Result<()> {
        Self::fail()
    }

    async fn get_personality(&self, _user_id: &str) -> Result<Option<PersonalityState>> {
        Self::fail()
    }

    async fn upsert_personality(&self, _state: &PersonalityState) -> Result<()> {
        Self::fail()
    }

    async fn insert_turn(&self, _turn: &ConversationTurn) -> Result<()> {
        Self::fail()
    }

    async fn recent_turns(&self, _user_id: &str, _limit: usize) -> Result<Vec<ConversationTurn>> {
        Self::fail()
    }

    async fn get_availability(&self, _user_id: &str) -> Result<Option<AvailabilityWindow>> {
        Self::fail()
    }

    async fn put_availability(&self, _window: &AvailabilityWindow) -> Result<()> {
        Self::fail()
    }

    async fn clear_availability(&self, _user_id: &str) -> Result<()> {
        Self::fail()
    }

    async fn record_daily_interaction(
        &self,
        _user_id: &str,
        _date: NaiveDate,
    ) -> Result<DailyInteraction> {
        Self::fail()
    }
}

/// UTC instant from calendar parts; panics on invalid input (tests only)
pub fn utc(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, minute, 0)
        .single()
        .unwrap_or_else(|| panic!("invalid test timestamp {year}-{month}-{day} {hour}:{minute}"))
}
