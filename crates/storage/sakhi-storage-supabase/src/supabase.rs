//! Supabase companion store
//!
//! Implements [`CompanionStore`] over the PostgREST API. Rows map one-to-one
//! onto the core record types, so they are sent and read back as-is.

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::{header, Client};
use sakhi_core::{
    AvailabilityWindow, CompanionStore, ConversationTurn, Credentials, DailyInteraction,
    PersonalityState, Result, SakhiError, UserProfile,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

const PROFILES: &str = "user_profiles";
const PERSONALITIES: &str = "personality_states";
const TURNS: &str = "conversation_turns";
const AVAILABILITY: &str = "availability_windows";
const DAILY: &str = "daily_interactions";

/// Every table holding per-user rows
const USER_TABLES: [&str; 5] = [TURNS, AVAILABILITY, DAILY, PERSONALITIES, PROFILES];

/// Supabase configuration
#[derive(Clone)]
pub struct SupabaseConfig {
    /// Supabase project URL (e.g., https://xxx.supabase.co)
    pub url: String,
    /// Supabase anon/service key
    pub api_key: String,
}

impl std::fmt::Debug for SupabaseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SupabaseConfig")
            .field("url", &self.url)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

impl SupabaseConfig {
    /// Create a new Supabase configuration
    pub fn new(url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            url: url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    /// Build from validated credentials
    pub fn from_credentials(credentials: &Credentials) -> Self {
        Self::new(&credentials.supabase_url, &credentials.supabase_key)
    }
}

/// Supabase companion store using the PostgREST API
pub struct SupabaseAdapter {
    config: SupabaseConfig,
    client: Client,
}

impl SupabaseAdapter {
    /// Connect and verify the project answers.
    ///
    /// Fails if the endpoint is unreachable or rejects the key.
    pub async fn new(config: SupabaseConfig) -> Result<Self> {
        info!("Connecting to Supabase: {}", config.url);

        let mut headers = header::HeaderMap::new();
        headers.insert(
            "apikey",
            header::HeaderValue::from_str(&config.api_key)
                .map_err(|e| SakhiError::database(format!("Invalid API key: {}", e)))?,
        );
        headers.insert(
            header::AUTHORIZATION,
            header::HeaderValue::from_str(&format!("Bearer {}", config.api_key))
                .map_err(|e| SakhiError::database(format!("Invalid API key: {}", e)))?,
        );
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );
        headers.insert(
            "Prefer",
            header::HeaderValue::from_static("return=representation"),
        );

        let client = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| SakhiError::database(format!("Failed to create HTTP client: {}", e)))?;

        let health_url = format!("{}/rest/v1/", config.url);
        let response = client
            .get(&health_url)
            .send()
            .await
            .map_err(|e| SakhiError::database(format!("Failed to connect to Supabase: {}", e)))?;
        if response.status().is_client_error() || response.status().is_server_error() {
            return Err(SakhiError::database(format!(
                "Supabase health check failed ({})",
                response.status()
            )));
        }

        info!("Successfully connected to Supabase");

        Ok(Self { config, client })
    }

    /// Get the REST API URL for a table
    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.config.url, table)
    }

    /// Execute a SELECT query
    async fn select<T: for<'de> Deserialize<'de>>(
        &self,
        table: &str,
        query: &str,
    ) -> Result<Vec<T>> {
        let url = format!("{}?{}", self.table_url(table), query);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| SakhiError::database(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(SakhiError::database(format!(
                "Supabase query failed ({}): {}",
                status, body
            )));
        }

        response
            .json()
            .await
            .map_err(|e| SakhiError::database(format!("Failed to parse response: {}", e)))
    }

    /// Execute an INSERT query
    async fn insert<T: Serialize>(&self, table: &str, data: &T) -> Result<()> {
        let response = self
            .client
            .post(self.table_url(table))
            .json(data)
            .send()
            .await
            .map_err(|e| SakhiError::database(format!("Insert failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(SakhiError::database(format!(
                "Supabase insert failed ({}): {}",
                status, body
            )));
        }

        Ok(())
    }

    /// Execute an UPSERT query, merging on the `on_conflict` columns
    async fn upsert<T: Serialize>(&self, table: &str, data: &T, on_conflict: &str) -> Result<()> {
        let url = format!("{}?on_conflict={}", self.table_url(table), on_conflict);

        let response = self
            .client
            .post(&url)
            .header("Prefer", "resolution=merge-duplicates,return=representation")
            .json(data)
            .send()
            .await
            .map_err(|e| SakhiError::database(format!("Upsert failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(SakhiError::database(format!(
                "Supabase upsert failed ({}): {}",
                status, body
            )));
        }

        Ok(())
    }

    /// Execute a DELETE query
    async fn delete(&self, table: &str, filter: &str) -> Result<()> {
        let url = format!("{}?{}", self.table_url(table), filter);

        let response = self
            .client
            .delete(&url)
            .send()
            .await
            .map_err(|e| SakhiError::database(format!("Delete failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(SakhiError::database(format!(
                "Supabase delete failed ({}): {}",
                status, body
            )));
        }

        Ok(())
    }

    /// First row matching `user_id`, if any
    async fn select_one<T: for<'de> Deserialize<'de>>(
        &self,
        table: &str,
        user_id: &str,
    ) -> Result<Option<T>> {
        let rows: Vec<T> = self
            .select(table, &format!("{}&limit=1", user_filter(user_id)))
            .await?;
        Ok(rows.into_iter().next())
    }
}

/// PostgREST equality filter on `user_id`
fn user_filter(user_id: &str) -> String {
    format!("user_id=eq.{}", urlencoding::encode(user_id))
}

#[async_trait]
impl CompanionStore for SupabaseAdapter {
    fn name(&self) -> &str {
        "supabase"
    }

    async fn get_profile(&self, user_id: &str) -> Result<Option<UserProfile>> {
        self.select_one(PROFILES, user_id).await
    }

    async fn upsert_profile(&self, profile: &UserProfile) -> Result<()> {
        self.upsert(PROFILES, profile, "user_id").await
    }

    async fn delete_user(&self, user_id: &str) -> Result<()> {
        let filter = user_filter(user_id);
        for table in USER_TABLES {
            self.delete(table, &filter).await?;
        }
        debug!(user_id, "Deleted all Supabase rows for user");
        Ok(())
    }

    async fn get_personality(&self, user_id: &str) -> Result<Option<PersonalityState>> {
        self.select_one(PERSONALITIES, user_id).await
    }

    async fn upsert_personality(&self, state: &PersonalityState) -> Result<()> {
        self.upsert(PERSONALITIES, state, "user_id").await
    }

    async fn insert_turn(&self, turn: &ConversationTurn) -> Result<()> {
        self.insert(TURNS, turn).await
    }

    async fn recent_turns(&self, user_id: &str, limit: usize) -> Result<Vec<ConversationTurn>> {
        if limit == 0 {
            return Ok(Vec::new());
        }
        let query = format!(
            "{}&order=created_at.desc&limit={}",
            user_filter(user_id),
            limit
        );
        let mut turns: Vec<ConversationTurn> = self.select(TURNS, &query).await?;
        turns.reverse();
        Ok(turns)
    }

    async fn get_availability(&self, user_id: &str) -> Result<Option<AvailabilityWindow>> {
        self.select_one(AVAILABILITY, user_id).await
    }

    async fn put_availability(&self, window: &AvailabilityWindow) -> Result<()> {
        self.upsert(AVAILABILITY, window, "user_id").await
    }

    async fn clear_availability(&self, user_id: &str) -> Result<()> {
        self.delete(AVAILABILITY, &user_filter(user_id)).await
    }

    async fn record_daily_interaction(
        &self,
        user_id: &str,
        date: NaiveDate,
    ) -> Result<DailyInteraction> {
        let query = format!("{}&date=eq.{}&limit=1", user_filter(user_id), date);
        let existing: Vec<DailyInteraction> = self.select(DAILY, &query).await?;

        let updated = DailyInteraction {
            user_id: user_id.to_string(),
            date,
            turn_count: existing.first().map(|row| row.turn_count).unwrap_or(0) + 1,
        };
        self.upsert(DAILY, &updated, "user_id,date").await?;
        Ok(updated)
    }
}
