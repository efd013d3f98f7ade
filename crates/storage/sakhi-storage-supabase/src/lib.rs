//! Sakhi Supabase Store
//!
//! Companion store backed by Supabase through its PostgREST API. Expects the
//! `user_profiles`, `personality_states`, `conversation_turns`,
//! `availability_windows` and `daily_interactions` tables, each keyed by
//! `user_id` (`daily_interactions` by `user_id, date`).

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod supabase;

pub use supabase::{SupabaseAdapter, SupabaseConfig};
