//! Context Provider
//!
//! Derives the time, cycle, season, calendar and relationship facts for a
//! turn. Pure: the same instant, offset and profile always give the same
//! bundle.

use super::calendar;
use crate::types::{ContextBundle, CyclePhase, Season, TimeOfDay};
use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, Timelike, Utc};
use once_cell::sync::Lazy;
use sakhi_core::{RelationshipStage, UserProfile};

/// Length of the simulated cycle in days
pub const CYCLE_LENGTH: i64 = 28;

/// How far ahead and behind calendar events are reported
pub const EVENT_WINDOW_DAYS: i64 = 7;

/// Day zero of the cycle
pub static CYCLE_EPOCH: Lazy<NaiveDate> =
    Lazy::new(|| NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or_default());

/// Offset of `date` within the cycle
pub fn cycle_day(date: NaiveDate) -> u32 {
    date.signed_duration_since(*CYCLE_EPOCH)
        .num_days()
        .rem_euclid(CYCLE_LENGTH) as u32
}

/// Build the context bundle for one turn
pub fn derive_context(
    now: DateTime<Utc>,
    tz: FixedOffset,
    profile: Option<&UserProfile>,
) -> ContextBundle {
    let local_time = now.with_timezone(&tz).naive_local();
    let local_date = local_time.date();
    let weekday = local_date.weekday();
    let day = cycle_day(local_date);

    let (display_name, relationship_stage, days_known, hours_since_last, first_contact) =
        match profile {
            Some(p) => (
                p.display_name.clone(),
                p.relationship_stage,
                p.days_known(now),
                p.hours_since_last(now),
                p.message_count == 0,
            ),
            None => (None, RelationshipStage::Stranger, 0, 0, true),
        };

    let bundle = ContextBundle {
        local_time,
        local_date,
        weekday: local_date.format("%A").to_string(),
        is_weekend: weekday.number_from_monday() >= 6,
        time_of_day: TimeOfDay::from_hour(local_time.hour()),
        cycle_day: day,
        cycle_phase: CyclePhase::from_day(day),
        season: Season::from_month(local_date.month()),
        festival_today: calendar::festival_on(local_date).map(str::to_string),
        upcoming_event: calendar::upcoming_event(local_date, EVENT_WINDOW_DAYS),
        recent_event: calendar::recent_event(local_date, EVENT_WINDOW_DAYS),
        display_name,
        relationship_stage,
        days_known,
        hours_since_last,
        first_contact,
    };

    tracing::debug!(
        time_of_day = bundle.time_of_day.as_str(),
        cycle_phase = bundle.cycle_phase.as_str(),
        season = bundle.season.as_str(),
        festival = ?bundle.festival_today,
        stage = %bundle.relationship_stage,
        "ContextProvider: derived turn context"
    );

    bundle
}
