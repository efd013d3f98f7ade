//! Simulated unavailability windows

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Excuse categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExcuseCategory {
    /// Office or college work
    Work,
    /// Not feeling well
    Health,
    /// Family and errands
    Personal,
}

impl ExcuseCategory {
    /// All categories
    pub const ALL: [ExcuseCategory; 3] = [
        ExcuseCategory::Work,
        ExcuseCategory::Health,
        ExcuseCategory::Personal,
    ];

    /// Lowercase label
    pub fn as_str(&self) -> &'static str {
        match self {
            ExcuseCategory::Work => "work",
            ExcuseCategory::Health => "health",
            ExcuseCategory::Personal => "personal",
        }
    }
}

/// Where a user is in the availability state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AvailabilityPhase {
    /// No window active
    Available,
    /// Window active and still running
    AwaitingAck,
    /// Window active but its duration has run out
    CooldownElapsed,
}

/// An active unavailability window. At most one exists per user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AvailabilityWindow {
    /// Owning user
    pub user_id: String,

    /// Excuse category
    pub category: ExcuseCategory,

    /// Excuse text, fixed for the lifetime of the window
    pub excuse: String,

    /// When the window opened
    pub started_at: DateTime<Utc>,

    /// How long the persona stays away
    pub duration_minutes: u32,

    /// The user acknowledged the apology
    pub acknowledged: bool,
}

impl AvailabilityWindow {
    /// Open a window
    pub fn open(
        user_id: impl Into<String>,
        category: ExcuseCategory,
        excuse: impl Into<String>,
        started_at: DateTime<Utc>,
        duration_minutes: u32,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            category,
            excuse: excuse.into(),
            started_at,
            duration_minutes,
            acknowledged: false,
        }
    }

    /// When the window runs out
    pub fn ends_at(&self) -> DateTime<Utc> {
        self.started_at + Duration::minutes(i64::from(self.duration_minutes))
    }

    /// Whether the duration has run out at `now`
    pub fn is_elapsed(&self, now: DateTime<Utc>) -> bool {
        now >= self.ends_at()
    }

    /// Minutes remaining, zero once elapsed
    pub fn minutes_left(&self, now: DateTime<Utc>) -> i64 {
        self.ends_at().signed_duration_since(now).num_minutes().max(0)
    }

    /// Phase at `now`
    pub fn phase(&self, now: DateTime<Utc>) -> AvailabilityPhase {
        if self.is_elapsed(now) {
            AvailabilityPhase::CooldownElapsed
        } else {
            AvailabilityPhase::AwaitingAck
        }
    }
}

/// Phase for an optional window
pub fn availability_phase(
    window: Option<&AvailabilityWindow>,
    now: DateTime<Utc>,
) -> AvailabilityPhase {
    window
        .map(|w| w.phase(now))
        .unwrap_or(AvailabilityPhase::Available)
}
