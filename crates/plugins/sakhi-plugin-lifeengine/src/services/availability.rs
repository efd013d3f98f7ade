//! Availability Gate
//!
//! Three-state machine per user:
//!
//! - `Available`: no window; a Bernoulli trial may open one
//! - `AwaitingAck`: window running; acknowledgements get silence, anything
//!   else a reminder that quotes the stored excuse
//! - `CooldownElapsed`: window ran out; the next reply opens with a return
//!   line from that excuse's family and the window is cleared
//!
//! When the gate fires, the season's illness risk is rolled first; a hit
//! picks a Health excuse, otherwise the category is uniform.

use crate::evaluators::is_acknowledgement;
use crate::types::excuse::{self, Excuse, GENERIC_RETURN_LINE};
use crate::types::{ContextBundle, Season, TimeOfDay};
use chrono::{DateTime, Utc};
use sakhi_core::random::{pick, RandomSource};
use sakhi_core::{AvailabilityPhase, AvailabilityWindow, ExcuseCategory};

/// Minimum gate probability on a festival day
pub const FESTIVAL_MIN_PROBABILITY: f64 = 0.20;

/// Weekend multiplier
pub const WEEKEND_FACTOR: f64 = 0.5;

/// Base gate probability by time of day
pub fn base_probability(time_of_day: TimeOfDay) -> f64 {
    match time_of_day {
        TimeOfDay::Morning => 0.08,
        TimeOfDay::Afternoon => 0.12,
        TimeOfDay::Evening => 0.05,
        TimeOfDay::Night => 0.03,
    }
}

/// Gate probability for a turn, after weekend, festival and scale adjustments
pub fn unavailability_probability(context: &ContextBundle, scale: f64) -> f64 {
    let mut p = base_probability(context.time_of_day);
    if context.is_weekend {
        p *= WEEKEND_FACTOR;
    }
    if context.is_festival_day() {
        p = p.max(FESTIVAL_MIN_PROBABILITY);
    }
    (p * scale).clamp(0.0, 1.0)
}

/// What one inbound message looks like to the gate
#[derive(Debug, Clone, Copy)]
pub struct GateInput<'a> {
    /// User identifier
    pub user_id: &'a str,
    /// Raw user message
    pub message: &'a str,
    /// Stored window, if any
    pub window: Option<&'a AvailabilityWindow>,
    /// Turn context
    pub context: &'a ContextBundle,
    /// The user has never messaged before
    pub first_message: bool,
    /// The user is in distress
    pub distress: bool,
    /// Current instant
    pub now: DateTime<Utc>,
}

/// Gate decision for one message
#[derive(Debug, Clone, PartialEq)]
pub enum GateOutcome {
    /// Reply normally
    Proceed,
    /// The gate fired; store the window and send the apology
    WentAway {
        /// New window
        window: AvailabilityWindow,
        /// Apology text
        apology: String,
    },
    /// Still away; send a reminder, window unchanged
    Reminder {
        /// Active window
        window: AvailabilityWindow,
        /// Reminder text
        text: String,
    },
    /// Still away and the user acknowledged; send nothing
    Acknowledged {
        /// Window, now marked acknowledged
        window: AvailabilityWindow,
    },
    /// Window elapsed; clear it and open the reply with `return_line`
    Returned {
        /// The elapsed window
        window: AvailabilityWindow,
        /// Opening line of the reply
        return_line: String,
    },
}

/// Decides whether the persona is around to reply
#[derive(Debug, Clone)]
pub struct AvailabilityGate {
    scale: f64,
}

impl AvailabilityGate {
    /// Create a gate with a probability multiplier
    pub fn new(scale: f64) -> Self {
        Self {
            scale: scale.max(0.0),
        }
    }

    /// Probability multiplier
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Run the state machine for one message
    pub fn evaluate(&self, input: GateInput<'_>, rng: &mut dyn RandomSource) -> GateOutcome {
        let phase = sakhi_core::availability_phase(input.window, input.now);
        match (phase, input.window) {
            (AvailabilityPhase::AwaitingAck, Some(window)) => {
                if is_acknowledgement(input.message) {
                    let mut window = window.clone();
                    window.acknowledged = true;
                    tracing::debug!(user_id = input.user_id, "acknowledged while away");
                    GateOutcome::Acknowledged { window }
                } else {
                    GateOutcome::Reminder {
                        text: reminder_text(window, input.now),
                        window: window.clone(),
                    }
                }
            }
            (AvailabilityPhase::CooldownElapsed, Some(window)) => {
                let return_line = return_line(window, rng);
                tracing::info!(
                    user_id = input.user_id,
                    excuse = %window.excuse,
                    "availability window elapsed"
                );
                GateOutcome::Returned {
                    window: window.clone(),
                    return_line,
                }
            }
            _ => self.roll(input, rng),
        }
    }

    fn roll(&self, input: GateInput<'_>, rng: &mut dyn RandomSource) -> GateOutcome {
        if input.first_message || input.distress {
            return GateOutcome::Proceed;
        }

        let p = unavailability_probability(input.context, self.scale);
        if !rng.chance(p) {
            return GateOutcome::Proceed;
        }

        let Some(excuse) = choose_excuse(input.context.season, rng) else {
            return GateOutcome::Proceed;
        };
        let duration = rng.range_inclusive(excuse.min_minutes, excuse.max_minutes);
        let window = AvailabilityWindow::open(
            input.user_id,
            excuse.category,
            excuse.reason,
            input.now,
            duration,
        );

        tracing::info!(
            user_id = input.user_id,
            category = excuse.category.as_str(),
            excuse = excuse.reason,
            duration_minutes = duration,
            probability = p,
            "persona went unavailable"
        );

        GateOutcome::WentAway {
            apology: apology_text(&window),
            window,
        }
    }
}

fn choose_excuse(season: Season, rng: &mut dyn RandomSource) -> Option<&'static Excuse> {
    let category = if rng.chance(season.illness_risk()) {
        ExcuseCategory::Health
    } else {
        pick(rng, &ExcuseCategory::ALL).copied()?
    };
    let candidates = excuse::excuses_in(category);
    pick(rng, &candidates).copied()
}

/// First message after the gate fires
pub fn apology_text(window: &AvailabilityWindow) -> String {
    format!(
        "sorry, {} rn... {}",
        window.excuse,
        excuse::vague_return_phrase(window.duration_minutes)
    )
}

/// Reply to a non-acknowledging message while away
pub fn reminder_text(window: &AvailabilityWindow, now: DateTime<Utc>) -> String {
    match window.minutes_left(now) {
        0 | 1 => format!("still {}, almost done i promise", window.excuse),
        left => format!("told you na, still {}... give me {left} min?", window.excuse),
    }
}

/// Opening line after a window elapses, from the excuse's own family
pub fn return_line(window: &AvailabilityWindow, rng: &mut dyn RandomSource) -> String {
    excuse::find_excuse(&window.excuse)
        .and_then(|e| pick(rng, e.return_lines).copied())
        .unwrap_or(GENERIC_RETURN_LINE)
        .to_string()
}
