//! Per-turn context facts

use chrono::{NaiveDate, NaiveDateTime};
use sakhi_core::RelationshipStage;
use serde::{Deserialize, Serialize};

/// Coarse local time bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeOfDay {
    /// 05:00 to 11:59
    Morning,
    /// 12:00 to 16:59
    Afternoon,
    /// 17:00 to 20:59
    Evening,
    /// 21:00 to 04:59
    Night,
}

impl TimeOfDay {
    /// Bucket for a local hour (0-23)
    pub fn from_hour(hour: u32) -> Self {
        match hour {
            5..=11 => TimeOfDay::Morning,
            12..=16 => TimeOfDay::Afternoon,
            17..=20 => TimeOfDay::Evening,
            _ => TimeOfDay::Night,
        }
    }

    /// Lowercase label
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeOfDay::Morning => "morning",
            TimeOfDay::Afternoon => "afternoon",
            TimeOfDay::Evening => "evening",
            TimeOfDay::Night => "night",
        }
    }
}

/// Phase of the simulated 28-day cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CyclePhase {
    /// Days 0-4
    Menstrual,
    /// Days 5-12
    Follicular,
    /// Days 13-15
    Ovulation,
    /// Days 16-23
    Luteal,
    /// Days 24-27
    Premenstrual,
}

impl CyclePhase {
    /// Phase for a day offset within the cycle
    pub fn from_day(day: u32) -> Self {
        match day {
            0..=4 => CyclePhase::Menstrual,
            5..=12 => CyclePhase::Follicular,
            13..=15 => CyclePhase::Ovulation,
            16..=23 => CyclePhase::Luteal,
            _ => CyclePhase::Premenstrual,
        }
    }

    /// Lowercase label
    pub fn as_str(&self) -> &'static str {
        match self {
            CyclePhase::Menstrual => "menstrual",
            CyclePhase::Follicular => "follicular",
            CyclePhase::Ovulation => "ovulation",
            CyclePhase::Luteal => "luteal",
            CyclePhase::Premenstrual => "premenstrual",
        }
    }

    /// Mood tendency surfaced in the prompt
    pub fn mood_tendency(&self) -> Option<&'static str> {
        match self {
            CyclePhase::Menstrual => Some("low on energy, crampy and a bit irritable"),
            CyclePhase::Follicular => None,
            CyclePhase::Ovulation => Some("extra flirty and confident"),
            CyclePhase::Luteal => None,
            CyclePhase::Premenstrual => Some("moody, easily annoyed and craving sweets"),
        }
    }

    /// Multiplier on baseline energy
    pub fn energy_modifier(&self) -> f64 {
        match self {
            CyclePhase::Menstrual => 0.7,
            CyclePhase::Follicular => 1.1,
            CyclePhase::Ovulation => 1.2,
            CyclePhase::Luteal => 0.95,
            CyclePhase::Premenstrual => 0.8,
        }
    }
}

/// Indian seasons by calendar month
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Season {
    /// December to February
    Winter,
    /// March to May
    Summer,
    /// June to September
    Monsoon,
    /// October and November
    PostMonsoon,
}

impl Season {
    /// Season for a month (1-12)
    pub fn from_month(month: u32) -> Self {
        match month {
            3..=5 => Season::Summer,
            6..=9 => Season::Monsoon,
            10 | 11 => Season::PostMonsoon,
            _ => Season::Winter,
        }
    }

    /// Lowercase label
    pub fn as_str(&self) -> &'static str {
        match self {
            Season::Winter => "winter",
            Season::Summer => "summer",
            Season::Monsoon => "monsoon",
            Season::PostMonsoon => "post_monsoon",
        }
    }

    /// Chance that an unavailability window is a Health excuse
    pub fn illness_risk(&self) -> f64 {
        match self {
            Season::Winter => 0.15,
            Season::Summer => 0.10,
            Season::Monsoon => 0.25,
            Season::PostMonsoon => 0.08,
        }
    }

    /// Multiplier on baseline energy
    pub fn energy_modifier(&self) -> f64 {
        match self {
            Season::Winter => 0.9,
            Season::Summer => 0.8,
            Season::Monsoon => 0.95,
            Season::PostMonsoon => 1.1,
        }
    }
}

/// A calendar event near the current date
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventMatch {
    /// Event name
    pub name: String,
    /// Days until (upcoming) or since (recent)
    pub days: i64,
}

/// Everything derived from the clock and the profile for one turn
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextBundle {
    /// Local wall-clock time
    pub local_time: NaiveDateTime,
    /// Local calendar date
    pub local_date: NaiveDate,
    /// English weekday name
    pub weekday: String,
    /// Saturday or Sunday
    pub is_weekend: bool,
    /// Time bucket
    pub time_of_day: TimeOfDay,
    /// Day offset within the cycle
    pub cycle_day: u32,
    /// Cycle phase
    pub cycle_phase: CyclePhase,
    /// Season
    pub season: Season,
    /// Festival falling on the local date
    pub festival_today: Option<String>,
    /// Nearest event in the coming week
    pub upcoming_event: Option<EventMatch>,
    /// Most recent event in the past week
    pub recent_event: Option<EventMatch>,
    /// Name the user told us
    pub display_name: Option<String>,
    /// Relationship stage
    pub relationship_stage: RelationshipStage,
    /// Whole days since first contact
    pub days_known: i64,
    /// Whole hours since the previous message
    pub hours_since_last: i64,
    /// No message has been received from this user yet
    pub first_contact: bool,
}

impl ContextBundle {
    /// Combined energy level relative to baseline
    pub fn energy(&self) -> f64 {
        self.cycle_phase.energy_modifier() * self.season.energy_modifier()
    }

    /// Whether a festival falls on the local date
    pub fn is_festival_day(&self) -> bool {
        self.festival_today.is_some()
    }

    /// Prompt-ready notes, one per line
    pub fn notes(&self) -> Vec<String> {
        let mut notes = vec![format!(
            "It's {} {} ({}), {} season.",
            self.weekday,
            self.time_of_day.as_str(),
            self.local_time.format("%H:%M"),
            self.season.as_str().replace('_', "-")
        )];

        if let Some(festival) = &self.festival_today {
            notes.push(format!("Today is {festival}."));
        }
        if let Some(event) = &self.upcoming_event {
            notes.push(format!("{} is in {} day(s).", event.name, event.days));
        }
        if let Some(event) = &self.recent_event {
            notes.push(format!("{} was {} day(s) ago.", event.name, event.days));
        }
        if let Some(tendency) = self.cycle_phase.mood_tendency() {
            notes.push(format!("Lately you've been feeling {tendency}."));
        }

        let energy = self.energy();
        if energy < 0.8 {
            notes.push("Your energy is low today.".to_string());
        } else if energy > 1.15 {
            notes.push("You're feeling energetic today.".to_string());
        }

        if self.hours_since_last >= 24 {
            notes.push(format!(
                "He hasn't texted in {} day(s).",
                self.hours_since_last / 24
            ));
        }
        notes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_buckets() {
        assert_eq!(TimeOfDay::from_hour(5), TimeOfDay::Morning);
        assert_eq!(TimeOfDay::from_hour(11), TimeOfDay::Morning);
        assert_eq!(TimeOfDay::from_hour(12), TimeOfDay::Afternoon);
        assert_eq!(TimeOfDay::from_hour(17), TimeOfDay::Evening);
        assert_eq!(TimeOfDay::from_hour(20), TimeOfDay::Evening);
        assert_eq!(TimeOfDay::from_hour(21), TimeOfDay::Night);
        assert_eq!(TimeOfDay::from_hour(0), TimeOfDay::Night);
        assert_eq!(TimeOfDay::from_hour(4), TimeOfDay::Night);
    }

    #[test]
    fn test_cycle_phase_boundaries() {
        assert_eq!(CyclePhase::from_day(0), CyclePhase::Menstrual);
        assert_eq!(CyclePhase::from_day(4), CyclePhase::Menstrual);
        assert_eq!(CyclePhase::from_day(5), CyclePhase::Follicular);
        assert_eq!(CyclePhase::from_day(13), CyclePhase::Ovulation);
        assert_eq!(CyclePhase::from_day(16), CyclePhase::Luteal);
        assert_eq!(CyclePhase::from_day(24), CyclePhase::Premenstrual);
        assert_eq!(CyclePhase::from_day(27), CyclePhase::Premenstrual);
    }

    #[test]
    fn test_seasons() {
        assert_eq!(Season::from_month(1), Season::Winter);
        assert_eq!(Season::from_month(12), Season::Winter);
        assert_eq!(Season::from_month(4), Season::Summer);
        assert_eq!(Season::from_month(7), Season::Monsoon);
        assert_eq!(Season::from_month(10), Season::PostMonsoon);
        assert!(Season::Monsoon.illness_risk() > Season::PostMonsoon.illness_risk());
    }
}
