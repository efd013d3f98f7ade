//! Festival and holiday calendar

use crate::types::EventMatch;
use chrono::{Datelike, NaiveDate};

/// When an event happens
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventDate {
    /// Same month and day every year
    Annual {
        /// Month (1-12)
        month: u32,
        /// Day of month
        day: u32,
    },
    /// A single dated occurrence (lunar festivals move every year)
    Fixed {
        /// Year
        year: i32,
        /// Month (1-12)
        month: u32,
        /// Day of month
        day: u32,
    },
}

/// A named calendar event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarEvent {
    /// Display name
    pub name: &'static str,
    /// Date rule
    pub date: EventDate,
}

const fn annual(name: &'static str, month: u32, day: u32) -> CalendarEvent {
    CalendarEvent {
        name,
        date: EventDate::Annual { month, day },
    }
}

const fn fixed(name: &'static str, year: i32, month: u32, day: u32) -> CalendarEvent {
    CalendarEvent {
        name,
        date: EventDate::Fixed { year, month, day },
    }
}

/// Static event table
pub static CALENDAR: &[CalendarEvent] = &[
    annual("New Year's Day", 1, 1),
    annual("Republic Day", 1, 26),
    annual("Valentine's Day", 2, 14),
    annual("Independence Day", 8, 15),
    annual("Gandhi Jayanti", 10, 2),
    annual("Christmas", 12, 25),
    annual("New Year's Eve", 12, 31),
    fixed("Holi", 2025, 3, 14),
    fixed("Holi", 2026, 3, 4),
    fixed("Holi", 2027, 3, 22),
    fixed("Raksha Bandhan", 2025, 8, 9),
    fixed("Raksha Bandhan", 2026, 8, 28),
    fixed("Raksha Bandhan", 2027, 8, 17),
    fixed("Navratri", 2025, 9, 22),
    fixed("Navratri", 2026, 10, 11),
    fixed("Navratri", 2027, 9, 30),
    fixed("Diwali", 2025, 10, 20),
    fixed("Diwali", 2026, 11, 8),
    fixed("Diwali", 2027, 10, 29),
];

impl CalendarEvent {
    /// Concrete dates of this event in the years around `date`
    fn occurrences_near(&self, date: NaiveDate) -> Vec<NaiveDate> {
        match self.date {
            EventDate::Annual { month, day } => (date.year() - 1..=date.year() + 1)
                .filter_map(|year| NaiveDate::from_ymd_opt(year, month, day))
                .collect(),
            EventDate::Fixed { year, month, day } => {
                NaiveDate::from_ymd_opt(year, month, day).into_iter().collect()
            }
        }
    }

    /// Signed day distances from `date` to each nearby occurrence
    fn offsets_from(&self, date: NaiveDate) -> impl Iterator<Item = i64> + '_ {
        self.occurrences_near(date)
            .into_iter()
            .map(move |d| d.signed_duration_since(date).num_days())
    }
}

/// Festival falling exactly on `date`
pub fn festival_on(date: NaiveDate) -> Option<&'static str> {
    CALENDAR
        .iter()
        .find(|event| event.offsets_from(date).any(|offset| offset == 0))
        .map(|event| event.name)
}

/// Nearest event 1..=`window_days` days after `date`
pub fn upcoming_event(date: NaiveDate, window_days: i64) -> Option<EventMatch> {
    CALENDAR
        .iter()
        .flat_map(|event| {
            event
                .offsets_from(date)
                .filter(|offset| (1..=window_days).contains(offset))
                .map(move |days| (event.name, days))
        })
        .min_by_key(|(_, days)| *days)
        .map(|(name, days)| EventMatch {
            name: name.to_string(),
            days,
        })
}

/// Most recent event 1..=`window_days` days before `date`
pub fn recent_event(date: NaiveDate, window_days: i64) -> Option<EventMatch> {
    CALENDAR
        .iter()
        .flat_map(|event| {
            event
                .offsets_from(date)
                .filter(|offset| (-window_days..=-1).contains(offset))
                .map(move |offset| (event.name, -offset))
        })
        .min_by_key(|(_, days)| *days)
        .map(|(name, days)| EventMatch {
            name: name.to_string(),
            days,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_festival_on_exact_date() {
        assert_eq!(festival_on(date(2026, 11, 8)), Some("Diwali"));
        assert_eq!(festival_on(date(2031, 8, 15)), Some("Independence Day"));
        assert_eq!(festival_on(date(2026, 11, 9)), None);
    }

    #[test]
    fn test_upcoming_event_within_window() {
        let upcoming = upcoming_event(date(2026, 11, 3), 7).unwrap();
        assert_eq!(upcoming.name, "Diwali");
        assert_eq!(upcoming.days, 5);
        assert!(upcoming_event(date(2026, 11, 8), 0).is_none());
    }

    #[test]
    fn test_upcoming_wraps_year_end() {
        let upcoming = upcoming_event(date(2026, 12, 28), 7).unwrap();
        assert_eq!(upcoming.name, "New Year's Eve");
        assert_eq!(upcoming.days, 3);
    }

    #[test]
    fn test_recent_event() {
        let recent = recent_event(date(2027, 1, 2), 7).unwrap();
        assert_eq!(recent.name, "New Year's Day");
        assert_eq!(recent.days, 1);
        assert!(recent_event(date(2026, 7, 1), 7).is_none());
    }
}
