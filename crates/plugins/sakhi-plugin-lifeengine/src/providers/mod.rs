//! Life Engine Providers
//!
//! Providers that derive turn context from the clock and the stored profile.

pub mod calendar;
mod context;

pub use calendar::{festival_on, recent_event, upcoming_event, CalendarEvent, CALENDAR};
pub use context::*;
