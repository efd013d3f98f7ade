//! Core types for Sakhi

mod availability;
mod database;
mod emotion;
mod model;
mod personality;
mod profile;
mod turn;

pub use availability::*;
pub use database::*;
pub use emotion::*;
pub use model::*;
pub use personality::*;
pub use profile::*;
pub use turn::*;
