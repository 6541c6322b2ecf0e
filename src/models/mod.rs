//! Core data models for the league tracker.

mod game;
mod ids;
mod leaders;
mod settings;
mod stat_record;
mod team;

pub use game::*;
pub use ids::*;
pub use leaders::*;
pub use settings::*;
pub use stat_record::*;
pub use team::*;
