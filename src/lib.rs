//! # League Stats
//!
//! Box scores and game leaders for a small recreational basketball league.
//!
//! ## Architecture
//!
//! - **models**: Core data structures (teams, players, games, stat records, settings)
//! - **calculate**: Derived stat fields, form input coercion and per-game leaders
//! - **storage**: Filesystem JSONL store with referential checks and cascades
//! - **schedule**: Read views for week schedules, game cards and admin pickers
//! - **api**: REST API endpoints
//! - **config**: Configuration loading and validation

pub mod api;
pub mod calculate;
pub mod config;
pub mod models;
pub mod schedule;
pub mod storage;

pub use models::*;
