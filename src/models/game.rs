//! Scheduled and completed games.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::{EntityId, GameId, TeamId};

/// Lifecycle status of a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum GameStatus {
    Scheduled,
    /// Games entered by an admin after the fact are already final.
    #[default]
    Completed,
}

impl std::fmt::Display for GameStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GameStatus::Scheduled => write!(f, "scheduled"),
            GameStatus::Completed => write!(f, "completed"),
        }
    }
}

/// One game between two teams in a given season and week.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Game {
    pub id: GameId,

    pub season: u32,

    pub week: u32,

    pub date: NaiveDate,

    pub team1_id: TeamId,

    pub team2_id: TeamId,

    #[serde(default)]
    pub team1_score: u32,

    #[serde(default)]
    pub team2_score: u32,

    #[serde(default)]
    pub status: GameStatus,

    pub created_at: DateTime<Utc>,
}

impl Game {
    pub fn new(season: u32, week: u32, date: NaiveDate, team1_id: TeamId, team2_id: TeamId) -> Self {
        let created_at = Utc::now();
        let id = EntityId::for_new(
            "game",
            &[
                &season.to_string(),
                &week.to_string(),
                &date.to_string(),
                team1_id.as_str(),
                team2_id.as_str(),
            ],
            created_at,
        );
        Self {
            id,
            season,
            week,
            date,
            team1_id,
            team2_id,
            team1_score: 0,
            team2_score: 0,
            status: GameStatus::default(),
            created_at,
        }
    }

    pub fn with_scores(mut self, team1_score: u32, team2_score: u32) -> Self {
        self.team1_score = team1_score;
        self.team2_score = team2_score;
        self
    }

    pub fn with_status(mut self, status: GameStatus) -> Self {
        self.status = status;
        self
    }

    /// True if `team_id` plays on either side of this game.
    pub fn involves(&self, team_id: &TeamId) -> bool {
        &self.team1_id == team_id || &self.team2_id == team_id
    }

    /// Long date for game cards, e.g. `January 5, 2026`.
    pub fn long_date(&self) -> String {
        self.date.format("%B %-d, %Y").to_string()
    }

    /// Short date for pickers, e.g. `Jan 5, 2026`.
    pub fn short_date(&self) -> String {
        self.date.format("%b %-d, %Y").to_string()
    }
}

/// Sort games newest first. Same-day games keep their stored order.
pub fn sort_by_date_desc(games: &mut [Game]) {
    games.sort_by(|a, b| b.date.cmp(&a.date));
}
