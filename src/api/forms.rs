//! Admin form bodies.
//!
//! Numeric fields arrive as whatever the browser form produced and go
//! through [`FormCount`]; everything else is validated here before it
//! reaches the store.

use chrono::{NaiveDate, NaiveDateTime};
use serde::Deserialize;

use super::ApiError;
use crate::calculate::{derive_from_form, DerivedStats, FormCount};
use crate::models::{GameStatus, LeagueSettings, PlayerId, StatLine, TeamId};

fn required_text(value: &str, field: &str) -> Result<String, ApiError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ApiError::BadRequest(format!("{} is required", field)));
    }
    Ok(trimmed.to_string())
}

fn non_negative(count: FormCount, field: &str) -> Result<u32, ApiError> {
    u32::try_from(count.value())
        .map_err(|_| ApiError::BadRequest(format!("{} must not be negative", field)))
}

fn positive(count: FormCount, field: &str) -> Result<u32, ApiError> {
    match non_negative(count, field)? {
        0 => Err(ApiError::BadRequest(format!("{} must be at least 1", field))),
        n => Ok(n),
    }
}

/// Accepts `2026-01-05` as well as the `2026-01-05T19:30` of a
/// datetime-local input.
pub fn parse_game_date(raw: &str) -> Result<NaiveDate, ApiError> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M").map(|dt| dt.date()))
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S").map(|dt| dt.date()))
        .map_err(|_| ApiError::BadRequest(format!("Invalid game date: {:?}", raw)))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub logo_url: String,
}

/// Validated team fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamInput {
    pub name: String,
    pub color: String,
    pub logo_url: String,
}

impl TeamForm {
    pub fn validate(self) -> Result<TeamInput, ApiError> {
        Ok(TeamInput {
            name: required_text(&self.name, "Team name")?,
            color: self.color.trim().to_string(),
            logo_url: self.logo_url.trim().to_string(),
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub number: FormCount,
    #[serde(default)]
    pub team_id: String,
}

/// Validated player fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerInput {
    pub name: String,
    pub number: u32,
    pub team_id: TeamId,
}

impl PlayerForm {
    pub fn validate(self) -> Result<PlayerInput, ApiError> {
        Ok(PlayerInput {
            name: required_text(&self.name, "Player name")?,
            number: non_negative(self.number, "Jersey number")?,
            team_id: required_text(&self.team_id, "Team")?.into(),
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameForm {
    #[serde(default)]
    pub season: Option<u32>,
    #[serde(default)]
    pub week: FormCount,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub team1_id: String,
    #[serde(default)]
    pub team2_id: String,
    #[serde(default)]
    pub team1_score: FormCount,
    #[serde(default)]
    pub team2_score: FormCount,
    #[serde(default)]
    pub status: Option<GameStatus>,
}

/// Validated game fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameInput {
    pub season: u32,
    pub week: u32,
    pub date: NaiveDate,
    pub team1_id: TeamId,
    pub team2_id: TeamId,
    pub team1_score: u32,
    pub team2_score: u32,
    pub status: GameStatus,
}

impl GameForm {
    /// An omitted season or status falls back to `season` / `status`: the
    /// current season and `completed` for a new game, the stored values on update.
    pub fn validate(self, season: u32, status: GameStatus) -> Result<GameInput, ApiError> {
        let team1_id = required_text(&self.team1_id, "Team 1")?;
        let team2_id = required_text(&self.team2_id, "Team 2")?;
        if team1_id == team2_id {
            return Err(ApiError::BadRequest(
                "A team cannot play itself".to_string(),
            ));
        }

        let season = self.season.unwrap_or(season);
        if season == 0 {
            return Err(ApiError::BadRequest("Season must be at least 1".to_string()));
        }

        Ok(GameInput {
            season,
            week: positive(self.week, "Week")?,
            date: parse_game_date(&self.date)?,
            team1_id: team1_id.into(),
            team2_id: team2_id.into(),
            team1_score: non_negative(self.team1_score, "Team 1 score")?,
            team2_score: non_negative(self.team2_score, "Team 2 score")?,
            status: self.status.unwrap_or(status),
        })
    }
}

/// A box score entry. `points` and `fieldGoalsMade` are derived, so any
/// values the client sends for them are ignored.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StatEntryForm {
    pub player_id: String,
    pub rebounds: FormCount,
    pub assists: FormCount,
    pub steals: FormCount,
    pub blocks: FormCount,
    pub field_goals_attempted: FormCount,
    pub two_point_made: FormCount,
    pub two_point_attempted: FormCount,
    pub three_point_made: FormCount,
    pub three_point_attempted: FormCount,
    pub free_throw_made: FormCount,
    pub free_throw_attempted: FormCount,
}

impl StatEntryForm {
    pub fn line(&self) -> StatLine {
        StatLine {
            rebounds: self.rebounds.value(),
            assists: self.assists.value(),
            steals: self.steals.value(),
            blocks: self.blocks.value(),
            field_goals_attempted: self.field_goals_attempted.value(),
            two_point_made: self.two_point_made.value(),
            two_point_attempted: self.two_point_attempted.value(),
            three_point_made: self.three_point_made.value(),
            three_point_attempted: self.three_point_attempted.value(),
            free_throw_made: self.free_throw_made.value(),
            free_throw_attempted: self.free_throw_attempted.value(),
        }
    }

    pub fn player_id(&self) -> Result<PlayerId, ApiError> {
        Ok(required_text(&self.player_id, "Player")?.into())
    }
}

/// The three made-shot inputs of a stat form, for live previews.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DeriveForm {
    pub two_point_made: FormCount,
    pub three_point_made: FormCount,
    pub free_throw_made: FormCount,
}

impl DeriveForm {
    pub fn derived(&self) -> DerivedStats {
        derive_from_form(self.two_point_made, self.three_point_made, self.free_throw_made)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsForm {
    #[serde(default)]
    pub current_season: FormCount,
    #[serde(default)]
    pub current_week: FormCount,
    #[serde(default)]
    pub league_name: String,
}

impl SettingsForm {
    pub fn validate(self) -> Result<LeagueSettings, ApiError> {
        Ok(LeagueSettings::new(
            required_text(&self.league_name, "League name")?,
            positive(self.current_season, "Season")?,
            positive(self.current_week, "Week")?,
        ))
    }
}
