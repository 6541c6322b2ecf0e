//! Read-only views for the public schedule page.

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::state::AppState;
use crate::api::ApiError;
use crate::models::{GameId, GameLeaders, LeagueSettings};
use crate::schedule::{self, GameCard, WeekOption};
use crate::storage::StoreCounts;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub counts: StoreCounts,
}

pub async fn health(State(state): State<AppState>) -> Result<Json<HealthResponse>, ApiError> {
    Ok(Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        counts: state.store.counts()?,
    }))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsResponse {
    #[serde(flatten)]
    pub settings: LeagueSettings,
    pub season_banner: String,
}

pub async fn get_settings(
    State(state): State<AppState>,
) -> Result<Json<SettingsResponse>, ApiError> {
    let settings = state.settings()?;
    Ok(Json(SettingsResponse {
        season_banner: settings.season_banner(),
        settings,
    }))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeksResponse {
    pub season: u32,
    pub current_week: u32,
    pub weeks: Vec<WeekOption>,
}

pub async fn list_weeks(State(state): State<AppState>) -> Result<Json<WeeksResponse>, ApiError> {
    let settings = state.settings()?;
    let weeks = schedule::available_weeks(&state.store, &settings)?;
    Ok(Json(WeeksResponse {
        season: settings.current_season,
        current_week: settings.current_week,
        weeks,
    }))
}

#[derive(Debug, Deserialize)]
pub struct WeekGamesParams {
    pub week: Option<u32>,
    pub season: Option<u32>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekGamesResponse {
    pub season: u32,
    pub week: u32,
    pub games: Vec<GameCard>,
}

/// Game cards for a week, the current week of the current season by default.
pub async fn list_week_games(
    State(state): State<AppState>,
    Query(params): Query<WeekGamesParams>,
) -> Result<Json<WeekGamesResponse>, ApiError> {
    let settings = state.settings()?;
    let season = params.season.unwrap_or(settings.current_season);
    let week = params.week.unwrap_or(settings.current_week);

    let games = schedule::week_games(&state.store, season, week)?;
    Ok(Json(WeekGamesResponse {
        season,
        week,
        games,
    }))
}

pub async fn get_game(
    State(state): State<AppState>,
    Path(id): Path<GameId>,
) -> Result<Json<GameCard>, ApiError> {
    Ok(Json(schedule::game_card(&state.store, &id)?))
}

pub async fn get_game_leaders(
    State(state): State<AppState>,
    Path(id): Path<GameId>,
) -> Result<Json<GameLeaders>, ApiError> {
    if state.store.game(&id)?.is_none() {
        return Err(ApiError::NotFound(format!("game not found: {}", id)));
    }
    Ok(Json(schedule::load_game_leaders(&state.store, &id)))
}
