//! Read views over the league store: week schedules, game cards, leaders,
//! and the pickers used by admin forms.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, warn};

use crate::calculate::{game_leaders, NamedLine};
use crate::models::{
    sort_by_date_desc, Game, GameId, GameLeaders, GameStatus, LeagueSettings, Player, PlayerId,
    Team, TeamId,
};
use crate::storage::{LeagueStore, StorageError};

/// Name shown for a stat record whose player no longer exists.
pub const UNKNOWN_PLAYER: &str = "Unknown Player";

/// Name shown for a game side whose team no longer exists.
pub const UNKNOWN_TEAM: &str = "Unknown Team";

/// One side of a matchup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamSide {
    pub id: TeamId,
    pub name: String,
    pub score: u32,
}

/// Everything a game card shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameCard {
    pub id: GameId,
    pub date: NaiveDate,
    pub date_label: String,
    pub season: u32,
    pub week: u32,
    pub status: GameStatus,
    pub team1: TeamSide,
    pub team2: TeamSide,
    pub leaders: GameLeaders,
}

/// Entry in the week dropdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekOption {
    pub week: u32,
    pub label: String,
    pub is_current: bool,
}

/// Entry in the admin game picker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameOption {
    pub id: GameId,
    pub label: String,
}

/// Entry in the stat form's player picker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RosterEntry {
    pub id: PlayerId,
    pub team_id: TeamId,
    pub label: String,
}

/// Team names keyed by ID, loaded once per view.
struct TeamNames(HashMap<TeamId, String>);

impl TeamNames {
    fn load(store: &LeagueStore) -> Result<Self, StorageError> {
        Ok(Self(
            store
                .teams()?
                .into_iter()
                .map(|t: Team| (t.id, t.name))
                .collect(),
        ))
    }

    fn name(&self, id: &TeamId) -> &str {
        self.0.get(id).map(String::as_str).unwrap_or(UNKNOWN_TEAM)
    }

    fn side(&self, id: &TeamId, score: u32) -> TeamSide {
        TeamSide {
            id: id.clone(),
            name: self.name(id).to_string(),
            score,
        }
    }
}

fn try_game_leaders(store: &LeagueStore, game_id: &GameId) -> Result<GameLeaders, StorageError> {
    let records = store.stat_records_for_game(game_id)?;
    if records.is_empty() {
        return Ok(GameLeaders::no_data());
    }

    // Each player is looked up once, however many lines reference them.
    let players: HashMap<PlayerId, String> = store
        .players()?
        .into_iter()
        .map(|p: Player| (p.id, p.name))
        .collect();

    let lines: Vec<NamedLine<'_>> = records
        .iter()
        .map(|record| {
            let name = players
                .get(&record.player_id)
                .map(String::as_str)
                .unwrap_or(UNKNOWN_PLAYER);
            NamedLine::new(name, record)
        })
        .collect();

    Ok(game_leaders(&lines))
}

/// Leaders for one game.
///
/// A failure reading stat records or players is logged and yields the
/// "N/A", 0 placeholder for every category instead of an error.
pub fn load_game_leaders(store: &LeagueStore, game_id: &GameId) -> GameLeaders {
    match try_game_leaders(store, game_id) {
        Ok(leaders) => leaders,
        Err(e) => {
            warn!("Failed to load leaders for game {}: {}", game_id, e);
            GameLeaders::no_data()
        }
    }
}

fn build_card(store: &LeagueStore, teams: &TeamNames, game: &Game) -> GameCard {
    GameCard {
        id: game.id.clone(),
        date: game.date,
        date_label: game.long_date(),
        season: game.season,
        week: game.week,
        status: game.status,
        team1: teams.side(&game.team1_id, game.team1_score),
        team2: teams.side(&game.team2_id, game.team2_score),
        leaders: load_game_leaders(store, &game.id),
    }
}

/// Sorted distinct weeks that have games in the current season.
pub fn available_weeks(
    store: &LeagueStore,
    settings: &LeagueSettings,
) -> Result<Vec<WeekOption>, StorageError> {
    let mut weeks: Vec<u32> = store
        .games_in_season(settings.current_season)?
        .iter()
        .map(|g| g.week)
        .collect();
    weeks.sort_unstable();
    weeks.dedup();

    Ok(weeks
        .into_iter()
        .map(|week| WeekOption {
            week,
            label: settings.week_label(week),
            is_current: week == settings.current_week,
        })
        .collect())
}

/// Game cards for one week, newest first.
pub fn week_games(store: &LeagueStore, season: u32, week: u32) -> Result<Vec<GameCard>, StorageError> {
    let mut games = store.games_in_week(season, week)?;
    sort_by_date_desc(&mut games);
    debug!("Season {} week {}: {} games", season, week, games.len());

    let teams = TeamNames::load(store)?;
    Ok(games.iter().map(|g| build_card(store, &teams, g)).collect())
}

/// The card for one game.
pub fn game_card(store: &LeagueStore, game_id: &GameId) -> Result<GameCard, StorageError> {
    let game = store.game(game_id)?.ok_or_else(|| StorageError::NotFound {
        entity: "game",
        id: game_id.to_string(),
    })?;
    let teams = TeamNames::load(store)?;
    Ok(build_card(store, &teams, &game))
}

/// Every game newest first, labelled `Jan 5, 2026 - A vs B (50-48)`.
pub fn game_options(store: &LeagueStore) -> Result<Vec<GameOption>, StorageError> {
    let mut games = store.games()?;
    sort_by_date_desc(&mut games);
    let teams = TeamNames::load(store)?;

    Ok(games
        .iter()
        .map(|g| GameOption {
            id: g.id.clone(),
            label: format!(
                "{} - {} vs {} ({}-{})",
                g.short_date(),
                teams.name(&g.team1_id),
                teams.name(&g.team2_id),
                g.team1_score,
                g.team2_score
            ),
        })
        .collect())
}

/// Players of both teams in a game.
pub fn roster_for_game(store: &LeagueStore, game: &Game) -> Result<Vec<RosterEntry>, StorageError> {
    Ok(store
        .players_on_teams(&[&game.team1_id, &game.team2_id])?
        .into_iter()
        .map(|p| RosterEntry {
            label: p.roster_label(),
            id: p.id,
            team_id: p.team_id,
        })
        .collect())
}
