//! Token-gated management routes.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::api::forms::{
    DeriveForm, GameForm, PlayerForm, SettingsForm, StatEntryForm, TeamForm,
};
use crate::api::state::AppState;
use crate::api::{ApiError, PageParams, Pagination, PaginationMeta};
use crate::calculate::DerivedStats;
use crate::models::{
    EntityId, Game, GameId, GameStatus, LeagueSettings, Player, PlayerId, StatRecord,
    StatRecordId, Team, TeamId,
};
use crate::schedule::{self, GameOption, RosterEntry, UNKNOWN_PLAYER};
use crate::storage::Removed;

fn not_found(entity: &str, id: &EntityId) -> ApiError {
    ApiError::NotFound(format!("{} not found: {}", entity, id))
}

/// Body of a delete that may have cascaded to stat records.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteResponse {
    pub id: EntityId,
    pub stat_records_removed: usize,
}

impl<T> From<Removed<T>> for DeleteResponse
where
    T: crate::storage::Record,
{
    fn from(removed: Removed<T>) -> Self {
        Self {
            id: removed.entity.id().clone(),
            stat_records_removed: removed.stat_records_removed,
        }
    }
}

// ── Settings ────────────────────────────────────────────────────

pub async fn update_settings(
    State(state): State<AppState>,
    Json(form): Json<SettingsForm>,
) -> Result<Json<LeagueSettings>, ApiError> {
    let settings = form.validate()?;
    state.store.save_settings(&settings)?;
    Ok(Json(settings))
}

// ── Teams ───────────────────────────────────────────────────────

pub async fn list_teams(State(state): State<AppState>) -> Result<Json<Vec<Team>>, ApiError> {
    let mut teams = state.store.teams()?;
    teams.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(Json(teams))
}

pub async fn create_team(
    State(state): State<AppState>,
    Json(form): Json<TeamForm>,
) -> Result<(StatusCode, Json<Team>), ApiError> {
    let input = form.validate()?;
    let team = Team::new(input.name, input.color).with_logo_url(input.logo_url);
    let team = state.store.insert_team(team)?;
    Ok((StatusCode::CREATED, Json(team)))
}

pub async fn update_team(
    State(state): State<AppState>,
    Path(id): Path<TeamId>,
    Json(form): Json<TeamForm>,
) -> Result<Json<Team>, ApiError> {
    let input = form.validate()?;
    let mut team = state
        .store
        .team(&id)?
        .ok_or_else(|| not_found("team", &id))?;
    team.name = input.name;
    team.color = input.color;
    team.logo_url = input.logo_url;
    Ok(Json(state.store.update_team(team)?))
}

pub async fn delete_team(
    State(state): State<AppState>,
    Path(id): Path<TeamId>,
) -> Result<Json<DeleteResponse>, ApiError> {
    let team = state.store.delete_team(&id)?;
    Ok(Json(DeleteResponse {
        id: team.id,
        stat_records_removed: 0,
    }))
}

// ── Players ─────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerParams {
    pub team_id: Option<TeamId>,
}

pub async fn list_players(
    State(state): State<AppState>,
    Query(params): Query<PlayerParams>,
) -> Result<Json<Vec<Player>>, ApiError> {
    let players = match &params.team_id {
        Some(team_id) => state.store.players_on_teams(&[team_id])?,
        None => state.store.players()?,
    };
    Ok(Json(players))
}

pub async fn create_player(
    State(state): State<AppState>,
    Json(form): Json<PlayerForm>,
) -> Result<(StatusCode, Json<Player>), ApiError> {
    let input = form.validate()?;
    let player = Player::new(input.name, input.number, input.team_id);
    let player = state.store.insert_player(player)?;
    Ok((StatusCode::CREATED, Json(player)))
}

pub async fn update_player(
    State(state): State<AppState>,
    Path(id): Path<PlayerId>,
    Json(form): Json<PlayerForm>,
) -> Result<Json<Player>, ApiError> {
    let input = form.validate()?;
    let mut player = state
        .store
        .player(&id)?
        .ok_or_else(|| not_found("player", &id))?;
    player.name = input.name;
    player.number = input.number;
    player.team_id = input.team_id;
    Ok(Json(state.store.update_player(player)?))
}

pub async fn delete_player(
    State(state): State<AppState>,
    Path(id): Path<PlayerId>,
) -> Result<Json<DeleteResponse>, ApiError> {
    Ok(Json(state.store.delete_player(&id)?.into()))
}

// ── Games ───────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct GamesPage {
    pub games: Vec<GameOption>,
    pub pagination: PaginationMeta,
}

/// Game picker entries, newest first.
pub async fn list_games(
    State(state): State<AppState>,
    Query(params): Query<PageParams>,
) -> Result<Json<GamesPage>, ApiError> {
    let pagination = Pagination::from(&params);
    let options = schedule::game_options(&state.store)?;
    let total = u32::try_from(options.len()).unwrap_or(u32::MAX);

    Ok(Json(GamesPage {
        games: pagination.slice(&options).to_vec(),
        pagination: PaginationMeta::new(&pagination, total),
    }))
}

pub async fn create_game(
    State(state): State<AppState>,
    Json(form): Json<GameForm>,
) -> Result<(StatusCode, Json<Game>), ApiError> {
    let settings = state.settings()?;
    let input = form.validate(settings.current_season, GameStatus::default())?;
    let game = Game::new(
        input.season,
        input.week,
        input.date,
        input.team1_id,
        input.team2_id,
    )
    .with_scores(input.team1_score, input.team2_score)
    .with_status(input.status);
    let game = state.store.insert_game(game)?;
    Ok((StatusCode::CREATED, Json(game)))
}

pub async fn update_game(
    State(state): State<AppState>,
    Path(id): Path<GameId>,
    Json(form): Json<GameForm>,
) -> Result<Json<Game>, ApiError> {
    let mut game = state
        .store
        .game(&id)?
        .ok_or_else(|| not_found("game", &id))?;
    let input = form.validate(game.season, game.status)?;
    game.season = input.season;
    game.week = input.week;
    game.date = input.date;
    game.team1_id = input.team1_id;
    game.team2_id = input.team2_id;
    game.team1_score = input.team1_score;
    game.team2_score = input.team2_score;
    game.status = input.status;
    Ok(Json(state.store.update_game(game)?))
}

pub async fn delete_game(
    State(state): State<AppState>,
    Path(id): Path<GameId>,
) -> Result<Json<DeleteResponse>, ApiError> {
    Ok(Json(state.store.delete_game(&id)?.into()))
}

fn require_game(state: &AppState, id: &GameId) -> Result<Game, ApiError> {
    state.store.game(id)?.ok_or_else(|| not_found("game", id))
}

/// Players eligible for a game's stat form.
pub async fn game_roster(
    State(state): State<AppState>,
    Path(id): Path<GameId>,
) -> Result<Json<Vec<RosterEntry>>, ApiError> {
    let game = require_game(&state, &id)?;
    Ok(Json(schedule::roster_for_game(&state.store, &game)?))
}

// ── Stat records ────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatRow {
    #[serde(flatten)]
    pub record: StatRecord,
    pub player_name: String,
}

pub async fn list_game_stats(
    State(state): State<AppState>,
    Path(id): Path<GameId>,
) -> Result<Json<Vec<StatRow>>, ApiError> {
    require_game(&state, &id)?;
    let records = state.store.stat_records_for_game(&id)?;
    let players = state.store.players()?;

    let rows = records
        .into_iter()
        .map(|record| {
            let player_name = players
                .iter()
                .find(|p| p.id == record.player_id)
                .map(|p| p.name.clone())
                .unwrap_or_else(|| UNKNOWN_PLAYER.to_string());
            StatRow {
                record,
                player_name,
            }
        })
        .collect();
    Ok(Json(rows))
}

/// Record a player's box score for a game. Derived fields are always
/// recomputed from the made counts.
pub async fn create_stat_record(
    State(state): State<AppState>,
    Path(game_id): Path<GameId>,
    Json(form): Json<StatEntryForm>,
) -> Result<(StatusCode, Json<StatRecord>), ApiError> {
    let record = StatRecord::new(game_id, form.player_id()?, form.line());
    let record = state.store.insert_stat_record(record)?;
    info!(
        "Recorded {} points for player {} in game {}",
        record.points, record.player_id, record.game_id
    );
    Ok((StatusCode::CREATED, Json(record)))
}

pub async fn update_stat_record(
    State(state): State<AppState>,
    Path(id): Path<StatRecordId>,
    Json(form): Json<StatEntryForm>,
) -> Result<Json<StatRecord>, ApiError> {
    let mut record = state
        .store
        .stat_record(&id)?
        .ok_or_else(|| not_found("stat record", &id))?;
    record.player_id = form.player_id()?;
    record.apply_line(form.line());
    Ok(Json(state.store.update_stat_record(record)?))
}

pub async fn delete_stat_record(
    State(state): State<AppState>,
    Path(id): Path<StatRecordId>,
) -> Result<Json<StatRecord>, ApiError> {
    Ok(Json(state.store.delete_stat_record(&id)?))
}

/// Preview of the derived fields while a stat form is being filled in.
pub async fn derive_preview(Json(form): Json<DeriveForm>) -> Json<DerivedStats> {
    Json(form.derived())
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{admin, get_json, send, setup_test_state, TOKEN};
    use crate::api::build_router;
    use axum::http::StatusCode;
    use serde_json::{json, Value};

    async fn create(app: &axum::Router, uri: &str, body: Value) -> Value {
        let (status, json) = admin(app.clone(), "POST", uri, Some(body)).await;
        assert_eq!(status, StatusCode::CREATED, "POST {} failed: {}", uri, json);
        json
    }

    /// Two teams, a player on each, and one game between them.
    async fn seed(app: &axum::Router) -> (Value, Value, Value) {
        let falcons = create(app, "/api/admin/teams", json!({ "name": "Falcons" })).await;
        let hawks = create(app, "/api/admin/teams", json!({ "name": "Hawks" })).await;
        let ali = create(
            app,
            "/api/admin/players",
            json!({ "name": "Ali", "number": "23", "teamId": falcons["id"] }),
        )
        .await;
        create(
            app,
            "/api/admin/players",
            json!({ "name": "Sam", "number": 5, "teamId": hawks["id"] }),
        )
        .await;
        let game = create(
            app,
            "/api/admin/games",
            json!({
                "week": 1,
                "date": "2026-01-05",
                "team1Id": falcons["id"],
                "team2Id": hawks["id"],
                "team1Score": "50",
                "team2Score": "48"
            }),
        )
        .await;
        (falcons, ali, game)
    }

    #[tokio::test]
    async fn test_admin_requires_token() {
        let tmp = tempfile::tempdir().unwrap();
        let app = build_router(setup_test_state(tmp.path(), TOKEN));

        let (status, json) = get_json(app.clone(), "/api/admin/teams").await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(json["error"]["code"], "UNAUTHORIZED");

        let (status, _) = send(app.clone(), "GET", "/api/admin/teams", Some("wrong"), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, _) = admin(app, "GET", "/api/admin/teams", None).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_admin_disabled_without_configured_token() {
        let tmp = tempfile::tempdir().unwrap();
        let app = build_router(setup_test_state(tmp.path(), ""));

        let (status, json) = admin(app, "GET", "/api/admin/teams", None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(json["error"]["code"], "FORBIDDEN");
    }

    #[tokio::test]
    async fn test_blank_team_name_rejected() {
        let tmp = tempfile::tempdir().unwrap();
        let app = build_router(setup_test_state(tmp.path(), TOKEN));

        let (status, json) =
            admin(app, "POST", "/api/admin/teams", Some(json!({ "name": "  " }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"]["code"], "BAD_REQUEST");
    }

    #[tokio::test]
    async fn test_game_season_defaults_to_settings() {
        let tmp = tempfile::tempdir().unwrap();
        let app = build_router(setup_test_state(tmp.path(), TOKEN));

        let (status, _) = admin(
            app.clone(),
            "PUT",
            "/api/admin/settings",
            Some(json!({ "currentSeason": 3, "currentWeek": 2, "leagueName": "Metro" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (_, _, game) = seed(&app).await;
        assert_eq!(game["season"], 3);
        assert_eq!(game["status"], "completed");

        let (_, json) = get_json(app, "/api/settings").await;
        assert_eq!(json["seasonBanner"], "Season 3 • Current Week: 2");
    }

    #[tokio::test]
    async fn test_stat_record_derived_fields_enforced() {
        let tmp = tempfile::tempdir().unwrap();
        let app = build_router(setup_test_state(tmp.path(), TOKEN));
        let (_, ali, game) = seed(&app).await;

        let uri = format!("/api/admin/games/{}/stats", game["id"].as_str().unwrap());
        let record = create(
            &app,
            &uri,
            json!({
                "playerId": ali["id"],
                "twoPointMade": "5",
                "threePointMade": 2,
                "freeThrowMade": "3",
                "rebounds": "",
                "points": 99,
                "fieldGoalsMade": 99
            }),
        )
        .await;
        assert_eq!(record["points"], 19);
        assert_eq!(record["fieldGoalsMade"], 7);
        assert_eq!(record["rebounds"], 0);

        let (status, rows) = admin(app.clone(), "GET", &uri, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(rows[0]["playerName"], "Ali");
        assert_eq!(rows[0]["points"], 19);

        // Same player twice in one game
        let (status, _) = admin(
            app.clone(),
            "POST",
            &uri,
            Some(json!({ "playerId": ali["id"], "twoPointMade": 1 })),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);

        let record_uri = format!("/api/admin/stats/{}", record["id"].as_str().unwrap());
        let (status, updated) = admin(
            app,
            "PUT",
            &record_uri,
            Some(json!({ "playerId": ali["id"], "threePointMade": 4, "points": 0 })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["points"], 12);
        assert_eq!(updated["fieldGoalsMade"], 4);
        assert_eq!(updated["twoPointMade"], 0);
    }

    #[tokio::test]
    async fn test_stat_record_for_unknown_game() {
        let tmp = tempfile::tempdir().unwrap();
        let app = build_router(setup_test_state(tmp.path(), TOKEN));
        let (_, ali, _) = seed(&app).await;

        let (status, _) = admin(
            app,
            "POST",
            "/api/admin/games/nope/stats",
            Some(json!({ "playerId": ali["id"] })),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_delete_game_cascades() {
        let tmp = tempfile::tempdir().unwrap();
        let app = build_router(setup_test_state(tmp.path(), TOKEN));
        let (falcons, ali, game) = seed(&app).await;
        let game_id = game["id"].as_str().unwrap();

        create(
            &app,
            &format!("/api/admin/games/{}/stats", game_id),
            json!({ "playerId": ali["id"], "twoPointMade": 3 }),
        )
        .await;

        // Still referenced by a player and the game
        let team_uri = format!("/api/admin/teams/{}", falcons["id"].as_str().unwrap());
        let (status, _) = admin(app.clone(), "DELETE", &team_uri, None).await;
        assert_eq!(status, StatusCode::CONFLICT);

        let (status, json) =
            admin(app.clone(), "DELETE", &format!("/api/admin/games/{}", game_id), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["statRecordsRemoved"], 1);

        let (_, health) = get_json(app, "/api/health").await;
        assert_eq!(health["counts"]["games"], 0);
        assert_eq!(health["counts"]["statRecords"], 0);
    }

    #[tokio::test]
    async fn test_delete_player_cascades() {
        let tmp = tempfile::tempdir().unwrap();
        let app = build_router(setup_test_state(tmp.path(), TOKEN));
        let (_, ali, game) = seed(&app).await;

        create(
            &app,
            &format!("/api/admin/games/{}/stats", game["id"].as_str().unwrap()),
            json!({ "playerId": ali["id"], "freeThrowMade": 2 }),
        )
        .await;

        let uri = format!("/api/admin/players/{}", ali["id"].as_str().unwrap());
        let (status, json) = admin(app, "DELETE", &uri, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["statRecordsRemoved"], 1);
    }

    #[tokio::test]
    async fn test_games_list_and_roster() {
        let tmp = tempfile::tempdir().unwrap();
        let app = build_router(setup_test_state(tmp.path(), TOKEN));
        let (_, _, game) = seed(&app).await;

        let (status, json) = admin(app.clone(), "GET", "/api/admin/games?page=1&page_size=10", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["games"][0]["label"], "Jan 5, 2026 - Falcons vs Hawks (50-48)");
        assert_eq!(json["pagination"]["total_items"], 1);
        assert_eq!(json["pagination"]["has_next"], false);

        let uri = format!("/api/admin/games/{}/players", game["id"].as_str().unwrap());
        let (status, roster) = admin(app, "GET", &uri, None).await;
        assert_eq!(status, StatusCode::OK);
        let labels: Vec<_> = roster
            .as_array()
            .unwrap()
            .iter()
            .map(|r| r["label"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(labels, vec!["Ali (#23)", "Sam (#5)"]);
    }

    #[tokio::test]
    async fn test_games_list_page_far_past_end() {
        let tmp = tempfile::tempdir().unwrap();
        let app = build_router(setup_test_state(tmp.path(), TOKEN));
        seed(&app).await;

        let (status, json) = admin(
            app,
            "GET",
            "/api/admin/games?page=4294967295&page_size=100",
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["games"], json!([]));
        assert_eq!(json["pagination"]["total_items"], 1);
        assert_eq!(json["pagination"]["has_next"], false);
    }

    #[tokio::test]
    async fn test_update_game_keeps_status_when_omitted() {
        let tmp = tempfile::tempdir().unwrap();
        let app = build_router(setup_test_state(tmp.path(), TOKEN));
        let (falcons, _, game) = seed(&app).await;
        let hawks_id = game["team2Id"].clone();

        let scheduled = create(
            &app,
            "/api/admin/games",
            json!({
                "week": 2,
                "date": "2026-01-12",
                "team1Id": falcons["id"],
                "team2Id": hawks_id,
                "status": "scheduled"
            }),
        )
        .await;
        assert_eq!(scheduled["status"], "scheduled");

        let uri = format!("/api/admin/games/{}", scheduled["id"].as_str().unwrap());
        let (status, updated) = admin(
            app.clone(),
            "PUT",
            &uri,
            Some(json!({
                "week": 3,
                "date": "2026-01-19",
                "team1Id": falcons["id"],
                "team2Id": hawks_id
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["week"], 3);
        assert_eq!(updated["status"], "scheduled");

        let (_, updated) = admin(
            app,
            "PUT",
            &uri,
            Some(json!({
                "week": 3,
                "date": "2026-01-19",
                "team1Id": falcons["id"],
                "team2Id": hawks_id,
                "team1Score": 40,
                "team2Score": 38,
                "status": "completed"
            })),
        )
        .await;
        assert_eq!(updated["status"], "completed");
        assert_eq!(updated["team1Score"], 40);
    }

    #[tokio::test]
    async fn test_update_team_keeps_id() {
        let tmp = tempfile::tempdir().unwrap();
        let app = build_router(setup_test_state(tmp.path(), TOKEN));
        let team = create(&app, "/api/admin/teams", json!({ "name": "Falcons" })).await;

        let uri = format!("/api/admin/teams/{}", team["id"].as_str().unwrap());
        let (status, updated) = admin(
            app.clone(),
            "PUT",
            &uri,
            Some(json!({ "name": " Red Falcons ", "color": "#c00" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["id"], team["id"]);
        assert_eq!(updated["name"], "Red Falcons");

        let (status, _) = admin(app, "PUT", "/api/admin/teams/missing", Some(json!({ "name": "X" }))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_derive_preview() {
        let tmp = tempfile::tempdir().unwrap();
        let app = build_router(setup_test_state(tmp.path(), TOKEN));

        let (status, json) = admin(
            app,
            "POST",
            "/api/admin/stats/derive",
            Some(json!({ "twoPointMade": "", "threePointMade": "5", "freeThrowMade": 2 })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json, json!({ "fieldGoalsMade": 5, "points": 17 }));
    }
}
