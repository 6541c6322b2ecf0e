//! League store: CRUD over the JSONL entity files.
//!
//! Reads go straight to disk. Every mutation is a read-modify-write of a whole
//! file and runs under the store's write lock, so two admin requests cannot
//! interleave their rewrites.

use std::fs;
use std::sync::{Mutex, MutexGuard};

use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, info};

use super::{EntityType, JsonlReader, JsonlWriter, StorageConfig, StorageError};
use crate::models::{
    EntityId, Game, GameId, LeagueSettings, Player, PlayerId, StatRecord, StatRecordId, Team,
    TeamId,
};

/// An entity persisted in its own JSONL file.
pub trait Record: Serialize + DeserializeOwned + Clone {
    const ENTITY: EntityType;

    fn id(&self) -> &EntityId;
}

impl Record for Team {
    const ENTITY: EntityType = EntityType::Team;

    fn id(&self) -> &EntityId {
        &self.id
    }
}

impl Record for Player {
    const ENTITY: EntityType = EntityType::Player;

    fn id(&self) -> &EntityId {
        &self.id
    }
}

impl Record for Game {
    const ENTITY: EntityType = EntityType::Game;

    fn id(&self) -> &EntityId {
        &self.id
    }
}

impl Record for StatRecord {
    const ENTITY: EntityType = EntityType::StatRecord;

    fn id(&self) -> &EntityId {
        &self.id
    }
}

/// Outcome of a delete that may cascade to stat records.
#[derive(Debug, Clone)]
pub struct Removed<T> {
    pub entity: T,
    pub stat_records_removed: usize,
}

type WriteGuard<'a> = MutexGuard<'a, ()>;

/// File-backed store for teams, players, games, stat records and settings.
#[derive(Debug)]
pub struct LeagueStore {
    config: StorageConfig,
    write_lock: Mutex<()>,
}

impl LeagueStore {
    pub fn new(config: StorageConfig) -> Self {
        Self {
            config,
            write_lock: Mutex::new(()),
        }
    }

    pub fn config(&self) -> &StorageConfig {
        &self.config
    }

    fn lock(&self) -> Result<WriteGuard<'_>, StorageError> {
        self.write_lock.lock().map_err(|_| StorageError::Poisoned)
    }

    // ── Generic helpers ──────────────────────────────────────────

    fn all<T: Record>(&self) -> Result<Vec<T>, StorageError> {
        JsonlReader::for_entity(&self.config, T::ENTITY).read_all()
    }

    fn find<T: Record>(&self, id: &EntityId) -> Result<Option<T>, StorageError> {
        Ok(self.all::<T>()?.into_iter().find(|e| e.id() == id))
    }

    fn require<T: Record>(&self, id: &EntityId) -> Result<T, StorageError> {
        self.find(id)?.ok_or_else(|| StorageError::NotFound {
            entity: T::ENTITY.noun(),
            id: id.to_string(),
        })
    }

    fn append_new<T: Record>(&self, _guard: &WriteGuard<'_>, entity: &T) -> Result<(), StorageError> {
        if self.find::<T>(entity.id())?.is_some() {
            return Err(StorageError::Conflict(format!(
                "{} {} already exists",
                T::ENTITY.noun(),
                entity.id()
            )));
        }
        JsonlWriter::for_entity(&self.config, T::ENTITY).append(entity)?;
        info!("Created {} {}", T::ENTITY.noun(), entity.id());
        Ok(())
    }

    fn replace_existing<T: Record>(&self, _guard: &WriteGuard<'_>, entity: &T) -> Result<T, StorageError> {
        let mut all = self.all::<T>()?;
        let slot = all
            .iter_mut()
            .find(|e| e.id() == entity.id())
            .ok_or_else(|| StorageError::NotFound {
                entity: T::ENTITY.noun(),
                id: entity.id().to_string(),
            })?;
        let previous = std::mem::replace(slot, entity.clone());
        JsonlWriter::for_entity(&self.config, T::ENTITY).write_all(&all)?;
        info!("Updated {} {}", T::ENTITY.noun(), entity.id());
        Ok(previous)
    }

    fn remove_existing<T: Record>(&self, _guard: &WriteGuard<'_>, id: &EntityId) -> Result<T, StorageError> {
        let mut all = self.all::<T>()?;
        let idx = all
            .iter()
            .position(|e| e.id() == id)
            .ok_or_else(|| StorageError::NotFound {
                entity: T::ENTITY.noun(),
                id: id.to_string(),
            })?;
        let removed = all.remove(idx);
        JsonlWriter::for_entity(&self.config, T::ENTITY).write_all(&all)?;
        info!("Deleted {} {}", T::ENTITY.noun(), id);
        Ok(removed)
    }

    fn remove_stat_records_where<F>(&self, _guard: &WriteGuard<'_>, predicate: F) -> Result<usize, StorageError>
    where
        F: Fn(&StatRecord) -> bool,
    {
        let all = self.all::<StatRecord>()?;
        let before = all.len();
        let kept: Vec<StatRecord> = all.into_iter().filter(|r| !predicate(r)).collect();
        let removed = before - kept.len();
        if removed > 0 {
            JsonlWriter::for_entity(&self.config, EntityType::StatRecord).write_all(&kept)?;
            info!("Deleted {} dependent stat records", removed);
        }
        Ok(removed)
    }

    // ── Settings ─────────────────────────────────────────────────

    /// The stored settings document, if one has been written.
    pub fn settings(&self) -> Result<Option<LeagueSettings>, StorageError> {
        let path = self.config.settings_path();
        if !path.exists() {
            return Ok(None);
        }
        let contents = fs::read_to_string(&path)?;
        Ok(Some(serde_json::from_str(&contents)?))
    }

    /// Stored settings, or `fallback` when none have been saved yet.
    pub fn settings_or(&self, fallback: &LeagueSettings) -> Result<LeagueSettings, StorageError> {
        Ok(self.settings()?.unwrap_or_else(|| fallback.clone()))
    }

    pub fn save_settings(&self, settings: &LeagueSettings) -> Result<(), StorageError> {
        let _guard = self.lock()?;
        let path = self.config.settings_path();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let tmp_path = path.with_extension("json.tmp");
        fs::write(&tmp_path, serde_json::to_string_pretty(settings)?)?;
        fs::rename(&tmp_path, &path)?;
        info!(
            "Saved league settings: season {}, week {}",
            settings.current_season, settings.current_week
        );
        Ok(())
    }

    // ── Teams ────────────────────────────────────────────────────

    pub fn teams(&self) -> Result<Vec<Team>, StorageError> {
        self.all()
    }

    pub fn team(&self, id: &TeamId) -> Result<Option<Team>, StorageError> {
        self.find(id)
    }

    pub fn insert_team(&self, team: Team) -> Result<Team, StorageError> {
        let guard = self.lock()?;
        self.append_new(&guard, &team)?;
        Ok(team)
    }

    pub fn update_team(&self, team: Team) -> Result<Team, StorageError> {
        let guard = self.lock()?;
        self.replace_existing(&guard, &team)?;
        Ok(team)
    }

    /// Delete a team that no player or game still references.
    pub fn delete_team(&self, id: &TeamId) -> Result<Team, StorageError> {
        let guard = self.lock()?;
        self.require::<Team>(id)?;

        let players = self
            .all::<Player>()?
            .iter()
            .filter(|p| &p.team_id == id)
            .count();
        let games = self.all::<Game>()?.iter().filter(|g| g.involves(id)).count();
        if players > 0 || games > 0 {
            return Err(StorageError::Conflict(format!(
                "team {} is still referenced by {} players and {} games",
                id, players, games
            )));
        }

        self.remove_existing(&guard, id)
    }

    // ── Players ──────────────────────────────────────────────────

    pub fn players(&self) -> Result<Vec<Player>, StorageError> {
        self.all()
    }

    pub fn player(&self, id: &PlayerId) -> Result<Option<Player>, StorageError> {
        self.find(id)
    }

    /// Players rostered on any of `team_ids`, in stored order.
    pub fn players_on_teams(&self, team_ids: &[&TeamId]) -> Result<Vec<Player>, StorageError> {
        JsonlReader::for_entity(&self.config, EntityType::Player)
            .read_where(|p: &Player| team_ids.contains(&&p.team_id))
    }

    pub fn insert_player(&self, player: Player) -> Result<Player, StorageError> {
        let guard = self.lock()?;
        self.require::<Team>(&player.team_id)?;
        self.append_new(&guard, &player)?;
        Ok(player)
    }

    pub fn update_player(&self, player: Player) -> Result<Player, StorageError> {
        let guard = self.lock()?;
        self.require::<Team>(&player.team_id)?;
        self.replace_existing(&guard, &player)?;
        Ok(player)
    }

    /// Delete a player and every stat record of theirs.
    pub fn delete_player(&self, id: &PlayerId) -> Result<Removed<Player>, StorageError> {
        let guard = self.lock()?;
        self.require::<Player>(id)?;
        // Dependents first: a failed write must not strand stat records.
        let stat_records_removed = self.remove_stat_records_where(&guard, |r| &r.player_id == id)?;
        let entity = self.remove_existing::<Player>(&guard, id)?;
        Ok(Removed {
            entity,
            stat_records_removed,
        })
    }

    // ── Games ────────────────────────────────────────────────────

    pub fn games(&self) -> Result<Vec<Game>, StorageError> {
        self.all()
    }

    pub fn game(&self, id: &GameId) -> Result<Option<Game>, StorageError> {
        self.find(id)
    }

    /// Games of one season, in stored order.
    pub fn games_in_season(&self, season: u32) -> Result<Vec<Game>, StorageError> {
        JsonlReader::for_entity(&self.config, EntityType::Game)
            .read_where(|g: &Game| g.season == season)
    }

    /// Games of one season and week, in stored order.
    pub fn games_in_week(&self, season: u32, week: u32) -> Result<Vec<Game>, StorageError> {
        JsonlReader::for_entity(&self.config, EntityType::Game)
            .read_where(|g: &Game| g.season == season && g.week == week)
    }

    fn check_game_teams(&self, game: &Game) -> Result<(), StorageError> {
        self.require::<Team>(&game.team1_id)?;
        self.require::<Team>(&game.team2_id)?;
        Ok(())
    }

    pub fn insert_game(&self, game: Game) -> Result<Game, StorageError> {
        let guard = self.lock()?;
        self.check_game_teams(&game)?;
        self.append_new(&guard, &game)?;
        Ok(game)
    }

    pub fn update_game(&self, game: Game) -> Result<Game, StorageError> {
        let guard = self.lock()?;
        self.check_game_teams(&game)?;
        self.replace_existing(&guard, &game)?;
        Ok(game)
    }

    /// Delete a game and its box scores.
    pub fn delete_game(&self, id: &GameId) -> Result<Removed<Game>, StorageError> {
        let guard = self.lock()?;
        self.require::<Game>(id)?;
        let stat_records_removed = self.remove_stat_records_where(&guard, |r| &r.game_id == id)?;
        let entity = self.remove_existing::<Game>(&guard, id)?;
        Ok(Removed {
            entity,
            stat_records_removed,
        })
    }

    // ── Stat records ─────────────────────────────────────────────

    pub fn stat_record(&self, id: &StatRecordId) -> Result<Option<StatRecord>, StorageError> {
        self.find(id)
    }

    /// A game's stat records, in stored order.
    pub fn stat_records_for_game(&self, game_id: &GameId) -> Result<Vec<StatRecord>, StorageError> {
        let records = JsonlReader::for_entity(&self.config, EntityType::StatRecord)
            .read_where(|r: &StatRecord| &r.game_id == game_id)?;
        debug!("Loaded {} stat records for game {}", records.len(), game_id);
        Ok(records)
    }

    /// Game and player must exist, and no other record may hold the same pair.
    fn check_stat_record(&self, record: &StatRecord) -> Result<(), StorageError> {
        self.require::<Game>(&record.game_id)?;
        self.require::<Player>(&record.player_id)?;

        let taken = self.stat_records_for_game(&record.game_id)?.iter().any(|r| {
            r.player_id == record.player_id && r.id != record.id
        });
        if taken {
            return Err(StorageError::Conflict(format!(
                "player {} already has stats for game {}",
                record.player_id, record.game_id
            )));
        }
        Ok(())
    }

    pub fn insert_stat_record(&self, record: StatRecord) -> Result<StatRecord, StorageError> {
        let guard = self.lock()?;
        self.check_stat_record(&record)?;
        self.append_new(&guard, &record)?;
        Ok(record)
    }

    pub fn update_stat_record(&self, record: StatRecord) -> Result<StatRecord, StorageError> {
        let guard = self.lock()?;
        self.check_stat_record(&record)?;
        self.replace_existing(&guard, &record)?;
        Ok(record)
    }

    pub fn delete_stat_record(&self, id: &StatRecordId) -> Result<StatRecord, StorageError> {
        let guard = self.lock()?;
        self.remove_existing(&guard, id)
    }

    /// Entity counts, for health reporting.
    pub fn counts(&self) -> Result<StoreCounts, StorageError> {
        let count = |entity| JsonlReader::<serde_json::Value>::for_entity(&self.config, entity).count();
        Ok(StoreCounts {
            teams: count(EntityType::Team)?,
            players: count(EntityType::Player)?,
            games: count(EntityType::Game)?,
            stat_records: count(EntityType::StatRecord)?,
        })
    }
}

/// Number of stored entities per type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreCounts {
    pub teams: usize,
    pub players: usize,
    pub games: usize,
    pub stat_records: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::StatLine;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn store(dir: &TempDir) -> LeagueStore {
        LeagueStore::new(StorageConfig::new(dir.path().to_path_buf()))
    }

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    struct Fixture {
        home: Team,
        away: Team,
        ali: Player,
        sam: Player,
        game: Game,
    }

    fn seed(store: &LeagueStore) -> Fixture {
        let home = store.insert_team(Team::new("Falcons".into(), "#f00".into())).unwrap();
        let away = store.insert_team(Team::new("Hawks".into(), "#00f".into())).unwrap();
        let ali = store.insert_player(Player::new("Ali".into(), 23, home.id.clone())).unwrap();
        let sam = store.insert_player(Player::new("Sam".into(), 5, away.id.clone())).unwrap();
        let game = store
            .insert_game(
                Game::new(1, 2, date("2026-01-12"), home.id.clone(), away.id.clone())
                    .with_scores(50, 48),
            )
            .unwrap();
        Fixture {
            home,
            away,
            ali,
            sam,
            game,
        }
    }

    fn line(two: i32) -> StatLine {
        StatLine {
            two_point_made: two,
            ..StatLine::default()
        }
    }

    #[test]
    fn test_insert_and_read_back() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        let f = seed(&store);

        assert_eq!(store.teams().unwrap().len(), 2);
        assert_eq!(store.team(&f.home.id).unwrap().unwrap().name, "Falcons");
        assert_eq!(store.games_in_week(1, 2).unwrap().len(), 1);
        assert!(store.games_in_week(1, 3).unwrap().is_empty());
        assert_eq!(store.games_in_season(1).unwrap().len(), 1);
    }

    #[test]
    fn test_player_requires_existing_team() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);

        let err = store
            .insert_player(Player::new("Ghost".into(), 0, "missing".into()))
            .unwrap_err();
        assert!(matches!(err, StorageError::NotFound { entity: "team", .. }));
    }

    #[test]
    fn test_game_requires_existing_teams() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        let home = store.insert_team(Team::new("Falcons".into(), "".into())).unwrap();

        let err = store
            .insert_game(Game::new(1, 1, date("2026-01-05"), home.id, "missing".into()))
            .unwrap_err();
        assert!(matches!(err, StorageError::NotFound { entity: "team", .. }));
    }

    #[test]
    fn test_duplicate_id_is_conflict() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        let team = store.insert_team(Team::new("Falcons".into(), "".into())).unwrap();

        let err = store.insert_team(team).unwrap_err();
        assert!(matches!(err, StorageError::Conflict(_)));
    }

    #[test]
    fn test_stat_records_keep_store_order() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        let f = seed(&store);

        store
            .insert_stat_record(StatRecord::new(f.game.id.clone(), f.sam.id.clone(), line(1)))
            .unwrap();
        store
            .insert_stat_record(StatRecord::new(f.game.id.clone(), f.ali.id.clone(), line(2)))
            .unwrap();

        let records = store.stat_records_for_game(&f.game.id).unwrap();
        let players: Vec<_> = records.iter().map(|r| r.player_id.clone()).collect();
        assert_eq!(players, vec![f.sam.id.clone(), f.ali.id.clone()]);
    }

    #[test]
    fn test_one_stat_record_per_player_per_game() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        let f = seed(&store);

        store
            .insert_stat_record(StatRecord::new(f.game.id.clone(), f.ali.id.clone(), line(1)))
            .unwrap();
        let err = store
            .insert_stat_record(StatRecord::new(f.game.id.clone(), f.ali.id.clone(), line(3)))
            .unwrap_err();
        assert!(matches!(err, StorageError::Conflict(_)));
    }

    #[test]
    fn test_stat_record_requires_game_and_player() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        let f = seed(&store);

        let err = store
            .insert_stat_record(StatRecord::new("nope".into(), f.ali.id.clone(), line(1)))
            .unwrap_err();
        assert!(matches!(err, StorageError::NotFound { entity: "game", .. }));

        let err = store
            .insert_stat_record(StatRecord::new(f.game.id.clone(), "nope".into(), line(1)))
            .unwrap_err();
        assert!(matches!(err, StorageError::NotFound { entity: "player", .. }));
    }

    #[test]
    fn test_update_stat_record_overwrites() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        let f = seed(&store);

        let mut record = store
            .insert_stat_record(StatRecord::new(f.game.id.clone(), f.ali.id.clone(), line(1)))
            .unwrap();
        record.apply_line(line(6));
        store.update_stat_record(record.clone()).unwrap();

        let stored = store.stat_record(&record.id).unwrap().unwrap();
        assert_eq!(stored.points, 12);
        assert_eq!(stored.field_goals_made, 6);
    }

    #[test]
    fn test_update_missing_is_not_found() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);

        let err = store
            .update_team(Team::new("Nobody".into(), "".into()))
            .unwrap_err();
        assert!(matches!(err, StorageError::NotFound { .. }));
    }

    #[test]
    fn test_delete_game_cascades_stats() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        let f = seed(&store);

        store
            .insert_stat_record(StatRecord::new(f.game.id.clone(), f.ali.id.clone(), line(1)))
            .unwrap();
        store
            .insert_stat_record(StatRecord::new(f.game.id.clone(), f.sam.id.clone(), line(1)))
            .unwrap();

        let removed = store.delete_game(&f.game.id).unwrap();
        assert_eq!(removed.entity.id, f.game.id);
        assert_eq!(removed.stat_records_removed, 2);
        assert!(store.game(&f.game.id).unwrap().is_none());
        assert!(store.stat_records_for_game(&f.game.id).unwrap().is_empty());
    }

    #[test]
    fn test_delete_player_cascades_only_their_stats() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        let f = seed(&store);

        store
            .insert_stat_record(StatRecord::new(f.game.id.clone(), f.ali.id.clone(), line(1)))
            .unwrap();
        store
            .insert_stat_record(StatRecord::new(f.game.id.clone(), f.sam.id.clone(), line(1)))
            .unwrap();

        let removed = store.delete_player(&f.ali.id).unwrap();
        assert_eq!(removed.stat_records_removed, 1);

        let left = store.stat_records_for_game(&f.game.id).unwrap();
        assert_eq!(left.len(), 1);
        assert_eq!(left[0].player_id, f.sam.id);
    }

    #[test]
    fn test_failed_cascade_keeps_owner_and_stats() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        let f = seed(&store);
        store
            .insert_stat_record(StatRecord::new(f.game.id.clone(), f.ali.id.clone(), line(1)))
            .unwrap();

        // A directory at the temp path makes the stats rewrite fail
        let tmp = store.config().normalized_dir().join("game_stats.jsonl.tmp");
        fs::create_dir_all(&tmp).unwrap();

        assert!(store.delete_player(&f.ali.id).is_err());
        assert!(store.player(&f.ali.id).unwrap().is_some());

        assert!(store.delete_game(&f.game.id).is_err());
        assert!(store.game(&f.game.id).unwrap().is_some());
        assert_eq!(store.stat_records_for_game(&f.game.id).unwrap().len(), 1);

        fs::remove_dir(&tmp).unwrap();
        let removed = store.delete_player(&f.ali.id).unwrap();
        assert_eq!(removed.stat_records_removed, 1);
    }

    #[test]
    fn test_delete_missing_player_is_not_found() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);

        let err = store.delete_player(&"ghost".into()).unwrap_err();
        assert!(matches!(err, StorageError::NotFound { entity: "player", .. }));
    }

    #[test]
    fn test_delete_referenced_team_is_conflict() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        let f = seed(&store);

        let err = store.delete_team(&f.home.id).unwrap_err();
        assert!(matches!(err, StorageError::Conflict(_)));
        assert!(store.team(&f.home.id).unwrap().is_some());
    }

    #[test]
    fn test_delete_unreferenced_team() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        let team = store.insert_team(Team::new("Orphans".into(), "".into())).unwrap();

        store.delete_team(&team.id).unwrap();
        assert!(store.teams().unwrap().is_empty());
    }

    #[test]
    fn test_players_on_teams() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        let f = seed(&store);
        let other = store.insert_team(Team::new("Owls".into(), "".into())).unwrap();
        store
            .insert_player(Player::new("Lee".into(), 9, other.id.clone()))
            .unwrap();

        let roster = store.players_on_teams(&[&f.home.id, &f.away.id]).unwrap();
        let names: Vec<_> = roster.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Ali", "Sam"]);
    }

    #[test]
    fn test_settings_round_trip_and_fallback() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        let fallback = LeagueSettings::new("Default League".into(), 1, 1);

        assert!(store.settings().unwrap().is_none());
        assert_eq!(store.settings_or(&fallback).unwrap(), fallback);

        let saved = LeagueSettings::new("Metro".into(), 2, 6);
        store.save_settings(&saved).unwrap();
        assert_eq!(store.settings_or(&fallback).unwrap(), saved);
    }

    #[test]
    fn test_counts() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        let f = seed(&store);
        store
            .insert_stat_record(StatRecord::new(f.game.id.clone(), f.ali.id.clone(), line(1)))
            .unwrap();

        assert_eq!(
            store.counts().unwrap(),
            StoreCounts {
                teams: 2,
                players: 2,
                games: 1,
                stat_records: 1
            }
        );
    }
}
