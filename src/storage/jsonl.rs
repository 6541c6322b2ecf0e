//! JSONL (JSON Lines) storage.
//!
//! JSONL is the source of truth for teams, players, games and box scores.
//! Each line is a valid JSON object representing one entity.

use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, warn};

use super::{StorageConfig, StorageError};

/// Entity types for JSONL storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityType {
    Team,
    Player,
    Game,
    StatRecord,
}

impl EntityType {
    /// Get the filename for this entity type.
    pub fn filename(&self) -> &'static str {
        match self {
            EntityType::Team => "teams.jsonl",
            EntityType::Player => "players.jsonl",
            EntityType::Game => "games.jsonl",
            EntityType::StatRecord => "game_stats.jsonl",
        }
    }

    /// Singular name used in error messages.
    pub fn noun(&self) -> &'static str {
        match self {
            EntityType::Team => "team",
            EntityType::Player => "player",
            EntityType::Game => "game",
            EntityType::StatRecord => "stat record",
        }
    }
}

/// Get the path of an entity type's file.
pub fn entity_path(config: &StorageConfig, entity: EntityType) -> PathBuf {
    config.normalized_dir().join(entity.filename())
}

/// JSONL file writer.
pub struct JsonlWriter<T> {
    path: PathBuf,
    _marker: PhantomData<T>,
}

impl<T: Serialize> JsonlWriter<T> {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            _marker: PhantomData,
        }
    }

    pub fn for_entity(config: &StorageConfig, entity: EntityType) -> Self {
        Self::new(entity_path(config, entity))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn ensure_dir(&self) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        Ok(())
    }

    /// Append a single entity to the file.
    pub fn append(&self, entity: &T) -> Result<(), StorageError> {
        self.ensure_dir()?;

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        let mut writer = BufWriter::new(file);
        let json = serde_json::to_string(entity)?;
        writeln!(writer, "{}", json)?;
        writer.flush()?;

        debug!("Appended entity to {:?}", self.path);
        Ok(())
    }

    /// Write entities, replacing the entire file.
    ///
    /// Lines go to a sibling temp file that is renamed over the original, so a
    /// crash mid-write leaves the previous contents intact.
    pub fn write_all(&self, entities: &[T]) -> Result<usize, StorageError> {
        self.ensure_dir()?;

        let tmp_path = self.path.with_extension("jsonl.tmp");
        let file = File::create(&tmp_path)?;
        let mut writer = BufWriter::new(file);
        let mut count = 0;

        for entity in entities {
            let json = serde_json::to_string(entity)?;
            writeln!(writer, "{}", json)?;
            count += 1;
        }

        writer.flush()?;
        drop(writer);
        fs::rename(&tmp_path, &self.path)?;
        debug!("Wrote {} entities to {:?}", count, self.path);

        Ok(count)
    }
}

/// JSONL file reader.
pub struct JsonlReader<T> {
    path: PathBuf,
    _marker: PhantomData<T>,
}

impl<T: DeserializeOwned> JsonlReader<T> {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            _marker: PhantomData,
        }
    }

    pub fn for_entity(config: &StorageConfig, entity: EntityType) -> Self {
        Self::new(entity_path(config, entity))
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Read all entities from the file, in file order.
    ///
    /// A missing file reads as empty. Lines that fail to parse are skipped.
    pub fn read_all(&self) -> Result<Vec<T>, StorageError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let file = File::open(&self.path)?;
        let reader = BufReader::new(file);
        let mut entities = Vec::new();

        for (idx, line) in reader.lines().enumerate() {
            let line = line?;

            if line.trim().is_empty() {
                continue;
            }

            match serde_json::from_str(&line) {
                Ok(entity) => entities.push(entity),
                Err(e) => {
                    warn!("Failed to parse line {} in {:?}: {}", idx + 1, self.path, e);
                }
            }
        }

        debug!("Read {} entities from {:?}", entities.len(), self.path);
        Ok(entities)
    }

    /// Read entities matching a predicate.
    pub fn read_where<F>(&self, predicate: F) -> Result<Vec<T>, StorageError>
    where
        F: Fn(&T) -> bool,
    {
        let all = self.read_all()?;
        Ok(all.into_iter().filter(predicate).collect())
    }

    /// Count non-blank lines in the file.
    pub fn count(&self) -> Result<usize, StorageError> {
        if !self.path.exists() {
            return Ok(0);
        }

        let file = File::open(&self.path)?;
        let reader = BufReader::new(file);
        let mut count = 0;
        for line in reader.lines() {
            if !line?.trim().is_empty() {
                count += 1;
            }
        }

        Ok(count)
    }
}
