//! Per-player box score lines.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{EntityId, GameId, PlayerId, StatCategory, StatRecordId};
use crate::calculate::{derive_stats, DerivedStats};

/// The operator-entered part of a box score line.
///
/// Attempts are taken as entered; nothing relates them to the made counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StatLine {
    pub rebounds: i32,
    pub assists: i32,
    pub steals: i32,
    pub blocks: i32,
    pub field_goals_attempted: i32,
    pub two_point_made: i32,
    pub two_point_attempted: i32,
    pub three_point_made: i32,
    pub three_point_attempted: i32,
    pub free_throw_made: i32,
    pub free_throw_attempted: i32,
}

impl StatLine {
    pub fn derived(&self) -> DerivedStats {
        derive_stats(self.two_point_made, self.three_point_made, self.free_throw_made)
    }
}

/// One player's statistical line for one game, derived fields included.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatRecord {
    pub id: StatRecordId,

    pub game_id: GameId,

    pub player_id: PlayerId,

    /// Derived: 2*twos + 3*threes + free throws
    pub points: i32,

    pub rebounds: i32,

    pub assists: i32,

    pub steals: i32,

    pub blocks: i32,

    /// Derived: twos + threes
    pub field_goals_made: i32,

    pub field_goals_attempted: i32,

    pub two_point_made: i32,

    pub two_point_attempted: i32,

    pub three_point_made: i32,

    pub three_point_attempted: i32,

    pub free_throw_made: i32,

    pub free_throw_attempted: i32,

    pub created_at: DateTime<Utc>,
}

impl StatRecord {
    /// Build a record from an entered line, computing the derived fields.
    pub fn new(game_id: GameId, player_id: PlayerId, line: StatLine) -> Self {
        let created_at = Utc::now();
        let id = EntityId::for_new(
            "stat",
            &[game_id.as_str(), player_id.as_str()],
            created_at,
        );
        let mut record = Self {
            id,
            game_id,
            player_id,
            points: 0,
            rebounds: 0,
            assists: 0,
            steals: 0,
            blocks: 0,
            field_goals_made: 0,
            field_goals_attempted: 0,
            two_point_made: 0,
            two_point_attempted: 0,
            three_point_made: 0,
            three_point_attempted: 0,
            free_throw_made: 0,
            free_throw_attempted: 0,
            created_at,
        };
        record.apply_line(line);
        record
    }

    /// Overwrite every entered field and recompute the derived ones.
    pub fn apply_line(&mut self, line: StatLine) {
        let derived = line.derived();
        self.points = derived.points;
        self.field_goals_made = derived.field_goals_made;
        self.rebounds = line.rebounds;
        self.assists = line.assists;
        self.steals = line.steals;
        self.blocks = line.blocks;
        self.field_goals_attempted = line.field_goals_attempted;
        self.two_point_made = line.two_point_made;
        self.two_point_attempted = line.two_point_attempted;
        self.three_point_made = line.three_point_made;
        self.three_point_attempted = line.three_point_attempted;
        self.free_throw_made = line.free_throw_made;
        self.free_throw_attempted = line.free_throw_attempted;
    }

    /// Value of a leader category on this line.
    pub fn category_value(&self, category: StatCategory) -> i32 {
        match category {
            StatCategory::Points => self.points,
            StatCategory::Rebounds => self.rebounds,
            StatCategory::Blocks => self.blocks,
            StatCategory::Steals => self.steals,
        }
    }

    /// True if the stored derived fields agree with the made counts.
    pub fn is_consistent(&self) -> bool {
        let derived = derive_stats(self.two_point_made, self.three_point_made, self.free_throw_made);
        derived.points == self.points && derived.field_goals_made == self.field_goals_made
    }
}
