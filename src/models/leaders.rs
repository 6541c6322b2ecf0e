//! Game leader view models.

use serde::{Deserialize, Serialize};

/// Player name shown when a category has no data.
pub const NO_DATA_NAME: &str = "N/A";

/// Statistical categories eligible for leader computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatCategory {
    Points,
    Rebounds,
    Blocks,
    Steals,
}

impl StatCategory {
    /// Every tracked category, in display order.
    pub const ALL: [StatCategory; 4] = [
        StatCategory::Points,
        StatCategory::Rebounds,
        StatCategory::Blocks,
        StatCategory::Steals,
    ];

    /// Short unit suffix used on game cards.
    pub fn unit(&self) -> &'static str {
        match self {
            StatCategory::Points => "pts",
            StatCategory::Rebounds => "reb",
            StatCategory::Blocks => "blk",
            StatCategory::Steals => "stl",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            StatCategory::Points => "Points",
            StatCategory::Rebounds => "Rebounds",
            StatCategory::Blocks => "Blocks",
            StatCategory::Steals => "Steals",
        }
    }
}

impl std::fmt::Display for StatCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StatCategory::Points => write!(f, "points"),
            StatCategory::Rebounds => write!(f, "rebounds"),
            StatCategory::Blocks => write!(f, "blocks"),
            StatCategory::Steals => write!(f, "steals"),
        }
    }
}

impl std::str::FromStr for StatCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "points" => Ok(StatCategory::Points),
            "rebounds" => Ok(StatCategory::Rebounds),
            "blocks" => Ok(StatCategory::Blocks),
            "steals" => Ok(StatCategory::Steals),
            other => Err(format!("unknown stat category: {}", other)),
        }
    }
}

/// Top performer in one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Leader {
    pub player_name: String,
    pub value: i32,
}

impl Leader {
    pub fn new(player_name: impl Into<String>, value: i32) -> Self {
        Self {
            player_name: player_name.into(),
            value,
        }
    }

    /// The "N/A", 0 placeholder.
    pub fn no_data() -> Self {
        Self::new(NO_DATA_NAME, 0)
    }

    /// Card text, e.g. `Ali - 24 pts`.
    pub fn display(&self, category: StatCategory) -> String {
        format!("{} - {} {}", self.player_name, self.value, category.unit())
    }
}

/// Top performer per category for one game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameLeaders {
    pub points: Leader,
    pub rebounds: Leader,
    pub blocks: Leader,
    pub steals: Leader,
}

impl GameLeaders {
    /// Every category resolved to "N/A", 0.
    pub fn no_data() -> Self {
        Self {
            points: Leader::no_data(),
            rebounds: Leader::no_data(),
            blocks: Leader::no_data(),
            steals: Leader::no_data(),
        }
    }

    pub fn get(&self, category: StatCategory) -> &Leader {
        match category {
            StatCategory::Points => &self.points,
            StatCategory::Rebounds => &self.rebounds,
            StatCategory::Blocks => &self.blocks,
            StatCategory::Steals => &self.steals,
        }
    }

    pub(crate) fn set(&mut self, category: StatCategory, leader: Leader) {
        match category {
            StatCategory::Points => self.points = leader,
            StatCategory::Rebounds => self.rebounds = leader,
            StatCategory::Blocks => self.blocks = leader,
            StatCategory::Steals => self.steals = leader,
        }
    }
}

impl Default for GameLeaders {
    fn default() -> Self {
        Self::no_data()
    }
}
