//! Team and player models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{EntityId, PlayerId, TeamId};

/// A league team.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    pub id: TeamId,

    pub name: String,

    /// Display color, usually a CSS hex string
    #[serde(default)]
    pub color: String,

    /// Logo URL, empty when the team has none
    #[serde(default)]
    pub logo_url: String,

    pub created_at: DateTime<Utc>,
}

impl Team {
    pub fn new(name: String, color: String) -> Self {
        let created_at = Utc::now();
        let id = EntityId::for_new("team", &[&name], created_at);
        Self {
            id,
            name,
            color,
            logo_url: String::new(),
            created_at,
        }
    }

    pub fn with_logo_url(mut self, logo_url: String) -> Self {
        self.logo_url = logo_url;
        self
    }
}

/// A rostered player. Belongs to exactly one team.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub id: PlayerId,

    pub name: String,

    /// Jersey number
    pub number: u32,

    pub team_id: TeamId,

    pub created_at: DateTime<Utc>,
}

impl Player {
    pub fn new(name: String, number: u32, team_id: TeamId) -> Self {
        let created_at = Utc::now();
        let id = EntityId::for_new(
            "player",
            &[&name, &number.to_string(), team_id.as_str()],
            created_at,
        );
        Self {
            id,
            name,
            number,
            team_id,
            created_at,
        }
    }

    /// Label used in roster pickers, e.g. `Ali Hassan (#23)`.
    pub fn roster_label(&self) -> String {
        format!("{} (#{})", self.name, self.number)
    }
}
