//! League-wide display settings.

use serde::{Deserialize, Serialize};

/// Season, week and league name shown in page headers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeagueSettings {
    pub current_season: u32,
    pub current_week: u32,
    pub league_name: String,
}

impl LeagueSettings {
    pub fn new(league_name: String, current_season: u32, current_week: u32) -> Self {
        Self {
            current_season,
            current_week,
            league_name,
        }
    }

    /// Header line, e.g. `Season 3 • Current Week: 5`.
    pub fn season_banner(&self) -> String {
        format!(
            "Season {} • Current Week: {}",
            self.current_season, self.current_week
        )
    }

    /// Dropdown label for a week, flagging the current one.
    pub fn week_label(&self, week: u32) -> String {
        if week == self.current_week {
            format!("Week {} (Current)", week)
        } else {
            format!("Week {}", week)
        }
    }
}
