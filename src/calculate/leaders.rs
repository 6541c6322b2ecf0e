//! Per-category game leaders.

use crate::models::{GameLeaders, Leader, StatCategory, StatRecord};

/// A stat record paired with its player's display name.
#[derive(Debug, Clone, Copy)]
pub struct NamedLine<'a> {
    pub player_name: &'a str,
    pub record: &'a StatRecord,
}

impl<'a> NamedLine<'a> {
    pub fn new(player_name: &'a str, record: &'a StatRecord) -> Self {
        Self {
            player_name,
            record,
        }
    }
}

/// Top performer for one category.
///
/// Scans left to right and replaces the running best only on a strictly
/// greater value, so the first line reaching the maximum wins ties.
/// An empty slice yields "N/A", 0.
pub fn top_performer(lines: &[NamedLine<'_>], category: StatCategory) -> Leader {
    let mut best: Option<(&str, i32)> = None;

    for line in lines {
        let value = line.record.category_value(category);
        match best {
            Some((_, best_value)) if value <= best_value => {}
            _ => best = Some((line.player_name, value)),
        }
    }

    best.map(|(name, value)| Leader::new(name, value))
        .unwrap_or_else(Leader::no_data)
}

/// Leaders in every tracked category for one game's lines.
pub fn game_leaders(lines: &[NamedLine<'_>]) -> GameLeaders {
    let mut leaders = GameLeaders::no_data();
    for category in StatCategory::ALL {
        leaders.set(category, top_performer(lines, category));
    }
    leaders
}
