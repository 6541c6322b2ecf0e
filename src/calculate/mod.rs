//! Statistics calculation engine.
//!
//! Pure computations over already-loaded data:
//! - Derived box score fields (field goals made, points)
//! - Per-category game leaders
//! - Permissive parsing of operator-entered counts

mod coerce;
mod leaders;

pub use coerce::*;
pub use leaders::*;

use serde::{Deserialize, Serialize};

/// Fields computed from made-shot counts rather than entered directly.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DerivedStats {
    pub field_goals_made: i32,
    pub points: i32,
}

/// Compute field goals made and points from made-shot counts.
///
/// Negative counts are not rejected; they flow through the arithmetic.
pub fn derive_stats(two_point_made: i32, three_point_made: i32, free_throw_made: i32) -> DerivedStats {
    let field_goals_made = two_point_made.saturating_add(three_point_made);
    let points = two_point_made
        .saturating_mul(2)
        .saturating_add(three_point_made.saturating_mul(3))
        .saturating_add(free_throw_made);

    DerivedStats {
        field_goals_made,
        points,
    }
}

/// [`derive_stats`] over raw form inputs, blanks and junk counting as 0.
pub fn derive_from_form(two_point_made: FormCount, three_point_made: FormCount, free_throw_made: FormCount) -> DerivedStats {
    derive_stats(
        two_point_made.value(),
        three_point_made.value(),
        free_throw_made.value(),
    )
}
