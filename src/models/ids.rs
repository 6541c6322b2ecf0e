//! Content-hash entity IDs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// Identifier of a stored league entity.
///
/// New IDs are the first 16 hex characters of a SHA256 over the entity's
/// identifying fields, so the same inputs always hash to the same ID.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(String);

impl EntityId {
    pub fn new(id: String) -> Self {
        Self(id)
    }

    /// Hash `fields` joined with `|` into an ID.
    pub fn generate(fields: &[&str]) -> Self {
        let mut hasher = Sha256::new();
        for (i, field) in fields.iter().enumerate() {
            if i > 0 {
                hasher.update(b"|");
            }
            hasher.update(field.as_bytes());
        }
        let hash = hex::encode(hasher.finalize());
        Self(hash[..16].to_string())
    }

    /// Hash `fields` together with the entity kind and its creation instant.
    ///
    /// Two teams with the same name created at different times get different IDs.
    pub fn for_new(kind: &str, fields: &[&str], created_at: DateTime<Utc>) -> Self {
        let stamp = created_at.to_rfc3339_opts(chrono::SecondsFormat::Nanos, true);
        let mut all = Vec::with_capacity(fields.len() + 2);
        all.push(kind);
        all.extend_from_slice(fields);
        all.push(&stamp);
        Self::generate(&all)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EntityId({})", self.0)
    }
}

impl From<String> for EntityId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for EntityId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

pub type TeamId = EntityId;
pub type PlayerId = EntityId;
pub type GameId = EntityId;
pub type StatRecordId = EntityId;

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_generate_is_deterministic() {
        let a = EntityId::generate(&["team", "Falcons"]);
        let b = EntityId::generate(&["team", "Falcons"]);
        assert_eq!(a, b);
        assert_eq!(a.as_str().len(), 16);
        assert!(a.as_str().chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_for_new_differs_by_timestamp() {
        let t1 = Utc.with_ymd_and_hms(2026, 1, 5, 18, 0, 0).unwrap();
        let t2 = Utc.with_ymd_and_hms(2026, 1, 5, 18, 0, 1).unwrap();
        let a = EntityId::for_new("team", &["Falcons"], t1);
        let b = EntityId::for_new("team", &["Falcons"], t2);
        assert_ne!(a, b);
        assert_eq!(a, EntityId::for_new("team", &["Falcons"], t1));
    }

    #[test]
    fn test_for_new_differs_by_kind() {
        let t = Utc.with_ymd_and_hms(2026, 1, 5, 18, 0, 0).unwrap();
        assert_ne!(
            EntityId::for_new("team", &["Ali"], t),
            EntityId::for_new("player", &["Ali"], t)
        );
    }

    #[test]
    fn test_serializes_as_plain_string() {
        let id = EntityId::from("g-1");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"g-1\"");
        let back: EntityId = serde_json::from_str("\"g-1\"").unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn test_display_and_debug() {
        let id = EntityId::new("abc123".to_string());
        assert_eq!(id.to_string(), "abc123");
        assert_eq!(format!("{:?}", id), "EntityId(abc123)");
    }
}
