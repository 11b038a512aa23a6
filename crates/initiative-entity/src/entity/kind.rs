//! Entity kind enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Whether an entity is a player character or a monster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    /// A player character. HP is visible to everyone.
    Player,
    /// A monster controlled by the session owner. HP is owner-only.
    Monster,
}

impl EntityKind {
    /// Whether this kind's health is hidden from non-owners.
    pub fn hides_health(&self) -> bool {
        matches!(self, Self::Monster)
    }

    /// Return the kind as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Player => "player",
            Self::Monster => "monster",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
