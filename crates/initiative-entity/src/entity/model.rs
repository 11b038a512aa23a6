//! Entity model.

use serde::{Deserialize, Serialize};

use initiative_core::types::{EntityId, SubscriberId};

use super::kind::EntityKind;

/// A player or monster occupying a slot in a session's turn order.
///
/// Entities are only created and destroyed through the session that owns
/// them. `seq` records insertion order and breaks initiative ties.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entity {
    /// Identifier, unique within the session.
    pub id: EntityId,
    /// Display name.
    pub name: String,
    /// Player or monster.
    #[serde(rename = "type")]
    pub kind: EntityKind,
    /// Current hit points.
    pub hp: i32,
    /// Maximum hit points.
    pub max_hp: i32,
    /// Initiative score.
    pub initiative: i32,
    /// Tie-break bonus (initiative modifier).
    pub bonus: i32,
    /// Free-form tags with set semantics, kept in insertion order.
    #[serde(default)]
    pub tags: Vec<String>,
    /// The subscriber who created this entity.
    #[serde(skip)]
    pub owner: Option<SubscriberId>,
    #[serde(skip)]
    pub(crate) seq: u64,
}

impl Entity {
    /// Build a player entity.
    pub fn player(
        name: impl Into<String>,
        initiative: i32,
        bonus: i32,
        owner: SubscriberId,
    ) -> Self {
        Self {
            id: EntityId::new(),
            name: name.into(),
            kind: EntityKind::Player,
            hp: 0,
            max_hp: 0,
            initiative,
            bonus,
            tags: Vec::new(),
            owner: Some(owner),
            seq: 0,
        }
    }

    /// Build a monster entity with full health.
    pub fn monster(
        name: impl Into<String>,
        hp: i32,
        initiative: i32,
        bonus: i32,
        owner: SubscriberId,
    ) -> Self {
        let hp = hp.max(0);
        Self {
            id: EntityId::new(),
            name: name.into(),
            kind: EntityKind::Monster,
            hp,
            max_hp: hp,
            initiative,
            bonus,
            tags: Vec::new(),
            owner: Some(owner),
            seq: 0,
        }
    }

    /// Whether this entity is a monster.
    pub fn is_monster(&self) -> bool {
        self.kind == EntityKind::Monster
    }

    /// Subtract damage, never dropping below zero. Negative amounts do
    /// nothing. Returns the new HP.
    pub fn apply_damage(&mut self, amount: i32) -> i32 {
        let amount = amount.max(0);
        self.hp = self.hp.saturating_sub(amount).max(0);
        self.hp
    }

    /// Overwrite current and maximum HP.
    ///
    /// Both values are floored at zero and the maximum is raised to at
    /// least the current value.
    pub fn set_health(&mut self, hp: i32, max_hp: i32) {
        self.hp = hp.max(0);
        self.max_hp = max_hp.max(0).max(self.hp);
    }

    /// Add a tag. Returns `false` if it was already present.
    pub fn add_tag(&mut self, tag: &str) -> bool {
        if self.tags.iter().any(|t| t == tag) {
            return false;
        }
        self.tags.push(tag.to_string());
        true
    }

    /// Remove a tag. Returns `false` if it was not present.
    pub fn remove_tag(&mut self, tag: &str) -> bool {
        let before = self.tags.len();
        self.tags.retain(|t| t != tag);
        self.tags.len() < before
    }

    /// Copy of this entity as a non-owner may see it.
    pub fn redacted(&self) -> Self {
        let mut out = self.clone();
        if out.kind.hides_health() {
            out.hp = 0;
            out.max_hp = 0;
        }
        out
    }
}
