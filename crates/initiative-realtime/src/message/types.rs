//! Inbound command and outbound state message definitions.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use initiative_core::types::EntityId;
use initiative_entity::SessionView;

use super::fields;

/// Name given to players added without one.
pub const DEFAULT_PLAYER_NAME: &str = "Player";
/// Name given to monsters added without one.
pub const DEFAULT_MONSTER_NAME: &str = "Monster";

/// The `{type, data}` envelope every inbound frame arrives in.
#[derive(Debug, Clone, Deserialize)]
pub struct RawEnvelope {
    /// Command kind.
    #[serde(rename = "type")]
    pub kind: String,
    /// Kind-specific fields. Absent or `null` reads as empty.
    #[serde(default)]
    pub data: Value,
}

/// Commands a connected client can send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundCommand {
    /// Add a player with a caller-supplied initiative.
    AddPlayer {
        /// Display name.
        name: String,
        /// Initiative score.
        initiative: i32,
        /// Initiative bonus.
        bonus: i32,
    },
    /// Add a player whose initiative is rolled.
    AddPlayerRoll {
        /// Display name.
        name: String,
        /// Initiative bonus, added to the roll.
        bonus: i32,
    },
    /// Add a monster at full health.
    AddMonster {
        /// Display name.
        name: String,
        /// Starting and maximum HP.
        hp: i32,
        /// Initiative score.
        initiative: i32,
        /// Initiative bonus.
        bonus: i32,
    },
    /// Damage a monster.
    Damage {
        /// Target, `None` if the id was missing or unreadable.
        id: Option<EntityId>,
        /// Damage amount.
        amount: i32,
    },
    /// Put entities in an explicit order.
    Reorder {
        /// Requested order.
        order: Vec<EntityId>,
    },
    /// Advance the turn.
    Next,
    /// Restore sorted order and restart at round 1.
    Reset,
    /// Remove an entity.
    DeleteEntity {
        /// Target.
        id: Option<EntityId>,
    },
    /// Rename an entity. `name` is `None` when blank.
    RenameEntity {
        /// Target.
        id: Option<EntityId>,
        /// New name.
        name: Option<String>,
    },
    /// Overwrite an entity's HP.
    EditEntityHp {
        /// Target.
        id: Option<EntityId>,
        /// Current HP.
        hp: i32,
        /// Maximum HP.
        max_hp: i32,
    },
    /// Tag an entity. `tag` is `None` when blank.
    AddEntityTag {
        /// Target.
        id: Option<EntityId>,
        /// Tag text.
        tag: Option<String>,
    },
    /// Untag an entity. `tag` is `None` when blank.
    RemoveEntityTag {
        /// Target.
        id: Option<EntityId>,
        /// Tag text.
        tag: Option<String>,
    },
    /// A `type` this server does not know.
    Unknown(String),
}

impl InboundCommand {
    /// Build a typed command from a parsed envelope.
    pub fn from_envelope(envelope: RawEnvelope) -> Self {
        let data = &envelope.data;
        match envelope.kind.as_str() {
            "addPlayer" => Self::AddPlayer {
                name: name_or(data, DEFAULT_PLAYER_NAME),
                initiative: fields::int(data, "initiative"),
                bonus: fields::int(data, "bonus"),
            },
            "addPlayerRoll" => Self::AddPlayerRoll {
                name: name_or(data, DEFAULT_PLAYER_NAME),
                bonus: fields::int(data, "bonus"),
            },
            "addMonster" => Self::AddMonster {
                name: name_or(data, DEFAULT_MONSTER_NAME),
                hp: fields::int(data, "hp"),
                initiative: fields::int(data, "initiative"),
                bonus: fields::int(data, "bonus"),
            },
            "damage" => Self::Damage {
                id: fields::entity_id(data, "id"),
                amount: fields::int(data, "dmg"),
            },
            "reorder" => Self::Reorder {
                order: fields::entity_ids(data, "order"),
            },
            "next" => Self::Next,
            "reset" => Self::Reset,
            "deleteEntity" => Self::DeleteEntity {
                id: fields::entity_id(data, "id"),
            },
            "renameEntity" => Self::RenameEntity {
                id: fields::entity_id(data, "id"),
                name: fields::trimmed(data, "name"),
            },
            "editEntityHP" => Self::EditEntityHp {
                id: fields::entity_id(data, "id"),
                hp: fields::int(data, "hp"),
                max_hp: fields::int(data, "maxHp"),
            },
            "addEntityTag" => Self::AddEntityTag {
                id: fields::entity_id(data, "id"),
                tag: fields::trimmed(data, "tag"),
            },
            "removeEntityTag" => Self::RemoveEntityTag {
                id: fields::entity_id(data, "id"),
                tag: fields::trimmed(data, "tag"),
            },
            _ => Self::Unknown(envelope.kind),
        }
    }

    /// Wire name of the command.
    pub fn kind(&self) -> &str {
        match self {
            Self::AddPlayer { .. } => "addPlayer",
            Self::AddPlayerRoll { .. } => "addPlayerRoll",
            Self::AddMonster { .. } => "addMonster",
            Self::Damage { .. } => "damage",
            Self::Reorder { .. } => "reorder",
            Self::Next => "next",
            Self::Reset => "reset",
            Self::DeleteEntity { .. } => "deleteEntity",
            Self::RenameEntity { .. } => "renameEntity",
            Self::EditEntityHp { .. } => "editEntityHP",
            Self::AddEntityTag { .. } => "addEntityTag",
            Self::RemoveEntityTag { .. } => "removeEntityTag",
            Self::Unknown(kind) => kind,
        }
    }

    /// Whether only the session owner may issue this command.
    pub fn requires_owner(&self) -> bool {
        !matches!(
            self,
            Self::AddPlayer { .. } | Self::AddPlayerRoll { .. } | Self::Next | Self::Unknown(_)
        )
    }
}

fn name_or(data: &Value, default: &str) -> String {
    fields::trimmed(data, "name").unwrap_or_else(|| default.to_string())
}

/// Messages sent by the server to the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "camelCase")]
pub enum OutboundMessage {
    /// Full session state as the receiving viewer may see it.
    State(SessionView),
}
