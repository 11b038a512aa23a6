//! Per-role session views.

use serde::{Deserialize, Serialize};

use initiative_core::types::{SessionCode, SubscriberId};

use crate::entity::Entity;
use crate::session::Session;

/// Which role a view is rendered for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Viewer {
    /// The session owner sees everything.
    Owner,
    /// Everyone else sees monsters with zeroed health.
    Participant,
}

impl Viewer {
    /// Role of `subscriber` within `session`.
    pub fn of(session: &Session, subscriber: &SubscriberId) -> Self {
        if session.is_owner(subscriber) {
            Self::Owner
        } else {
            Self::Participant
        }
    }
}

/// Full-state snapshot of a session as one viewer may see it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionView {
    /// Session code.
    pub group: SessionCode,
    /// Round counter.
    pub round: u32,
    /// Index of the acting entity.
    pub turn: usize,
    /// Owner identity, so clients can tell whose view this is.
    #[serde(rename = "dmUid")]
    pub dm_uid: SubscriberId,
    /// Entities in turn order.
    pub entries: Vec<Entity>,
}

impl SessionView {
    /// Render `session` for `viewer`.
    pub fn render(session: &Session, viewer: Viewer) -> Self {
        let entries = match viewer {
            Viewer::Owner => session.entities().to_vec(),
            Viewer::Participant => session.entities().iter().map(Entity::redacted).collect(),
        };

        Self {
            group: session.code().clone(),
            round: session.round(),
            turn: session.turn(),
            dm_uid: session.owner().clone(),
            entries,
        }
    }
}
