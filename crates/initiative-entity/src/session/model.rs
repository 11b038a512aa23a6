//! Session model.

use initiative_core::types::{EntityId, SessionCode, SubscriberId};

use super::order;
use crate::entity::Entity;
use crate::view::{SessionView, Viewer};

/// One shared encounter.
///
/// Invariants:
/// - `turn` indexes into `entities`, or is 0 when `entities` is empty.
/// - `round` starts at 1 and only grows, except on [`Session::reset_initiative`].
/// - `owner` is fixed at creation.
#[derive(Debug, Clone)]
pub struct Session {
    code: SessionCode,
    owner: SubscriberId,
    entities: Vec<Entity>,
    round: u32,
    turn: usize,
    next_seq: u64,
}

impl Session {
    /// Create an empty session owned by `owner`.
    pub fn new(code: SessionCode, owner: SubscriberId) -> Self {
        Self {
            code,
            owner,
            entities: Vec::new(),
            round: 1,
            turn: 0,
            next_seq: 0,
        }
    }

    /// The session code.
    pub fn code(&self) -> &SessionCode {
        &self.code
    }

    /// The owner's subscriber id.
    pub fn owner(&self) -> &SubscriberId {
        &self.owner
    }

    /// Whether `subscriber` is the session owner.
    pub fn is_owner(&self, subscriber: &SubscriberId) -> bool {
        &self.owner == subscriber
    }

    /// Entities in turn order.
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    /// Current round, starting at 1.
    pub fn round(&self) -> u32 {
        self.round
    }

    /// Index of the entity whose turn it is.
    pub fn turn(&self) -> usize {
        self.turn
    }

    /// Look up an entity by id.
    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.iter().find(|e| e.id == id)
    }

    /// Mutable lookup for single-entity edits that don't affect ordering.
    pub fn entity_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.iter_mut().find(|e| e.id == id)
    }

    /// Insert an entity and restore turn order. Returns its id.
    pub fn add_entity(&mut self, mut entity: Entity) -> EntityId {
        entity.seq = self.next_seq;
        self.next_seq += 1;
        let id = entity.id;
        self.restructure(|entities| {
            entities.push(entity);
            order::sort_turn_order(entities);
        });
        id
    }

    /// Remove an entity. Returns it if it existed.
    pub fn remove_entity(&mut self, id: EntityId) -> Option<Entity> {
        let position = self.entities.iter().position(|e| e.id == id)?;
        let mut removed = None;
        self.restructure(|entities| {
            removed = Some(entities.remove(position));
        });
        removed
    }

    /// Replace the turn order with `ids`, keeping every unnamed entity
    /// after them in prior relative order.
    pub fn reorder(&mut self, ids: &[EntityId]) {
        self.restructure(|entities| order::apply_explicit_order(entities, ids));
    }

    /// Advance to the next turn, wrapping into a new round.
    pub fn next_turn(&mut self) {
        if self.entities.is_empty() {
            return;
        }
        self.turn += 1;
        if self.turn >= self.entities.len() {
            self.turn = 0;
            self.round += 1;
        }
    }

    /// Restore the turn-order rule from existing initiative values and
    /// start over at round 1, first turn.
    pub fn reset_initiative(&mut self) {
        order::sort_turn_order(&mut self.entities);
        self.turn = 0;
        self.round = 1;
    }

    /// Render the session for a viewer.
    pub fn view(&self, viewer: Viewer) -> SessionView {
        SessionView::render(self, viewer)
    }

    /// Apply a structural change while keeping the turn cursor on the
    /// entity whose turn it was.
    fn restructure(&mut self, change: impl FnOnce(&mut Vec<Entity>)) {
        let current = self.entities.get(self.turn).map(|e| e.id);
        change(&mut self.entities);

        let kept = current.and_then(|id| self.entities.iter().position(|e| e.id == id));
        self.turn = match kept {
            Some(index) => index,
            None if self.turn < self.entities.len() => self.turn,
            None => 0,
        };
    }
}
