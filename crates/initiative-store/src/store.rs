//! Session store: authoritative state for every live session.
//!
//! Locking discipline: the map only guards membership. Each session lives
//! behind its own `Mutex`, and the map shard lock is released before that
//! mutex is taken, so a slow command in one session never stalls another.
//! Critical sections are pure in-memory work with no I/O.

use std::sync::Arc;

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use parking_lot::Mutex;
use tracing::{debug, info, warn};

use initiative_core::config::SessionConfig;
use initiative_core::types::{EntityId, SessionCode, SubscriberId};
use initiative_entity::{Entity, Session};

use crate::code::CodeGenerator;
use crate::dice::{DiceRoller, ThreadRngDice};

/// Random codes tried per length before generated codes get longer.
const GENERATE_ATTEMPTS: usize = 16;

/// Thread-safe registry of sessions keyed by code.
///
/// Mutations for unknown sessions or entities are logged no-ops and report
/// `false`/`None`; nothing here returns an error to the caller.
#[derive(Debug)]
pub struct SessionStore {
    /// Session code → session behind its own lock.
    sessions: DashMap<SessionCode, Arc<Mutex<Session>>>,
    /// Generator for codes requested blank.
    codes: CodeGenerator,
    /// Initiative dice.
    dice: Arc<dyn DiceRoller>,
}

impl SessionStore {
    /// Creates an empty store.
    pub fn new(config: &SessionConfig) -> Self {
        Self::with_dice(config, Arc::new(ThreadRngDice))
    }

    /// Creates an empty store with a custom dice source.
    pub fn with_dice(config: &SessionConfig, dice: Arc<dyn DiceRoller>) -> Self {
        Self {
            sessions: DashMap::new(),
            codes: CodeGenerator::new(config.code_length),
            dice,
        }
    }

    /// Returns the session for `raw_code`, creating it with `requester` as
    /// owner if it does not exist. A blank code creates a session under a
    /// freshly generated unique code. Existing sessions are returned
    /// unchanged.
    pub fn create_or_get(&self, raw_code: &str, requester: &SubscriberId) -> Session {
        let slot = match SessionCode::parse(raw_code) {
            Some(code) => self.get_or_insert(code, requester),
            None => self.insert_generated(requester),
        };
        let snapshot = slot.lock().clone();
        snapshot
    }

    /// Snapshot of a session, if it exists.
    pub fn get(&self, code: &SessionCode) -> Option<Session> {
        let slot = self.slot(code)?;
        let snapshot = slot.lock().clone();
        Some(snapshot)
    }

    /// Runs `op` against a session while holding its lock.
    ///
    /// Readers that publish what they see (fanout, initial push) go through
    /// here so their output is ordered with every mutation of the session.
    /// `op` must not block.
    pub fn inspect<R>(&self, code: &SessionCode, op: impl FnOnce(&Session) -> R) -> Option<R> {
        let slot = self.slot(code)?;
        let session = slot.lock();
        Some(op(&session))
    }

    /// Whether a session exists.
    pub fn contains(&self, code: &SessionCode) -> bool {
        self.sessions.contains_key(code)
    }

    /// Number of live sessions.
    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    /// Appends a player with a caller-supplied initiative.
    pub fn add_player(
        &self,
        code: &SessionCode,
        requester: &SubscriberId,
        name: &str,
        initiative: i32,
        bonus: i32,
    ) -> Option<EntityId> {
        let entity = Entity::player(name, initiative, bonus, requester.clone());
        self.with_session(code, "add_player", |session| session.add_entity(entity))
    }

    /// Appends a player whose initiative is a d20 roll plus `bonus`.
    pub fn add_player_with_roll(
        &self,
        code: &SessionCode,
        requester: &SubscriberId,
        name: &str,
        bonus: i32,
    ) -> Option<EntityId> {
        let initiative = self.dice.roll_d20().saturating_add(bonus);
        debug!(session = %code, requester = %requester, initiative, "Rolled initiative");
        self.add_player(code, requester, name, initiative, bonus)
    }

    /// Appends a monster at full health.
    pub fn add_monster(
        &self,
        code: &SessionCode,
        requester: &SubscriberId,
        name: &str,
        hp: i32,
        bonus: i32,
        initiative: i32,
    ) -> Option<EntityId> {
        let entity = Entity::monster(name, hp, initiative, bonus, requester.clone());
        self.with_session(code, "add_monster", |session| session.add_entity(entity))
    }

    /// Damages a monster, flooring its HP at zero.
    pub fn damage_monster(
        &self,
        code: &SessionCode,
        requester: &SubscriberId,
        entity_id: EntityId,
        amount: i32,
    ) -> bool {
        self.with_entity(code, requester, entity_id, "damage_monster", |entity| {
            if !entity.is_monster() {
                debug!(entity_id = %entity.id, "Damage target is not a monster");
                return false;
            }
            entity.apply_damage(amount);
            true
        })
    }

    /// Replaces the turn order with `ordered`, appending unnamed entities.
    pub fn reorder(
        &self,
        code: &SessionCode,
        requester: &SubscriberId,
        ordered: &[EntityId],
    ) -> bool {
        debug!(session = %code, requester = %requester, count = ordered.len(), "Reorder");
        self.with_session(code, "reorder", |session| session.reorder(ordered))
            .is_some()
    }

    /// Advances the turn, wrapping into the next round.
    pub fn next_turn(&self, code: &SessionCode) -> bool {
        self.with_session(code, "next_turn", |session| {
            let before = (session.turn(), session.round());
            session.next_turn();
            before != (session.turn(), session.round())
        })
        .unwrap_or(false)
    }

    /// Restores turn order from initiative values and restarts at round 1.
    pub fn reset_initiative(&self, code: &SessionCode, requester: &SubscriberId) -> bool {
        debug!(session = %code, requester = %requester, "Reset initiative");
        self.with_session(code, "reset_initiative", Session::reset_initiative)
            .is_some()
    }

    /// Removes an entity.
    pub fn delete_entity(
        &self,
        code: &SessionCode,
        requester: &SubscriberId,
        entity_id: EntityId,
    ) -> bool {
        let removed = self
            .with_session(code, "delete_entity", |session| {
                session.remove_entity(entity_id)
            })
            .flatten();

        match removed {
            Some(entity) => {
                debug!(session = %code, requester = %requester, entity_id = %entity.id, "Entity deleted");
                true
            }
            None => {
                debug!(session = %code, entity_id = %entity_id, "Delete target not found");
                false
            }
        }
    }

    /// Renames an entity. Blank names are ignored.
    pub fn rename_entity(
        &self,
        code: &SessionCode,
        requester: &SubscriberId,
        entity_id: EntityId,
        name: &str,
    ) -> bool {
        let name = name.trim();
        if name.is_empty() {
            return false;
        }
        self.with_entity(code, requester, entity_id, "rename_entity", |entity| {
            entity.name = name.to_string();
            true
        })
    }

    /// Overwrites an entity's current and maximum HP.
    pub fn edit_entity_hp(
        &self,
        code: &SessionCode,
        requester: &SubscriberId,
        entity_id: EntityId,
        hp: i32,
        max_hp: i32,
    ) -> bool {
        self.with_entity(code, requester, entity_id, "edit_entity_hp", |entity| {
            entity.set_health(hp, max_hp);
            true
        })
    }

    /// Adds a tag to an entity. Blank tags are ignored.
    pub fn add_entity_tag(
        &self,
        code: &SessionCode,
        requester: &SubscriberId,
        entity_id: EntityId,
        tag: &str,
    ) -> bool {
        let tag = tag.trim();
        if tag.is_empty() {
            return false;
        }
        self.with_entity(code, requester, entity_id, "add_entity_tag", |entity| {
            entity.add_tag(tag)
        })
    }

    /// Removes a tag from an entity. Blank tags are ignored.
    pub fn remove_entity_tag(
        &self,
        code: &SessionCode,
        requester: &SubscriberId,
        entity_id: EntityId,
        tag: &str,
    ) -> bool {
        let tag = tag.trim();
        if tag.is_empty() {
            return false;
        }
        self.with_entity(code, requester, entity_id, "remove_entity_tag", |entity| {
            entity.remove_tag(tag)
        })
    }

    /// Clones the session handle out of the map, releasing the shard lock.
    fn slot(&self, code: &SessionCode) -> Option<Arc<Mutex<Session>>> {
        self.sessions.get(code).map(|entry| Arc::clone(entry.value()))
    }

    fn get_or_insert(&self, code: SessionCode, requester: &SubscriberId) -> Arc<Mutex<Session>> {
        match self.sessions.entry(code) {
            Entry::Occupied(entry) => Arc::clone(entry.get()),
            Entry::Vacant(entry) => {
                info!(session = %entry.key(), owner = %requester, "Session created");
                let session = Session::new(entry.key().clone(), requester.clone());
                Arc::clone(entry.insert(Arc::new(Mutex::new(session))).value())
            }
        }
    }

    /// Inserts a session under a random unused code. After
    /// `GENERATE_ATTEMPTS` collisions at one length the code grows by one
    /// character, so a crowded code space cannot stall the caller.
    fn insert_generated(&self, requester: &SubscriberId) -> Arc<Mutex<Session>> {
        let mut length = self.codes.length();
        loop {
            for _ in 0..GENERATE_ATTEMPTS {
                let code = self.codes.generate_with_length(length);
                if let Entry::Vacant(entry) = self.sessions.entry(code) {
                    info!(session = %entry.key(), owner = %requester, "Session created with generated code");
                    let session = Session::new(entry.key().clone(), requester.clone());
                    return Arc::clone(entry.insert(Arc::new(Mutex::new(session))).value());
                }
            }
            warn!(length, "Generated codes keep colliding; lengthening");
            length += 1;
        }
    }

    /// Runs `op` under the session's lock.
    fn with_session<R>(
        &self,
        code: &SessionCode,
        action: &'static str,
        op: impl FnOnce(&mut Session) -> R,
    ) -> Option<R> {
        let Some(slot) = self.slot(code) else {
            debug!(session = %code, action, "Session not found");
            return None;
        };
        let mut session = slot.lock();
        Some(op(&mut session))
    }

    /// Runs `op` on one entity under the session's lock.
    fn with_entity(
        &self,
        code: &SessionCode,
        requester: &SubscriberId,
        entity_id: EntityId,
        action: &'static str,
        op: impl FnOnce(&mut Entity) -> bool,
    ) -> bool {
        let applied = self.with_session(code, action, |session| {
            session.entity_mut(entity_id).map(op)
        });

        match applied.flatten() {
            Some(changed) => changed,
            None => {
                debug!(
                    session = %code,
                    requester = %requester,
                    entity_id = %entity_id,
                    action,
                    "Entity not found"
                );
                false
            }
        }
    }
}
