//! Session command router.
//!
//! Every inbound frame becomes at most one store mutation, gated by the
//! sender's role, and is followed by a broadcast of the session's current
//! state. Misuse is logged and ignored; nothing here ends a connection.

use std::fmt::Display;
use std::sync::Arc;

use tracing::debug;

use initiative_core::AppResult;
use initiative_core::types::{SessionCode, SubscriberId};
use initiative_store::SessionStore;

use crate::hub::{BroadcastHub, BroadcastReport};
use crate::message::types::InboundCommand;
use crate::message::{serializer, validator};
use crate::metrics::{RealtimeMetrics, commands};

/// Who sent a command, and to which session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandContext {
    /// Target session.
    pub code: SessionCode,
    /// Sender identity.
    pub uid: SubscriberId,
    /// Whether the sender owns the session.
    pub is_owner: bool,
}

/// What became of one command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOutcome {
    /// Session state changed.
    Applied,
    /// Valid and permitted, but nothing changed.
    NoOp,
    /// Owner-only command from a non-owner.
    Unauthorized,
    /// The frame could not be read as a command.
    Malformed,
}

/// Routes commands from connections into the session store.
#[derive(Debug)]
pub struct CommandRouter {
    store: Arc<SessionStore>,
    hub: Arc<BroadcastHub>,
    metrics: Arc<RealtimeMetrics>,
    max_message_size: usize,
}

impl CommandRouter {
    /// Creates a new router.
    pub fn new(
        store: Arc<SessionStore>,
        hub: Arc<BroadcastHub>,
        metrics: Arc<RealtimeMetrics>,
        max_message_size: usize,
    ) -> Self {
        Self {
            store,
            hub,
            metrics,
            max_message_size,
        }
    }

    /// Handles one raw text frame, then broadcasts.
    pub fn handle_raw(&self, ctx: &CommandContext, raw: &str) -> CommandOutcome {
        let outcome = match self.parse(raw) {
            Ok(command) => self.apply(ctx, command),
            Err(e) => self.malformed(ctx, &e),
        };
        self.broadcast_current(&ctx.code);
        outcome
    }

    /// Handles one binary frame. Invalid UTF-8 is malformed but still
    /// followed by a broadcast.
    pub fn handle_bytes(&self, ctx: &CommandContext, raw: &[u8]) -> CommandOutcome {
        match std::str::from_utf8(raw) {
            Ok(text) => self.handle_raw(ctx, text),
            Err(e) => {
                let outcome = self.malformed(ctx, &e);
                self.broadcast_current(&ctx.code);
                outcome
            }
        }
    }

    /// Broadcasts the session's current state, if the session exists.
    ///
    /// Fanout happens under the session lock, so concurrent broadcasts
    /// reach each queue in mutation order and the last one queued always
    /// matches the stored state.
    pub fn broadcast_current(&self, code: &SessionCode) -> BroadcastReport {
        self.store
            .inspect(code, |session| self.hub.broadcast(code, session))
            .unwrap_or_default()
    }

    fn malformed(&self, ctx: &CommandContext, error: &dyn Display) -> CommandOutcome {
        commands::record_malformed(&self.metrics);
        debug!(session = %ctx.code, uid = %ctx.uid, error = %error, "Ignoring malformed frame");
        CommandOutcome::Malformed
    }

    fn parse(&self, raw: &str) -> AppResult<InboundCommand> {
        validator::validate_inbound(raw, self.max_message_size)?;
        Ok(serializer::deserialize_inbound(raw)?)
    }

    fn apply(&self, ctx: &CommandContext, command: InboundCommand) -> CommandOutcome {
        if command.requires_owner() && !ctx.is_owner {
            commands::record_ignored(&self.metrics);
            debug!(
                session = %ctx.code,
                uid = %ctx.uid,
                command = command.kind(),
                reason = "unauthorized",
                "Command ignored"
            );
            return CommandOutcome::Unauthorized;
        }

        let kind = command.kind().to_string();
        let store = &self.store;
        let (code, uid) = (&ctx.code, &ctx.uid);

        let changed = match command {
            InboundCommand::AddPlayer {
                name,
                initiative,
                bonus,
            } => store.add_player(code, uid, &name, initiative, bonus).is_some(),
            InboundCommand::AddPlayerRoll { name, bonus } => {
                store.add_player_with_roll(code, uid, &name, bonus).is_some()
            }
            InboundCommand::AddMonster {
                name,
                hp,
                initiative,
                bonus,
            } => store
                .add_monster(code, uid, &name, hp, bonus, initiative)
                .is_some(),
            InboundCommand::Damage { id, amount } => {
                id.is_some_and(|id| store.damage_monster(code, uid, id, amount))
            }
            InboundCommand::Reorder { order } => store.reorder(code, uid, &order),
            InboundCommand::Next => store.next_turn(code),
            InboundCommand::Reset => store.reset_initiative(code, uid),
            InboundCommand::DeleteEntity { id } => {
                id.is_some_and(|id| store.delete_entity(code, uid, id))
            }
            InboundCommand::RenameEntity { id, name } => match (id, name) {
                (Some(id), Some(name)) => store.rename_entity(code, uid, id, &name),
                _ => false,
            },
            InboundCommand::EditEntityHp { id, hp, max_hp } => {
                id.is_some_and(|id| store.edit_entity_hp(code, uid, id, hp, max_hp))
            }
            InboundCommand::AddEntityTag { id, tag } => match (id, tag) {
                (Some(id), Some(tag)) => store.add_entity_tag(code, uid, id, &tag),
                _ => false,
            },
            InboundCommand::RemoveEntityTag { id, tag } => match (id, tag) {
                (Some(id), Some(tag)) => store.remove_entity_tag(code, uid, id, &tag),
                _ => false,
            },
            InboundCommand::Unknown(_) => {
                debug!(session = %code, command = %kind, reason = "unknown", "Command ignored");
                false
            }
        };

        if changed {
            commands::record_applied(&self.metrics);
            CommandOutcome::Applied
        } else {
            commands::record_ignored(&self.metrics);
            debug!(session = %code, uid = %uid, command = %kind, "Command changed nothing");
            CommandOutcome::NoOp
        }
    }
}
