//! Turn-order rule.
//!
//! Entities act in initiative order, highest first. Ties fall to the higher
//! bonus, then to whoever was added first.

use std::cmp::Ordering;
use std::collections::HashMap;

use initiative_core::types::EntityId;

use crate::entity::Entity;

/// Ordering of two entities under the turn-order rule.
pub fn turn_order(a: &Entity, b: &Entity) -> Ordering {
    b.initiative
        .cmp(&a.initiative)
        .then_with(|| b.bonus.cmp(&a.bonus))
        .then_with(|| a.seq.cmp(&b.seq))
}

/// Sort entities in place under the turn-order rule.
pub fn sort_turn_order(entities: &mut [Entity]) {
    entities.sort_by(turn_order);
}

/// Whether `entities` already satisfies the turn-order rule.
pub fn is_turn_ordered(entities: &[Entity]) -> bool {
    entities
        .windows(2)
        .all(|pair| turn_order(&pair[0], &pair[1]) != Ordering::Greater)
}

/// Rearrange entities to follow `ids`.
///
/// Named entities come first in the given order; unknown and repeated ids
/// are skipped. Every entity not named keeps its prior relative order after
/// them, so nothing is ever dropped.
pub fn apply_explicit_order(entities: &mut Vec<Entity>, ids: &[EntityId]) {
    let mut rank: HashMap<EntityId, usize> = HashMap::with_capacity(ids.len());
    for id in ids {
        let next = rank.len();
        rank.entry(*id).or_insert(next);
    }

    let mut indexed: Vec<(usize, Entity)> = std::mem::take(entities)
        .into_iter()
        .enumerate()
        .collect();

    indexed.sort_by_key(|(position, entity)| match rank.get(&entity.id) {
        Some(r) => (0, *r),
        None => (1, *position),
    });

    *entities = indexed.into_iter().map(|(_, entity)| entity).collect();
}
