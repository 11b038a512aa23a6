//! Turn-order participants.

pub mod kind;
pub mod model;

pub use kind::EntityKind;
pub use model::Entity;
