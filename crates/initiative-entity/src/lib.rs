//! # initiative-entity
//!
//! Domain models for a shared encounter. A [`Session`] owns an ordered
//! roster of [`Entity`] values; the order is the turn order. A session
//! renders itself into a [`SessionView`] per viewer role so that players
//! never see monster health.

pub mod entity;
pub mod session;
pub mod view;

pub use entity::{Entity, EntityKind};
pub use session::Session;
pub use view::{SessionView, Viewer};
