//! Encounter sessions and their turn order.

pub mod model;
pub mod order;

pub use model::Session;
