//! # initiative-store
//!
//! Holds the authoritative state of every live session. Each session sits
//! behind its own lock, so commands for one session are linearized while
//! unrelated sessions never wait on each other.

pub mod code;
pub mod dice;
pub mod store;

pub use code::CodeGenerator;
pub use dice::{DiceRoller, ThreadRngDice};
pub use store::SessionStore;
