//! Initiative dice.

use rand::Rng;

/// Source of d20 rolls for initiative.
pub trait DiceRoller: Send + Sync + std::fmt::Debug {
    /// Roll one twenty-sided die, uniform over 1..=20.
    fn roll_d20(&self) -> i32;
}

/// Rolls with the thread-local RNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadRngDice;

impl DiceRoller for ThreadRngDice {
    fn roll_d20(&self) -> i32 {
        rand::thread_rng().gen_range(1..=20)
    }
}
