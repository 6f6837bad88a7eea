//! Mana source.
//!
//! The source holds `players + 2` dice. Each turn a player may take one
//! die (more with effects like Mana Draw). Black dice are unusable by day,
//! gold dice by night. Taken dice are re-rolled and returned at the end of
//! the turn, and the whole source is re-rolled at the start of a round.

mod dice;

pub use dice::{ManaSource, SourceEdit};
