//! Core engine types: players, colours, elements, rounds, RNG, configuration
//! and errors.
//!
//! Everything here is leaf-level; no other module of the crate is imported.

pub mod config;
pub mod element;
pub mod error;
pub mod mana;
pub mod player;
pub mod rng;
pub mod round;

pub use config::{Hero, MatchConfig, PlayerConfig};
pub use element::{AttackRange, Element, Resistances};
pub use error::{Error, HistoryError, Result};
pub use mana::ManaColor;
pub use player::{PlayerId, PlayerMap};
pub use rng::{GameRng, GameRngState};
pub use round::{Round, TimeOfDay};
