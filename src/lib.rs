//! # mage-knight-engine
//!
//! A rules engine for the Mage Knight board game: single player or local
//! hotseat, with every player action undoable until hidden information is
//! revealed.
//!
//! ## Design Principles
//!
//! 1. **Every change is a recorded edit**: actions plan small invertible
//!    [`game::Change`]s and push them onto a [`stack::TransactionStack`].
//!    One action is one macro; a failing action rolls back completely.
//!
//! 2. **Effects are values**: move, influence, attack, block and heal
//!    points, mana tokens and rule modifiers are [`effects::Effect`]s
//!    banked in an [`effects::EffectList`], merged per kind and spent by
//!    removal.
//!
//! 3. **Randomness is explicit**: drawing cards, rolling dice and turning
//!    enemies face up go through `Match::reveal`, which clears the undo
//!    history. Everything else is deterministic from the seed.
//!
//! ## Modules
//!
//! - `core`: players, mana colours, elements, rounds, RNG, config, errors
//! - `stack`: the undo/redo transaction stack with nested macros
//! - `effects`: effect algebra and the active effect list
//! - `source`: the mana source dice
//! - `cards`: card and unit definitions, the offers
//! - `enemies`: enemy tokens and their face-down piles
//! - `map`: hexes, terrain, tiles and sites
//! - `combat`: the combat state machine and its resolution maths
//! - `game`: the match, its players, phases and actions

pub mod core;
pub mod stack;
pub mod effects;
pub mod source;
pub mod cards;
pub mod enemies;
pub mod map;
pub mod combat;
pub mod game;

// Re-export commonly used types
pub use crate::core::{Error, ManaColor, MatchConfig, PlayerId, Result};
pub use crate::effects::{Effect, EffectList};
pub use crate::game::{Match, Phase};
